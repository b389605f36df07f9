//! Integration tests for the course resolver

#![allow(clippy::expect_used, clippy::unwrap_used)]

use mhf_protocol::config::CourseConfig;
use mhf_protocol::course::{self, resolve, resolve_with_config, Course};
use proptest::prelude::*;

fn ids(courses: &[Course]) -> Vec<u16> {
    courses.iter().map(|c| c.id).collect()
}

const ANCHOR_BITS: u32 = (1 << course::N) | (1 << course::NET_CAFE);

#[test]
fn test_net_cafe_only() {
    let (courses, normalized) = resolve(1 << 26, &[]);
    assert_eq!(ids(&courses), vec![26, 25]);
    assert_eq!(normalized, (1 << 26) + (1 << 25));
}

#[test]
fn test_both_anchors() {
    let (courses, normalized) = resolve(ANCHOR_BITS, &[]);
    assert_eq!(
        ids(&courses),
        vec![
            course::NET_CAFE,
            course::CAFE_SP,
            course::N,
            course::REAL_NET_CAFE
        ]
    );
    assert_eq!(normalized, (1 << 26) + (1 << 25) + (1 << 9) + (1 << 30));
}

#[test]
fn test_anchor_with_companion_bit_counts_twice() {
    // CAFE_SP already in the mask and synthesised again from NetCafe.
    let (courses, normalized) = resolve((1 << 26) | (1 << 25), &[]);
    assert_eq!(ids(&courses), vec![26, 25, 25]);
    assert_eq!(normalized, (1 << 26) + (1 << 25) + (1 << 25));
}

#[test]
fn test_defaults_seed_without_expiry() {
    let (courses, normalized) = resolve(0, &[course::TRIAL]);
    assert_eq!(courses, vec![Course::new(course::TRIAL)]);
    assert_eq!(normalized, 2);
}

#[test]
fn test_mask_courses_expire_in_2030_jst() {
    let (courses, _) = resolve(1 << course::HUNTER_LIFE, &[]);
    let expiry = courses[0].expiry.expect("mask course has expiry");
    assert_eq!(expiry.to_rfc3339(), "2030-01-01T00:00:00+09:00");
}

#[test]
fn test_high_bit_wraps_on_normalisation() {
    // Bit 31 with a default of 31 sums past u32::MAX.
    let (courses, normalized) = resolve(1 << 31, &[31]);
    assert_eq!(ids(&courses), vec![31, 31]);
    assert_eq!(normalized, 0);
}

#[test]
fn test_resolve_with_config_uses_aliases() {
    let config = CourseConfig {
        default_courses: vec!["trial".into(), "HunterLife".into()],
        enabled: Vec::new(),
    };
    let (courses, normalized) = resolve_with_config(1 << course::EXTRA, &config);
    assert_eq!(
        ids(&courses),
        vec![course::TRIAL, course::HUNTER_LIFE, course::EXTRA]
    );
    assert_eq!(normalized, 0b1110);
}

proptest! {
    #[test]
    fn prop_plain_bits_idempotent(rights in any::<u32>()) {
        let rights = rights & !ANCHOR_BITS;
        let (courses, normalized) = resolve(rights, &[]);
        prop_assert_eq!(normalized, rights);
        prop_assert_eq!(courses.len() as u32, rights.count_ones());
    }

    #[test]
    fn prop_output_descends_after_defaults(rights in any::<u32>()) {
        let rights = rights & !ANCHOR_BITS;
        let (courses, _) = resolve(rights, &[course::TRIAL]);
        prop_assert_eq!(courses[0].id, course::TRIAL);
        let rest = ids(&courses[1..]);
        prop_assert!(rest.windows(2).all(|pair| pair[0] > pair[1]));
    }
}
