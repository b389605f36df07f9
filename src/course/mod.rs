//! # Courses
//!
//! Entitlement resolution for the per-character rights bitmask.
//!
//! Every course owns one bit of a `u32` mask (`value = 2^id`). The resolver turns a stored mask
//! into the list of [`Course`] entries sent to the client, synthesising the extra courses implied
//! by the two net-cafe anchor bits, and returns the mask recomputed from that list.
//!
//! ## Anchors
//! - **NetCafe (26)** implies **CAFE_SP (25)**
//! - **N (9)** implies the real net-cafe course (30)
//!
//! The resolver is a pure function over read-only tables and is safe to call from any task.

use crate::config::CourseConfig;
use chrono::{DateTime, FixedOffset, TimeZone};
use tracing::debug;

pub const TRIAL: u16 = 1;
pub const HUNTER_LIFE: u16 = 2;
pub const EXTRA: u16 = 3;
pub const EXTRA_B: u16 = 4;
pub const MOBILE: u16 = 5;
pub const PREMIUM: u16 = 6;
pub const PALLONE: u16 = 7;
pub const ASSIST: u16 = 8;
pub const N: u16 = 9;
pub const HIDEN: u16 = 10;
pub const HUNTER_SUPPORT: u16 = 11;
pub const N_BOOST: u16 = 12;
pub const DEBUG: u16 = 20;
pub const COG_LINK_EXPIRED: u16 = 21;
pub const GOLD_360: u16 = 22;
pub const PS3_TROP: u16 = 23;
pub const COG: u16 = 24;
pub const CAFE_SP: u16 = 25;
pub const NET_CAFE: u16 = 26;
pub const HL_RENEWING: u16 = 27;
pub const EX_RENEWING: u16 = 28;
pub const FREE: u16 = 29;
pub const REAL_NET_CAFE: u16 = 30;

/// Number of course IDs a rights mask can describe
pub const COURSE_COUNT: u16 = 32;

/// Seconds east of UTC for the fixed expiry (JST)
const EXPIRY_OFFSET_SECS: i32 = 9 * 60 * 60;

const ALIASES: &[(u16, &[&str])] = &[
    (TRIAL, &["Trial", "TL"]),
    (HUNTER_LIFE, &["HunterLife", "HL"]),
    (EXTRA, &["Extra", "ExtraA", "EX"]),
    (EXTRA_B, &["ExtraB"]),
    (MOBILE, &["Mobile"]),
    (PREMIUM, &["Premium"]),
    (PALLONE, &["Pallone", "ExtraC"]),
    (ASSIST, &["Assist", "***ist", "Legend", "Rasta"]),
    (N, &["N"]),
    (HIDEN, &["Hiden", "Secret"]),
    (
        HUNTER_SUPPORT,
        &["HunterSupport", "HunterAid", "Support", "Aid", "Royal"],
    ),
    (N_BOOST, &["NBoost", "NetCafeBoost", "Boost"]),
    (DEBUG, &["DEBUG"]),
    (COG_LINK_EXPIRED, &["COG_LINK_EXPIRED"]),
    (GOLD_360, &["360_GOLD"]),
    (PS3_TROP, &["PS3_TROP"]),
    (COG, &["COG"]),
    (CAFE_SP, &["CAFE_SP"]),
    (NET_CAFE, &["NetCafe", "Cafe", "OfficialCafe", "Official"]),
    (
        HL_RENEWING,
        &["HLRenewing", "HLR", "HLRenewal", "HLRenew", "CardHL"],
    ),
    (
        EX_RENEWING,
        &["EXRenewing", "EXR", "EXRenewal", "EXRenew", "CardEX"],
    ),
    (FREE, &["Free"]),
];

/// One entitlement owned by a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Course {
    pub id: u16,
    /// `None` for defaults and synthesised courses
    pub expiry: Option<DateTime<FixedOffset>>,
}

impl Course {
    /// A course without an expiry.
    pub const fn new(id: u16) -> Self {
        Self { id, expiry: None }
    }

    pub fn with_expiry(id: u16, expiry: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            expiry: Some(expiry),
        }
    }

    /// Bit value of this course in a rights mask; `0` for IDs outside the mask.
    pub fn value(&self) -> u32 {
        1u32.checked_shl(u32::from(self.id)).unwrap_or(0)
    }

    /// Operator-facing names, empty for unnamed IDs.
    pub fn aliases(&self) -> &'static [&'static str] {
        ALIASES
            .iter()
            .find(|(id, _)| *id == self.id)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    pub fn name(&self) -> Option<&'static str> {
        self.aliases().first().copied()
    }

    /// Whether the resolver synthesises this course from an anchor bit.
    pub fn is_virtual(&self) -> bool {
        self.id == CAFE_SP || self.id == REAL_NET_CAFE
    }

    /// Expiry as Unix seconds, `0` when unbounded.
    pub fn expiry_unix(&self) -> u32 {
        self.expiry
            .and_then(|at| u32::try_from(at.timestamp()).ok())
            .unwrap_or(0)
    }
}

/// Every course ID a mask can carry, ascending, without expiry.
pub fn all_courses() -> Vec<Course> {
    (0..COURSE_COUNT).map(Course::new).collect()
}

/// Look up a course ID by any of its aliases, ignoring ASCII case.
pub fn find_by_alias(name: &str) -> Option<u16> {
    ALIASES
        .iter()
        .find(|(_, names)| names.iter().any(|alias| alias.eq_ignore_ascii_case(name)))
        .map(|(id, _)| *id)
}

pub fn course_exists(id: u16, courses: &[Course]) -> bool {
    courses.iter().any(|course| course.id == id)
}

/// Expiry stamped on every course derived from the mask: 2030-01-01T00:00:00+09:00.
pub fn fixed_expiry() -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(EXPIRY_OFFSET_SECS)
        .and_then(|tz| tz.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single())
}

/// Resolve a rights mask into the course list, seeded with `defaults`.
///
/// IDs are walked from 31 down to 0. A bit counts as set when `rights - 2^id` does not wrap past
/// `0x8000_0000`; each hit is appended with [`fixed_expiry`] and subtracted from `rights`. An anchor
/// hit appends its virtual companion right after the anchor, once per resolution, so a NetCafe
/// mask resolves to `[NetCafe, CafeSP]` and not companion-first.
///
/// The returned mask is the wrapping sum of `2^id` over the whole list, duplicates included.
pub fn resolve(rights: u32, defaults: &[u16]) -> (Vec<Course>, u32) {
    let expiry = fixed_expiry();
    let mut resolved: Vec<Course> = defaults.iter().copied().map(Course::new).collect();
    let mut remaining = rights;
    let mut cafe_sp_set = false;
    let mut real_net_cafe_set = false;

    for id in (0..COURSE_COUNT).rev() {
        let mut course = Course::new(id);
        if remaining.wrapping_sub(course.value()) >= 0x8000_0000 {
            continue;
        }

        course.expiry = expiry;
        resolved.push(course);

        match id {
            NET_CAFE if !cafe_sp_set => {
                cafe_sp_set = true;
                resolved.push(Course::new(CAFE_SP));
            }
            N if !real_net_cafe_set => {
                real_net_cafe_set = true;
                resolved.push(Course::new(REAL_NET_CAFE));
            }
            _ => {}
        }

        remaining = remaining.wrapping_sub(course.value());
    }

    let normalized = resolved
        .iter()
        .fold(0u32, |acc, course| acc.wrapping_add(course.value()));

    debug!(
        rights,
        normalized,
        courses = resolved.len(),
        "Resolved course rights"
    );

    (resolved, normalized)
}

/// [`resolve`] seeded with the configured default courses.
pub fn resolve_with_config(rights: u32, config: &CourseConfig) -> (Vec<Course>, u32) {
    resolve(rights, &config.default_course_ids())
}
