//! Property-based tests for the byte cursor
//!
//! Every primitive written in either byte order must read back unchanged, and seeks must keep
//! the cursor inside the buffer.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use mhf_protocol::core::cursor::ByteCursor;
use mhf_protocol::error::ProtocolError;
use proptest::prelude::*;
use std::io::SeekFrom;

fn cursor_for(little_endian: bool) -> ByteCursor {
    let mut cursor = ByteCursor::new();
    if little_endian {
        cursor.set_le();
    }
    cursor
}

fn rewind(cursor: &mut ByteCursor) {
    cursor.seek(SeekFrom::Start(0)).expect("rewind should succeed");
}

macro_rules! roundtrip_property {
    ($name:ident, $ty:ty, $write:ident, $read:ident) => {
        proptest! {
            #[test]
            fn $name(value in any::<$ty>(), little_endian in any::<bool>()) {
                let mut cursor = cursor_for(little_endian);
                cursor.$write(value);
                prop_assert_eq!(cursor.len(), std::mem::size_of::<$ty>());
                rewind(&mut cursor);
                prop_assert_eq!(cursor.$read().unwrap(), value);
                prop_assert_eq!(cursor.remaining(), 0);
            }
        }
    };
}

roundtrip_property!(prop_u8_roundtrip, u8, write_u8, read_u8);
roundtrip_property!(prop_i8_roundtrip, i8, write_i8, read_i8);
roundtrip_property!(prop_u16_roundtrip, u16, write_u16, read_u16);
roundtrip_property!(prop_i16_roundtrip, i16, write_i16, read_i16);
roundtrip_property!(prop_u32_roundtrip, u32, write_u32, read_u32);
roundtrip_property!(prop_i32_roundtrip, i32, write_i32, read_i32);
roundtrip_property!(prop_u64_roundtrip, u64, write_u64, read_u64);
roundtrip_property!(prop_i64_roundtrip, i64, write_i64, read_i64);

// Floats compare by bit pattern so NaN payloads count too.
proptest! {
    #[test]
    fn prop_f32_roundtrip(bits in any::<u32>(), little_endian in any::<bool>()) {
        let mut cursor = cursor_for(little_endian);
        cursor.write_f32(f32::from_bits(bits));
        rewind(&mut cursor);
        prop_assert_eq!(cursor.read_f32().unwrap().to_bits(), bits);
    }

    #[test]
    fn prop_f64_roundtrip(bits in any::<u64>(), little_endian in any::<bool>()) {
        let mut cursor = cursor_for(little_endian);
        cursor.write_f64(f64::from_bits(bits));
        rewind(&mut cursor);
        prop_assert_eq!(cursor.read_f64().unwrap().to_bits(), bits);
    }
}

// Byte order only changes the layout, never the value.
proptest! {
    #[test]
    fn prop_endianness_mirrors_bytes(value in any::<u32>()) {
        let mut be = cursor_for(false);
        let mut le = cursor_for(true);
        be.write_u32(value);
        le.write_u32(value);

        let mut reversed = le.data().to_vec();
        reversed.reverse();
        prop_assert_eq!(be.data(), &reversed[..]);
    }
}

proptest! {
    #[test]
    fn prop_null_terminated_roundtrip(bytes in prop::collection::vec(1u8..=255, 0..256)) {
        let mut cursor = ByteCursor::new();
        cursor.write_null_terminated_bytes(&bytes);
        prop_assert_eq!(cursor.len(), bytes.len() + 1);
        rewind(&mut cursor);
        prop_assert_eq!(cursor.read_null_terminated_bytes(), bytes);
        prop_assert_eq!(cursor.remaining(), 0);
    }
}

proptest! {
    #[test]
    fn prop_seek_stays_in_bounds(len in 0usize..64, target in -100i64..100) {
        let mut cursor = ByteCursor::from_bytes(&vec![0xAB; len]);
        cursor.seek(SeekFrom::Start(len as u64 / 2)).unwrap();
        let before = cursor.position();

        match cursor.seek(SeekFrom::Current(target)) {
            Ok(pos) => {
                prop_assert!(pos as usize <= len);
                prop_assert_eq!(cursor.position(), pos as usize);
            }
            Err(ProtocolError::InvalidSeek(_)) => prop_assert_eq!(cursor.position(), before),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

proptest! {
    #[test]
    fn prop_reads_never_overrun(bytes in prop::collection::vec(any::<u8>(), 0..8)) {
        let mut cursor = ByteCursor::from_bytes(&bytes);
        let result = cursor.read_u64();
        if bytes.len() < 8 {
            let is_underrun = matches!(result, Err(ProtocolError::BufferUnderrun { .. }));
            prop_assert!(is_underrun);
            prop_assert_eq!(cursor.position(), 0);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}

#[test]
fn test_seek_scenario() {
    let mut cursor = ByteCursor::from_bytes(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    cursor.seek(SeekFrom::Start(4)).unwrap();
    let first = cursor.read_u32().unwrap();
    cursor.seek(SeekFrom::Current(-4)).unwrap();
    assert_eq!(cursor.read_u32().unwrap(), first);
    assert_eq!(first, 0x0405_0607);

    assert_eq!(cursor.seek(SeekFrom::End(-4)).unwrap(), 8);
    assert_eq!(cursor.position(), 8);
}

#[test]
fn test_empty_null_terminated_roundtrip() {
    let mut cursor = ByteCursor::new();
    cursor.write_null_terminated_bytes(&[]);
    assert_eq!(cursor.data(), &[0]);
    rewind(&mut cursor);
    assert!(cursor.read_null_terminated_bytes().is_empty());
    assert_eq!(cursor.position(), 1);
}

#[test]
fn test_overwrite_then_extend() {
    let mut cursor = ByteCursor::from_bytes(&[1, 2, 3]);
    cursor.seek(SeekFrom::Start(2)).unwrap();
    cursor.write_u16(0xAABB);
    assert_eq!(cursor.data(), &[1, 2, 0xAA, 0xBB]);
    assert_eq!(cursor.position(), 4);
}
