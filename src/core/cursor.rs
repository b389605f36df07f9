//! # Byte Cursor
//!
//! Growable in-memory buffer with a movable cursor and switchable byte order.
//!
//! Every wire structure in the protocol is produced by a sequence of primitive writes and
//! consumed by the mirror sequence of reads, so this type sits under everything else in the
//! crate.
//!
//! ## Semantics
//! - The cursor always lies in `[0, len]`.
//! - Writes land at the cursor, overwrite existing bytes, and extend the buffer by whatever
//!   overhangs the end.
//! - Reads that need more bytes than remain fail with [`ProtocolError::BufferUnderrun`] and leave
//!   the cursor where it was.
//! - Byte order is per-instance state and applies to every multi-byte operation that follows
//!   [`ByteCursor::set_le`] / [`ByteCursor::set_be`]. Bytes already written are not touched.
//!
//! New cursors are big-endian, matching the game client.
//!
//! ## Usage
//! ```rust
//! use mhf_protocol::core::cursor::ByteCursor;
//! use std::io::SeekFrom;
//!
//! let mut cursor = ByteCursor::new();
//! cursor.write_u16(0x0102);
//! cursor.set_le();
//! cursor.write_u16(0x0102);
//! assert_eq!(cursor.data(), &[0x01, 0x02, 0x02, 0x01]);
//!
//! cursor.seek(SeekFrom::Start(0)).unwrap();
//! cursor.set_be();
//! assert_eq!(cursor.read_u16().unwrap(), 0x0102);
//! ```

use crate::error::{ProtocolError, Result};
use bytes::Bytes;
use std::io::SeekFrom;

/// Byte order used for multi-byte reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Most significant byte first (network order, the client default)
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

/// Cursor-based binary reader/writer over an owned buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buf: Vec<u8>,
    pos: usize,
    endian: Endian,
}

macro_rules! write_num {
    ($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            pub fn $name(&mut self, value: $ty) {
                match self.endian {
                    Endian::Big => self.put(&value.to_be_bytes()),
                    Endian::Little => self.put(&value.to_le_bytes()),
                }
            }
        )*
    };
}

macro_rules! read_num {
    ($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            pub fn $name(&mut self) -> Result<$ty> {
                let raw = self.take_array::<{ std::mem::size_of::<$ty>() }>()?;
                Ok(match self.endian {
                    Endian::Big => <$ty>::from_be_bytes(raw),
                    Endian::Little => <$ty>::from_le_bytes(raw),
                })
            }
        )*
    };
}

impl ByteCursor {
    /// Create an empty big-endian cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cursor with room for `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Create a cursor over a copy of `bytes`, positioned at the start.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            buf: bytes.to_vec(),
            ..Self::default()
        }
    }

    /// Current cursor offset from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes between the cursor and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch to little-endian for subsequent multi-byte operations.
    pub fn set_le(&mut self) {
        self.endian = Endian::Little;
    }

    /// Switch to big-endian for subsequent multi-byte operations.
    pub fn set_be(&mut self) {
        self.endian = Endian::Big;
    }

    /// Move the cursor.
    ///
    /// The resulting position must lie in `[0, len]`; otherwise the cursor is left unchanged and
    /// [`ProtocolError::InvalidSeek`] carries the rejected position.
    pub fn seek(&mut self, whence: SeekFrom) -> Result<u64> {
        let target = match whence {
            SeekFrom::Start(offset) => {
                i64::try_from(offset).map_err(|_| ProtocolError::InvalidSeek(i64::MAX))?
            }
            SeekFrom::Current(offset) => (self.pos as i64).saturating_add(offset),
            SeekFrom::End(offset) => (self.buf.len() as i64).saturating_add(offset),
        };

        if target < 0 || target as u64 > self.buf.len() as u64 {
            return Err(ProtocolError::InvalidSeek(target));
        }

        self.pos = target as usize;
        Ok(target as u64)
    }

    /// The whole buffer, regardless of the cursor.
    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    /// Buffer contents from the cursor to the end. Does not move the cursor.
    pub fn data_from_current(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// Consume the cursor, returning the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Consume the cursor into an immutable `Bytes` for the framed transport.
    pub fn freeze(self) -> Bytes {
        Bytes::from(self.buf)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    fn put(&mut self, src: &[u8]) {
        let end = self.pos + src.len();
        let overlap = end.min(self.buf.len()).saturating_sub(self.pos);
        self.buf[self.pos..self.pos + overlap].copy_from_slice(&src[..overlap]);
        self.buf.extend_from_slice(&src[overlap..]);
        self.pos = end;
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    /// Write a single byte.
    pub fn write_i8(&mut self, value: i8) {
        self.put(&value.to_be_bytes());
    }

    /// Write a boolean as one byte, `1` for true and `0` for false.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    write_num! {
        /// Write a `u16` in the current byte order.
        write_u16 => u16,
        /// Write a `u32` in the current byte order.
        write_u32 => u32,
        /// Write a `u64` in the current byte order.
        write_u64 => u64,
        /// Write an `i16` in the current byte order.
        write_i16 => i16,
        /// Write an `i32` in the current byte order.
        write_i32 => i32,
        /// Write an `i64` in the current byte order.
        write_i64 => i64,
        /// Write an IEEE-754 `f32` in the current byte order.
        write_f32 => f32,
        /// Write an IEEE-754 `f64` in the current byte order.
        write_f64 => f64,
    }

    /// Write `bytes` verbatim with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// Write `bytes` followed by a single `0x00` terminator.
    pub fn write_null_terminated_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
        self.write_u8(0);
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(ProtocolError::BufferUnderrun {
                needed: count,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += count;
        Ok(&self.buf[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a single byte as a signed value.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(self.take_array::<1>()?))
    }

    /// Read one byte; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    read_num! {
        /// Read a `u16` in the current byte order.
        read_u16 => u16,
        /// Read a `u32` in the current byte order.
        read_u32 => u32,
        /// Read a `u64` in the current byte order.
        read_u64 => u64,
        /// Read an `i16` in the current byte order.
        read_i16 => i16,
        /// Read an `i32` in the current byte order.
        read_i32 => i32,
        /// Read an `i64` in the current byte order.
        read_i64 => i64,
        /// Read an IEEE-754 `f32` in the current byte order.
        read_f32 => f32,
        /// Read an IEEE-754 `f64` in the current byte order.
        read_f64 => f64,
    }

    /// Read the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.take(count)?.to_vec())
    }

    /// Borrow the next `count` bytes without copying them.
    pub fn read_slice(&mut self, count: usize) -> Result<&[u8]> {
        self.take(count)
    }

    /// Read up to (excluding) the next `0x00` byte and consume the terminator.
    ///
    /// If no terminator exists between the cursor and the end of the buffer, returns an empty
    /// vector and leaves the cursor in place, as the client-side reader does.
    pub fn read_null_terminated_bytes(&mut self) -> Vec<u8> {
        let rest = self.data_from_current();
        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                let out = rest[..end].to_vec();
                self.pos += end + 1;
                out
            }
            None => Vec::new(),
        }
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(buf: Vec<u8>) -> Self {
        Self {
            buf,
            ..Self::default()
        }
    }
}

impl AsRef<[u8]> for ByteCursor {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_big_endian() {
        let mut cursor = ByteCursor::new();
        cursor.write_u32(0x0102_0304);
        assert_eq!(cursor.endian(), Endian::Big);
        assert_eq!(cursor.data(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_endianness_switch_mid_stream() {
        let mut cursor = ByteCursor::new();
        cursor.write_u16(0xAABB);
        cursor.set_le();
        cursor.write_u16(0xAABB);
        cursor.set_be();
        cursor.write_u16(0xAABB);
        assert_eq!(cursor.data(), &[0xAA, 0xBB, 0xBB, 0xAA, 0xAA, 0xBB]);

        cursor.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(cursor.read_u16().unwrap(), 0xAABB);
        cursor.set_le();
        assert_eq!(cursor.read_u16().unwrap(), 0xAABB);
        assert_eq!(cursor.read_u16().unwrap(), 0xBBAA);
    }

    #[test]
    fn test_write_overwrites_then_extends() {
        let mut cursor = ByteCursor::from_bytes(&[1, 2, 3, 4]);
        cursor.seek(SeekFrom::Start(2)).unwrap();
        cursor.write_u32(0xAABB_CCDD);
        assert_eq!(cursor.data(), &[1, 2, 0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(cursor.position(), 6);

        cursor.seek(SeekFrom::Start(0)).unwrap();
        cursor.write_u8(9);
        assert_eq!(cursor.data(), &[9, 2, 0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(cursor.len(), 6);
    }

    #[test]
    fn test_underrun_leaves_cursor_in_place() {
        let mut cursor = ByteCursor::from_bytes(&[0x00, 0x01, 0x02]);
        cursor.read_u8().unwrap();
        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::BufferUnderrun {
                needed: 4,
                remaining: 2
            }
        ));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
    }

    #[test]
    fn test_read_bytes_underrun() {
        let mut cursor = ByteCursor::from_bytes(&[1, 2]);
        assert!(cursor.read_bytes(3).is_err());
        assert_eq!(cursor.read_bytes(2).unwrap(), vec![1, 2]);
        assert_eq!(cursor.read_bytes(0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bool_roundtrip() {
        let mut cursor = ByteCursor::new();
        cursor.write_bool(true);
        cursor.write_bool(false);
        cursor.write_u8(7);
        assert_eq!(cursor.data(), &[1, 0, 7]);

        cursor.seek(SeekFrom::Start(0)).unwrap();
        assert!(cursor.read_bool().unwrap());
        assert!(!cursor.read_bool().unwrap());
        assert!(cursor.read_bool().unwrap());
    }

    #[test]
    fn test_null_terminated_strings() {
        let mut cursor = ByteCursor::new();
        cursor.write_null_terminated_bytes(b"abc");
        cursor.write_null_terminated_bytes(b"");
        assert_eq!(cursor.data(), b"abc\0\0");

        cursor.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(cursor.read_null_terminated_bytes(), b"abc".to_vec());
        assert_eq!(cursor.position(), 4);
        assert!(cursor.read_null_terminated_bytes().is_empty());
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_null_terminated_without_terminator_does_not_move() {
        let mut cursor = ByteCursor::from_bytes(b"xyz");
        assert!(cursor.read_null_terminated_bytes().is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_seek_bounds() {
        let mut cursor = ByteCursor::from_bytes(&[0u8; 12]);
        assert_eq!(cursor.seek(SeekFrom::End(-4)).unwrap(), 8);
        assert_eq!(cursor.seek(SeekFrom::End(0)).unwrap(), 12);
        assert_eq!(cursor.seek(SeekFrom::Current(-12)).unwrap(), 0);

        assert!(matches!(
            cursor.seek(SeekFrom::Current(-1)),
            Err(ProtocolError::InvalidSeek(-1))
        ));
        assert!(matches!(
            cursor.seek(SeekFrom::Start(13)),
            Err(ProtocolError::InvalidSeek(13))
        ));
        assert!(matches!(
            cursor.seek(SeekFrom::End(1)),
            Err(ProtocolError::InvalidSeek(13))
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_data_from_current() {
        let mut cursor = ByteCursor::from_bytes(&[1, 2, 3, 4]);
        cursor.seek(SeekFrom::Start(1)).unwrap();
        assert_eq!(cursor.data_from_current(), &[2, 3, 4]);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_signed_and_float_layouts() {
        let mut cursor = ByteCursor::new();
        cursor.write_i16(-2);
        cursor.write_f32(1.0);
        assert_eq!(cursor.data(), &[0xFF, 0xFE, 0x3F, 0x80, 0x00, 0x00]);

        cursor.set_le();
        cursor.seek(SeekFrom::Start(0)).unwrap();
        cursor.write_i16(-2);
        assert_eq!(&cursor.data()[..2], &[0xFE, 0xFF]);
    }
}
