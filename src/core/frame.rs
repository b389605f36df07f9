//! # Packet Frame
//!
//! The fixed 14-byte header that precedes every encrypted packet body on the wire.
//!
//! ## Wire Format
//! ```text
//! [pf0(1)] [keyRotDelta(1)] [packetNum(2)] [dataSize(2)]
//! [prevPacketCombinedCheck(2)] [check0(2)] [check1(2)] [check2(2)]
//! ```
//! All multi-byte fields are big-endian. The layout is not self-describing: field order and
//! widths are fixed.
//!
//! This layer only carries the metadata. The checksums are extracted and written back as-is;
//! verifying them needs rolling per-session state and is left to the transport. Likewise
//! `keyRotDelta` and `packetNum` feed the external stream cipher through [`KeyRotation`].

use crate::core::cursor::ByteCursor;
use crate::error::{ProtocolError, Result};
use bytes::{BufMut, BytesMut};
use std::fmt;

/// Key-rotation value both directions start from after the connection handshake.
pub const INITIAL_KEY_ROTATION: u32 = 995_117;

/// Key-rotation delta stamped on every packet the server sends.
pub const OUTBOUND_KEY_ROT_DELTA: u8 = 3;

/// Parsed encrypted-packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketFrame {
    /// Protocol flag byte
    pub pf0: u8,
    /// Key-rotation steps to apply before decrypting this body
    pub key_rot_delta: u8,
    /// Per-session sequence number
    pub packet_num: u16,
    /// Length of the body following the header
    pub data_size: u16,
    /// Rolling checksum chaining to the previous packet
    pub prev_packet_combined_check: u16,
    pub check0: u16,
    pub check1: u16,
    pub check2: u16,
}

impl PacketFrame {
    /// Encoded header length in bytes
    pub const LEN: usize = 14;

    /// Decode a header from the first 14 bytes of `bytes`.
    ///
    /// Anything after the header is ignored. Checksums are returned, not verified.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::LEN {
            return Err(ProtocolError::MalformedHeader(bytes.len()));
        }

        let mut cursor = ByteCursor::from_bytes(&bytes[..Self::LEN]);
        Ok(Self {
            pf0: cursor.read_u8()?,
            key_rot_delta: cursor.read_u8()?,
            packet_num: cursor.read_u16()?,
            data_size: cursor.read_u16()?,
            prev_packet_combined_check: cursor.read_u16()?,
            check0: cursor.read_u16()?,
            check1: cursor.read_u16()?,
            check2: cursor.read_u16()?,
        })
    }

    /// Encode the header into exactly 14 bytes.
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut cursor = ByteCursor::with_capacity(Self::LEN);
        self.write_to(&mut cursor);

        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(cursor.data());
        out
    }

    /// Append the encoded header to `dst`.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.reserve(Self::LEN);
        dst.put_slice(&self.encode());
    }

    fn write_to(&self, cursor: &mut ByteCursor) {
        cursor.set_be();
        cursor.write_u8(self.pf0);
        cursor.write_u8(self.key_rot_delta);
        cursor.write_u16(self.packet_num);
        cursor.write_u16(self.data_size);
        cursor.write_u16(self.prev_packet_combined_check);
        cursor.write_u16(self.check0);
        cursor.write_u16(self.check1);
        cursor.write_u16(self.check2);
    }

    /// Header for a server-to-client packet, filled in the way the client expects.
    ///
    /// `checks` are the three body checksums computed by the cipher collaborator.
    pub fn outbound(
        data_size: u16,
        packet_num: u16,
        prev_packet_combined_check: u16,
        checks: [u16; 3],
    ) -> Self {
        Self {
            pf0: Self::pf0_for_size(data_size),
            key_rot_delta: OUTBOUND_KEY_ROT_DELTA,
            packet_num,
            data_size,
            prev_packet_combined_check,
            check0: checks[0],
            check1: checks[1],
            check2: checks[2],
        }
    }

    /// Protocol flag derived from the body size.
    #[inline]
    pub fn pf0_for_size(data_size: u16) -> u8 {
        (((data_size >> 12) as u8) & 0xF3) | 3
    }

    /// Total on-wire size of this header plus its body.
    #[inline]
    pub fn frame_len(&self) -> usize {
        Self::LEN + self.data_size as usize
    }
}

impl fmt::Display for PacketFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pf0={:#04X} rot={} num={} size={} prev={:#06X} checks=[{:#06X}, {:#06X}, {:#06X}]",
            self.pf0,
            self.key_rot_delta,
            self.packet_num,
            self.data_size,
            self.prev_packet_combined_check,
            self.check0,
            self.check1,
            self.check2
        )
    }
}

/// Per-direction key-rotation counter handed to the stream cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRotation(u32);

impl Default for KeyRotation {
    fn default() -> Self {
        Self(INITIAL_KEY_ROTATION)
    }
}

impl KeyRotation {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Apply a packet's rotation delta. A zero delta leaves the key unchanged.
    pub fn advance(&mut self, delta: u8) -> u32 {
        if delta != 0 {
            self.0 = u32::from(delta).wrapping_mul(self.0.wrapping_add(1));
        }
        self.0
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PacketFrame {
        PacketFrame {
            pf0: 0,
            key_rot_delta: 3,
            packet_num: 7,
            data_size: 20,
            prev_packet_combined_check: 0xAAAA,
            check0: 1,
            check1: 2,
            check2: 3,
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = sample().encode();
        assert_eq!(
            bytes,
            [0x00, 0x03, 0x00, 0x07, 0x00, 0x14, 0xAA, 0xAA, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03]
        );
    }

    #[test]
    fn test_roundtrip() {
        let header = sample();
        let decoded = PacketFrame::decode(&header.encode()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_decode_ignores_trailing_body() {
        let mut bytes = sample().encode().to_vec();
        bytes.extend_from_slice(&[0xFF; 20]);
        assert_eq!(PacketFrame::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_short_header_rejected() {
        for len in 0..PacketFrame::LEN {
            let bytes = vec![0u8; len];
            assert!(matches!(
                PacketFrame::decode(&bytes),
                Err(ProtocolError::MalformedHeader(n)) if n == len
            ));
        }
    }

    #[test]
    fn test_encode_into_appends() {
        let mut dst = BytesMut::from(&b"xy"[..]);
        sample().encode_into(&mut dst);
        assert_eq!(dst.len(), 2 + PacketFrame::LEN);
        assert_eq!(&dst[2..], &sample().encode());
    }

    #[test]
    fn test_outbound_fields() {
        let header = PacketFrame::outbound(0x5000, 4, 0x1234, [7, 8, 9]);
        assert_eq!(header.pf0, 0x03);
        assert_eq!(header.key_rot_delta, OUTBOUND_KEY_ROT_DELTA);
        assert_eq!(header.frame_len(), PacketFrame::LEN + 0x5000);

        assert_eq!(PacketFrame::pf0_for_size(0), 0x03);
        assert_eq!(PacketFrame::pf0_for_size(0xFFFF), 0x03);
    }

    #[test]
    fn test_key_rotation_advance() {
        let mut key = KeyRotation::default();
        assert_eq!(key.advance(0), INITIAL_KEY_ROTATION);
        assert_eq!(key.advance(3), 3 * (INITIAL_KEY_ROTATION + 1));

        let mut key = KeyRotation::new(u32::MAX);
        assert_eq!(key.advance(2), 0);
    }
}
