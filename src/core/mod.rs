//! # Core Protocol Components
//!
//! Byte-level primitives and packet framing.
//!
//! This module is the foundation for the protocol: the cursor every message is read from and
//! written to, the fixed header in front of every encrypted packet, and the stream codec the
//! transport uses to cut the TCP stream into packets.
//!
//! ## Components
//! - **Cursor**: growable buffer with a movable cursor and switchable byte order
//! - **Frame**: 14-byte big-endian encrypted-packet header
//! - **Codec**: Tokio codec for framing header + body pairs over byte streams
//!
//! ## Wire Format
//! ```text
//! [pf0(1)] [keyRotDelta(1)] [packetNum(2)] [dataSize(2)] [prevCheck(2)] [check0..2(6)] [Body(dataSize)]
//! ```

pub mod codec;
pub mod cursor;
pub mod frame;
