//! # mhf-protocol
//!
//! Byte-exact wire-protocol core for a Monster Hunter Frontier server emulator.
//!
//! The crate covers everything between the socket and the game logic that is pure data
//! transformation: a byte cursor with switchable endianness, the 14-byte encrypted-packet header
//! and a stream codec around it, typed messages with an opcode dispatcher, Shift-JIS text
//! handling, and the course (entitlement) resolver. Ciphers, checksums, sessions and storage live
//! in the server that embeds this crate.
//!
//! ## Modules
//! - [`core`]: cursor, packet header, frame codec
//! - [`protocol`]: opcodes, the [`Message`] contract, concrete messages, dispatcher
//! - [`course`]: rights mask resolution
//! - [`utils`]: text transcoding, logging, metrics
//! - [`config`] and [`error`]
//!
//! ## Example
//! ```rust
//! use mhf_protocol::protocol::dispatcher::Dispatcher;
//! use mhf_protocol::protocol::sys::SysPing;
//!
//! let dispatcher = Dispatcher::with_defaults().unwrap();
//! let bytes = dispatcher.encode_message(&SysPing { ack_handle: 5 }).unwrap();
//! assert_eq!(bytes, vec![0x00, 0x17, 0x00, 0x00, 0x00, 0x05]);
//!
//! let message = dispatcher.dispatch(0x0017, &bytes[2..]).unwrap();
//! assert_eq!(message.downcast_ref::<SysPing>(), Some(&SysPing { ack_handle: 5 }));
//! ```

pub mod config;
pub mod core;
pub mod course;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::cursor::{ByteCursor, Endian};
pub use crate::core::frame::{KeyRotation, PacketFrame};
pub use config::ProtocolConfig;
pub use course::Course;
pub use error::{ProtocolError, Result};
pub use protocol::dispatcher::Dispatcher;
pub use protocol::message::Message;
pub use protocol::opcode::PacketId;
