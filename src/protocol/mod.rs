//! # Protocol Layer
//!
//! Typed messages on top of the byte cursor.
//!
//! ## Components
//! - **Opcode**: the `u16` identifiers this crate understands
//! - **Message**: parse/build contract every message type implements
//! - **Sys**: `MSG_SYS_*` messages, including the binary relay envelopes
//! - **Binary**: payloads carried inside the relay envelopes
//! - **Dispatcher**: opcode registry that turns packet bodies into messages
//!
//! ## Wire Format
//! ```text
//! packet group: [opcode(2)] [body] [opcode(2)] [body] ... [MSG_SYS_END(2)]
//! ```

pub mod binary;
pub mod dispatcher;
pub mod message;
pub mod opcode;
pub mod sys;
