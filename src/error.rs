//! # Error Types
//!
//! Error handling for the wire-protocol core.
//!
//! Every codec operation returns [`Result`] and hands failures back to the caller (normally the
//! transport loop for one connection). Nothing in this crate aborts the process on malformed
//! input: a bad packet costs that packet, not the server.
//!
//! ## Error Categories
//! - **Cursor Errors**: reads past the end of the buffer, out-of-range seeks
//! - **Framing Errors**: short headers, oversized or mismatched bodies
//! - **Message Errors**: unknown opcodes, one-directional message types, leftover bytes
//! - **Text Errors**: strings that cannot be represented in Shift-JIS
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! ## Example Usage
//! ```rust
//! use mhf_protocol::core::cursor::ByteCursor;
//! use mhf_protocol::error::{ProtocolError, Result};
//! use tracing::{error, info};
//!
//! fn read_handle(bytes: &[u8]) -> Result<u32> {
//!     let mut cursor = ByteCursor::from_bytes(bytes);
//!     cursor.read_u32()
//! }
//!
//! match read_handle(&[0x00, 0x01]) {
//!     Ok(handle) => info!(handle, "Read ack handle"),
//!     Err(e @ ProtocolError::BufferUnderrun { .. }) => error!(error = %e, "Short packet"),
//!     Err(e) => error!(error = %e, "Unexpected failure"),
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Logging setup errors
    pub const ERR_LOGGING_ALREADY_SET: &str = "A global tracing subscriber is already installed";

    /// Wire field names reported through `ProtocolError::InvalidField`
    pub const FIELD_CHAT_TYPE: &str = "chat_type";
    pub const FIELD_TARGET_TYPE: &str = "target_type";
    pub const FIELD_TARGET_COUNT: &str = "target_count";
    pub const FIELD_PAYLOAD_LENGTH: &str = "payload_length";
    pub const FIELD_NAME_LENGTH: &str = "name_length";
    pub const FIELD_RIGHTS_COUNT: &str = "rights_count";
    pub const FIELD_CHAT_TEXT: &str = "chat_text";
}

/// Which half of the message contract was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes to message (inbound).
    Parse,
    /// Message to bytes (outbound).
    Build,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Parse => f.write_str("parse"),
            Direction::Build => f.write_str("build"),
        }
    }
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("Invalid seek to position {0}")]
    InvalidSeek(i64),

    #[error("Malformed packet header: got {0} bytes, need 14")]
    MalformedHeader(usize),

    #[error("Unsupported opcode: {0:#06X}")]
    UnsupportedOpcode(u16),

    #[error("Transcoding failure: {0}")]
    TranscodingFailure(String),

    #[error("Opcode {opcode:#06X} does not support {direction}")]
    NotImplementedDirection { opcode: u16, direction: Direction },

    #[error("Message left {0} unconsumed bytes")]
    TrailingBytes(usize),

    #[error("Payload size mismatch: header declares {declared} bytes, body has {actual}")]
    PayloadSizeMismatch { declared: usize, actual: usize },

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Invalid field: {0}")]
    InvalidField(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ProtocolError {
    /// Whether the error only invalidates the current message, leaving the stream usable.
    ///
    /// Framing and I/O failures desynchronise the byte stream; everything else is scoped to the
    /// message that produced it.
    pub fn is_message_scoped(&self) -> bool {
        !matches!(
            self,
            ProtocolError::Io(_)
                | ProtocolError::MalformedHeader(_)
                | ProtocolError::OversizedPacket(_)
                | ProtocolError::PayloadSizeMismatch { .. }
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
