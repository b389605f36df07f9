//! # Message Contract
//!
//! Every concrete message type implements [`Message`]: a static opcode plus the two halves of
//! its wire layout. Types that only travel one way implement only that half; the other one
//! returns [`ProtocolError::NotImplementedDirection`] so the caller can drop the message and keep
//! the connection.

use crate::core::cursor::ByteCursor;
use crate::error::{Direction, ProtocolError, Result};
use crate::protocol::opcode::PacketId;
use std::any::Any;
use std::fmt::Debug;

pub trait Message: Debug + Send + Sync {
    /// Static identifier used for dispatch.
    fn opcode(&self) -> PacketId;

    /// Read this message from the cursor's position, consuming exactly its own bytes.
    fn parse(&mut self, _cursor: &mut ByteCursor) -> Result<()> {
        Err(ProtocolError::NotImplementedDirection {
            opcode: self.opcode().as_u16(),
            direction: Direction::Parse,
        })
    }

    /// Append this message's wire representation to the cursor.
    fn build(&self, _cursor: &mut ByteCursor) -> Result<()> {
        Err(ProtocolError::NotImplementedDirection {
            opcode: self.opcode().as_u16(),
            direction: Direction::Build,
        })
    }

    /// Downcasting hook for dispatched messages.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Message {
    /// Borrow the concrete message if it is a `T`.
    pub fn downcast_ref<T: Message + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Build `message` into a fresh cursor and return the bytes.
pub fn build_to_vec(message: &dyn Message) -> Result<Vec<u8>> {
    let mut cursor = ByteCursor::new();
    message.build(&mut cursor)?;
    Ok(cursor.into_bytes())
}
