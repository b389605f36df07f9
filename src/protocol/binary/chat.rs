//! Chat message payload.
//!
//! Layout: `u8 unk, u8 chat type, u16 flags, u16 sender length, u16 message length`, then the
//! message and the sender name, each null-terminated Shift-JIS. Both lengths count the transcoded
//! bytes plus the terminator. Multi-byte fields follow the cursor's byte order; chat relayed
//! through the cast envelopes is little-endian.

use crate::core::cursor::ByteCursor;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::binary::BinaryMessageType;
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use crate::protocol::sys::SysCastedBinary;
use crate::utils::text::{sjis_to_utf8, utf8_to_sjis};
use std::any::Any;

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatType {
    #[default]
    World = 0,
    Stage = 1,
    Guild = 2,
    Alliance = 3,
    Party = 4,
    Whisper = 5,
}

impl TryFrom<u8> for ChatType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::World),
            1 => Ok(Self::Stage),
            2 => Ok(Self::Guild),
            3 => Ok(Self::Alliance),
            4 => Ok(Self::Party),
            5 => Ok(Self::Whisper),
            _ => Err(ProtocolError::InvalidField(constants::FIELD_CHAT_TYPE)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinChat {
    pub unk: u8,
    pub chat_type: ChatType,
    pub flags: u16,
    pub message: String,
    pub sender_name: String,
}

/// Length field value for a null-terminated string of `len` bytes.
fn terminated_len(len: usize) -> Result<u16> {
    u16::try_from(len + 1).map_err(|_| ProtocolError::InvalidField(constants::FIELD_NAME_LENGTH))
}

/// Transcode a chat string, rejecting text that would split early on the receiver.
fn encode_text(text: &str) -> Result<Vec<u8>> {
    if text.contains('\0') {
        return Err(ProtocolError::InvalidField(constants::FIELD_CHAT_TEXT));
    }
    utf8_to_sjis(text)
}

/// Read a null-terminated string that must end before the buffer does.
fn read_terminated(cursor: &mut ByteCursor) -> Result<Vec<u8>> {
    let start = cursor.position();
    let bytes = cursor.read_null_terminated_bytes();
    if cursor.position() == start {
        let remaining = cursor.remaining();
        return Err(ProtocolError::BufferUnderrun {
            needed: remaining + 1,
            remaining,
        });
    }
    Ok(bytes)
}

impl BinChat {
    pub fn new(
        chat_type: ChatType,
        flags: u16,
        message: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Self {
        Self {
            unk: 0,
            chat_type,
            flags,
            message: message.into(),
            sender_name: sender_name.into(),
        }
    }

    /// Build little-endian and wrap in a casted envelope from `char_id`.
    pub fn wrap(&self, char_id: u32, broadcast_type: u8) -> Result<SysCastedBinary> {
        let mut payload = ByteCursor::new();
        payload.set_le();
        self.build(&mut payload)?;
        Ok(SysCastedBinary {
            char_id,
            broadcast_type,
            message_type: BinaryMessageType::Chat as u8,
            payload: payload.into_bytes(),
        })
    }
}

impl Message for BinChat {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CAST_BINARY
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        self.unk = cursor.read_u8()?;
        self.chat_type = ChatType::try_from(cursor.read_u8()?)?;
        self.flags = cursor.read_u16()?;
        // Declared lengths are informational; the terminators delimit the strings.
        let _sender_len = cursor.read_u16()?;
        let _message_len = cursor.read_u16()?;
        self.message = sjis_to_utf8(&read_terminated(cursor)?);
        self.sender_name = sjis_to_utf8(&read_terminated(cursor)?);
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let message = encode_text(&self.message)?;
        let sender = encode_text(&self.sender_name)?;
        let sender_len = terminated_len(sender.len())?;
        let message_len = terminated_len(message.len())?;

        cursor.write_u8(self.unk);
        cursor.write_u8(self.chat_type as u8);
        cursor.write_u16(self.flags);
        cursor.write_u16(sender_len);
        cursor.write_u16(message_len);
        cursor.write_null_terminated_bytes(&message);
        cursor.write_null_terminated_bytes(&sender);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
