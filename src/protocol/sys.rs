//! # System Messages
//!
//! The `MSG_SYS_*` family: acknowledgements, keep-alives, group terminators, the binary relay
//! envelopes, and the rights update.

use crate::core::cursor::ByteCursor;
use crate::course::{self, Course};
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::binary::{BinChat, BinTargeted, BinaryMessageType, BroadcastType};
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use std::any::Any;

/// Size marker announcing a `u32` length after it
const EXTENDED_SIZE: u16 = 0xFFFF;

fn payload_len_u16(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| ProtocolError::InvalidField(constants::FIELD_PAYLOAD_LENGTH))
}

/// Terminates a packet group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SysEnd;

impl Message for SysEnd {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_END
    }

    fn parse(&mut self, _cursor: &mut ByteCursor) -> Result<()> {
        Ok(())
    }

    fn build(&self, _cursor: &mut ByteCursor) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SysNop;

impl Message for SysNop {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_NOP
    }

    fn parse(&mut self, _cursor: &mut ByteCursor) -> Result<()> {
        Ok(())
    }

    fn build(&self, _cursor: &mut ByteCursor) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SysPing {
    pub ack_handle: u32,
}

impl Message for SysPing {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_PING
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        self.ack_handle = cursor.read_u32()?;
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        cursor.write_u32(self.ack_handle);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Acknowledgement carrying either a variable-size buffer or four fixed bytes.
///
/// Layout: `u32 handle, bool buffer, u8 error, u16 size, data`. Buffer responses of `0xFFFF` bytes
/// or more write `0xFFFF` followed by a `u32` size. Fixed responses write size `0` and always four
/// data bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysAck {
    pub ack_handle: u32,
    pub is_buffer_response: bool,
    pub error_code: u8,
    pub data: Vec<u8>,
}

impl SysAck {
    /// Successful buffer response.
    pub fn buffer(ack_handle: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            ack_handle,
            is_buffer_response: true,
            error_code: 0,
            data: data.into(),
        }
    }

    /// Successful fixed response; only the first four bytes of `data` go on the wire.
    pub fn simple(ack_handle: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            ack_handle,
            is_buffer_response: false,
            error_code: 0,
            data: data.into(),
        }
    }

    pub fn with_error(mut self, error_code: u8) -> Self {
        self.error_code = error_code;
        self
    }
}

impl Message for SysAck {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_ACK
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        self.ack_handle = cursor.read_u32()?;
        self.is_buffer_response = cursor.read_bool()?;
        self.error_code = cursor.read_u8()?;

        let mut size = cursor.read_u16()? as usize;
        if size == EXTENDED_SIZE as usize {
            size = cursor.read_u32()? as usize;
        }

        self.data = if self.is_buffer_response {
            cursor.read_bytes(size)?
        } else {
            cursor.read_bytes(4)?
        };
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        cursor.write_u32(self.ack_handle);
        cursor.write_bool(self.is_buffer_response);
        cursor.write_u8(self.error_code);

        if self.is_buffer_response {
            let len = self.data.len();
            if len < EXTENDED_SIZE as usize {
                cursor.write_u16(len as u16);
            } else {
                let len = u32::try_from(len)
                    .map_err(|_| ProtocolError::InvalidField(constants::FIELD_PAYLOAD_LENGTH))?;
                cursor.write_u16(EXTENDED_SIZE);
                cursor.write_u32(len);
            }
            cursor.write_bytes(&self.data);
        } else {
            cursor.write_u16(0);
            match self.data.get(..4) {
                Some(head) => cursor.write_bytes(head),
                None => cursor.write_bytes(&[0; 4]),
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Interpreted contents of a cast binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryPayload {
    Chat(BinChat),
    /// Targeted relay; `chat` is set when the forwarded payload is a chat message.
    Targeted {
        envelope: BinTargeted,
        chat: Option<BinChat>,
    },
    Raw {
        message_type: u8,
        payload: Vec<u8>,
    },
}

fn parse_chat_le(payload: &[u8]) -> Result<BinChat> {
    let mut cursor = ByteCursor::from_bytes(payload);
    cursor.set_le();
    let mut chat = BinChat::default();
    chat.parse(&mut cursor)?;
    match cursor.remaining() {
        0 => Ok(chat),
        n => Err(ProtocolError::TrailingBytes(n)),
    }
}

/// Binary relay sent by a client for the server to fan out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysCastBinary {
    pub unk: u32,
    pub broadcast_type: u8,
    pub message_type: u8,
    pub payload: Vec<u8>,
}

impl SysCastBinary {
    /// Interpret the payload by its broadcast and message type.
    ///
    /// Targeted broadcasts carry a big-endian [`BinTargeted`] around the real payload. Chat
    /// payloads are little-endian.
    pub fn decode_payload(&self) -> Result<BinaryPayload> {
        let is_chat = self.message_type == BinaryMessageType::Chat as u8;

        if self.broadcast_type == BroadcastType::Targeted as u8 {
            let mut cursor = ByteCursor::from_bytes(&self.payload);
            let mut envelope = BinTargeted::default();
            envelope.parse(&mut cursor)?;
            let chat = if is_chat {
                Some(parse_chat_le(&envelope.payload)?)
            } else {
                None
            };
            return Ok(BinaryPayload::Targeted { envelope, chat });
        }

        if is_chat {
            return parse_chat_le(&self.payload).map(BinaryPayload::Chat);
        }

        Ok(BinaryPayload::Raw {
            message_type: self.message_type,
            payload: self.payload.clone(),
        })
    }

    /// Re-address this relay as the envelope delivered to other clients.
    pub fn into_casted(self, char_id: u32) -> SysCastedBinary {
        SysCastedBinary {
            char_id,
            broadcast_type: self.broadcast_type,
            message_type: self.message_type,
            payload: self.payload,
        }
    }
}

impl Message for SysCastBinary {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CAST_BINARY
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        self.unk = cursor.read_u32()?;
        self.broadcast_type = cursor.read_u8()?;
        self.message_type = cursor.read_u8()?;
        let len = cursor.read_u16()? as usize;
        self.payload = cursor.read_bytes(len)?;
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let len = payload_len_u16(self.payload.len())?;
        cursor.write_u32(self.unk);
        cursor.write_u8(self.broadcast_type);
        cursor.write_u8(self.message_type);
        cursor.write_u16(len);
        cursor.write_bytes(&self.payload);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Binary relay delivered to clients, tagged with the originating character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysCastedBinary {
    pub char_id: u32,
    pub broadcast_type: u8,
    pub message_type: u8,
    pub payload: Vec<u8>,
}

impl Message for SysCastedBinary {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CASTED_BINARY
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        self.char_id = cursor.read_u32()?;
        self.broadcast_type = cursor.read_u8()?;
        self.message_type = cursor.read_u8()?;
        let len = cursor.read_u16()? as usize;
        self.payload = cursor.read_bytes(len)?;
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let len = payload_len_u16(self.payload.len())?;
        cursor.write_u32(self.char_id);
        cursor.write_u8(self.broadcast_type);
        cursor.write_u8(self.message_type);
        cursor.write_u16(len);
        cursor.write_bytes(&self.payload);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pushes the character's course list to the client. Outbound only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysUpdateRight {
    /// Non-zero asks the client to answer with a `MSG_SYS_ACK` carrying this handle
    pub ack_handle: u32,
    pub bitfield: u32,
    pub rights: Vec<Course>,
}

impl SysUpdateRight {
    /// Resolve `rights` against `defaults` and carry the result with its normalised mask.
    pub fn from_rights(ack_handle: u32, rights: u32, defaults: &[u16]) -> Self {
        let (rights, bitfield) = course::resolve(rights, defaults);
        Self {
            ack_handle,
            bitfield,
            rights,
        }
    }
}

impl Message for SysUpdateRight {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_UPDATE_RIGHT
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let count = u16::try_from(self.rights.len())
            .map_err(|_| ProtocolError::InvalidField(constants::FIELD_RIGHTS_COUNT))?;

        cursor.write_u32(self.ack_handle);
        cursor.write_u32(self.bitfield);
        cursor.write_u16(count);
        cursor.write_u16(0);
        for right in &self.rights {
            cursor.write_u16(right.id);
            cursor.write_u16(0);
            cursor.write_u32(right.expiry_unix());
        }
        // Empty login-token string: length (with terminator) then the terminator.
        cursor.write_u16(1);
        cursor.write_u8(0);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
