//! Targeted relay envelope: forwards a regular binary payload to an explicit list of characters.
//!
//! Layout: `u16 count, count × u32 char id, u16 target type`, then the forwarded payload up to the
//! end of the buffer.

use crate::core::cursor::ByteCursor;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use std::any::Any;
use std::io::SeekFrom;

#[repr(u16)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetType {
    #[default]
    Party = 4,
    Private = 5,
}

impl TryFrom<u16> for TargetType {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            4 => Ok(Self::Party),
            5 => Ok(Self::Private),
            _ => Err(ProtocolError::InvalidField(constants::FIELD_TARGET_TYPE)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinTargeted {
    pub targets: Vec<u32>,
    pub target_type: TargetType,
    /// Forwarded payload, opaque at this layer
    pub payload: Vec<u8>,
}

impl Message for BinTargeted {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CAST_BINARY
    }

    fn parse(&mut self, cursor: &mut ByteCursor) -> Result<()> {
        let count = cursor.read_u16()? as usize;
        if count * 4 > cursor.remaining() {
            return Err(ProtocolError::BufferUnderrun {
                needed: count * 4,
                remaining: cursor.remaining(),
            });
        }

        self.targets = (0..count)
            .map(|_| cursor.read_u32())
            .collect::<Result<Vec<_>>>()?;
        self.target_type = TargetType::try_from(cursor.read_u16()?)?;
        self.payload = cursor.data_from_current().to_vec();
        cursor.seek(SeekFrom::End(0))?;
        Ok(())
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let count = u16::try_from(self.targets.len())
            .map_err(|_| ProtocolError::InvalidField(constants::FIELD_TARGET_COUNT))?;

        cursor.write_u16(count);
        for target in &self.targets {
            cursor.write_u32(*target);
        }
        cursor.write_u16(self.target_type as u16);
        cursor.write_bytes(&self.payload);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
