//! Party-join announcement. Outbound only.
//!
//! Builds its own payload (`u16 0x0002, u8 join type, u16 unk1`, seven zero bytes) and delegates
//! to [`SysCastedBinary`] for the envelope, so the bytes written are a complete casted binary.

use crate::core::cursor::ByteCursor;
use crate::error::Result;
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use crate::protocol::sys::SysCastedBinary;
use std::any::Any;

const PAYLOAD_MARKER: u16 = 0x0002;
const PAYLOAD_PADDING: [u8; 7] = [0; 7];
const ENVELOPE_BROADCAST_TYPE: u8 = 0x03;
const ENVELOPE_MESSAGE_TYPE: u8 = 0x03;

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartyJoinType {
    #[default]
    JoinedLocalParty = 0x01,
    JoinedYourParty = 0x04,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinPlayerJoinedParty {
    pub char_id: u32,
    pub join_type: PartyJoinType,
    pub unk1: u16,
}

impl BinPlayerJoinedParty {
    fn payload(&self) -> Vec<u8> {
        let mut payload = ByteCursor::with_capacity(12);
        payload.write_u16(PAYLOAD_MARKER);
        payload.write_u8(self.join_type as u8);
        payload.write_u16(self.unk1);
        payload.write_bytes(&PAYLOAD_PADDING);
        payload.into_bytes()
    }

    pub fn to_casted(&self) -> SysCastedBinary {
        SysCastedBinary {
            char_id: self.char_id,
            broadcast_type: ENVELOPE_BROADCAST_TYPE,
            message_type: ENVELOPE_MESSAGE_TYPE,
            payload: self.payload(),
        }
    }
}

impl Message for BinPlayerJoinedParty {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CASTED_BINARY
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        self.to_casted().build(cursor)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
