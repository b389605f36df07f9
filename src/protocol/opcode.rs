//! Opcodes of the message types this crate can parse or build.

use std::fmt;

/// Wire opcode (`u16`, big-endian) selecting a message type.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum PacketId {
    MSG_HEAD = 0x0000,
    MSG_SYS_END = 0x0010,
    MSG_SYS_NOP = 0x0011,
    MSG_SYS_ACK = 0x0012,
    MSG_SYS_PING = 0x0017,
    MSG_SYS_CAST_BINARY = 0x0018,
    MSG_SYS_CASTED_BINARY = 0x001B,
    MSG_SYS_UPDATE_RIGHT = 0x0058,
}

impl PacketId {
    pub const ALL: [PacketId; 8] = [
        PacketId::MSG_HEAD,
        PacketId::MSG_SYS_END,
        PacketId::MSG_SYS_NOP,
        PacketId::MSG_SYS_ACK,
        PacketId::MSG_SYS_PING,
        PacketId::MSG_SYS_CAST_BINARY,
        PacketId::MSG_SYS_CASTED_BINARY,
        PacketId::MSG_SYS_UPDATE_RIGHT,
    ];

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_u16() == value)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            PacketId::MSG_HEAD => "MSG_HEAD",
            PacketId::MSG_SYS_END => "MSG_SYS_END",
            PacketId::MSG_SYS_NOP => "MSG_SYS_NOP",
            PacketId::MSG_SYS_ACK => "MSG_SYS_ACK",
            PacketId::MSG_SYS_PING => "MSG_SYS_PING",
            PacketId::MSG_SYS_CAST_BINARY => "MSG_SYS_CAST_BINARY",
            PacketId::MSG_SYS_CASTED_BINARY => "MSG_SYS_CASTED_BINARY",
            PacketId::MSG_SYS_UPDATE_RIGHT => "MSG_SYS_UPDATE_RIGHT",
        }
    }
}

impl From<PacketId> for u16 {
    fn from(id: PacketId) -> Self {
        id.as_u16()
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#06X})", self.name(), self.as_u16())
    }
}
