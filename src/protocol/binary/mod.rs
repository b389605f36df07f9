//! # Binary Payloads
//!
//! Messages that travel inside the cast / casted binary envelopes rather than as top-level
//! packets. Each type builds its own payload bytes; the outbound ones then wrap that payload in a
//! [`SysCastedBinary`](crate::protocol::sys::SysCastedBinary) addressed to the receiving clients.

pub mod chat;
pub mod mail_notify;
pub mod player_joined_party;
pub mod targeted;

pub use chat::{BinChat, ChatType};
pub use mail_notify::BinMailNotify;
pub use player_joined_party::{BinPlayerJoinedParty, PartyJoinType};
pub use targeted::{BinTargeted, TargetType};

/// `message_type` tag of a cast binary.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMessageType {
    State = 0,
    Chat = 1,
    Quest = 2,
    Data = 3,
    MailNotify = 4,
    Emote = 6,
}

impl BinaryMessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::State),
            1 => Some(Self::Chat),
            2 => Some(Self::Quest),
            3 => Some(Self::Data),
            4 => Some(Self::MailNotify),
            6 => Some(Self::Emote),
            _ => None,
        }
    }
}

/// `broadcast_type` tag of a cast binary.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastType {
    Targeted = 0x01,
    Stage = 0x03,
    Server = 0x06,
    World = 0x0a,
}

impl BroadcastType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Targeted),
            0x03 => Some(Self::Stage),
            0x06 => Some(Self::Server),
            0x0a => Some(Self::World),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lookup() {
        assert_eq!(BinaryMessageType::from_u8(4), Some(BinaryMessageType::MailNotify));
        assert_eq!(BinaryMessageType::from_u8(5), None);
        assert_eq!(BroadcastType::from_u8(0x0a), Some(BroadcastType::World));
        assert_eq!(BroadcastType::from_u8(0x00), None);
    }
}
