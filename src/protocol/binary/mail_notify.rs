//! New-mail notification. Outbound only.
//!
//! Layout: `u8 0x01`, then the sender name as a 21-byte zero-padded Shift-JIS field whose last
//! byte is always `0`.

use crate::config::PaddedStringFallback;
use crate::core::cursor::ByteCursor;
use crate::error::Result;
use crate::protocol::binary::BinaryMessageType;
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use crate::protocol::sys::SysCastedBinary;
use crate::utils::text::padded_string;
use std::any::Any;

/// Width of the sender-name field
pub const SENDER_NAME_SIZE: usize = 21;

const MAIL_NOTIFY_MARKER: u8 = 0x01;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinMailNotify {
    pub sender_name: String,
    /// What to write when the name has no Shift-JIS form
    pub fallback: PaddedStringFallback,
}

impl BinMailNotify {
    pub fn new(sender_name: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
            fallback: PaddedStringFallback::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: PaddedStringFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Build and wrap in a casted envelope attributed to the mail's sender.
    pub fn wrap(&self, sender_id: u32) -> Result<SysCastedBinary> {
        let mut payload = ByteCursor::new();
        self.build(&mut payload)?;
        Ok(SysCastedBinary {
            char_id: sender_id,
            broadcast_type: 0x00,
            message_type: BinaryMessageType::MailNotify as u8,
            payload: payload.into_bytes(),
        })
    }
}

impl Message for BinMailNotify {
    fn opcode(&self) -> PacketId {
        PacketId::MSG_SYS_CASTED_BINARY
    }

    fn build(&self, cursor: &mut ByteCursor) -> Result<()> {
        let name = padded_string(&self.sender_name, SENDER_NAME_SIZE, true, self.fallback)?;
        cursor.write_u8(MAIL_NOTIFY_MARKER);
        cursor.write_bytes(&name);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Direction, ProtocolError};
    use crate::protocol::message::build_to_vec;

    #[test]
    fn test_layout() {
        let bytes = build_to_vec(&BinMailNotify::new("Bob")).unwrap();
        assert_eq!(bytes.len(), 1 + SENDER_NAME_SIZE);
        assert_eq!(&bytes[..4], &[0x01, b'B', b'o', b'b']);
        assert!(bytes[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_long_name_truncated_with_terminator() {
        let bytes = build_to_vec(&BinMailNotify::new("A".repeat(30))).unwrap();
        assert_eq!(bytes.len(), 22);
        assert!(bytes[1..21].iter().all(|b| *b == b'A'));
        assert_eq!(bytes[21], 0);
    }

    #[test]
    fn test_fallback_policy() {
        let strict = BinMailNotify::new("🎣");
        assert!(matches!(
            build_to_vec(&strict),
            Err(ProtocolError::TranscodingFailure(_))
        ));

        let lossy = strict.with_fallback(PaddedStringFallback::ZeroFill);
        let bytes = build_to_vec(&lossy).unwrap();
        assert_eq!(bytes[0], 0x01);
        assert!(bytes[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_wrap_and_parse_rejected() {
        let casted = BinMailNotify::new("Bob").wrap(1234).unwrap();
        assert_eq!(casted.char_id, 1234);
        assert_eq!(casted.broadcast_type, 0x00);
        assert_eq!(casted.message_type, 4);

        let mut notify = BinMailNotify::default();
        assert!(matches!(
            notify.parse(&mut ByteCursor::from_bytes(&[0x01])),
            Err(ProtocolError::NotImplementedDirection {
                direction: Direction::Parse,
                ..
            })
        ));
    }
}
