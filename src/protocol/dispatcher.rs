use crate::config::CodecConfig;
use crate::core::cursor::ByteCursor;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::opcode::PacketId;
use crate::protocol::sys::{SysAck, SysCastBinary, SysCastedBinary, SysEnd, SysNop, SysPing};
use crate::utils::metrics::Metrics;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, warn};

type ConstructorFn = dyn Fn() -> Box<dyn Message> + Send + Sync + 'static;

/// Opcode registry that turns decrypted packet bodies into typed messages.
///
/// Maps each `u16` opcode to a constructor for an empty message, which then parses itself from
/// the body. The table sits behind a lock so one dispatcher can be shared by every connection;
/// clones share the same table, so a registration through any clone is seen by all of them.
#[derive(Clone)]
pub struct Dispatcher {
    constructors: Arc<RwLock<HashMap<u16, Box<ConstructorFn>>>>,
    reject_trailing_bytes: bool,
    metrics: Option<Arc<Metrics>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Empty registry that rejects trailing bytes.
    pub fn new() -> Self {
        Self {
            constructors: Arc::new(RwLock::new(HashMap::new())),
            reject_trailing_bytes: true,
            metrics: None,
        }
    }

    /// Registry preloaded with every message type that can be parsed.
    pub fn with_defaults() -> Result<Self> {
        let dispatcher = Self::new();
        dispatcher.register_defaults()?;
        Ok(dispatcher)
    }

    /// Preloaded registry honouring the codec settings.
    pub fn with_config(config: &CodecConfig) -> Result<Self> {
        let mut dispatcher = Self::with_defaults()?;
        dispatcher.reject_trailing_bytes = config.reject_trailing_bytes;
        Ok(dispatcher)
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn register_defaults(&self) -> Result<()> {
        self.register(PacketId::MSG_SYS_END.as_u16(), || Box::new(SysEnd))?;
        self.register(PacketId::MSG_SYS_NOP.as_u16(), || Box::new(SysNop))?;
        self.register(PacketId::MSG_SYS_ACK.as_u16(), || {
            Box::new(SysAck::default())
        })?;
        self.register(PacketId::MSG_SYS_PING.as_u16(), || {
            Box::new(SysPing::default())
        })?;
        self.register(PacketId::MSG_SYS_CAST_BINARY.as_u16(), || {
            Box::new(SysCastBinary::default())
        })?;
        self.register(PacketId::MSG_SYS_CASTED_BINARY.as_u16(), || {
            Box::new(SysCastedBinary::default())
        })?;
        Ok(())
    }

    /// Register (or replace) the constructor for `opcode`.
    pub fn register<F>(&self, opcode: u16, constructor: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Message> + Send + Sync + 'static,
    {
        let mut constructors = self
            .constructors
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string()))?;

        constructors.insert(opcode, Box::new(constructor));
        Ok(())
    }

    pub fn is_registered(&self, opcode: u16) -> Result<bool> {
        let constructors = self
            .constructors
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;
        Ok(constructors.contains_key(&opcode))
    }

    fn instantiate(&self, opcode: u16) -> Result<Box<dyn Message>> {
        let constructors = self
            .constructors
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;

        match constructors.get(&opcode) {
            Some(constructor) => Ok(constructor()),
            None => {
                if let Some(metrics) = &self.metrics {
                    metrics.unsupported_opcode();
                }
                warn!(opcode = format_args!("{opcode:#06X}"), "Unsupported opcode");
                Err(ProtocolError::UnsupportedOpcode(opcode))
            }
        }
    }

    fn parse_from(&self, opcode: u16, cursor: &mut ByteCursor) -> Result<Box<dyn Message>> {
        let mut message = self.instantiate(opcode)?;
        if let Err(err) = message.parse(cursor) {
            if let Some(metrics) = &self.metrics {
                metrics.parse_error();
            }
            debug!(opcode = format_args!("{opcode:#06X}"), error = %err, "Message parse failed");
            return Err(err);
        }
        if let Some(metrics) = &self.metrics {
            metrics.message_parsed();
        }
        Ok(message)
    }

    fn check_consumed(&self, cursor: &ByteCursor) -> Result<()> {
        let left = cursor.remaining();
        if self.reject_trailing_bytes && left > 0 {
            if let Some(metrics) = &self.metrics {
                metrics.parse_error();
            }
            return Err(ProtocolError::TrailingBytes(left));
        }
        Ok(())
    }

    /// Parse `body` as the message registered for `opcode`.
    ///
    /// The message must consume the whole body unless trailing bytes are allowed by config.
    #[instrument(level = "debug", skip(self, body), fields(len = body.len()))]
    pub fn dispatch(&self, opcode: u16, body: &[u8]) -> Result<Box<dyn Message>> {
        let mut cursor = ByteCursor::from_bytes(body);
        let message = self.parse_from(opcode, &mut cursor)?;
        self.check_consumed(&cursor)?;
        debug!(opcode = %message.opcode(), "Dispatched message");
        Ok(message)
    }

    /// Parse a packet group: `u16 opcode` + body, repeated until `MSG_SYS_END` or until fewer
    /// than two bytes remain.
    #[instrument(level = "debug", skip(self, group), fields(len = group.len()))]
    pub fn dispatch_group(&self, group: &[u8]) -> Result<Vec<Box<dyn Message>>> {
        let mut cursor = ByteCursor::from_bytes(group);
        let mut messages = Vec::new();

        let mut terminated = false;
        while cursor.remaining() >= 2 {
            let opcode = cursor.read_u16()?;
            if opcode == PacketId::MSG_SYS_END.as_u16() {
                terminated = true;
                break;
            }
            messages.push(self.parse_from(opcode, &mut cursor)?);
        }

        // Bytes after the terminator are padding.
        if !terminated {
            self.check_consumed(&cursor)?;
        }
        debug!(count = messages.len(), "Dispatched packet group");
        Ok(messages)
    }

    /// Message body without the opcode.
    pub fn build(&self, message: &dyn Message) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new();
        message.build(&mut cursor)?;
        if let Some(metrics) = &self.metrics {
            metrics.message_built();
        }
        Ok(cursor.into_bytes())
    }

    /// `u16 opcode` followed by the message body.
    pub fn encode_message(&self, message: &dyn Message) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new();
        self.encode_into(message, &mut cursor)?;
        Ok(cursor.into_bytes())
    }

    /// Several messages back to back, closed with `MSG_SYS_END`.
    pub fn encode_group(&self, messages: &[&dyn Message]) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new();
        for message in messages {
            self.encode_into(*message, &mut cursor)?;
        }
        cursor.write_u16(PacketId::MSG_SYS_END.as_u16());
        Ok(cursor.into_bytes())
    }

    fn encode_into(&self, message: &dyn Message, cursor: &mut ByteCursor) -> Result<()> {
        cursor.write_u16(message.opcode().as_u16());
        message.build(cursor)?;
        if let Some(metrics) = &self.metrics {
            metrics.message_built();
        }
        Ok(())
    }
}
