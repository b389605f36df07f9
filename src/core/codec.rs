//! # Frame Codec
//!
//! Tokio codec that splits a raw TCP byte stream into header + body pairs.
//!
//! The codec waits for a full 14-byte [`PacketFrame`] header, then for `dataSize` body bytes,
//! and yields both as a [`RawPacket`]. The body is still ciphertext here: the codec never looks
//! at checksums or key rotation, it only guarantees that each item is exactly one packet.
//!
//! ## Security
//! - Declared body sizes above the configured limit are rejected before buffering them
//! - Partial frames are left in the buffer untouched until more bytes arrive

use crate::config::CodecConfig;
use crate::core::frame::PacketFrame;
use crate::error::{ProtocolError, Result};
use crate::utils::metrics::Metrics;
use bytes::{Buf, Bytes, BytesMut};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};
use tracing::{debug, warn};

/// One packet as it travels on the wire: header plus (encrypted) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub header: PacketFrame,
    pub body: Bytes,
}

impl RawPacket {
    /// Pair a header with its body, checking that `dataSize` matches the body length.
    pub fn new(header: PacketFrame, body: impl Into<Bytes>) -> Result<Self> {
        let body = body.into();
        if header.data_size as usize != body.len() {
            return Err(ProtocolError::PayloadSizeMismatch {
                declared: header.data_size as usize,
                actual: body.len(),
            });
        }
        Ok(Self { header, body })
    }

    /// Header bytes followed by the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.frame_len());
        out.extend_from_slice(&self.header.encode());
        out.extend_from_slice(&self.body);
        out
    }
}

/// Length-aware framing codec for the encrypted packet stream.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_payload_size: usize,
    metrics: Option<Arc<Metrics>>,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl FrameCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            max_payload_size: config.max_payload_size,
            metrics: None,
        }
    }

    /// Report frame counts and byte totals into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl Decoder for FrameCodec {
    type Item = RawPacket;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < PacketFrame::LEN {
            return Ok(None);
        }

        let header = PacketFrame::decode(&src[..PacketFrame::LEN])?;
        let body_len = header.data_size as usize;

        if body_len > self.max_payload_size {
            warn!(
                declared = body_len,
                limit = self.max_payload_size,
                "Rejecting oversized frame"
            );
            return Err(ProtocolError::OversizedPacket(body_len));
        }

        let frame_len = header.frame_len();
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(PacketFrame::LEN);
        let body = src.split_to(body_len).freeze();

        if let Some(metrics) = &self.metrics {
            metrics.frame_decoded(frame_len as u64);
        }
        debug!(header = %header, "Decoded frame");

        Ok(Some(RawPacket { header, body }))
    }
}

impl Encoder<RawPacket> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: RawPacket, dst: &mut BytesMut) -> Result<()> {
        let declared = item.header.data_size as usize;
        if declared != item.body.len() {
            return Err(ProtocolError::PayloadSizeMismatch {
                declared,
                actual: item.body.len(),
            });
        }
        if declared > self.max_payload_size {
            return Err(ProtocolError::OversizedPacket(declared));
        }

        dst.reserve(item.header.frame_len());
        item.header.encode_into(dst);
        dst.extend_from_slice(&item.body);

        if let Some(metrics) = &self.metrics {
            metrics.frame_encoded(item.header.frame_len() as u64);
        }
        debug!(header = %item.header, "Encoded frame");
        Ok(())
    }
}

/// Wrap an async byte stream in the frame codec.
pub fn framed<T>(io: T, config: &CodecConfig) -> Framed<T, FrameCodec>
where
    T: AsyncRead + AsyncWrite,
{
    Framed::new(io, FrameCodec::new(config))
}
