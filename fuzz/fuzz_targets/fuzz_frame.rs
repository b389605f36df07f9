#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use mhf_protocol::core::codec::FrameCodec;
use mhf_protocol::core::frame::PacketFrame;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Header decode must never panic and must round-trip whatever it accepts
    if let Ok(header) = PacketFrame::decode(data) {
        assert_eq!(&header.encode()[..], &data[..PacketFrame::LEN]);
    }

    // Drain the stream codec until it needs more input or rejects the stream
    let mut codec = FrameCodec::default();
    let mut buf = BytesMut::from(data);
    while let Ok(Some(_)) = codec.decode(&mut buf) {}
});
