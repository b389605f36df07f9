#![no_main]

use libfuzzer_sys::fuzz_target;
use mhf_protocol::protocol::dispatcher::Dispatcher;
use mhf_protocol::protocol::sys::SysCastBinary;

fuzz_target!(|data: &[u8]| {
    let Ok(dispatcher) = Dispatcher::with_defaults() else {
        return;
    };

    // Packet groups as they arrive after decryption
    if let Ok(messages) = dispatcher.dispatch_group(data) {
        for message in &messages {
            if let Some(cast) = message.downcast_ref::<SysCastBinary>() {
                let _ = cast.decode_payload();
            }
        }
    }

    // Single bodies under every opcode the first two bytes can name
    if data.len() >= 2 {
        let opcode = u16::from_be_bytes([data[0], data[1]]);
        let _ = dispatcher.dispatch(opcode, &data[2..]);
    }
});
