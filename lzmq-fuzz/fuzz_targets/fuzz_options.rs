#![no_main]

use libfuzzer_sys::fuzz_target;
use lzmq_core::options::{lookup_context_option, lookup_socket_option, socket_options, OptionValue};
use lzmq_core::socket_type::SocketType;

fuzz_target!(|data: &[u8]| {
    // Name resolution must never panic, whatever the input
    if let Ok(name) = std::str::from_utf8(data) {
        let _ = lookup_socket_option(name);
        let _ = lookup_context_option(name);
        let _ = SocketType::from_name(name);
    }

    // First byte picks an option, the rest is the engine's output buffer
    if let Some((&selector, buf)) = data.split_first() {
        let options = socket_options();
        let spec = &options[usize::from(selector) % options.len()];

        if let Ok(value) = spec.decode(buf) {
            let _ = spec.encode(&value);
        }
        let _ = spec.encode(&OptionValue::Bytes(buf.to_vec()));
    }
});
