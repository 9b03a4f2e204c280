#![no_main]

use libfuzzer_sys::fuzz_target;
use packet::{Limits, Packet};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(packet) = Packet::parse_with_limits(text, &Limits::unlimited()) {
        // Formatting must reparse to the same packet.
        let formatted = packet.to_string();
        assert_eq!(formatted.len(), packet.encoded_len());
        let reparsed = Packet::parse_with_limits(&formatted, &Limits::unlimited())
            .expect("formatted packet reparses");
        assert_eq!(reparsed, packet);
    }
});
