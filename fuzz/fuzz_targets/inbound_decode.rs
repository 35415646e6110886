//! Fuzz target for Inbound::decode
//!
//! This fuzzer tests frame classification with arbitrary input to find:
//! - Parser crashes or panics
//! - Tags that classify inconsistently
//! - Payload shapes that bypass validation
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use palaver_proto::Inbound;

fuzz_target!(|data: &[u8]| {
    // Attempt to classify arbitrary bytes as an inbound frame
    // This should never panic, only return Err for invalid data
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Inbound::decode(text);
    }
});
