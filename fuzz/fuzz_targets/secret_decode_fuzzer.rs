//! Fuzz target for Base32 secret decoding
//!
//! # Invariants
//!
//! - Decoding arbitrary text never panics
//! - A decoded secret is never empty
//! - The canonical form decodes back to the same bytes

#![no_main]

use libfuzzer_sys::fuzz_target;
use totp_guard_core::SecretKey;

fuzz_target!(|text: &str| {
    if let Ok(key) = SecretKey::from_base32(text) {
        assert!(!key.is_empty());

        let canonical = key.to_base32();
        let again = SecretKey::from_base32(&canonical).expect("canonical form must decode");
        assert_eq!(again.as_bytes(), key.as_bytes());
    }
});
