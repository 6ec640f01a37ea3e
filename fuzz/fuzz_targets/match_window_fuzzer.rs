//! Fuzz target for TOTP window matching
//!
//! Prevent replay and out-of-window acceptance on hostile inputs.
//!
//! # Strategy
//!
//! - Arbitrary secrets, codes and watermarks (including `u64::MAX`)
//! - Timestamps from the full `f64` range (NaN, infinities, negatives)
//! - Windows up to ten minutes, spanning many steps
//!
//! # Invariants
//!
//! - A matched counter is ALWAYS above the watermark
//! - A matched counter ALWAYS reproduces the submitted code
//! - A matched counter lies inside the window around the timestamp
//! - Re-submitting with the matched counter as watermark never matches the
//!   same or an earlier step
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use totp_guard_crypto::{counter_at, MatchOutcome, Totp};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    secret: Vec<u8>,
    code: u32,
    watermark: u64,
    unix_time: f64,
    window: u16,
}

fuzz_target!(|input: FuzzInput| {
    let totp = Totp::new(&input.secret);

    let window = u32::from(input.window % 600);
    let outcome = totp.matches(input.code, input.watermark, input.unix_time, window);

    if let MatchOutcome::Matched(counter) = outcome {
        assert!(
            counter > input.watermark,
            "matched {} at or below watermark {}",
            counter,
            input.watermark
        );
        assert_eq!(totp.code_for_counter(counter), input.code);

        if input.unix_time.is_finite() {
            let low = counter_at(input.unix_time - f64::from(window));
            let high = counter_at(input.unix_time + f64::from(window));
            assert!(
                low <= counter && counter <= high,
                "counter {} outside [{}, {}]",
                counter,
                low,
                high
            );
        }

        if let MatchOutcome::Matched(again) =
            totp.matches(input.code, counter, input.unix_time, window)
        {
            assert!(again > counter, "ratchet went backwards: {} -> {}", counter, again);
        }
    }
});
