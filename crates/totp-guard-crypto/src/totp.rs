//! Time-based one-time passwords (RFC 6238) with replay protection.
//!
//! A code is matched against every time step inside a fuzz window around the
//! current time, skipping every step at or below the account's watermark.
//!
//! # Invariants
//!
//! - Ratchet: a returned counter is always `> watermark`, so persisting it as
//!   the new watermark rejects an immediate re-submission of the same code
//! - Ordering: steps are scanned in ascending order and the first match wins
//! - Totality: no timestamp, window or watermark value panics or overflows

use std::time::{SystemTime, UNIX_EPOCH};

use crate::hotp::HotpKey;

/// Length of one time step in seconds.
pub const TIMESTEP: u64 = 30;

/// Default fuzz window in seconds on each side of the current time.
pub const DEFAULT_WINDOW: u32 = 30;

/// Result of matching a code against a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The code matched this counter, which becomes the new watermark.
    Matched(u64),
    /// No counter in the window (above the watermark) produced the code.
    NoMatch,
}

impl MatchOutcome {
    /// Returns the matched counter, if any.
    pub fn counter(self) -> Option<u64> {
        match self {
            Self::Matched(counter) => Some(counter),
            Self::NoMatch => None,
        }
    }

    /// Returns true if the code matched.
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// A TOTP verifier bound to one shared secret.
#[derive(Debug, Clone)]
pub struct Totp {
    key: HotpKey,
}

impl Totp {
    /// Create a verifier from raw (already Base32-decoded) secret bytes of
    /// any length.
    pub fn new(secret: &[u8]) -> Self {
        Self { key: HotpKey::new(secret) }
    }

    /// The code an authenticator app displays at `unix_time`.
    pub fn code_at(&self, unix_time: f64) -> u32 {
        self.key.generate(counter_at(unix_time))
    }

    /// The code for an explicit counter.
    pub fn code_for_counter(&self, counter: u64) -> u32 {
        self.key.generate(counter)
    }

    /// Match `code` against the steps within `window` seconds of
    /// `unix_time`, ignoring every step at or below `watermark`.
    pub fn matches(&self, code: u32, watermark: u64, unix_time: f64, window: u32) -> MatchOutcome {
        let window = f64::from(window);
        let low = step_floor(unix_time - window).max(i128::from(watermark) + 1);
        let high = step_floor(unix_time + window).saturating_add(1);

        (low..high)
            .map_while(|step| u64::try_from(step).ok())
            .find(|&counter| self.key.verify(counter, code))
            .map_or(MatchOutcome::NoMatch, MatchOutcome::Matched)
    }
}

/// Match `code` for `secret` against the window around `timestamp`.
///
/// Uses wall-clock time when `timestamp` is `None`. The verifier is
/// stateless: on [`MatchOutcome::Matched`] the caller stores the counter as
/// the account's new watermark.
pub fn match_code(
    secret: &[u8],
    code: u32,
    watermark: u64,
    timestamp: Option<f64>,
    window: u32,
) -> MatchOutcome {
    let now = timestamp.unwrap_or_else(unix_now);
    Totp::new(secret).matches(code, watermark, now, window)
}

/// Time step containing `unix_time`, clamped to the `u64` range.
pub fn counter_at(unix_time: f64) -> u64 {
    u64::try_from(step_floor(unix_time).clamp(0, i128::from(u64::MAX))).unwrap_or(u64::MAX)
}

/// Seconds since the Unix epoch according to the system clock.
///
/// A clock set before 1970 reads as zero.
pub fn unix_now() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

/// `floor(seconds / TIMESTEP)` in a domain wide enough for any `u64`
/// watermark. The float-to-int cast saturates and maps NaN to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn step_floor(seconds: f64) -> i128 {
    (seconds / TIMESTEP as f64).floor() as i128
}
