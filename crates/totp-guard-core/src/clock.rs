//! Wall-clock abstraction for deterministic testing.
//!
//! TOTP depends on real time, which makes verification logic awkward to test.
//! The `Clock` trait decouples the authenticator from the system clock:
//!
//! - Production: [`SystemClock`] reads `SystemTime`.
//! - Tests: [`ManualClock`] holds a settable instant shared between clones.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Source of Unix time in seconds.
///
/// Unlike a monotonic clock this may jump backwards (NTP corrections); the
/// watermark, not the clock, is what keeps verification monotonic.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Seconds since the Unix epoch.
    fn unix_time(&self) -> f64;
}

/// Production clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn unix_time(&self) -> f64 {
        totp_guard_crypto::unix_now()
    }
}

/// Clock whose time only changes when told to.
///
/// Clones share the same instant, so a test can hold one handle and advance
/// time under an authenticator that owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `unix_time`.
    pub fn new(unix_time: f64) -> Self {
        Self { bits: Arc::new(AtomicU64::new(unix_time.to_bits())) }
    }

    /// Jump to `unix_time`.
    pub fn set(&self, unix_time: f64) {
        self.bits.store(unix_time.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.unix_time() + seconds);
    }
}

impl Clock for ManualClock {
    fn unix_time(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
