//! TOTP Guard Cryptographic Primitives
//!
//! This crate provides the one-time password building blocks used by the
//! second-factor subsystem: HOTP (RFC 4226) and its time-based variant TOTP
//! (RFC 6238), restricted to the parameters every authenticator app agrees
//! on.
//!
//! # Design
//!
//! All functions in this crate are total and pure - given a secret, a code, a watermark
//! and a timestamp they produce the same answer every time and touch no
//! state. The only exception is [`match_code`] reading the wall clock when
//! the caller does not supply a timestamp.
//!
//! Persisting the watermark returned by a successful match is the caller's
//! job. Read, match and write must happen as one atomic unit per account.
//!
//! # Security Properties
//!
//! - Replay protection: counters at or below the watermark never match
//! - Skew tolerance: codes from neighbouring steps within the fuzz window
//!   are accepted
//! - Constant-time comparison of submitted and expected codes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod hotp;
pub mod totp;

pub use hotp::{ALGORITHM, DIGITS, HotpKey, hotp};
pub use totp::{DEFAULT_WINDOW, MatchOutcome, TIMESTEP, Totp, counter_at, match_code, unix_now};
