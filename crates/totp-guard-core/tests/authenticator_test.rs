//! Authenticator integration tests
//!
//! These tests verify the login flow's critical invariants:
//! - Enrollment persists the matched counter as watermark
//! - Replayed codes are rejected
//! - The watermark never decreases
//! - Concurrent submissions of one code succeed at most once

use std::{sync::Arc, thread};

use proptest::prelude::*;
use totp_guard_core::{
    AuthError, Authenticator, AuthenticatorConfig, Clock, Credential, CredentialStore, DEFAULT_WINDOW,
    ManualClock, MatchOutcome, MemoryStore, SecretKey, StoreError, format_code, parse_code,
};
use totp_guard_crypto::{Totp, counter_at, match_code};

const SECRET: &str = "JBSWY3DPEHPK3PXP";

fn totp() -> Totp {
    let key = SecretKey::from_base32(SECRET).expect("valid secret");
    Totp::new(key.as_bytes())
}

fn enrolled(t: f64) -> (Authenticator<ManualClock, MemoryStore>, ManualClock) {
    let clock = ManualClock::new(t);
    let auth = Authenticator::new(clock.clone(), MemoryStore::new(), AuthenticatorConfig::default());
    assert!(auth.try_enable("alice", SECRET, totp().code_at(t)).expect("enable"));
    (auth, clock)
}

#[test]
fn match_then_replay_with_returned_watermark() {
    let key = SecretKey::from_base32(SECRET).expect("valid secret");
    let t = 1_700_000_000.0;
    let code = totp().code_at(t);

    let outcome = match_code(key.as_bytes(), code, 0, Some(t), DEFAULT_WINDOW);
    assert_eq!(outcome, MatchOutcome::Matched(counter_at(t)));

    let replay = match_code(key.as_bytes(), code, counter_at(t), Some(t), DEFAULT_WINDOW);
    assert_eq!(replay, MatchOutcome::NoMatch);
}

#[test]
fn login_with_typed_code() {
    let t = 1_700_000_000.0;
    let (auth, clock) = enrolled(t);

    clock.advance(35.0);
    let typed = format!(" {} ", format_code(totp().code_at(t + 35.0)));
    let code = parse_code(&typed).expect("well-formed code");

    assert_eq!(auth.verify("alice", code).expect("accepted"), counter_at(t + 35.0));
}

#[test]
fn clock_skew_within_window_is_tolerated() {
    let t = 1_700_000_000.0;
    let (auth, clock) = enrolled(t);

    // User's phone runs 25 seconds ahead of the server.
    clock.advance(60.0);
    let code = totp().code_at(t + 85.0);

    assert_eq!(auth.verify("alice", code).expect("accepted"), counter_at(t + 85.0));
}

#[test]
fn stale_code_outside_window_is_rejected() {
    let t = 1_700_000_000.0;
    let (auth, clock) = enrolled(t);

    clock.advance(300.0);
    let stale = totp().code_at(t + 150.0);

    let err = auth.verify("alice", stale).unwrap_err();
    assert!(matches!(err, AuthError::VerificationFailed));
    assert!(err.is_denial());
}

#[test]
fn concurrent_replay_succeeds_once() {
    let t = 1_700_000_000.0;
    let (auth, clock) = enrolled(t);
    clock.advance(30.0);
    let code = totp().code_at(t + 30.0);

    let auth = Arc::new(auth);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let auth = Arc::clone(&auth);
            thread::spawn(move || auth.verify("alice", code).is_ok())
        })
        .collect();

    let accepted =
        handles.into_iter().map(|h| h.join().expect("thread panicked")).filter(|ok| *ok).count();
    assert_eq!(accepted, 1);
}

/// Store whose backend is always down.
struct UnavailableStore;

impl CredentialStore for UnavailableStore {
    fn load(&self, _account: &str) -> Result<Option<Credential>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    fn update<R, F>(&self, _account: &str, _f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<Credential>) -> R,
    {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

#[test]
fn store_outage_is_not_a_denial() {
    let auth = Authenticator::new(
        ManualClock::new(1_700_000_000.0),
        UnavailableStore,
        AuthenticatorConfig::default(),
    );

    let err = auth.verify("alice", 123_456).unwrap_err();
    assert!(matches!(err, AuthError::Store(StoreError::Backend(_))));
    assert!(!err.is_denial());
    assert!(auth.is_enabled("alice").is_err());
}

#[test]
fn prop_watermark_is_monotonic() {
    proptest!(|(advances in prop::collection::vec(0u32..120, 1..20))| {
        let t0 = 1_700_000_000.0;
        let (auth, clock) = enrolled(t0);
        let mut watermark = counter_at(t0);

        for advance in advances {
            clock.advance(f64::from(advance));
            let now = clock.unix_time();
            let code = totp().code_at(now);

            match auth.verify("alice", code) {
                Ok(counter) => {
                    prop_assert!(counter > watermark, "counter {} <= watermark {}", counter, watermark);
                    watermark = counter;
                },
                Err(AuthError::VerificationFailed) => {
                    // Same step as the last accepted code.
                    prop_assert!(counter_at(now) <= watermark);
                },
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }

            let stored = auth.store().load("alice").expect("load").expect("enrolled");
            prop_assert_eq!(stored.last_valid, watermark);
        }
    });
}
