//! Authenticator
//!
//! Ties the verifier to a clock and a credential store.
//!
//! ## Responsibilities
//!
//! - Enrollment: hand out a fresh secret and its provisioning URI, then
//!   persist it only once the user proves their app produces matching codes
//! - Login: match a code and ratchet the watermark in one store update
//! - Disable: drop the credential
//!
//! Lockout after repeated failures is left to the caller.

use serde::{Deserialize, Serialize};
use totp_guard_crypto::{DEFAULT_WINDOW, MatchOutcome, Totp};

use crate::{
    clock::Clock,
    error::AuthError,
    secret::{SecretKey, generate_secret, group_secret},
    store::{Credential, CredentialStore},
    uri::provisioning_uri,
};

/// Largest accepted fuzz window in seconds (ten steps each side).
///
/// The verifier computes one HMAC per step in the window while holding the
/// account's store lock, so the window bounds the work a single login does.
pub const MAX_WINDOW: u32 = 300;

/// Authenticator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    /// Issuer shown in authenticator apps (e.g. the company name).
    pub issuer: Option<String>,
    /// Fuzz window in seconds on each side of the current time. Values above
    /// [`MAX_WINDOW`] are clamped.
    pub window: u32,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self { issuer: None, window: DEFAULT_WINDOW }
    }
}

/// A secret offered to the user but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEnrollment {
    /// Base32 secret, for manual entry.
    pub secret: String,
    /// `otpauth://` URI, for the QR code.
    pub uri: String,
}

impl PendingEnrollment {
    /// Secret split into groups of four for display.
    pub fn grouped_secret(&self) -> String {
        group_secret(&self.secret)
    }
}

/// Outcome of an enrollment attempt, for logging.
enum Enrollment {
    Enabled(u64),
    AlreadyEnabled,
    CodeMismatch,
}

/// Second-factor authenticator.
///
/// # Type Parameters
///
/// - `C`: Clock implementation
/// - `S`: Credential store
pub struct Authenticator<C: Clock, S: CredentialStore> {
    clock: C,
    store: S,
    config: AuthenticatorConfig,
}

impl<C: Clock, S: CredentialStore> Authenticator<C, S> {
    /// Create an authenticator.
    pub fn new(clock: C, store: S, mut config: AuthenticatorConfig) -> Self {
        if config.window > MAX_WINDOW {
            tracing::warn!("Window of {}s clamped to {}s", config.window, MAX_WINDOW);
            config.window = MAX_WINDOW;
        }

        Self { clock, store, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// Underlying credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate a secret and provisioning URI for `label`.
    ///
    /// Nothing is persisted; pass the secret back to [`Self::try_enable`]
    /// together with the first code the user's app shows.
    pub fn begin_enrollment(&self, label: &str) -> Result<PendingEnrollment, AuthError> {
        let secret = generate_secret()?.to_base32();
        let uri = provisioning_uri(label, &secret, self.config.issuer.as_deref());

        Ok(PendingEnrollment { secret, uri })
    }

    /// Enable the second factor for `account` if `code` matches `secret`.
    ///
    /// Returns `Ok(false)`, persisting nothing, when the code does not match
    /// or the account is already enrolled. On success the secret is stored
    /// in canonical form with the matched counter as watermark.
    pub fn try_enable(&self, account: &str, secret: &str, code: u32) -> Result<bool, AuthError> {
        let key = SecretKey::from_base32(secret)?;
        let totp = Totp::new(key.as_bytes());
        let now = self.clock.unix_time();
        let window = self.config.window;

        let enrollment = self.store.update(account, |slot| {
            if slot.is_some() {
                return Enrollment::AlreadyEnabled;
            }

            match totp.matches(code, 0, now, window) {
                MatchOutcome::Matched(counter) => {
                    *slot = Some(Credential { secret: key.to_base32(), last_valid: counter });
                    Enrollment::Enabled(counter)
                },
                MatchOutcome::NoMatch => Enrollment::CodeMismatch,
            }
        })?;

        match enrollment {
            Enrollment::Enabled(counter) => {
                tracing::info!("Two-factor enabled for {} at step {}", account, counter);
                Ok(true)
            },
            Enrollment::AlreadyEnabled => {
                tracing::warn!("Two-factor already enabled for {}", account);
                Ok(false)
            },
            Enrollment::CodeMismatch => {
                tracing::debug!("Enrollment code mismatch for {}", account);
                Ok(false)
            },
        }
    }

    /// Check a login code for `account`.
    ///
    /// On success the watermark is raised to the matched counter, which is
    /// returned. A code is therefore accepted at most once.
    pub fn verify(&self, account: &str, code: u32) -> Result<u64, AuthError> {
        let now = self.clock.unix_time();
        let window = self.config.window;

        let result = self.store.update(account, |slot| -> Result<u64, AuthError> {
            let credential = slot.as_mut().ok_or(AuthError::NotEnrolled)?;
            let key = SecretKey::from_base32(&credential.secret)?;
            let totp = Totp::new(key.as_bytes());

            match totp.matches(code, credential.last_valid, now, window) {
                MatchOutcome::Matched(counter) => {
                    credential.last_valid = counter;
                    Ok(counter)
                },
                MatchOutcome::NoMatch => Err(AuthError::VerificationFailed),
            }
        })?;

        match &result {
            Ok(counter) => tracing::debug!("Code accepted for {} at step {}", account, counter),
            Err(e) if e.is_denial() => tracing::warn!("Code rejected for {}: {}", account, e),
            Err(e) => tracing::error!("Stored credential unusable for {}: {}", account, e),
        }

        result
    }

    /// Remove the second factor for `account`.
    ///
    /// Returns true if a credential existed.
    pub fn disable(&self, account: &str) -> Result<bool, AuthError> {
        let removed = self.store.update(account, Option::take)?.is_some();

        if removed {
            tracing::info!("Two-factor disabled for {}", account);
        }
        Ok(removed)
    }

    /// Returns true if `account` has a second factor enrolled.
    pub fn is_enabled(&self, account: &str) -> Result<bool, AuthError> {
        Ok(self.store.load(account)?.is_some())
    }
}
