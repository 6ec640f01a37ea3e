//! Authenticator error types.

use thiserror::Error;

use crate::{secret::SecretError, store::StoreError};

/// Errors from enrollment and verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No step in the window above the watermark produced the code.
    #[error("verification failed: code does not match")]
    VerificationFailed,

    /// The account has no second factor enrolled.
    #[error("two-factor authentication is not enabled for this account")]
    NotEnrolled,

    /// The submitted code is not a short string of digits.
    #[error("malformed code")]
    MalformedCode,

    /// Stored or submitted secret could not be decoded or generated.
    #[error("invalid secret: {0}")]
    Secret(#[from] SecretError),

    /// The credential store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Returns true if this error means "access denied".
    ///
    /// Denials are the user's fault and map to a generic login failure.
    /// Everything else is a data-integrity or infrastructure problem that
    /// operators need to see.
    pub fn is_denial(&self) -> bool {
        match self {
            Self::VerificationFailed | Self::NotEnrolled | Self::MalformedCode => true,

            Self::Secret(_) | Self::Store(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_failed_is_denial() {
        assert!(AuthError::VerificationFailed.is_denial());
        assert!(AuthError::MalformedCode.is_denial());
    }

    #[test]
    fn corrupt_secret_is_not_denial() {
        let err = AuthError::from(SecretError::InvalidEncoding);
        assert!(!err.is_denial());
        assert_eq!(err.to_string(), "invalid secret: secret must be valid base32");
    }

    #[test]
    fn store_failure_is_not_denial() {
        assert!(!AuthError::from(StoreError::Poisoned).is_denial());
    }
}
