//! Credential storage abstraction.
//!
//! One [`Credential`] per enrolled account: the Base32 secret and the replay
//! watermark. Both change together, and only at enrollment or after a
//! successful verification.
//!
//! # Invariants
//!
//! - Atomicity: [`CredentialStore::update`] runs its closure with exclusive
//!   access to the account's slot. Database-backed stores implement it as a
//!   transaction or row lock.
//! - Monotonicity: callers only ever raise `last_valid`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted second-factor state for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Base32 shared secret.
    pub secret: String,
    /// Highest counter ever accepted for this account.
    pub last_valid: u64,
}

/// Errors from the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A thread panicked while holding the store lock.
    #[error("credential store lock poisoned")]
    Poisoned,

    /// Backend-specific failure (I/O, database, ...).
    #[error("credential store backend error: {0}")]
    Backend(String),
}

/// Storage for per-account credentials.
pub trait CredentialStore: Send + Sync {
    /// Load the credential for `account`, if enrolled.
    fn load(&self, account: &str) -> Result<Option<Credential>, StoreError>;

    /// Run `f` with exclusive access to `account`'s slot and persist
    /// whatever it leaves there.
    ///
    /// Setting the slot to `None` removes the credential.
    fn update<R, F>(&self, account: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<Credential>) -> R;
}

/// In-memory credential store.
///
/// Clones share the same map. A single mutex serializes all updates, which
/// trivially satisfies per-account atomicity.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    credentials: Arc<Mutex<HashMap<String, Credential>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrolled accounts.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.credentials.lock().map_err(|_| StoreError::Poisoned)?.len())
    }

    /// Returns true if no account is enrolled.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self, account: &str) -> Result<Option<Credential>, StoreError> {
        let credentials = self.credentials.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(credentials.get(account).cloned())
    }

    fn update<R, F>(&self, account: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<Credential>) -> R,
    {
        let mut credentials = self.credentials.lock().map_err(|_| StoreError::Poisoned)?;

        let mut slot = credentials.get(account).cloned();
        let result = f(&mut slot);

        match slot {
            Some(credential) => {
                credentials.insert(account.to_string(), credential);
            },
            None => {
                credentials.remove(account);
            },
        }

        Ok(result)
    }
}
