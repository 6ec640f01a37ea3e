//! TOTP Guard Core
//!
//! Second-factor enrollment and login verification built on the
//! [`totp_guard_crypto`] verifier.
//!
//! ## Architecture
//!
//! ```text
//! totp-guard-core
//!   ├─ Authenticator     (enroll / verify / disable)
//!   ├─ Clock             (wall clock, manual clock for tests)
//!   ├─ CredentialStore   (secret + watermark per account)
//!   ├─ secret            (Base32 codec, generation)
//!   ├─ uri               (otpauth:// provisioning)
//!   └─ code              (parsing and display)
//! ```
//!
//! ## Replay protection
//!
//! Each account carries a watermark: the highest counter ever accepted. The
//! authenticator reads it, matches the code and writes the new watermark
//! inside a single [`CredentialStore::update`] call, so two concurrent
//! logins can never both accept the same code.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod clock;
pub mod code;
mod error;
pub mod secret;
mod store;
pub mod uri;

pub use auth::{Authenticator, AuthenticatorConfig, MAX_WINDOW, PendingEnrollment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{format_code, parse_code};
pub use error::AuthError;
pub use secret::{SECRET_LEN, SecretError, SecretKey, generate_secret, group_secret};
pub use store::{Credential, CredentialStore, MemoryStore, StoreError};
pub use totp_guard_crypto::{DEFAULT_WINDOW, DIGITS, MatchOutcome, TIMESTEP};
pub use uri::provisioning_uri;
