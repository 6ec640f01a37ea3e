//! Shared secrets and their Base32 text form.
//!
//! Secrets are stored and provisioned as RFC 4648 Base32 so they fit in
//! `otpauth://` URIs and can be typed by hand. Only decoded bytes ever reach
//! the verifier, and those are wiped when dropped, as is the normalized text
//! used while decoding.

use data_encoding::{BASE32, BASE32_NOPAD};
use thiserror::Error;
use zeroize::{ZeroizeOnDrop, Zeroizing};

/// Length of a generated secret in bytes (160 bits, the RFC 4226
/// recommendation for HMAC-SHA1).
pub const SECRET_LEN: usize = 20;

/// Errors from decoding or generating secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// Text is not valid Base32.
    #[error("secret must be valid base32")]
    InvalidEncoding,

    /// Text decoded to zero bytes.
    #[error("secret cannot be empty")]
    Empty,

    /// The OS entropy source failed.
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

/// Raw secret bytes, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wrap raw secret bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SecretError> {
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self { bytes })
    }

    /// Decode a Base32 secret.
    ///
    /// Spaces and dashes are ignored and the text is upper-cased first, so
    /// grouped or lower-case input from a user is accepted. Padding is
    /// optional.
    pub fn from_base32(text: &str) -> Result<Self, SecretError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(SecretError::Empty);
        }

        let bytes = BASE32_NOPAD
            .decode(normalized.as_bytes())
            .or_else(|_| BASE32.decode(normalized.as_bytes()))
            .map_err(|_| SecretError::InvalidEncoding)?;

        Self::from_bytes(bytes)
    }

    /// Canonical text form: upper-case Base32 without padding.
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.bytes)
    }

    /// Raw bytes for the verifier.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty secrets cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}

/// Generate a fresh [`SECRET_LEN`]-byte secret from the OS CSPRNG.
pub fn generate_secret() -> Result<SecretKey, SecretError> {
    let mut bytes = vec![0u8; SECRET_LEN];
    getrandom::fill(&mut bytes).map_err(|e| SecretError::Entropy(e.to_string()))?;
    SecretKey::from_bytes(bytes)
}

/// Split a Base32 secret into space-separated groups of four for display.
pub fn group_secret(text: &str) -> String {
    let normalized = normalize(text);
    let mut grouped = String::with_capacity(normalized.len() + normalized.len() / 4);

    for (i, c) in normalized.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// Strip separators and upper-case; the copy is wiped when dropped.
fn normalize(text: &str) -> Zeroizing<String> {
    Zeroizing::new(
        text.chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_canonical_secret() {
        let key = SecretKey::from_base32("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(key.as_bytes(), b"Hello!\xde\xad\xbe\xef");
        assert_eq!(key.to_base32(), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn decodes_user_formatted_secret() {
        let key = SecretKey::from_base32(" jbsw y3dp-ehpk 3pxp ").unwrap();
        assert_eq!(key.as_bytes(), b"Hello!\xde\xad\xbe\xef");
    }

    #[test]
    fn decodes_padded_secret() {
        // 5 bytes -> 8 chars, no padding; 1 byte -> 2 chars + 6 padding.
        let key = SecretKey::from_base32("ME======").unwrap();
        assert_eq!(key.as_bytes(), b"a");
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert_eq!(SecretKey::from_base32("JBSWY3DP1!").unwrap_err(), SecretError::InvalidEncoding);
    }

    #[test]
    fn rejects_empty_secret() {
        assert_eq!(SecretKey::from_base32("  - ").unwrap_err(), SecretError::Empty);
        assert_eq!(SecretKey::from_bytes(Vec::new()).unwrap_err(), SecretError::Empty);
    }

    #[test]
    fn generated_secrets_are_distinct() {
        let a = generate_secret().unwrap();
        let b = generate_secret().unwrap();

        assert_eq!(a.len(), SECRET_LEN);
        assert_eq!(a.to_base32().len(), 32);
        assert_ne!(a.as_bytes(), b.as_bytes(), "Random secrets should differ");
    }

    #[test]
    fn groups_secret_for_display() {
        assert_eq!(group_secret("JBSWY3DPEHPK3PXP"), "JBSW Y3DP EHPK 3PXP");
        assert_eq!(group_secret("jbswy3"), "JBSW Y3");
        assert_eq!(group_secret(""), "");
    }

    #[test]
    fn normalized_text_is_zeroizing() {
        let normalized: Zeroizing<String> = normalize(" jbsw-y3dp\tehpk ");
        assert_eq!(normalized.as_str(), "JBSWY3DPEHPK");
    }

    #[test]
    fn debug_hides_secret_bytes() {
        let key = SecretKey::from_base32("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(format!("{key:?}"), "SecretKey { len: 10, .. }");
    }
}
