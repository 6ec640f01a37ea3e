//! HMAC-based one-time passwords (RFC 4226).
//!
//! The algorithm, digit count and truncation are fixed: authenticator apps
//! provisioned through `otpauth://` URIs overwhelmingly assume HMAC-SHA1 and
//! six digits, so there is nothing to negotiate.

use hmac::{
    Hmac, Mac,
    digest::{Key, KeyInit},
};
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// HMAC algorithm name as advertised in provisioning URIs.
pub const ALGORITHM: &str = "SHA1";

/// Number of decimal digits in a code.
pub const DIGITS: u32 = 6;

/// `10^DIGITS`, the code space.
const MODULUS: u32 = 10u32.pow(DIGITS);

/// Length of an HMAC-SHA1 digest.
const DIGEST_LEN: usize = 20;

/// SHA-1 block size; HMAC keys are normalized to exactly this length.
const BLOCK_LEN: usize = 64;

/// A shared secret keyed into HMAC-SHA1, ready to produce codes.
///
/// Keying happens once; every code derivation clones the keyed state.
#[derive(Clone)]
pub struct HotpKey {
    mac: HmacSha1,
}

impl HotpKey {
    /// Key HMAC-SHA1 with raw secret bytes of any length, including none.
    ///
    /// The secret must already be decoded from its text form (Base32). Keys
    /// longer than a block are hashed and shorter ones zero-padded (RFC 2104
    /// section 2), which makes keying infallible.
    pub fn new(secret: &[u8]) -> Self {
        let mut block = [0u8; BLOCK_LEN];
        if secret.len() > BLOCK_LEN {
            block[..DIGEST_LEN].copy_from_slice(&<Sha1 as Digest>::digest(secret));
        } else {
            block[..secret.len()].copy_from_slice(secret);
        }

        let mac = <HmacSha1 as KeyInit>::new(Key::<HmacSha1>::from_slice(&block));
        Self { mac }
    }

    /// Compute the code for `counter`.
    pub fn generate(&self, counter: u64) -> u32 {
        let mut mac = self.mac.clone();
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        dynamic_truncate(digest.as_slice()) % MODULUS
    }

    /// Compare `code` against the code for `counter` in constant time.
    pub fn verify(&self, counter: u64, code: u32) -> bool {
        self.generate(counter).ct_eq(&code).into()
    }
}

impl std::fmt::Debug for HotpKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotpKey").finish_non_exhaustive()
    }
}

/// Compute `HOTP(secret, counter)`.
///
/// Convenience form of [`HotpKey::generate`] for one-off derivations.
pub fn hotp(secret: &[u8], counter: u64) -> u32 {
    HotpKey::new(secret).generate(counter)
}

/// RFC 4226 section 5.3 dynamic truncation.
///
/// The low nibble of the last byte selects a 4-byte window; the top bit is
/// cleared so the result is a 31-bit value. That caps useful code lengths at
/// 9 digits, which is inherent to the algorithm.
fn dynamic_truncate(digest: &[u8]) -> u32 {
    debug_assert_eq!(digest.len(), DIGEST_LEN);

    let offset = usize::from(digest[DIGEST_LEN - 1] & 0x0f);
    let window = [digest[offset], digest[offset + 1], digest[offset + 2], digest[offset + 3]];

    u32::from_be_bytes(window) & 0x7fff_ffff
}
