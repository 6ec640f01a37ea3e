//! `otpauth://` provisioning URIs.
//!
//! The URI is what the enrollment screen turns into a QR code. Format per the
//! Google Authenticator key URI convention:
//!
//! ```text
//! otpauth://totp/<issuer>:<label>?secret=<b32>&issuer=<issuer>&algorithm=SHA1&digits=6&period=30
//! ```

use std::fmt::Write as _;

use totp_guard_crypto::{ALGORITHM, DIGITS, TIMESTEP};

/// Build the provisioning URI for `label` (usually the login).
///
/// `secret_base32` is embedded as-is; pass the canonical form from
/// [`SecretKey::to_base32`](crate::SecretKey::to_base32).
pub fn provisioning_uri(label: &str, secret_base32: &str, issuer: Option<&str>) -> String {
    let mut uri = String::from("otpauth://totp/");

    if let Some(issuer) = issuer {
        uri.push_str(&percent_encode(issuer));
        uri.push(':');
    }
    uri.push_str(&percent_encode(label));

    uri.push_str("?secret=");
    uri.push_str(&percent_encode(secret_base32));
    if let Some(issuer) = issuer {
        uri.push_str("&issuer=");
        uri.push_str(&percent_encode(issuer));
    }

    let _ = write!(uri, "&algorithm={ALGORITHM}&digits={DIGITS}&period={TIMESTEP}");
    uri
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
