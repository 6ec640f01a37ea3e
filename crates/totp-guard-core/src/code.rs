//! Parsing and display of user-facing codes.

use totp_guard_crypto::DIGITS;

use crate::error::AuthError;

/// Parse a code typed by a user.
///
/// All whitespace is dropped (authenticator apps often display `123 456`).
/// What remains must be between one and [`DIGITS`] ASCII digits; leading
/// zeros are insignificant because codes are compared numerically.
pub fn parse_code(text: &str) -> Result<u32, AuthError> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty()
        || digits.len() > DIGITS as usize
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AuthError::MalformedCode);
    }

    digits.parse().map_err(|_| AuthError::MalformedCode)
}

/// Zero-pad a code to [`DIGITS`] digits for display.
pub fn format_code(code: u32) -> String {
    format!("{:0width$}", code, width = DIGITS as usize)
}
