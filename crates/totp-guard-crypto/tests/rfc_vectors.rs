//! Published test vectors for HOTP (RFC 4226) and TOTP (RFC 6238).

use totp_guard_crypto::{DEFAULT_WINDOW, MatchOutcome, Totp, counter_at, hotp, match_code};

const RFC_SECRET: &[u8] = b"12345678901234567890";

#[test]
fn rfc4226_appendix_d() {
    let expected = [
        755_224, 287_082, 359_152, 969_429, 338_314, 254_676, 287_922, 162_583, 399_871, 520_489,
    ];

    for (counter, code) in expected.into_iter().enumerate() {
        assert_eq!(hotp(RFC_SECRET, counter as u64), code, "counter {counter}");
    }
}

#[test]
fn hotp_is_deterministic() {
    for counter in [0, 1, 59, 37_037_036, u64::MAX] {
        let first = hotp(RFC_SECRET, counter);
        let second = hotp(RFC_SECRET, counter);
        assert_eq!(first, second);
    }
}

#[test]
fn rfc6238_sha1_vectors_truncated_to_six_digits() {
    // Appendix B lists 8-digit codes; the trailing six digits are the
    // 6-digit codes for the same steps.
    let vectors: [(f64, u32); 6] = [
        (59.0, 287_082),
        (1_111_111_109.0, 81_804),
        (1_111_111_111.0, 50_471),
        (1_234_567_890.0, 5_924),
        (2_000_000_000.0, 279_037),
        (20_000_000_000.0, 353_130),
    ];

    let totp = Totp::new(RFC_SECRET);
    for (t, code) in vectors {
        assert_eq!(totp.code_at(t), code, "T = {t}");
        assert_eq!(
            match_code(RFC_SECRET, code, 0, Some(t), DEFAULT_WINDOW),
            MatchOutcome::Matched(counter_at(t)),
            "T = {t}"
        );
    }
}
