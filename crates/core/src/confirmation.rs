//! Stateless confirmation codes for the signup flow.
//!
//! A code is `<issued_at base36>-<hex of the first 10 HMAC-SHA256 bytes>`.
//! The MAC covers the user id, email, last login time and issue time, so a
//! code stops verifying once the user logs in (token exchange records
//! `last_login_at`) or changes email, and it expires after the configured
//! TTL. Nothing is persisted.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::DbId;

type HmacSha256 = Hmac<Sha256>;

/// Number of MAC bytes kept in the code.
const MAC_PREFIX_BYTES: usize = 10;

/// Default code lifetime: three days.
pub const DEFAULT_CODE_TTL_SECS: i64 = 3 * 24 * 60 * 60;

/// The user state a code is bound to.
#[derive(Debug, Clone, Copy)]
pub struct CodeSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    /// `last_login_at` in Unix microseconds, if the user ever logged in.
    pub last_login: Option<i64>,
}

/// Issues and checks confirmation codes with a server-side secret.
#[derive(Clone)]
pub struct CodeSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl std::fmt::Debug for CodeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl CodeSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Issue a code for `subject` at Unix time `now`.
    pub fn make_code(&self, subject: &CodeSubject<'_>, now: i64) -> String {
        let mac = self.mac(subject, now).finalize().into_bytes();
        let digest: String = mac[..MAC_PREFIX_BYTES]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        format!("{}-{digest}", to_base36(now))
    }

    /// Check `code` against `subject` at Unix time `now`.
    pub fn check_code(&self, subject: &CodeSubject<'_>, code: &str, now: i64) -> bool {
        let Some((ts_part, digest_part)) = code.split_once('-') else {
            return false;
        };
        let Some(issued_at) = from_base36(ts_part) else {
            return false;
        };
        if issued_at > now || now - issued_at > self.ttl_secs {
            return false;
        }
        let Some(expected) = decode_hex(digest_part) else {
            return false;
        };
        if expected.len() != MAC_PREFIX_BYTES {
            return false;
        }
        self.mac(subject, issued_at)
            .verify_truncated_left(&expected)
            .is_ok()
    }

    fn mac(&self, subject: &CodeSubject<'_>, issued_at: i64) -> HmacSha256 {
        // HMAC accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
        let last_login = subject
            .last_login
            .map(|t| t.to_string())
            .unwrap_or_default();
        mac.update(
            format!(
                "{}|{}|{}|{}",
                subject.user_id, subject.email, last_login, issued_at
            )
            .as_bytes(),
        );
        mac
    }
}

fn to_base36(mut n: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 12 {
        return None;
    }
    i64::from_str_radix(s, 36).ok()
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;
    const NOW_MICROS: i64 = NOW * 1_000_000;

    fn signer() -> CodeSigner {
        CodeSigner::new("test-secret", 3600)
    }

    fn subject(last_login: Option<i64>) -> CodeSubject<'static> {
        CodeSubject {
            user_id: 5,
            email: "reader@example.com",
            last_login,
        }
    }

    #[test]
    fn issued_code_verifies() {
        let s = signer();
        let code = s.make_code(&subject(None), NOW);
        assert!(s.check_code(&subject(None), &code, NOW + 10));
    }

    #[test]
    fn code_is_invalidated_by_login() {
        let s = signer();
        let code = s.make_code(&subject(None), NOW);
        assert!(!s.check_code(&subject(Some(NOW_MICROS + 5_000_000)), &code, NOW + 10));
    }

    #[test]
    fn logins_within_one_second_are_distinguished() {
        let s = signer();
        let after_first = subject(Some(NOW_MICROS + 1));
        let code = s.make_code(&after_first, NOW);
        assert!(s.check_code(&after_first, &code, NOW));
        assert!(!s.check_code(&subject(Some(NOW_MICROS + 2)), &code, NOW));
    }

    #[test]
    fn code_is_bound_to_email_and_user() {
        let s = signer();
        let code = s.make_code(&subject(None), NOW);
        let other_email = CodeSubject {
            email: "other@example.com",
            ..subject(None)
        };
        let other_user = CodeSubject {
            user_id: 6,
            ..subject(None)
        };
        assert!(!s.check_code(&other_email, &code, NOW));
        assert!(!s.check_code(&other_user, &code, NOW));
    }

    #[test]
    fn code_expires_after_ttl() {
        let s = signer();
        let code = s.make_code(&subject(None), NOW);
        assert!(s.check_code(&subject(None), &code, NOW + 3600));
        assert!(!s.check_code(&subject(None), &code, NOW + 3601));
    }

    #[test]
    fn code_from_the_future_is_rejected() {
        let s = signer();
        let code = s.make_code(&subject(None), NOW + 100);
        assert!(!s.check_code(&subject(None), &code, NOW));
    }

    #[test]
    fn different_secret_rejects() {
        let code = signer().make_code(&subject(None), NOW);
        let other = CodeSigner::new("another-secret", 3600);
        assert!(!other.check_code(&subject(None), &code, NOW));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        let s = signer();
        for code in ["", "nodash", "-abcd", "zz-", "1-xyz", "1-abcd", "!!-00"] {
            assert!(!s.check_code(&subject(None), code, NOW), "accepted {code:?}");
        }
    }

    #[test]
    fn base36_roundtrip() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(from_base36(&to_base36(NOW)), Some(NOW));
    }
}
