//! Stateless admin session credentials.
//!
//! A credential is `"{timestamp_ms}.{hex_signature}"` where the signature is
//! the HMAC of `admin-session:{timestamp_ms}`. Nothing is stored server-side:
//! validity is recomputed from the signing secret and the presented string.
//!
//! Two verification levels exist:
//! - [`verify_shallow`]: shape and expiry only, no secret needed. Used by the
//!   edge guard to bounce stale or garbage cookies cheaply.
//! - [`SessionAuthority::verify_full`]: signature recomputation plus expiry.
//!   The only check that authorizes privileged operations.

use super::password::AdminPassword;
use super::signer::Signer;
use super::AuthError;
use std::fmt;
use std::sync::Arc;

/// Cookie carrying the admin session credential.
pub const SESSION_COOKIE: &str = "admin_session";

/// Session lifetime. No sliding renewal.
pub const SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Allowance for issuance timestamps slightly ahead of the verifier's clock.
pub const MAX_CLOCK_SKEW_MS: u64 = 60 * 1000;

/// Why a session credential was rejected. Only surfaced in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionRejection {
    #[error("malformed session credential")]
    Malformed,

    #[error("session signature mismatch")]
    BadSignature,

    #[error("session expired")]
    Expired,
}

impl SessionRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRejection::Malformed => "malformed",
            SessionRejection::BadSignature => "bad_signature",
            SessionRejection::Expired => "expired",
        }
    }
}

/// Parsed `timestamp.signature` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    pub issued_at_ms: u64,
    pub signature: String,
}

impl SessionCredential {
    /// Parse a raw credential. Exactly two dot-separated, non-empty parts;
    /// the timestamp must be plain ASCII digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let (timestamp, signature) = raw.split_once('.')?;

        if signature.is_empty() || signature.contains('.') {
            return None;
        }
        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let issued_at_ms = timestamp.parse::<u64>().ok()?;

        Some(SessionCredential {
            issued_at_ms,
            signature: signature.to_string(),
        })
    }

    fn check_window(&self, now_ms: u64) -> Result<(), SessionRejection> {
        if self.issued_at_ms > now_ms.saturating_add(MAX_CLOCK_SKEW_MS) {
            return Err(SessionRejection::Malformed);
        }
        if now_ms.saturating_sub(self.issued_at_ms) > SESSION_TTL_MS {
            return Err(SessionRejection::Expired);
        }
        Ok(())
    }
}

impl fmt::Display for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.issued_at_ms, self.signature)
    }
}

fn session_message(issued_at_ms: u64) -> String {
    format!("admin-session:{}", issued_at_ms)
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Shallow check: shape and expiry window, no signature.
pub fn check_shallow(raw: &str, now_ms: u64) -> Result<SessionCredential, SessionRejection> {
    let credential = SessionCredential::parse(raw).ok_or(SessionRejection::Malformed)?;
    credential.check_window(now_ms)?;
    Ok(credential)
}

/// Shallow check against the system clock.
///
/// Never sufficient for authorization; see [`SessionAuthority::verify_full`].
pub fn verify_shallow(raw: &str) -> bool {
    verify_shallow_at(raw, now_millis())
}

pub fn verify_shallow_at(raw: &str, now_ms: u64) -> bool {
    check_shallow(raw, now_ms).is_ok()
}

/// Issues and fully verifies admin sessions.
#[derive(Debug, Clone)]
pub struct SessionAuthority {
    signer: Arc<Signer>,
    password: AdminPassword,
}

impl SessionAuthority {
    pub fn new(signer: Arc<Signer>, password: AdminPassword) -> Self {
        SessionAuthority { signer, password }
    }

    /// Check the admin password and mint a credential stamped now.
    pub fn issue(&self, password: &str) -> Result<SessionCredential, AuthError> {
        self.issue_at(password, now_millis())
    }

    pub fn issue_at(&self, password: &str, now_ms: u64) -> Result<SessionCredential, AuthError> {
        if !self.password.matches(password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.mint(now_ms))
    }

    /// Sign a credential for `issued_at_ms` without a password check.
    pub(crate) fn mint(&self, issued_at_ms: u64) -> SessionCredential {
        SessionCredential {
            issued_at_ms,
            signature: self.signer.sign(&session_message(issued_at_ms)),
        }
    }

    /// Full check: signature first, then the expiry window.
    pub fn check_full(
        &self,
        raw: &str,
        now_ms: u64,
    ) -> Result<SessionCredential, SessionRejection> {
        let credential = SessionCredential::parse(raw).ok_or(SessionRejection::Malformed)?;

        if !self
            .signer
            .verify(&session_message(credential.issued_at_ms), &credential.signature)
        {
            return Err(SessionRejection::BadSignature);
        }

        credential.check_window(now_ms)?;
        Ok(credential)
    }

    pub fn verify_full(&self, raw: &str) -> bool {
        self.verify_full_at(raw, now_millis())
    }

    pub fn verify_full_at(&self, raw: &str, now_ms: u64) -> bool {
        self.check_full(raw, now_ms).is_ok()
    }
}
