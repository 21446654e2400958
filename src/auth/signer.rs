//! HMAC-SHA256 signing with the process-wide signing secret.

use super::AuthError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest over arbitrary messages.
///
/// The MAC is keyed once at construction and cloned per call, so `sign`
/// cannot fail after startup.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("key", &"[REDACTED]").finish()
    }
}

impl Signer {
    /// Build a signer from the signing secret.
    ///
    /// An empty secret is a configuration error; there is no fallback key.
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "signing secret is empty".to_string(),
            ));
        }

        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| AuthError::Configuration(format!("invalid signing key: {}", e)))?;

        Ok(Signer { mac })
    }

    /// Lowercase hex HMAC-SHA256 of `message`.
    pub fn sign(&self, message: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Recompute the digest for `message` and compare it to `candidate` in
    /// constant time.
    pub fn verify(&self, message: &str, candidate: &str) -> bool {
        let expected = self.sign(message);
        constant_time_eq(expected.as_bytes(), candidate.as_bytes())
    }
}

/// Constant-time byte comparison.
///
/// Unequal lengths return false without touching the contents.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = Signer::new(b"");
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_sign_is_deterministic_hex() {
        let signer = Signer::new(SECRET).unwrap();
        let a = signer.sign("hello");
        let b = signer.sign("hello");
        assert_eq!(a, b);
        // SHA-256 digest is 32 bytes -> 64 hex chars
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_known_vector() {
        // RFC 4231 test case 2
        let signer = Signer::new(b"Jefe").unwrap();
        assert_eq!(
            signer.sign("what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_different_keys_produce_different_digests() {
        let a = Signer::new(SECRET).unwrap();
        let b = Signer::new(b"another-secret-another-secret-xx").unwrap();
        assert_ne!(a.sign("msg"), b.sign("msg"));
    }

    #[test]
    fn test_verify() {
        let signer = Signer::new(SECRET).unwrap();
        let digest = signer.sign("payload");

        assert!(signer.verify("payload", &digest));
        assert!(!signer.verify("payload2", &digest));
        assert!(!signer.verify("payload", &digest[..63]));
        assert!(!signer.verify("payload", ""));
        assert!(!signer.verify("payload", &digest.to_uppercase()));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = Signer::new(SECRET).unwrap();
        let debug = format!("{:?}", signer);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("0123456789"));
    }
}
