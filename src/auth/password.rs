//! Admin password storage and constant-time checking.

use super::AuthError;
use super::signer::constant_time_eq;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

/// The configured admin password.
///
/// A plaintext password is never kept; only its SHA-256 digest, so every
/// comparison runs over two fixed-length digests and leaks neither length
/// nor prefix.
#[derive(Clone)]
pub enum AdminPassword {
    Sha256([u8; 32]),
    /// Argon2 PHC string, e.g. produced by `uatgate hash-password`.
    Argon2(String),
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminPassword::Sha256(_) => f.write_str("AdminPassword::Sha256([REDACTED])"),
            AdminPassword::Argon2(_) => f.write_str("AdminPassword::Argon2([REDACTED])"),
        }
    }
}

impl AdminPassword {
    pub fn from_plaintext(password: &str) -> Result<Self, AuthError> {
        if password.is_empty() {
            return Err(AuthError::Configuration(
                "admin password is empty".to_string(),
            ));
        }
        Ok(AdminPassword::Sha256(Sha256::digest(password.as_bytes()).into()))
    }

    pub fn from_phc(hash: &str) -> Result<Self, AuthError> {
        PasswordHash::new(hash)
            .map_err(|e| AuthError::Configuration(format!("invalid password hash: {}", e)))?;
        Ok(AdminPassword::Argon2(hash.to_string()))
    }

    /// Check a submitted password.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            AdminPassword::Sha256(expected) => {
                let provided = Sha256::digest(candidate.as_bytes());
                constant_time_eq(provided.as_slice(), expected)
            }
            AdminPassword::Argon2(phc) => match PasswordHash::new(phc) {
                // argon2 compares the output hash in constant time
                Ok(parsed) => Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }
}

/// Hash a password into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::Configuration(
            "admin password is empty".to_string(),
        ));
    }

    let mut salt_bytes = [0u8; 16];
    rand::fill(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::Configuration(format!("salt encoding: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Configuration(format!("argon2 hash: {}", e)))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_match() {
        let pw = AdminPassword::from_plaintext("hunter2").unwrap();
        assert!(pw.matches("hunter2"));
        assert!(!pw.matches("hunter3"));
        assert!(!pw.matches("hunter"));
        assert!(!pw.matches(""));
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        assert!(matches!(
            AdminPassword::from_plaintext(""),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_argon2_roundtrip() {
        let phc = hash_password("correct horse").unwrap();
        assert!(phc.starts_with("$argon2id$"));

        let pw = AdminPassword::from_phc(&phc).unwrap();
        assert!(pw.matches("correct horse"));
        assert!(!pw.matches("battery staple"));
    }

    #[test]
    fn test_invalid_phc_rejected() {
        assert!(matches!(
            AdminPassword::from_phc("not-a-phc-string"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_redacts() {
        let pw = AdminPassword::from_plaintext("hunter2").unwrap();
        assert!(format!("{:?}", pw).contains("REDACTED"));
    }
}
