//! Admin session and share-token authentication.

pub mod edge;
pub mod middleware;
pub mod password;
pub mod session;
pub mod share;
pub mod signer;

pub use edge::{edge_guard, EdgeDecision, LOGIN_PATH};
pub use middleware::{check_rate_limit, AdminSession, AppState};
pub use password::AdminPassword;
pub use session::{verify_shallow, SessionAuthority, SessionCredential, SESSION_COOKIE};
pub use share::ShareTokens;
pub use signer::Signer;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or unusable secret. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}
