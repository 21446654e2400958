//! Share tokens: deterministic, resource-scoped bearer capabilities.
//!
//! A token is the HMAC of `share:{resource_id}`. Tokens are never stored and
//! carry no expiry; rotating the signing secret invalidates all of them.

use super::signer::{constant_time_eq, Signer};
use std::sync::Arc;

fn share_message(resource_id: &str) -> String {
    format!("share:{}", resource_id)
}

#[derive(Debug, Clone)]
pub struct ShareTokens {
    signer: Arc<Signer>,
}

impl ShareTokens {
    pub fn new(signer: Arc<Signer>) -> Self {
        ShareTokens { signer }
    }

    /// Token for `resource_id`. Callers must have checked admin auth.
    pub fn issue_for(&self, resource_id: &str) -> String {
        self.signer.sign(&share_message(resource_id))
    }

    /// Check a presented token. Requires no authentication.
    pub fn verify_for(&self, resource_id: &str, presented: &str) -> bool {
        let expected = self.issue_for(resource_id);
        if expected.len() != presented.len() {
            return false;
        }
        constant_time_eq(expected.as_bytes(), presented.as_bytes())
    }
}
