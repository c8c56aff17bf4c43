use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::errors::AuthError;
use crate::modules::utils::time::Clock;

/// Length of the random reset token in bytes (hex-encoded on the wire)
const RESET_TOKEN_BYTES: usize = 32;

/// A single outstanding password-reset grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub email: String,
    pub expires_at: u64,
}

/// Storage interface for outstanding reset tokens, keyed by token string.
///
/// `delete` returns the removed entry so consumption is atomic inside
/// the implementation: two racing consumers cannot both get it back.
pub trait ResetTokenStore: Send + Sync {
    fn get(&self, token: &str) -> Option<ResetToken>;
    fn set(&self, token: &str, entry: ResetToken);
    fn delete(&self, token: &str) -> Option<ResetToken>;
}

/// Process-lifetime reset token store
#[derive(Default)]
pub struct InMemoryResetTokenStore {
    entries: Mutex<HashMap<String, ResetToken>>,
}

impl InMemoryResetTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResetTokenStore for InMemoryResetTokenStore {
    fn get(&self, token: &str) -> Option<ResetToken> {
        self.entries
            .lock()
            .expect("reset token store lock poisoned")
            .get(token)
            .cloned()
    }

    fn set(&self, token: &str, entry: ResetToken) {
        self.entries
            .lock()
            .expect("reset token store lock poisoned")
            .insert(token.to_string(), entry);
    }

    fn delete(&self, token: &str) -> Option<ResetToken> {
        self.entries
            .lock()
            .expect("reset token store lock poisoned")
            .remove(token)
    }
}

/// Single-use reset token lifecycle over an injected store.
///
/// Every token carries a TTL; an expired token reports the same error as
/// an unknown one.
pub struct ResetTokens {
    store: Arc<dyn ResetTokenStore>,
    clock: Arc<dyn Clock>,
    ttl: u64,
}

impl ResetTokens {
    pub fn new(store: Arc<dyn ResetTokenStore>, clock: Arc<dyn Clock>, ttl: u64) -> Self {
        Self { store, clock, ttl }
    }

    /// Mint a fresh random token for the account and store the mapping.
    ///
    /// Earlier tokens for the same account stay outstanding.
    pub fn create(&self, email: &str) -> String {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill(&mut bytes);
        let token = hex::encode(bytes);

        self.store.set(
            &token,
            ResetToken {
                email: email.to_string(),
                expires_at: self.clock.now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its account email, removing it in the same step.
    ///
    /// Absent, already-consumed, and expired tokens are indistinguishable
    /// to the caller.
    pub fn resolve_and_consume(&self, token: &str) -> Result<String, AuthError> {
        let entry = self
            .store
            .delete(token)
            .ok_or(AuthError::InvalidResetToken)?;

        if self.clock.now() >= entry.expires_at {
            return Err(AuthError::InvalidResetToken);
        }
        Ok(entry.email)
    }
}
