use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Define verification status enum
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Unverified,
    Verified,
}

impl VerificationStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

/// A single account record, keyed by email (case-sensitive as received)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password_hash: String,
    pub verification_status: VerificationStatus,
    /// Pending emailed code; `None` once the account is verified
    pub verification_code: Option<String>,
    pub created_at: u64,
}

/// Storage interface for account records.
///
/// Implementations must be safe for concurrent use; compound
/// check-then-write sequences are serialized by the caller through
/// [`KeyLocks`].
pub trait AccountStore: Send + Sync {
    fn get(&self, email: &str) -> Option<Account>;
    fn set(&self, email: &str, account: Account);
    fn delete(&self, email: &str) -> Option<Account>;
}

/// Process-lifetime account store
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .expect("account store lock poisoned")
            .get(email)
            .cloned()
    }

    fn set(&self, email: &str, account: Account) {
        self.accounts
            .lock()
            .expect("account store lock poisoned")
            .insert(email.to_string(), account);
    }

    fn delete(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .expect("account store lock poisoned")
            .remove(email)
    }
}

/// Per-key mutual exclusion for check-then-write account mutations.
///
/// The store itself only guarantees atomic single operations; flows take
/// the key's lock around read-modify-write sequences so that at most one
/// state transition per email can succeed at a time.
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get the lock handle for a key, creating it on first use.
    ///
    /// The table grows with distinct keys and entries are never dropped,
    /// matching the process-lifetime account store.
    pub fn acquire(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .expect("key lock table poisoned")
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience guard helper used by the flows
pub fn lock_key<'a>(lock: &'a Arc<Mutex<()>>) -> MutexGuard<'a, ()> {
    lock.lock().expect("key lock poisoned")
}
