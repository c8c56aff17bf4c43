pub mod errors;
pub mod flows;
pub mod hashing;
pub mod password;
pub mod reset;
pub mod store;
pub mod tokens;
pub mod verification;

// Re-export the main types and functions
pub use errors::{AuthError, ErrorKind};
pub use flows::AuthService;
pub use hashing::{hash_password, verify_password};
pub use password::{validate_password, PasswordError};
pub use reset::{InMemoryResetTokenStore, ResetToken, ResetTokenStore, ResetTokens};
pub use store::{Account, AccountStore, InMemoryAccountStore, KeyLocks, VerificationStatus};
pub use tokens::{Claims, TokenKind, TokenPair, TokenService};
pub use verification::generate_verification_code;
