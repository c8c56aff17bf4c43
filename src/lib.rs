// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, config, email, utils};

// Re-export commonly used types
pub use modules::auth::errors::{AuthError, ErrorKind};
pub use modules::auth::flows::AuthService;
pub use modules::auth::reset::InMemoryResetTokenStore;
pub use modules::auth::store::InMemoryAccountStore;
pub use modules::auth::tokens::{TokenKind, TokenPair};
pub use modules::config::Settings;
pub use modules::email::{Mailer, SmtpMailer};
