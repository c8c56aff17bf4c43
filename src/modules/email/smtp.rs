use serde::{Deserialize, Serialize};

/// Structure to hold SMTP credentials
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SmtpCredentials {
    // The email address/username for SMTP authentication
    pub username: String,
    // The password or app-specific password for SMTP
    pub password: String,
    // SMTP server hostname (e.g., smtp.gmail.com)
    pub host: String,
    // SMTP server port (typically 587 for TLS)
    pub port: u16,
}
