use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use super::smtp::SmtpCredentials;

/// Errors raised while building or sending an email.
///
/// These never cross a flow boundary; flows log them and report success
/// regardless.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid from address: {0}")]
    InvalidFromAddress(String),
    #[error("Invalid to address: {0}")]
    InvalidToAddress(String),
    #[error("Failed to create email: {0}")]
    Build(String),
    #[error("Failed to build TLS parameters: {0}")]
    Tls(String),
    #[error("Failed to create SMTP transport: {0}")]
    Transport(String),
    #[error("Failed to send email: {0}")]
    Send(String),
}

/// Outbound notification port consumed by the auth flows.
///
/// Implementations deliver an HTML message to a single recipient; the
/// flows treat delivery as fire-and-forget.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

/// Mailer delivering through an authenticated SMTP relay
pub struct SmtpMailer {
    credentials: SmtpCredentials,
    from_email: String,
}

impl SmtpMailer {
    pub fn new(credentials: SmtpCredentials, from_email: String) -> Self {
        Self {
            credentials,
            from_email,
        }
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        // Create email message
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e| MailError::InvalidFromAddress(format!("{}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| MailError::InvalidToAddress(format!("{}", e)))?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Build(format!("{}", e)))?;

        // Configure TLS parameters
        let tls_parameters = TlsParameters::builder(self.credentials.host.clone())
            .build()
            .map_err(|e| MailError::Tls(format!("{}", e)))?;

        // Set up SMTP transport with explicit TLS configuration
        let mailer = SmtpTransport::relay(&self.credentials.host)
            .map_err(|e| MailError::Transport(format!("{}", e)))?
            .credentials(Credentials::new(
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            ))
            .port(self.credentials.port)
            .tls(Tls::Required(tls_parameters))
            .pool_config(PoolConfig::new().max_size(1))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        // Send the email
        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| MailError::Send(format!("{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockMailer {
        last_email: Mutex<Option<(String, String, String)>>,
    }

    impl MockMailer {
        fn new() -> Self {
            Self {
                last_email: Mutex::new(None),
            }
        }
    }

    impl Mailer for MockMailer {
        fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
            *self.last_email.lock().unwrap() =
                Some((to.to_string(), subject.to_string(), html_body.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_mailer_port_records_message() {
        let mailer = MockMailer::new();

        let result = mailer.send("test@example.com", "Your verification code", "<h2>123456</h2>");
        assert!(result.is_ok());

        let (to, subject, body) = mailer.last_email.lock().unwrap().clone().unwrap();
        assert_eq!(to, "test@example.com");
        assert_eq!(subject, "Your verification code");
        assert!(body.contains("123456"));
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(
            SmtpCredentials {
                username: "sender@example.com".to_string(),
                password: "password123".to_string(),
                host: "smtp.example.com".to_string(),
                port: 587,
            },
            "sender@example.com".to_string(),
        );

        // Address parsing fails before any network activity
        let result = mailer.send("not an address", "subject", "body");
        assert!(matches!(result, Err(MailError::InvalidToAddress(_))));
    }
}
