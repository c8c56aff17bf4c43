pub mod mailer;
mod smtp;
mod templates;

pub use mailer::{MailError, Mailer, SmtpMailer};
pub use smtp::SmtpCredentials;
pub use templates::{
    password_reset_body, reset_link, verification_code_body, RESET_SUBJECT, VERIFICATION_SUBJECT,
};
