//! Message bodies for the outbound notification emails.
//!
//! The wording and markup are part of the external contract; keep them
//! in sync with whatever renders these on the receiving side.

/// Subject line for verification-code emails
pub const VERIFICATION_SUBJECT: &str = "Your verification code";

/// Subject line for password-reset emails
pub const RESET_SUBJECT: &str = "Your reset link";

/// Body of the signup/resend verification email
pub fn verification_code_body(code: &str) -> String {
    format!(
        "Thank you for registering at our website. To confirm your account, \
         please enter the following verification code:<br>\
         <h2> {}</h2>",
        code
    )
}

/// Build the reset link the user follows from the email
pub fn reset_link(frontend_link: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", frontend_link, token)
}

/// Body of the password-reset email
pub fn password_reset_body(link: &str) -> String {
    format!(
        "To reset your password, please paste the link below in your browser:<br>{}",
        link
    )
}
