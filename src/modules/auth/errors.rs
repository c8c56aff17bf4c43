use thiserror::Error;

use super::password::PasswordError;
use super::tokens::TokenKind;

/// Stable machine-checkable class of a flow failure.
///
/// An HTTP layer maps these onto status codes; the crate itself only
/// guarantees the class and the human message stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    InvalidToken,
}

/// Failures surfaced by the authentication flows.
///
/// Messages follow the wire contract; match on the variant (or on
/// [`AuthError::kind`]) rather than on message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address format")]
    InvalidEmail,

    #[error(transparent)]
    PasswordPolicy(#[from] PasswordError),

    #[error("Email already registered")]
    AlreadyRegistered,

    /// The message differs per flow in the contract, so it travels with
    /// the variant.
    #[error("{0}")]
    AccountNotFound(String),

    #[error("Your user has been already verified")]
    AlreadyVerified,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    #[error("Please verify your user first")]
    NotVerified,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("{}", .expected.mismatch_message())]
    TokenKindMismatch { expected: TokenKind },

    #[error("Invalid or expired token")]
    InvalidResetToken,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidEmail | AuthError::PasswordPolicy(_) => ErrorKind::Validation,
            AuthError::AccountNotFound(_) => ErrorKind::NotFound,
            AuthError::AlreadyRegistered | AuthError::AlreadyVerified => ErrorKind::Conflict,
            AuthError::InvalidVerificationCode
            | AuthError::NotVerified
            | AuthError::WrongPassword
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::TokenKindMismatch { .. } => ErrorKind::Unauthorized,
            AuthError::InvalidResetToken => ErrorKind::InvalidToken,
        }
    }
}
