//! Orchestration of the authentication flows.
//!
//! `AuthService` is the sole mutator of the account and reset-token
//! stores. Every flow is a single request/response operation: validate,
//! transition state under the email's key lock, then dispatch at most one
//! notification email. Email dispatch is fire-and-forget; a delivery
//! failure is logged and the flow still reports success.

use std::sync::Arc;

use super::errors::AuthError;
use super::hashing::{hash_password, verify_password};
use super::password::validate_password;
use super::reset::{ResetTokenStore, ResetTokens};
use super::store::{lock_key, Account, AccountStore, KeyLocks, VerificationStatus};
use super::tokens::{TokenKind, TokenPair, TokenService};
use super::verification::{generate_verification_code, DEFAULT_CODE_LENGTH};
use crate::modules::config::Settings;
use crate::modules::email::{
    password_reset_body, reset_link, verification_code_body, Mailer, RESET_SUBJECT,
    VERIFICATION_SUBJECT,
};
use crate::modules::utils::logging::{log_auth_event, log_email_event};
use crate::modules::utils::time::{system_clock, Clock};

/// The authentication service wiring stores, token signing, and the
/// notification port together.
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    reset_tokens: ResetTokens,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    locks: KeyLocks,
    clock: Arc<dyn Clock>,
    frontend_link: String,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        reset_store: Arc<dyn ResetTokenStore>,
        mailer: Arc<dyn Mailer>,
        settings: &Settings,
    ) -> Self {
        Self::with_clock(accounts, reset_store, mailer, settings, system_clock())
    }

    /// Construct with an explicit clock. Everything time-dependent
    /// (token expiry, reset TTLs, account timestamps) goes through it.
    pub fn with_clock(
        accounts: Arc<dyn AccountStore>,
        reset_store: Arc<dyn ResetTokenStore>,
        mailer: Arc<dyn Mailer>,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenService::new(
            &settings.secret_key,
            settings.jwt.algorithm,
            settings.jwt.access_token_ttl,
            settings.jwt.refresh_token_ttl,
            clock.clone(),
        );
        let reset_tokens =
            ResetTokens::new(reset_store, clock.clone(), settings.jwt.reset_token_ttl);

        Self {
            accounts,
            reset_tokens,
            tokens,
            mailer,
            locks: KeyLocks::new(),
            clock,
            frontend_link: settings.frontend_link.clone(),
        }
    }

    /// Register a new account and email it a verification code.
    ///
    /// Returns the registered email on success.
    pub fn signup(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if !crate::modules::utils::validate::is_valid_email(email) {
            log_auth_event("signup", email, false, Some("invalid email format"));
            return Err(AuthError::InvalidEmail);
        }
        validate_password(password)?;

        let code = {
            let lock = self.locks.acquire(email);
            let _guard = lock_key(&lock);

            if self.accounts.get(email).is_some() {
                log_auth_event("signup", email, false, Some("email already registered"));
                return Err(AuthError::AlreadyRegistered);
            }

            let code = generate_verification_code(DEFAULT_CODE_LENGTH);
            self.accounts.set(
                email,
                Account {
                    email: email.to_string(),
                    password_hash: hash_password(password),
                    verification_status: VerificationStatus::Unverified,
                    verification_code: Some(code.clone()),
                    created_at: self.clock.now(),
                },
            );
            code
        };

        self.dispatch(
            "verification_code",
            email,
            VERIFICATION_SUBJECT,
            &verification_code_body(&code),
        );
        log_auth_event("signup", email, true, None);
        Ok(email.to_string())
    }

    /// Confirm an account with the emailed verification code.
    pub fn verify_email(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let lock = self.locks.acquire(email);
        let _guard = lock_key(&lock);

        let mut account = self
            .accounts
            .get(email)
            .ok_or_else(|| AuthError::AccountNotFound("User not found".to_string()))?;

        if account.verification_status.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }
        if account.verification_code.as_deref() != Some(code) {
            log_auth_event("verify_email", email, false, Some("wrong code"));
            return Err(AuthError::InvalidVerificationCode);
        }

        account.verification_status = VerificationStatus::Verified;
        account.verification_code = None;
        self.accounts.set(email, account);

        log_auth_event("verify_email", email, true, None);
        Ok(())
    }

    /// Replace the pending verification code and email the new one.
    pub fn resend_code(&self, email: &str) -> Result<(), AuthError> {
        let code = {
            let lock = self.locks.acquire(email);
            let _guard = lock_key(&lock);

            let mut account = self.accounts.get(email).ok_or_else(|| {
                AuthError::AccountNotFound(
                    "The user with this email does not exists. Please signup first.".to_string(),
                )
            })?;

            if account.verification_status.is_verified() {
                return Err(AuthError::AlreadyVerified);
            }

            // The old code stops working the moment the new one is stored
            let code = generate_verification_code(DEFAULT_CODE_LENGTH);
            account.verification_code = Some(code.clone());
            self.accounts.set(email, account);
            code
        };

        self.dispatch(
            "verification_code",
            email,
            VERIFICATION_SUBJECT,
            &verification_code_body(&code),
        );
        log_auth_event("resend_code", email, true, None);
        Ok(())
    }

    /// Authenticate a verified account and issue the full token pair.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let account = self.accounts.get(email).ok_or_else(|| {
            AuthError::AccountNotFound(
                "User with this email does not exist. Please signup first".to_string(),
            )
        })?;

        if !account.verification_status.is_verified() {
            log_auth_event("login", email, false, Some("account not verified"));
            return Err(AuthError::NotVerified);
        }
        if !verify_password(password, &account.password_hash) {
            log_auth_event("login", email, false, Some("wrong password"));
            return Err(AuthError::WrongPassword);
        }

        let pair = self.tokens.issue_pair(email)?;
        log_auth_event("login", email, true, None);
        Ok(pair)
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Never re-issues a refresh token; the old one keeps its original
    /// expiry.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.validate(refresh_token, TokenKind::Refresh)?;
        let access_token = self.tokens.issue(&claims.email, TokenKind::Access)?;

        log_auth_event("refresh_token", &claims.email, true, None);
        Ok(access_token)
    }

    /// Create a reset token for the account and email the reset link.
    pub fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if self.accounts.get(email).is_none() {
            log_auth_event("password_reset_request", email, false, Some("no account"));
            return Err(AuthError::AccountNotFound(
                "User with this email is not registered on our website".to_string(),
            ));
        }

        let token = self.reset_tokens.create(email);
        let link = reset_link(&self.frontend_link, &token);

        self.dispatch("password_reset", email, RESET_SUBJECT, &password_reset_body(&link));
        log_auth_event("password_reset_request", email, true, None);
        Ok(())
    }

    /// Consume a reset token and replace the account's password hash.
    ///
    /// The policy check runs first so that a rejected password does not
    /// burn the single-use token.
    pub fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let email = self.reset_tokens.resolve_and_consume(token)?;

        let lock = self.locks.acquire(&email);
        let _guard = lock_key(&lock);

        let mut account = match self.accounts.get(&email) {
            Some(account) => account,
            None => {
                // Token resolved but the account is gone; do not reveal
                // which of the two happened.
                log_auth_event("password_reset_confirm", &email, false, Some("no account"));
                return Err(AuthError::InvalidResetToken);
            }
        };

        account.password_hash = hash_password(new_password);
        self.accounts.set(&email, account);

        log_auth_event("password_reset_confirm", &email, true, None);
        Ok(())
    }

    /// Fire-and-forget notification dispatch.
    fn dispatch(&self, kind: &str, to: &str, subject: &str, html_body: &str) {
        match self.mailer.send(to, subject, html_body) {
            Ok(()) => log_email_event(kind, to, true, None),
            Err(e) => log_email_event(kind, to, false, Some(&e.to_string())),
        }
    }
}
