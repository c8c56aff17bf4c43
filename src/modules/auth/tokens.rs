use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::AuthError;
use crate::modules::utils::time::Clock;

/// The two token kinds the service issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    /// Message shown when a token of the other kind is presented
    pub(crate) fn mismatch_message(&self) -> &'static str {
        match self {
            TokenKind::Refresh => "Please use refresh token for renewal",
            TokenKind::Access => "Please use access token for authorization",
        }
    }
}

/// Signed claims carried by every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: u64,
    pub token_type: TokenKind,
}

/// Access/refresh token pair returned by a full issuance
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Stateless JWT issuance and validation.
///
/// Nothing is persisted; a token is valid iff its signature checks out
/// against the shared secret and its claims pass the expiry and kind
/// checks. Expiry is compared once, explicitly, against the injected
/// clock; the signing library's built-in check stays disabled so there
/// is a single source of truth for "expired".
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: u64,
    refresh_ttl: u64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        access_ttl: u64,
        refresh_ttl: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
            clock,
        }
    }

    fn ttl(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue a single signed token of the given kind.
    ///
    /// The embedded expiry is strictly in the future as long as the TTL
    /// is non-zero.
    pub fn issue(&self, email: &str, kind: TokenKind) -> Result<String, AuthError> {
        let claims = Claims {
            email: email.to_string(),
            exp: self.clock.now() + self.ttl(kind),
            token_type: kind,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &self.encoding_key,
        )
        .map_err(|_| AuthError::InvalidToken)
    }

    /// Issue the full access + refresh pair for a successful login.
    pub fn issue_pair(&self, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(email, TokenKind::Access)?,
            refresh_token: self.issue(email, TokenKind::Refresh)?,
        })
    }

    /// Validate a token string and return its claims.
    ///
    /// Check order matters for the error contract: signature/format
    /// first, then expiry, then kind.
    pub fn validate(&self, token: &str, expected_kind: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked explicitly below against the injected clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;
        let claims = data.claims;

        if self.clock.now() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if claims.token_type != expected_kind {
            return Err(AuthError::TokenKindMismatch {
                expected: expected_kind,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct FixedClock(AtomicU64);

    impl FixedClock {
        fn at(secs: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(secs)))
        }

        fn advance(&self, secs: u64) {
            self.0.fetch_add(secs, Ordering::Relaxed);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }

    fn service(clock: Arc<FixedClock>) -> TokenService {
        TokenService::new("test-secret", Algorithm::HS256, 3600, 86400, clock)
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let clock = FixedClock::at(1_000_000);
        let tokens = service(clock);

        let token = tokens.issue("a@x.com", TokenKind::Access).unwrap();
        let claims = tokens.validate(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.exp, 1_000_000 + 3600);
    }

    #[test]
    fn test_kind_mismatch_both_directions() {
        let tokens = service(FixedClock::at(1_000_000));

        let access = tokens.issue("a@x.com", TokenKind::Access).unwrap();
        let refresh = tokens.issue("a@x.com", TokenKind::Refresh).unwrap();

        let err = tokens.validate(&access, TokenKind::Refresh).unwrap_err();
        assert_eq!(
            err,
            AuthError::TokenKindMismatch {
                expected: TokenKind::Refresh
            }
        );
        assert_eq!(err.to_string(), "Please use refresh token for renewal");

        let err = tokens.validate(&refresh, TokenKind::Access).unwrap_err();
        assert_eq!(err.to_string(), "Please use access token for authorization");
    }

    #[test]
    fn test_expired_token_fails_even_with_valid_signature() {
        let clock = FixedClock::at(1_000_000);
        let tokens = service(clock.clone());

        let token = tokens.issue("a@x.com", TokenKind::Access).unwrap();
        clock.advance(3600);

        assert_eq!(
            tokens.validate(&token, TokenKind::Access).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn test_token_valid_until_the_last_second() {
        let clock = FixedClock::at(1_000_000);
        let tokens = service(clock.clone());

        let token = tokens.issue("a@x.com", TokenKind::Access).unwrap();
        clock.advance(3599);

        assert!(tokens.validate(&token, TokenKind::Access).is_ok());
    }

    #[test]
    fn test_garbage_and_tampered_tokens_are_invalid() {
        let tokens = service(FixedClock::at(1_000_000));

        assert_eq!(
            tokens.validate("not-a-jwt", TokenKind::Access).unwrap_err(),
            AuthError::InvalidToken
        );

        let mut token = tokens.issue("a@x.com", TokenKind::Access).unwrap();
        // Flip a character in the signature segment
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });
        assert_eq!(
            tokens.validate(&token, TokenKind::Access).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let clock = FixedClock::at(1_000_000);
        let tokens = service(clock.clone());
        let other =
            TokenService::new("other-secret", Algorithm::HS256, 3600, 86400, clock);

        let token = other.issue("a@x.com", TokenKind::Access).unwrap();
        assert_eq!(
            tokens.validate(&token, TokenKind::Access).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_issue_pair_uses_both_ttls() {
        let tokens = service(FixedClock::at(1_000_000));
        let pair = tokens.issue_pair("a@x.com").unwrap();

        let access = tokens.validate(&pair.access_token, TokenKind::Access).unwrap();
        let refresh = tokens
            .validate(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();

        assert_eq!(access.exp, 1_000_000 + 3600);
        assert_eq!(refresh.exp, 1_000_000 + 86400);
    }

    #[test]
    fn test_pair_serializes_with_wire_field_names() {
        let tokens = service(FixedClock::at(1_000_000));
        let pair = tokens.issue_pair("a@x.com").unwrap();

        let value = serde_json::to_value(&pair).unwrap();
        assert!(value.get("access_token").is_some());
        assert!(value.get("refresh_token").is_some());
    }
}
