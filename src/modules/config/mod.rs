//! Process configuration, read from the environment at startup.
//!
//! Secrets have no defaults: a missing `SECRET_KEY` or SMTP credential is
//! a fatal misconfiguration, not something to paper over at request time.

use jsonwebtoken::Algorithm;
use std::str::FromStr;
use thiserror::Error;

use crate::modules::email::SmtpCredentials;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: String, reason: String },
}

/// Token signing parameters and lifetimes
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub algorithm: Algorithm,
    pub access_token_ttl: u64,
    pub refresh_token_ttl: u64,
    pub reset_token_ttl: u64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            access_token_ttl: 3600,  // 1 hour
            refresh_token_ttl: 86400, // 1 day
            reset_token_ttl: 3600,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub secret_key: String,
    pub from_email: String,
    pub frontend_link: String,
    pub allowed_origins: Vec<String>,
    pub smtp: SmtpCredentials,
    pub jwt: JwtSettings,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary lookup. The env-free entry point
    /// keeps tests independent of process-global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(ConfigError::MissingVar(key.to_string())),
            }
        };

        let secret_key = required("SECRET_KEY")?;
        let from_email = required("FROM_EMAIL")?;
        let frontend_link = required("FRONTEND_LINK")?;

        let allowed_origins: Vec<String> = required("ALLOWED_ORIGINS")?
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if allowed_origins.is_empty() {
            return Err(ConfigError::MissingVar("ALLOWED_ORIGINS".to_string()));
        }

        let smtp = SmtpCredentials {
            host: required("SMTP_HOST")?,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            port: parse_or(&lookup, "SMTP_PORT", 587)?,
        };

        let algorithm = match lookup("JWT_ALGORITHM") {
            None => Algorithm::HS256,
            Some(name) => {
                Algorithm::from_str(name.trim()).map_err(|_| ConfigError::InvalidVar {
                    var: "JWT_ALGORITHM".to_string(),
                    reason: format!("unknown algorithm '{}'", name.trim()),
                })?
            }
        };

        let defaults = JwtSettings::default();
        let jwt = JwtSettings {
            algorithm,
            access_token_ttl: parse_or(&lookup, "ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl)?,
            refresh_token_ttl: parse_or(
                &lookup,
                "REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_token_ttl,
            )?,
            reset_token_ttl: parse_or(&lookup, "RESET_TOKEN_TTL_SECS", defaults.reset_token_ttl)?,
        };

        Ok(Self {
            secret_key,
            from_email,
            frontend_link,
            allowed_origins,
            smtp,
            jwt,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
            var: key.to_string(),
            reason: format!("'{}' is not a valid number", raw.trim()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SECRET_KEY", "super-secret"),
            ("FROM_EMAIL", "noreply@example.com"),
            ("FRONTEND_LINK", "https://app.example.com"),
            ("ALLOWED_ORIGINS", "https://app.example.com, https://admin.example.com"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer@example.com"),
            ("SMTP_PASSWORD", "mail-password"),
        ])
    }

    fn load(vars: &HashMap<&str, &str>) -> Result<Settings, ConfigError> {
        Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_loads_with_defaults() {
        let settings = load(&base_vars()).unwrap();

        assert_eq!(settings.secret_key, "super-secret");
        assert_eq!(settings.smtp.port, 587);
        assert_eq!(settings.jwt.algorithm, Algorithm::HS256);
        assert_eq!(settings.jwt.access_token_ttl, 3600);
        assert_eq!(settings.jwt.refresh_token_ttl, 86400);
        assert_eq!(settings.jwt.reset_token_ttl, 3600);
        assert_eq!(
            settings.allowed_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn test_each_secret_is_required() {
        for missing in [
            "SECRET_KEY",
            "FROM_EMAIL",
            "FRONTEND_LINK",
            "ALLOWED_ORIGINS",
            "SMTP_HOST",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
        ] {
            let mut vars = base_vars();
            vars.remove(missing);
            assert_eq!(
                load(&vars).unwrap_err(),
                ConfigError::MissingVar(missing.to_string()),
                "expected {} to be required",
                missing
            );
        }
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("SECRET_KEY", "   ");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::MissingVar("SECRET_KEY".to_string())
        );
    }

    #[test]
    fn test_overrides_are_honored() {
        let mut vars = base_vars();
        vars.insert("SMTP_PORT", "2525");
        vars.insert("JWT_ALGORITHM", "HS512");
        vars.insert("ACCESS_TOKEN_TTL_SECS", "600");

        let settings = load(&vars).unwrap();
        assert_eq!(settings.smtp.port, 2525);
        assert_eq!(settings.jwt.algorithm, Algorithm::HS512);
        assert_eq!(settings.jwt.access_token_ttl, 600);
    }

    #[test]
    fn test_malformed_values_are_fatal() {
        let mut vars = base_vars();
        vars.insert("ACCESS_TOKEN_TTL_SECS", "soon");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidVar { .. }
        ));

        let mut vars = base_vars();
        vars.insert("JWT_ALGORITHM", "ROT13");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidVar { .. }
        ));
    }
}
