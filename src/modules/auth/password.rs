use thiserror::Error;

/// Characters that count as a special character for the password policy
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password policy violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password must contain at least one uppercase letter")]
    NoUppercase,
    #[error("Password must contain at least one lowercase letter")]
    NoLowercase,
    #[error("Password must contain at least one number")]
    NoNumber,
    #[error("Password must contain at least one special character")]
    NoSpecialChar,
}

/// Function to validate password strength
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < 8 {
        return Err(PasswordError::TooShort);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err(PasswordError::NoNumber);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(PasswordError::NoSpecialChar);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_validation() {
        // Test valid password
        assert!(validate_password("Password123!").is_ok());
        assert!(validate_password("Valid1Pass!").is_ok());

        // Test too short (7 characters)
        assert!(matches!(
            validate_password("short1!"),
            Err(PasswordError::TooShort)
        ));

        // Test missing uppercase
        assert!(matches!(
            validate_password("alllowercase1!"),
            Err(PasswordError::NoUppercase)
        ));

        // Test missing lowercase
        assert!(matches!(
            validate_password("PASSWORD123!"),
            Err(PasswordError::NoLowercase)
        ));

        // Test missing number
        assert!(matches!(
            validate_password("NoDigits!"),
            Err(PasswordError::NoNumber)
        ));

        // Test missing special character
        assert!(matches!(
            validate_password("NoSpecial1A"),
            Err(PasswordError::NoSpecialChar)
        ));
    }

    #[test]
    fn test_password_error_messages() {
        assert_eq!(
            PasswordError::TooShort.to_string(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            PasswordError::NoSpecialChar.to_string(),
            "Password must contain at least one special character"
        );
    }
}
