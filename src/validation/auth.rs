use crate::error::{AppError, Result};

/// Validates a user name.
///
/// # Arguments
///
/// * `user_name` - The user name to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the user name is valid.
pub fn validate_user_name(user_name: &str) -> Result<()> {
    if user_name.len() < 3 {
        return Err(AppError::Validation(
            "User name must be at least 3 characters long".to_string(),
        ));
    }

    if user_name.len() > 255 {
        return Err(AppError::Validation(
            "User name must be at most 255 characters".to_string(),
        ));
    }

    if !user_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::Validation(
            "User name can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["alice", "Chef", "sous_chef-2"] {
            assert!(validate_user_name(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn rejects_bad_names() {
        let too_long = "x".repeat(256);
        for name in ["", "ab", "bad name", "emoji🍕", too_long.as_str()] {
            assert!(validate_user_name(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("s3cret").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }
}
