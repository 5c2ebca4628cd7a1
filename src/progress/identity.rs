//! Username and avatar rules

use super::error::IdentityError;
use super::models::AVATARS;

pub const MAX_USERNAME_CHARS: usize = 20;

/// Trim and check a username, returning the value to store.
pub fn validate_username(raw: &str) -> Result<String, IdentityError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(IdentityError::EmptyUsername);
    }
    if name.chars().count() > MAX_USERNAME_CHARS {
        return Err(IdentityError::UsernameTooLong {
            max: MAX_USERNAME_CHARS,
        });
    }
    Ok(name.to_string())
}

pub fn validate_avatar(raw: &str) -> Result<String, IdentityError> {
    let avatar = raw.trim();
    if AVATARS.contains(&avatar) {
        Ok(avatar.to_string())
    } else {
        Err(IdentityError::UnknownAvatar(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert_eq!(validate_username("  Rita  ").unwrap(), "Rita");
        assert_eq!(validate_username("   "), Err(IdentityError::EmptyUsername));
        assert!(validate_username(&"x".repeat(20)).is_ok());
        assert!(matches!(
            validate_username(&"x".repeat(21)),
            Err(IdentityError::UsernameTooLong { max: 20 })
        ));
        // Characters, not bytes
        assert!(validate_username(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn test_avatar_rules() {
        assert_eq!(validate_avatar("🍿").unwrap(), "🍿");
        assert!(matches!(validate_avatar("🐍"), Err(IdentityError::UnknownAvatar(_))));
    }
}
