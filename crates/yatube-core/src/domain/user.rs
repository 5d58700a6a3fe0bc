use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const USERNAME_MAX_LEN: usize = 150;

/// User entity - the identity that authors posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user with generated ID and timestamp.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    pub fn admin(username: String, password_hash: String) -> Self {
        Self {
            is_admin: true,
            ..Self::new(username, password_hash)
        }
    }

    /// Roles embedded into issued tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_admin {
            roles.push("admin".to_string());
        }
        roles
    }

    /// Usernames are 1-150 characters of letters, digits and `@.+-_`.
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(DomainError::validation(format!(
                "username must be at most {USERNAME_MAX_LEN} characters"
            )));
        }
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !username.chars().all(allowed) {
            return Err(DomainError::validation(
                "username may contain only letters, digits and @/./+/-/_",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_admin_role() {
        let user = User::admin("root".to_string(), "hash".to_string());
        assert_eq!(user.roles(), vec!["user".to_string(), "admin".to_string()]);

        let user = User::new("leo".to_string(), "hash".to_string());
        assert_eq!(user.roles(), vec!["user".to_string()]);
    }

    #[test]
    fn test_username_rules() {
        assert!(User::validate_username("test_user").is_ok());
        assert!(User::validate_username("a.b+c-d@e").is_ok());
        assert!(User::validate_username("").is_err());
        assert!(User::validate_username("has space").is_err());
        assert!(User::validate_username(&"x".repeat(151)).is_err());
    }
}
