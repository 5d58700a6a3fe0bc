use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const SLUG_MAX_LEN: usize = 50;
const TITLE_MAX_LEN: usize = 200;

/// A named category that posts may optionally belong to.
///
/// The slug is the primary key and never changes once the group exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl Group {
    /// Build a validated group.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let group = Self {
            slug: slug.into(),
            title: title.into().trim().to_string(),
            description: description.into(),
        };
        group.validate()?;
        Ok(group)
    }

    fn validate(&self) -> Result<(), DomainError> {
        Self::validate_slug(&self.slug)?;
        if self.title.is_empty() {
            return Err(DomainError::validation("group title is required"));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::validation(format!(
                "group title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Slugs are 1-50 ASCII letters, digits, hyphens or underscores.
    pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
        if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
            return Err(DomainError::validation(format!(
                "group slug must be 1-{SLUG_MAX_LEN} characters"
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation(
                "group slug may contain only letters, digits, hyphens and underscores",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_title() {
        let group = Group::new("test_slug", "test_group", "test_description").unwrap();
        assert_eq!(group.to_string(), "test_group");
    }

    #[test]
    fn test_rejects_bad_slug() {
        assert!(Group::new("has space", "Title", "").is_err());
        assert!(Group::new("", "Title", "").is_err());
        assert!(Group::new("ok-slug_1", "Title", "").is_ok());
    }

    #[test]
    fn test_rejects_blank_or_long_title() {
        assert!(Group::new("slug", "   ", "").is_err());
        assert!(Group::new("slug", "t".repeat(201), "").is_err());
    }
}
