use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Number of characters of text used as the post's display form.
const DISPLAY_CHARS: usize = 15;

/// The author reference carried by every post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// Post entity - a single authored text entry.
///
/// `id` is assigned by storage and grows monotonically; `author` and
/// `pub_date` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author: Author,
    /// Slug of the group, if any.
    pub group: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author.id == user_id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.text.chars().take(DISPLAY_CHARS).collect();
        f.write_str(&head)
    }
}

/// A validated post ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// Fully resolved mutable fields written on update.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group: Option<String>,
}

/// Caller input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub text: String,
    pub group: Option<String>,
}

/// Caller input for editing a post.
///
/// `group`: `None` keeps the current group, `Some(None)` clears it,
/// `Some(Some(slug))` moves the post to `slug`.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub text: Option<String>,
    pub group: Option<Option<String>>,
}

/// Trim and reject empty post bodies.
pub(crate) fn clean_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("text must not be empty"));
    }
    Ok(text.to_string())
}

/// Treat blank group selections as "no group".
pub(crate) fn clean_group(group: Option<String>) -> Option<String> {
    group
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_string(),
            author: Author {
                id: Uuid::new_v4(),
                username: "test_user".to_string(),
            },
            group: None,
            pub_date: Utc::now(),
        }
    }

    #[test]
    fn test_display_is_first_fifteen_chars() {
        let long = post("a post that is longer than fifteen characters");
        assert_eq!(long.to_string(), "a post that is ");

        let short = post("test_text");
        assert_eq!(short.to_string(), "test_text");
    }

    #[test]
    fn test_display_counts_chars_not_bytes() {
        let cyrillic = post("Текст, который длиннее пятнадцати символов");
        assert_eq!(cyrillic.to_string(), "Текст, который ");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello ").unwrap(), "hello");
        assert!(matches!(clean_text(" \n\t"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_clean_group_blank_is_none() {
        assert_eq!(clean_group(Some("  ".to_string())), None);
        assert_eq!(clean_group(Some("cats".to_string())), Some("cats".to_string()));
        assert_eq!(clean_group(None), None);
    }
}
