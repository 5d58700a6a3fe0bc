//! Data Transfer Objects - request/response types for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /create/`. A missing `text` is reported as a validation
/// error rather than a malformed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// Body of `POST /posts/{id}/edit/`.
///
/// An absent `group` leaves the group as is; `"group": null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPostRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<Option<String>>,
}

/// Maps a present field (even `null`) to `Some`, so `default` covers absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// `?page=` on listing endpoints. Kept as text so junk values fall back to
/// the first page instead of failing extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub author: AuthorResponse,
    pub group: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// One page of a listing plus navigation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub count: usize,
    pub page_size: usize,
    /// 1-based position of the first and last item shown; 0 on an empty page.
    pub start_index: usize,
    pub end_index: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub page: PageResponse<PostResponse>,
}

/// `GET /group/{slug}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    pub page: PageResponse<PostResponse>,
}

/// `GET /profile/{username}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    pub post_count: usize,
    pub page: PageResponse<PostResponse>,
}

/// `GET /posts/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub group: Option<GroupResponse>,
    pub author_post_count: usize,
}

/// `GET /create/` and `GET /posts/{id}/edit/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub is_edit: bool,
    pub post: Option<PostResponse>,
    pub groups: Vec<GroupResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_group_tri_state() {
        let keep: EditPostRequest = serde_json::from_str(r#"{"text": "x"}"#).unwrap();
        assert_eq!(keep.group, None);

        let clear: EditPostRequest = serde_json::from_str(r#"{"group": null}"#).unwrap();
        assert_eq!(clear.group, Some(None));
        assert_eq!(clear.text, None);

        let set: EditPostRequest = serde_json::from_str(r#"{"group": "cats"}"#).unwrap();
        assert_eq!(set.group, Some(Some("cats".to_string())));
    }

    #[test]
    fn test_post_request_defaults() {
        let req: PostRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_empty());
        assert!(req.group.is_none());
    }
}
