use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, NewPost, Post, PostChanges, User};
use crate::error::RepoError;

/// Generic repository trait for entities with caller-chosen keys.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with `RepoError::Constraint` on a key clash.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository, keyed by slug.
///
/// Deleting a group must leave its posts in place with the group cleared.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, String> {
    /// All groups ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(String),
    Author(String),
}

/// Post repository.
///
/// Every listing is ordered newest first: `pub_date` descending, then `id`
/// descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Overwrite the mutable fields. `RepoError::NotFound` if the post is gone.
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError>;

    async fn count(&self, filter: &PostFilter) -> Result<usize, RepoError>;

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// One window of the ordered listing.
    async fn list_page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError>;
}
