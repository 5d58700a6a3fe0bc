//! Post workflows: create, edit, and the paginated feeds.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Author, Group, NewPost, Post, PostChanges, PostDraft, PostEdit, clean_group, clean_text,
};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, Paginator};
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

/// Posts of one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<Post>,
}

/// Posts of one author.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFeed {
    pub author: Author,
    pub post_count: usize,
    pub page: Page<Post>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub group: Option<Group>,
    pub author_post_count: usize,
}

/// Context for the create/edit form: selectable groups plus the post being
/// edited, if any.
#[derive(Debug, Clone, Serialize)]
pub struct PostForm {
    pub is_edit: bool,
    pub post: Option<Post>,
    pub groups: Vec<Group>,
}

/// Entry point for everything handlers do with posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    paginator: Paginator,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        paginator: Paginator,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            paginator,
        }
    }

    /// Persist a new post. `author` is `None` when the caller is anonymous.
    pub async fn create(&self, author: Option<Uuid>, draft: PostDraft) -> Result<Post, DomainError> {
        let author_id = author.ok_or_else(|| DomainError::validation("author is required"))?;
        let text = clean_text(&draft.text)?;
        let group = clean_group(draft.group);

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::validation("author does not exist"));
        }
        if let Some(slug) = &group {
            self.ensure_group_exists(slug).await?;
        }

        let post = self
            .posts
            .insert(NewPost {
                author_id,
                text,
                group,
                pub_date: Utc::now(),
            })
            .await?;

        tracing::info!(post_id = post.id, author = %post.author.username, "Post created: {post}");
        Ok(post)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Edit text and/or group. Only the author may edit; nothing is written
    /// when any check fails.
    pub async fn update(&self, id: i64, editor: Uuid, edit: PostEdit) -> Result<Post, DomainError> {
        let post = self.get_by_id(id).await?;
        if !post.is_authored_by(editor) {
            tracing::warn!(post_id = id, editor = %editor, "Edit rejected: not the author");
            return Err(DomainError::PermissionDenied);
        }

        let text = match edit.text {
            Some(text) => clean_text(&text)?,
            None => post.text,
        };
        let group = match edit.group {
            Some(group) => clean_group(group),
            None => post.group,
        };
        if let Some(slug) = &group {
            self.ensure_group_exists(slug).await?;
        }

        let updated = self
            .posts
            .update(id, PostChanges { text, group })
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("Post", id),
                other => other.into(),
            })?;

        tracing::info!(post_id = id, "Post updated");
        Ok(updated)
    }

    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list(&PostFilter::All).await?)
    }

    pub async fn list_by_group(&self, slug: &str) -> Result<Vec<Post>, DomainError> {
        self.require_group(slug).await?;
        Ok(self.posts.list(&PostFilter::Group(slug.to_string())).await?)
    }

    pub async fn list_by_author(&self, username: &str) -> Result<Vec<Post>, DomainError> {
        self.require_author(username).await?;
        Ok(self
            .posts
            .list(&PostFilter::Author(username.to_string()))
            .await?)
    }

    /// Global feed, newest first.
    pub async fn index_feed(&self, page: i64) -> Result<Page<Post>, DomainError> {
        self.fetch_page(PostFilter::All, page).await
    }

    pub async fn group_feed(&self, slug: &str, page: i64) -> Result<GroupFeed, DomainError> {
        let group = self.require_group(slug).await?;
        let page = self
            .fetch_page(PostFilter::Group(group.slug.clone()), page)
            .await?;
        Ok(GroupFeed { group, page })
    }

    pub async fn profile_feed(&self, username: &str, page: i64) -> Result<ProfileFeed, DomainError> {
        let author = self.require_author(username).await?;
        let page = self
            .fetch_page(PostFilter::Author(author.username.clone()), page)
            .await?;
        Ok(ProfileFeed {
            post_count: page.count,
            author,
            page,
        })
    }

    pub async fn post_detail(&self, id: i64) -> Result<PostDetail, DomainError> {
        let post = self.get_by_id(id).await?;
        let author_post_count = self
            .posts
            .count(&PostFilter::Author(post.author.username.clone()))
            .await?;
        let group = match &post.group {
            Some(slug) => self.groups.find_by_id(slug.clone()).await?,
            None => None,
        };
        Ok(PostDetail {
            post,
            group,
            author_post_count,
        })
    }

    pub async fn create_form(&self) -> Result<PostForm, DomainError> {
        Ok(PostForm {
            is_edit: false,
            post: None,
            groups: self.groups.list_all().await?,
        })
    }

    pub async fn edit_form(&self, id: i64, editor: Uuid) -> Result<PostForm, DomainError> {
        let post = self.get_by_id(id).await?;
        if !post.is_authored_by(editor) {
            return Err(DomainError::PermissionDenied);
        }
        Ok(PostForm {
            is_edit: true,
            post: Some(post),
            groups: self.groups.list_all().await?,
        })
    }

    async fn fetch_page(&self, filter: PostFilter, requested: i64) -> Result<Page<Post>, DomainError> {
        let count = self.posts.count(&filter).await?;
        let window = self.paginator.locate(count, requested);
        let items = if window.limit == 0 {
            Vec::new()
        } else {
            self.posts
                .list_page(&filter, window.offset, window.limit)
                .await?
        };
        Ok(window.into_page(items))
    }

    async fn ensure_group_exists(&self, slug: &str) -> Result<(), DomainError> {
        match self.groups.find_by_id(slug.to_string()).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation(format!(
                "group '{slug}' does not exist"
            ))),
        }
    }

    async fn require_group(&self, slug: &str) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(slug.to_string())
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))
    }

    async fn require_author(&self, username: &str) -> Result<Author, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;
        Ok(Author {
            id: user.id,
            username: user.username,
        })
    }
}
