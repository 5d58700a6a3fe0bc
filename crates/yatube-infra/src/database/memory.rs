//! In-memory storage - used when no database is configured, and in tests.
//!
//! Mirrors the relational rules of the PostgreSQL schema: unique usernames
//! and slugs, posts referencing existing users and groups, posts removed with
//! their author, and group deletion clearing the group on its posts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Author, Group, NewPost, Post, PostChanges, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

struct PostRow {
    text: String,
    author_id: Uuid,
    group: Option<String>,
    pub_date: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: BTreeMap<String, Group>,
    posts: BTreeMap<i64, PostRow>,
    last_post_id: i64,
}

impl Tables {
    fn materialize(&self, id: i64, row: &PostRow) -> Result<Post, RepoError> {
        let author = self
            .users
            .get(&row.author_id)
            .ok_or_else(|| RepoError::Query(format!("post {id} has no author row")))?;
        Ok(Post {
            id,
            text: row.text.clone(),
            author: Author {
                id: author.id,
                username: author.username.clone(),
            },
            group: row.group.clone(),
            pub_date: row.pub_date,
        })
    }

    fn matches(&self, row: &PostRow, filter: &PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(slug) => row.group.as_deref() == Some(slug.as_str()),
            PostFilter::Author(username) => self
                .users
                .get(&row.author_id)
                .is_some_and(|u| &u.username == username),
        }
    }

    /// Matching post ids, newest first.
    fn ordered_ids(&self, filter: &PostFilter) -> Vec<i64> {
        let mut rows: Vec<(i64, DateTime<Utc>)> = self
            .posts
            .iter()
            .filter(|(_, row)| self.matches(row, filter))
            .map(|(id, row)| (*id, row.pub_date))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        rows.into_iter().map(|(id, _)| id).collect()
    }

    fn check_group(&self, group: Option<&str>) -> Result<(), RepoError> {
        match group {
            Some(slug) if !self.groups.contains_key(slug) => Err(RepoError::Reference(format!(
                "group '{slug}' does not exist"
            ))),
            _ => Ok(()),
        }
    }

    fn load(&self, ids: impl IntoIterator<Item = i64>) -> Result<Vec<Post>, RepoError> {
        ids.into_iter()
            .filter_map(|id| self.posts.get(&id).map(|row| (id, row)))
            .map(|(id, row)| self.materialize(id, row))
            .collect()
    }
}

/// Shared in-memory tables. Repository handles created from one store see
/// each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository {
            store: self.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|_, row| row.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

pub struct InMemoryGroupRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<Group, String> for InMemoryGroupRepository {
    async fn find_by_id(&self, slug: String) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.get(&slug).cloned())
    }

    async fn create(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.groups.contains_key(&group.slug) {
            return Err(RepoError::Constraint(format!(
                "group '{}' already exists",
                group.slug
            )));
        }
        tables.groups.insert(group.slug.clone(), group.clone());
        Ok(group)
    }

    async fn delete(&self, slug: String) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.groups.remove(&slug).is_none() {
            return Err(RepoError::NotFound);
        }
        for row in tables.posts.values_mut() {
            if row.group.as_deref() == Some(slug.as_str()) {
                row.group = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Reference(format!(
                "user {} does not exist",
                post.author_id
            )));
        }
        tables.check_group(post.group.as_deref())?;

        tables.last_post_id += 1;
        let id = tables.last_post_id;
        tables.posts.insert(
            id,
            PostRow {
                text: post.text,
                author_id: post.author_id,
                group: post.group,
                pub_date: post.pub_date,
            },
        );
        tables.materialize(id, &tables.posts[&id])
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|row| tables.materialize(id, row))
            .transpose()
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_group(changes.group.as_deref())?;

        let row = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        row.text = changes.text;
        row.group = changes.group;

        tables.materialize(id, &tables.posts[&id])
    }

    async fn count(&self, filter: &PostFilter) -> Result<usize, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|row| tables.matches(row, filter))
            .count())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        tables.load(tables.ordered_ids(filter))
    }

    async fn list_page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let ids = tables.ordered_ids(filter).into_iter().skip(offset).take(limit);
        tables.load(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn new_post(author_id: Uuid, text: &str, group: Option<&str>) -> NewPost {
        NewPost {
            author_id,
            text: text.to_string(),
            group: group.map(str::to_string),
            pub_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let users = InMemoryStore::new().users();
        users
            .create(User::new("leo".to_string(), "h".to_string()))
            .await
            .unwrap();

        let result = users
            .create(User::new("leo".to_string(), "h".to_string()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_references() {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .create(User::new("leo".to_string(), "h".to_string()))
            .await
            .unwrap();

        let result = store.posts().insert(new_post(Uuid::new_v4(), "x", None)).await;
        assert!(matches!(result, Err(RepoError::Reference(_))));

        let result = store
            .posts()
            .insert(new_post(user.id, "x", Some("missing")))
            .await;
        assert!(matches!(result, Err(RepoError::Reference(_))));
    }

    #[tokio::test]
    async fn test_ties_on_pub_date_break_by_id() {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .create(User::new("leo".to_string(), "h".to_string()))
            .await
            .unwrap();
        let posts = store.posts();
        let when = Utc::now();

        for text in ["first", "second", "third"] {
            let mut post = new_post(user.id, text, None);
            post.pub_date = when;
            posts.insert(post).await.unwrap();
        }
        let mut older = new_post(user.id, "older", None);
        older.pub_date = when - TimeDelta::minutes(5);
        posts.insert(older).await.unwrap();

        let texts: Vec<String> = posts
            .list(&PostFilter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["third", "second", "first", "older"]);
    }

    #[tokio::test]
    async fn test_deleting_author_removes_posts() {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .create(User::new("leo".to_string(), "h".to_string()))
            .await
            .unwrap();
        store.posts().insert(new_post(user.id, "x", None)).await.unwrap();

        store.users().delete(user.id).await.unwrap();

        assert_eq!(store.posts().count(&PostFilter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_page_windows() {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .create(User::new("leo".to_string(), "h".to_string()))
            .await
            .unwrap();
        let posts = store.posts();
        for i in 0..5 {
            posts
                .insert(new_post(user.id, &format!("post {i}"), None))
                .await
                .unwrap();
        }

        let page = posts.list_page(&PostFilter::All, 3, 10).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
