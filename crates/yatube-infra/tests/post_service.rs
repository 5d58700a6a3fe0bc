//! Post and group services running on the in-memory store.

use std::sync::Arc;

use yatube_core::domain::{Group, PostDraft, PostEdit, User};
use yatube_core::error::DomainError;
use yatube_core::ports::{GroupRepository, UserRepository};
use yatube_core::services::{GroupService, PostService};
use yatube_core::Paginator;
use yatube_infra::InMemoryStore;

struct Fixture {
    posts: PostService,
    groups: GroupService,
    users: Arc<dyn UserRepository>,
    group_repo: Arc<dyn GroupRepository>,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let users: Arc<dyn UserRepository> = Arc::new(store.users());
        let group_repo: Arc<dyn GroupRepository> = Arc::new(store.groups());
        let posts = PostService::new(
            Arc::new(store.posts()),
            group_repo.clone(),
            users.clone(),
            Paginator::default(),
        );
        Self {
            posts,
            groups: GroupService::new(group_repo.clone()),
            users,
            group_repo,
        }
    }

    async fn user(&self, username: &str) -> User {
        self.users
            .create(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    async fn group(&self, slug: &str) -> Group {
        self.groups
            .create(slug, &format!("{slug} title"), "description")
            .await
            .unwrap()
    }

    async fn publish(&self, author: &User, text: &str, group: Option<&str>) -> i64 {
        self.posts
            .create(
                Some(author.id),
                PostDraft {
                    text: text.to_string(),
                    group: group.map(str::to_string),
                },
            )
            .await
            .unwrap()
            .id
    }
}

#[tokio::test]
async fn test_create_and_fetch_post() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;
    fx.group("test_slug").await;

    let id = fx.publish(&author, "test_text", Some("test_slug")).await;
    let post = fx.posts.get_by_id(id).await.unwrap();

    assert_eq!(post.text, "test_text");
    assert_eq!(post.author.username, "test_user");
    assert_eq!(post.group.as_deref(), Some("test_slug"));
}

#[tokio::test]
async fn test_create_requires_text_and_author() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;

    let empty = fx
        .posts
        .create(
            Some(author.id),
            PostDraft {
                text: "   ".to_string(),
                group: None,
            },
        )
        .await;
    assert!(matches!(empty, Err(DomainError::Validation(_))));

    let anonymous = fx
        .posts
        .create(
            None,
            PostDraft {
                text: "hello".to_string(),
                group: None,
            },
        )
        .await;
    assert!(matches!(anonymous, Err(DomainError::Validation(_))));

    assert!(fx.posts.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_unknown_group_fails_validation() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;

    let result = fx
        .posts
        .create(
            Some(author.id),
            PostDraft {
                text: "hello".to_string(),
                group: Some("nope".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert!(fx.posts.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.posts.get_by_id(42).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.posts.post_detail(42).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_list_all_is_newest_first() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;
    let first = fx.publish(&author, "first", None).await;
    let second = fx.publish(&author, "second", None).await;
    let third = fx.publish(&author, "third", None).await;

    let ids: Vec<i64> = fx
        .posts
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![third, second, first]);

    let posts = fx.posts.list_all().await.unwrap();
    assert!(posts.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
}

#[tokio::test]
async fn test_feeds_paginate_thirteen_posts() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;
    fx.group("test_slug").await;
    for i in 0..13 {
        fx.publish(&author, &format!("post {i}"), Some("test_slug"))
            .await;
    }

    let first = fx.posts.index_feed(1).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 2);

    let second = fx.posts.index_feed(2).await.unwrap();
    assert_eq!(second.items.len(), 3);
    assert_eq!(second.items.last().unwrap().text, "post 0");

    let group = fx.posts.group_feed("test_slug", 2).await.unwrap();
    assert_eq!(group.page.items.len(), 3);
    assert_eq!(group.group.title, "test_slug title");

    let profile = fx.posts.profile_feed("test_user", 1).await.unwrap();
    assert_eq!(profile.page.items.len(), 10);
    assert_eq!(profile.post_count, 13);
    assert_eq!(profile.author.username, "test_user");

    let clamped = fx.posts.index_feed(99).await.unwrap();
    assert_eq!(clamped.number, 2);
    assert_eq!(clamped.items, second.items);
}

#[tokio::test]
async fn test_empty_feed_has_no_pages() {
    let fx = Fixture::new();
    let page = fx.posts.index_feed(3).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_feeds_filter_by_group_and_author() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    let ann = fx.user("ann").await;
    fx.group("cats").await;
    fx.group("dogs").await;

    fx.publish(&leo, "leo cats", Some("cats")).await;
    fx.publish(&ann, "ann dogs", Some("dogs")).await;
    fx.publish(&ann, "ann cats", Some("cats")).await;
    fx.publish(&ann, "ann loose", None).await;

    let cats: Vec<String> = fx
        .posts
        .list_by_group("cats")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.text)
        .collect();
    assert_eq!(cats, vec!["ann cats", "leo cats"]);

    let ann_posts = fx.posts.list_by_author("ann").await.unwrap();
    assert_eq!(ann_posts.len(), 3);
    assert!(ann_posts.iter().all(|p| p.author.id == ann.id));

    assert!(matches!(
        fx.posts.list_by_group("birds").await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.posts.list_by_author("nobody").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_author_can_edit_post() {
    let fx = Fixture::new();
    let author = fx.user("test_user").await;
    fx.group("cats").await;
    let id = fx.publish(&author, "before", Some("cats")).await;

    let updated = fx
        .posts
        .update(
            id,
            author.id,
            PostEdit {
                text: Some("after".to_string()),
                group: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.text, "after");
    assert_eq!(updated.group.as_deref(), Some("cats"));

    let cleared = fx
        .posts
        .update(
            id,
            author.id,
            PostEdit {
                text: None,
                group: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.text, "after");
    assert_eq!(cleared.group, None);
}

#[tokio::test]
async fn test_non_author_cannot_edit() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    let intruder = fx.user("intruder").await;
    fx.group("cats").await;
    fx.group("dogs").await;
    let id = fx.publish(&author, "original", Some("cats")).await;

    let result = fx
        .posts
        .update(
            id,
            intruder.id,
            PostEdit {
                text: Some("hijacked".to_string()),
                group: Some(Some("dogs".to_string())),
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::PermissionDenied)));

    let post = fx.posts.get_by_id(id).await.unwrap();
    assert_eq!(post.text, "original");
    assert_eq!(post.group.as_deref(), Some("cats"));

    assert!(matches!(
        fx.posts.edit_form(id, intruder.id).await,
        Err(DomainError::PermissionDenied)
    ));
}

#[tokio::test]
async fn test_edit_to_unknown_group_changes_nothing() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    let id = fx.publish(&author, "original", None).await;

    let result = fx
        .posts
        .update(
            id,
            author.id,
            PostEdit {
                text: Some("changed".to_string()),
                group: Some(Some("missing".to_string())),
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(fx.posts.get_by_id(id).await.unwrap().text, "original");
}

#[tokio::test]
async fn test_deleting_group_keeps_posts() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    fx.group("cats").await;
    let id = fx.publish(&author, "meow", Some("cats")).await;

    fx.groups.delete("cats").await.unwrap();

    let post = fx.posts.get_by_id(id).await.unwrap();
    assert_eq!(post.group, None);
    assert_eq!(fx.posts.list_all().await.unwrap().len(), 1);
    assert!(fx.group_repo.find_by_id("cats".to_string()).await.unwrap().is_none());
    assert!(matches!(
        fx.groups.delete("cats").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_group_slug_is_rejected() {
    let fx = Fixture::new();
    fx.group("cats").await;
    assert!(matches!(
        fx.groups.create("cats", "Cats again", "").await,
        Err(DomainError::Duplicate(_))
    ));
}

#[tokio::test]
async fn test_detail_and_forms_carry_context() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    fx.group("cats").await;
    fx.group("dogs").await;
    let id = fx.publish(&author, "meow", Some("cats")).await;
    fx.publish(&author, "woof", Some("dogs")).await;

    let detail = fx.posts.post_detail(id).await.unwrap();
    assert_eq!(detail.author_post_count, 2);
    assert_eq!(detail.group.unwrap().slug, "cats");

    let create = fx.posts.create_form().await.unwrap();
    assert!(!create.is_edit);
    assert_eq!(create.groups.len(), 2);

    let edit = fx.posts.edit_form(id, author.id).await.unwrap();
    assert!(edit.is_edit);
    assert_eq!(edit.post.unwrap().id, id);
}
