//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use yatube_core::domain::{Group, NewPost, Post, PostChanges, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// Posts are always read joined with their author so listings carry the
/// username without a second round trip.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    fn filtered(filter: &PostFilter) -> Select<PostEntity> {
        let query = PostEntity::find();
        match filter {
            PostFilter::All => query,
            PostFilter::Group(slug) => query.filter(post::Column::GroupId.eq(slug.as_str())),
            // A subquery keeps the author join below free for `find_also_related`.
            PostFilter::Author(username) => query.filter(
                post::Column::AuthorId.in_subquery(
                    Query::select()
                        .column(user::Column::Id)
                        .from(UserEntity)
                        .and_where(user::Column::Username.eq(username.as_str()))
                        .to_owned(),
                ),
            ),
        }
    }

    fn ordered(filter: &PostFilter) -> Select<PostEntity> {
        Self::filtered(filter)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = new_post.into();
        let model = active_model.insert(&*self.db).await.map_err(map_db_err)?;

        self.find_by_id(model.id).await?.ok_or(RepoError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        row.map(|(model, author)| post::into_domain(model, author))
            .transpose()
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active_model: post::ActiveModel = model.into();
        active_model.text = Set(changes.text);
        active_model.group_id = Set(changes.group);
        active_model.update(&*self.db).await.map_err(map_db_err)?;

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn count(&self, filter: &PostFilter) -> Result<usize, RepoError> {
        let count = Self::filtered(filter)
            .count(&*self.db)
            .await
            .map_err(map_db_err)?;

        usize::try_from(count).map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let rows = Self::ordered(filter)
            .find_also_related(UserEntity)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(model, author)| post::into_domain(model, author))
            .collect()
    }

    async fn list_page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?filter, offset, limit, "Fetching post page");

        let rows = Self::ordered(filter)
            .offset(offset as u64)
            .limit(limit as u64)
            .find_also_related(UserEntity)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(model, author)| post::into_domain(model, author))
            .collect()
    }
}
