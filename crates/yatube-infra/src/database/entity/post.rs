//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use yatube_core::domain::{Author, NewPost, Post};
use yatube_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub author_id: Uuid,
    pub group_id: Option<String>,
    pub pub_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Slug",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Group,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Assemble a domain post from a row joined with its author.
pub fn into_domain(model: Model, author: Option<super::user::Model>) -> Result<Post, RepoError> {
    let author = author
        .ok_or_else(|| RepoError::Query(format!("post {} has no author row", model.id)))?;
    Ok(Post {
        id: model.id,
        text: model.text,
        author: Author {
            id: author.id,
            username: author.username,
        },
        group: model.group_id,
        pub_date: model.pub_date.into(),
    })
}

/// Insert model for a new post; the id comes from the sequence.
impl From<NewPost> for ActiveModel {
    fn from(post: NewPost) -> Self {
        Self {
            id: NotSet,
            text: Set(post.text),
            author_id: Set(post.author_id),
            group_id: Set(post.group),
            pub_date: Set(post.pub_date.into()),
        }
    }
}
