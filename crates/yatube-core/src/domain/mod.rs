//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::Group;
pub use post::{Author, NewPost, Post, PostChanges, PostDraft, PostEdit};
pub(crate) use post::{clean_group, clean_text};
pub use user::User;
