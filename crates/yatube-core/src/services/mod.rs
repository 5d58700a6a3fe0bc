//! Application services - validation, permissions and view-model assembly
//! on top of the repository ports.

mod groups;
mod posts;

pub use groups::GroupService;
pub use posts::{GroupFeed, PostDetail, PostForm, PostService, ProfileFeed};
