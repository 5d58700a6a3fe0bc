//! Storage: PostgreSQL via SeaORM, plus an in-memory store for running
//! without a database.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

use std::sync::Arc;

use serde::Serialize;
use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};

pub use memory::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository};

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    InMemory,
}

/// The full set of repositories handed to the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub backend: StorageBackend,
}

impl Repositories {
    /// Repositories over a fresh in-memory store. Data is lost on restart.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            groups: Arc::new(store.groups()),
            posts: Arc::new(store.posts()),
            backend: StorageBackend::InMemory,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: sea_orm::DbConn) -> Self {
        let db = Arc::new(db);
        Self {
            users: Arc::new(PostgresUserRepository::new(Arc::clone(&db))),
            groups: Arc::new(PostgresGroupRepository::new(Arc::clone(&db))),
            posts: Arc::new(PostgresPostRepository::new(db)),
            backend: StorageBackend::Postgres,
        }
    }
}
