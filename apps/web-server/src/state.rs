//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::Paginator;
use yatube_core::domain::User;
use yatube_core::ports::{PasswordService, UserRepository};
use yatube_core::services::{GroupService, PostService};
use yatube_infra::{Repositories, StorageBackend};

use crate::config::{AdminAccount, DatabaseSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: PostService,
    pub groups: GroupService,
    pub storage: StorageBackend,
}

impl AppState {
    /// Open storage and wire the services.
    pub async fn new(
        database: Option<&DatabaseSettings>,
        paginator: Paginator,
    ) -> anyhow::Result<Self> {
        let repositories = open_storage(database).await?;
        tracing::info!(storage = ?repositories.backend, "Application state initialized");
        Ok(Self::from_repositories(repositories, paginator))
    }

    pub fn from_repositories(repositories: Repositories, paginator: Paginator) -> Self {
        let Repositories {
            users,
            groups,
            posts,
            backend,
        } = repositories;

        Self {
            posts: PostService::new(posts, groups.clone(), users.clone(), paginator),
            groups: GroupService::new(groups),
            users,
            storage: backend,
        }
    }

    /// Make sure the configured admin account exists.
    pub async fn ensure_admin(
        &self,
        admin: &AdminAccount,
        passwords: &dyn PasswordService,
    ) -> anyhow::Result<()> {
        if let Some(existing) = self.users.find_by_username(&admin.username).await? {
            if !existing.is_admin {
                tracing::warn!(username = %admin.username, "Configured admin exists without admin rights");
            }
            return Ok(());
        }

        User::validate_username(&admin.username)?;
        let hash = passwords.hash(&admin.password)?;
        self.users
            .create(User::admin(admin.username.clone(), hash))
            .await?;
        tracing::info!(username = %admin.username, "Admin account created");
        Ok(())
    }
}

#[cfg(feature = "postgres")]
async fn open_storage(database: Option<&DatabaseSettings>) -> anyhow::Result<Repositories> {
    use migration::{Migrator, MigratorTrait};
    use yatube_infra::DatabaseConfig;

    let Some(settings) = database else {
        tracing::warn!("DATABASE_URL not set. Running with in-memory storage.");
        return Ok(Repositories::in_memory());
    };

    let db = yatube_infra::connect(&DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    })
    .await?;

    if settings.run_migrations {
        tracing::info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    Ok(Repositories::postgres(db))
}

#[cfg(not(feature = "postgres"))]
async fn open_storage(database: Option<&DatabaseSettings>) -> anyhow::Result<Repositories> {
    if database.is_some() {
        tracing::warn!("Built without the postgres feature; ignoring DATABASE_URL");
    }
    Ok(Repositories::in_memory())
}
