//! Application configuration loaded from environment variables.

use std::env;

use yatube_core::pagination::DEFAULT_PAGE_SIZE;
use yatube_infra::JwtConfig;

/// PostgreSQL settings; present only when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
}

/// Account created (if missing) at startup with admin rights.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub posts_per_page: usize,
    pub jwt: JwtConfig,
    pub admin: Option<AdminAccount>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(10),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(1),
            run_migrations: flag("RUN_MIGRATIONS"),
        });

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminAccount { username, password }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            posts_per_page: parsed("POSTS_PER_PAGE").unwrap_or(DEFAULT_PAGE_SIZE),
            jwt: JwtConfig::from_env(),
            admin,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
