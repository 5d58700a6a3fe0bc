//! # Yatube web server
//!
//! The Actix-web entry point: configuration, storage, auth services and the
//! route table.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use yatube_core::Paginator;
use yatube_core::ports::{PasswordService, TokenService};
use yatube_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let paginator = Paginator::new(config.posts_per_page)?;

    let state = AppState::new(config.database.as_ref(), paginator).await?;
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    if let Some(admin) = &config.admin {
        state.ensure_admin(admin, passwords.as_ref()).await?;
    }

    tracing::info!(
        host = %config.host,
        port = config.port,
        posts_per_page = config.posts_per_page,
        "Starting Yatube server"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::Data::new(passwords.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
