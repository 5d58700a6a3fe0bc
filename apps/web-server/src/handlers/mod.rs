//! HTTP handlers and route configuration.

mod auth;
mod groups;
mod health;
mod posts;
mod present;


use actix_web::{HttpRequest, HttpResponse, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Post pages
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_post)),
        )
        // Groups
        .route("/groups/", web::get().to(groups::list_groups))
        .service(
            web::scope("/admin")
                .route("/groups/", web::post().to(groups::create_group))
                .route("/groups/{slug}/", web::delete().to(groups::delete_group)),
        )
        // Auth
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(auth::signup))
                .route("/login/", web::post().to(auth::login))
                .route("/me/", web::get().to(auth::me)),
        )
        .route("/health/", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

/// Malformed JSON bodies get the same problem-details shape as other errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req| {
        AppError::BadRequest(err.to_string()).into()
    })
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("No page at {}", req.path())))
}
