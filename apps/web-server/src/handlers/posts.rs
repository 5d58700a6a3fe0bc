//! Post pages: feeds, detail, and the create/edit forms.
//!
//! Anonymous callers of the form endpoints are redirected to the login page,
//! whatever body they sent.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::de::DeserializeOwned;

use yatube_core::domain::{PostDraft, PostEdit};
use yatube_core::pagination::parse_page_number;
use yatube_shared::dto::{EditPostRequest, PageQuery, PostRequest};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn requested_page(query: &PageQuery) -> i64 {
    parse_page_number(query.page.as_deref())
}

/// Bodies are decoded only after the identity check.
fn decode<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index_feed(requested_page(&query)).await?;
    Ok(HttpResponse::Ok().json(present::feed(page)))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .posts
        .group_feed(&path.into_inner(), requested_page(&query))
        .await?;
    Ok(HttpResponse::Ok().json(present::group_feed(feed)))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .posts
        .profile_feed(&path.into_inner(), requested_page(&query))
        .await?;
    Ok(HttpResponse::Ok().json(present::profile(feed)))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.post_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(present::detail(detail)))
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    identity: OptionalIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    identity.require(&req)?;
    let form = state.posts.create_form().await?;
    Ok(HttpResponse::Ok().json(present::form(form)))
}

/// POST /create/
pub async fn create_post(
    req: HttpRequest,
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = identity.require(&req)?;
    let PostRequest { text, group } = decode(&body)?;

    let post = state
        .posts
        .create(Some(identity.user_id), PostDraft { text, group })
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{}/", post.id)))
        .json(present::post(post)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let identity = identity.require(&req)?;
    let form = state
        .posts
        .edit_form(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(present::form(form)))
}

/// POST /posts/{post_id}/edit/
pub async fn edit_post(
    req: HttpRequest,
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = identity.require(&req)?;
    let EditPostRequest { text, group } = decode(&body)?;

    let post = state
        .posts
        .update(path.into_inner(), identity.user_id, PostEdit { text, group })
        .await?;
    Ok(HttpResponse::Ok().json(present::post(post)))
}
