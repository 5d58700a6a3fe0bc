//! Group listing and administration.

use actix_web::{HttpResponse, http::header, web};

use yatube_shared::dto::CreateGroupRequest;

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /groups/
pub async fn list_groups(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    let body: Vec<_> = groups.into_iter().map(present::group).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /admin/groups/ - admin only
pub async fn create_group(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateGroupRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let req = body.into_inner();

    let group = state
        .groups
        .create(&req.slug, &req.title, &req.description)
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/group/{}/", group.slug)))
        .json(present::group(group)))
}

/// DELETE /admin/groups/{slug}/ - admin only; posts of the group are kept
/// without a group.
pub async fn delete_group(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    state.groups.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
