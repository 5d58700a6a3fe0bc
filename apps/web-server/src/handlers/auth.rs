//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use yatube_core::domain::User;
use yatube_core::ports::{PasswordService, TokenService, UserRepository};
use yatube_shared::dto::{AuthResponse, IdentityResponse, LoginRequest, SignupRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(tokens: &Arc<dyn TokenService>, user: &User) -> AppResult<AuthResponse> {
    let token = tokens
        .generate_token(user.id, &user.username, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    User::validate_username(&req.username)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(vec![format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )]));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "username '{}' is taken",
            req.username
        )));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let user = state
        .users
        .create(User::new(req.username, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    Ok(HttpResponse::Created().json(issue_token(&token_service, &user)?))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::debug!(username = %req.username, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&token_service, &user)?))
}

/// GET /auth/me/
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(IdentityResponse {
        id: identity.user_id,
        username: identity.username,
        roles: identity.roles,
    }))
}
