//! User and session handlers.

use actix_web::{HttpResponse, web};

use juicebox_core::domain::{User, UserUpdate};
use juicebox_shared::ApiResponse;
use juicebox_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UpdateUserRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn auth_response(state: &AppState, token: String, message: &str) -> AuthResponse {
    AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        message: Some(message.to_string()),
    }
}

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    User::validate_registration(&req.username, &req.password)?;

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.username, password_hash, req.name, req.location);

    let created = state
        .users
        .create_user(user)
        .await?
        .ok_or(AppError::UserExists)?;
    tracing::info!(user_id = %created.id, username = %created.username, "User registered");

    let token = state.tokens.generate_token(created.id, &created.username)?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(auth_response(
        &state,
        token,
        "thank you for signing up",
    ))))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.find_credentials(&req.username).await?;
    let stored = user.as_ref().map(|u| u.password_hash.as_str());

    if !state.passwords.verify_login(&req.password, stored)? {
        return Err(AppError::InvalidCredentials);
    }
    let user = user.ok_or(AppError::InvalidCredentials)?;

    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth_response(
        &state,
        token,
        "you're logged in!",
    ))))
}

/// GET /api/users
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.get_all_users().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// GET /api/users/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state
        .users
        .get_user_by_id(identity.id())
        .await?
        .ok_or(AppError::MissingUser)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

/// PATCH /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = UserUpdate {
        name: req.name,
        location: req.location,
        active: None,
    };
    if changes.is_empty() {
        return Err(AppError::Validation(
            "Provide at least one of name or location".to_string(),
        ));
    }

    let user = state
        .users
        .update_user(identity.id(), changes)
        .await?
        .ok_or(AppError::MissingUser)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
