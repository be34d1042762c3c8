/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get tokens
/// - `POST /auth/refresh` - Refresh access token
///
/// Registration only creates the account; tokens are issued by login.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskhub_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,

    /// Always "bearer"
    pub token_type: &'static str,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    pub user: User,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,

    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "carol",
///   "email": "carol@example.com",
///   "password": "pw123"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the new user (without password hash). New accounts
/// always get the "user" role.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, username or email taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    if User::find_by_username(&state.db, &req.username).await?.is_some() {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent registration can still hit the unique constraint, which
    // maps to the same 400.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "username": "carol",
///   "password": "pw123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "refresh_token": "eyJ...",
///   "token_type": "bearer",
///   "expires_in": 86400,
///   "user": { "id": "uuid", "username": "carol", "email": "carol@example.com", "role": "user", "created_at": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(username = %req.username, "Login failed: wrong password");
        return Err(invalid());
    }

    let access_claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
        expires_in: access_claims.expires_in_seconds(),
        user,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token. Fails if the account
/// has been deleted since the refresh token was issued.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token, or unknown user
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let (user_id, access_token) =
        jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::Unauthorized("User not found".to_string()));
    }

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "bearer",
        expires_in: jwt::TokenType::Access.default_expiration().num_seconds(),
    }))
}
