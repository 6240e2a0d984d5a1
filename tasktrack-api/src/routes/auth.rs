/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Token refresh
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get tokens
/// - `POST /api/auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::JsonBody,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt, password},
    models::{user::normalize_email, CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Country of residence
    #[validate(length(min = 1, max = 100, message = "Country must be 1-100 characters"))]
    pub country: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user (never includes the password hash)
    pub user: User,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

impl AuthResponse {
    fn issue(user: User, secret: &str) -> ApiResult<Self> {
        let tokens = jwt::issue_token_pair(user.id, secret)?;

        Ok(Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "Jane Doe",
///   "country": "NL"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::ValidationError(vec![ValidationErrorDetail::new("password", e)]))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .repo
        .create_user(CreateUser {
            email: normalize_email(&req.email),
            name: req.name.trim().to_string(),
            country: req.country.trim().to_string(),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let response = AuthResponse::issue(user, state.jwt_secret())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid email or password (the two are not distinguished)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = match state.repo.find_user_by_email(&normalize_email(&req.email)).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown email");
            return Err(invalid());
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse::issue(user, state.jwt_secret())?))
}

/// Exchange a refresh token for a new access token
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/refresh
/// Content-Type: application/json
///
/// {
///   "refresh_token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired or wrong-type token, or the user no longer exists
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if state.repo.find_user_by_id(claims.sub).await?.is_none() {
        tracing::warn!(user_id = %claims.sub, "Refresh token for unknown user");
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }

    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
