/// Request authentication
///
/// Resolves an `Authorization: Bearer <token>` header into an
/// [`AuthContext`]. The HTTP layer calls [`authenticate`] once per request
/// and inserts the result into the request extensions; handlers extract it
/// with `Extension<AuthContext>` and pass it explicitly to the stores.
///
/// A request is authenticated only if:
///
/// 1. the header is present and uses the `Bearer` scheme
/// 2. the token is a valid, unexpired access token
/// 3. the token's subject still exists in the user store
///
/// Everything else is rejected as [`AuthError`], which maps to
/// [`CoreError::Unauthenticated`] (except storage faults).
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::middleware::{authenticate, AuthError};
/// use tasktrack_shared::db::memory::MemoryRepository;
///
/// # async fn example() {
/// let repo = MemoryRepository::new();
/// let result = authenticate(&repo, "a-secret-that-is-at-least-32-bytes-long", None).await;
/// assert!(matches!(result, Err(AuthError::MissingCredentials)));
/// # }
/// ```

use serde::Serialize;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::db::repository::UserRepository;
use crate::error::{CoreError, StoreError};
use crate::models::User;

/// Verified identity of the caller
///
/// Only produced by [`authenticate`] (or from a freshly loaded [`User`]),
/// never deserialized from request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// User's email address
    pub email: String,

    /// User's display name
    pub name: String,
}

impl AuthContext {
    /// Creates the context for a user loaded from storage
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token subject no longer exists
    #[error("Unknown user")]
    UnknownUser,

    /// User lookup failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            JwtError::WrongType { .. } => AuthError::InvalidToken("Access token required".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Storage(msg) => CoreError::StorageUnavailable(msg),
            _ => CoreError::Unauthenticated,
        }
    }
}

/// Extracts the token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Resolves the `Authorization` header of a request into a caller identity
pub async fn authenticate<R>(
    repo: &R,
    secret: &str,
    authorization: Option<&str>,
) -> Result<AuthContext, AuthError>
where
    R: UserRepository + ?Sized,
{
    let header = authorization.ok_or(AuthError::MissingCredentials)?;
    let token = bearer_token(header)?;

    let claims = validate_access_token(token, secret).map_err(|e| {
        tracing::warn!(error = %e, "Rejected access token");
        AuthError::from(e)
    })?;

    let user = repo
        .find_user_by_id(claims.sub)
        .await
        .map_err(|e: StoreError| AuthError::Storage(e.to_string()))?
        .ok_or_else(|| {
            tracing::warn!(user_id = %claims.sub, "Token subject does not exist");
            AuthError::UnknownUser
        })?;

    Ok(AuthContext::from_user(&user))
}
