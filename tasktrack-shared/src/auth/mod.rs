/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: access/refresh token issuance and validation
/// - [`middleware`]: resolves a bearer header into an [`AuthContext`]
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{issue_token_pair, validate_access_token};
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let secret = "a-secret-that-is-at-least-32-bytes-long";
/// let pair = issue_token_pair(Uuid::new_v4(), secret)?;
/// validate_access_token(&pair.access_token, secret)?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;

pub use middleware::{authenticate, AuthContext, AuthError};
