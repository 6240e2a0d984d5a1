/// Error types for the TaskTrack core
///
/// Two layers of errors live here:
///
/// - [`StoreError`]: raised by storage backends (`db::postgres`, `db::memory`)
/// - [`CoreError`]: raised by the access-controlled stores and surfaced
///   verbatim to the boundary layer
///
/// Ownership failures are reported as [`CoreError::NotFound`],
/// never as a permission error, so callers cannot probe for the existence of
/// records they do not own.

use std::fmt;

/// Kind of record referenced by a [`CoreError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Project,
    Task,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::User => write!(f, "User"),
            Resource::Project => write!(f, "Project"),
            Resource::Task => write!(f, "Task"),
        }
    }
}

/// Error returned by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. duplicate email)
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// The backing store failed or could not be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("value");
                if constraint.contains("email") {
                    return StoreError::Duplicate("email".to_string());
                }
                return StoreError::Duplicate(constraint.to_string());
            }
        }

        StoreError::Unavailable(err.to_string())
    }
}

/// Error returned by the access-controlled stores
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No credential, an invalid credential, or a credential for a user
    /// that no longer exists
    #[error("Authentication required")]
    Unauthenticated,

    /// Record absent or not owned by the caller
    #[error("{0} not found")]
    NotFound(Resource),

    /// Project creation limit reached
    #[error("Maximum projects limit reached ({current}/{limit})")]
    QuotaExceeded { limit: u32, current: u32 },

    /// Project deletion refused because tasks still reference it
    #[error("Project still has {0} task(s)")]
    HasDependents(u64),

    /// A required field is missing or empty
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A unique value is already taken
    #[error("{0} already exists")]
    Conflict(String),

    /// Generic backing-store fault
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl CoreError {
    /// Shorthand for an empty-field validation failure
    pub fn required(field: &'static str) -> Self {
        CoreError::Validation {
            field,
            message: format!("{} is required", field),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => CoreError::Conflict(what),
            StoreError::Unavailable(msg) => CoreError::StorageUnavailable(msg),
        }
    }
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Result alias for storage backend operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_hides_ownership() {
        let err = CoreError::NotFound(Resource::Project);
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = CoreError::QuotaExceeded { limit: 4, current: 4 };
        assert_eq!(err.to_string(), "Maximum projects limit reached (4/4)");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: CoreError = StoreError::Duplicate("email".to_string()).into();
        assert!(matches!(err, CoreError::Conflict(ref what) if what == "email"));

        let err: CoreError = StoreError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, CoreError::StorageUnavailable(_)));
    }

    #[test]
    fn test_required_message() {
        let err = CoreError::required("title");
        assert_eq!(err.to_string(), "Invalid title: title is required");
    }
}
