/// Project model
///
/// A project groups tasks and belongs to exactly one user. The owner is
/// fixed at creation and is the only identity allowed to read, list or
/// delete the project. Projects are never updated.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Project record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Project title
    pub title: String,

    /// Project description
    pub description: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
///
/// The owner is never taken from input; it always comes from the caller's
/// resolved identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project title (required, non-empty)
    pub title: String,

    /// Project description (required, non-empty)
    pub description: String,
}

impl CreateProject {
    /// Checks that both title and description are present
    ///
    /// Values are trimmed; a field consisting only of whitespace is treated
    /// as missing.
    pub fn normalized(self) -> CoreResult<Self> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();

        if title.is_empty() {
            return Err(CoreError::required("title"));
        }
        if description.is_empty() {
            return Err(CoreError::required("description"));
        }

        Ok(Self { title, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims() {
        let data = CreateProject {
            title: "  Website  ".to_string(),
            description: " Relaunch ".to_string(),
        }
        .normalized()
        .unwrap();

        assert_eq!(data.title, "Website");
        assert_eq!(data.description, "Relaunch");
    }

    #[test]
    fn test_normalized_rejects_blank_fields() {
        let err = CreateProject {
            title: "   ".to_string(),
            description: "Something".to_string(),
        }
        .normalized()
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "title", .. }));

        let err = CreateProject {
            title: "Title".to_string(),
            description: String::new(),
        }
        .normalized()
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "description", .. }));
    }
}
