/// Configurable behavior of the data-access core
///
/// Two behaviors of the system are deliberate choices rather than fixed
/// rules, so they are exposed as policies:
///
/// - [`CompletionStampPolicy`]: when a task's completion timestamp is
///   recomputed on update
/// - [`ProjectDeletePolicy`]: what happens to a project's tasks when the
///   project is deleted
///
/// The defaults reproduce the historical behavior of the service.
///
/// # Example
///
/// ```
/// use tasktrack_shared::policy::{CompletionStampPolicy, Policies, ProjectDeletePolicy};
///
/// let policies = Policies {
///     completion_stamp: "status_change".parse().unwrap(),
///     project_delete: ProjectDeletePolicy::Cascade,
///     ..Default::default()
/// };
/// assert_eq!(policies.completion_stamp, CompletionStampPolicy::StatusChange);
/// assert_eq!(policies.quota.projects_per_user, 4);
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::quota::QuotaLimits;

/// When to recompute a task's completion timestamp on update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStampPolicy {
    /// Recompute on every update, even if only the title changed.
    /// An already-completed task receives a fresh completion time.
    #[default]
    EveryUpdate,

    /// Recompute only when the update changes the status
    StatusChange,
}

impl CompletionStampPolicy {
    /// Whether the timestamp must be recomputed for an update
    pub fn restamps(&self, status_changed: bool) -> bool {
        match self {
            CompletionStampPolicy::EveryUpdate => true,
            CompletionStampPolicy::StatusChange => status_changed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStampPolicy::EveryUpdate => "every_update",
            CompletionStampPolicy::StatusChange => "status_change",
        }
    }
}

impl FromStr for CompletionStampPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every_update" => Ok(CompletionStampPolicy::EveryUpdate),
            "status_change" => Ok(CompletionStampPolicy::StatusChange),
            other => Err(PolicyParseError {
                policy: "completion stamp",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompletionStampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a project's tasks when the project is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectDeletePolicy {
    /// Delete the project only; its tasks stay behind as orphans
    #[default]
    Orphan,

    /// Delete the project and all of its tasks
    Cascade,

    /// Refuse to delete a project that still has tasks
    Restrict,
}

impl ProjectDeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectDeletePolicy::Orphan => "orphan",
            ProjectDeletePolicy::Cascade => "cascade",
            ProjectDeletePolicy::Restrict => "restrict",
        }
    }
}

impl FromStr for ProjectDeletePolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orphan" => Ok(ProjectDeletePolicy::Orphan),
            "cascade" => Ok(ProjectDeletePolicy::Cascade),
            "restrict" => Ok(ProjectDeletePolicy::Restrict),
            other => Err(PolicyParseError {
                policy: "project delete",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProjectDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized policy name
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {policy} policy: {value}")]
pub struct PolicyParseError {
    pub policy: &'static str,
    pub value: String,
}

/// Complete policy set handed to the stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policies {
    /// Completion timestamp recomputation
    pub completion_stamp: CompletionStampPolicy,

    /// Project deletion behavior
    pub project_delete: ProjectDeletePolicy,

    /// Per-user resource limits
    pub quota: QuotaLimits,
}
