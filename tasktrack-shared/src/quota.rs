/// Per-user resource quota
///
/// Each user may own at most [`MAX_PROJECTS_PER_USER`] projects at any time.
/// Creation beyond the limit fails with [`CoreError::QuotaExceeded`] before
/// anything is written.
///
/// The check and the insert are performed as one conditional write by the
/// storage backend (see `ProjectRepository::insert_project_within_quota`),
/// so two concurrent creations cannot both slip under the limit.
///
/// # Example
///
/// ```
/// use tasktrack_shared::quota::QuotaLimits;
///
/// let limits = QuotaLimits::default();
/// let check = limits.check_projects(3);
/// assert!(check.allowed);
/// assert_eq!(check.remaining, 1);
///
/// assert!(!limits.check_projects(4).allowed);
/// ```

use serde::Serialize;

#[cfg(doc)]
use crate::error::CoreError;

/// Maximum number of projects a single user may own
pub const MAX_PROJECTS_PER_USER: u32 = 4;

/// Quota limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    /// Maximum projects owned by one user
    pub projects_per_user: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        QuotaLimits {
            projects_per_user: MAX_PROJECTS_PER_USER,
        }
    }
}

impl QuotaLimits {
    /// Checks a current project count against the limit
    pub fn check_projects(&self, current: u32) -> QuotaCheckResult {
        if current >= self.projects_per_user {
            QuotaCheckResult::exceeded(current, self.projects_per_user)
        } else {
            QuotaCheckResult::allowed(current, self.projects_per_user)
        }
    }
}

/// Result of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaCheckResult {
    /// Whether one more resource may be created
    pub allowed: bool,

    /// Current usage
    pub current: u32,

    /// Maximum allowed
    pub limit: u32,

    /// Remaining quota
    pub remaining: u32,
}

impl QuotaCheckResult {
    /// Creates a result indicating quota is available
    pub fn allowed(current: u32, limit: u32) -> Self {
        QuotaCheckResult {
            allowed: true,
            current,
            limit,
            remaining: limit.saturating_sub(current),
        }
    }

    /// Creates a result indicating quota is exhausted
    pub fn exceeded(current: u32, limit: u32) -> Self {
        QuotaCheckResult {
            allowed: false,
            current,
            limit,
            remaining: 0,
        }
    }
}
