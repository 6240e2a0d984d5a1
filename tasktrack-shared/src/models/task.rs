/// Task model and status workflow
///
/// Tasks belong to a project and move through a three-state workflow.
///
/// # State Machine
///
/// ```text
///          ┌────────────────────────────┐
///          ▼                            │
///        TODO ◄──► IN_PROGRESS ◄──► COMPLETED
///          ▲                            │
///          └────────────────────────────┘
/// ```
///
/// Every transition is allowed, including a state to itself. The completion
/// timestamp follows the status:
///
/// - entering `COMPLETED` stamps `completed_at` with the current time
/// - any other status clears `completed_at`
///
/// When the timestamp is recomputed on update is governed by
/// [`CompletionStampPolicy`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status TEXT NOT NULL DEFAULT 'TODO',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::policy::CompletionStampPolicy;

/// Task workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses in display order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    /// Human-readable bucket label used by progress statistics
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Whether the status is terminal for the workflow
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Completion timestamp a task in this status should carry at `now`
    pub fn completion_stamp(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_completed() {
            Some(now)
        } else {
            None
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Task description (may be empty)
    pub description: String,

    /// Workflow status
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was completed; `Some` iff status is `COMPLETED`
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (required, non-empty)
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Initial status, `TODO` when omitted
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl CreateTask {
    /// Trims the text fields and rejects an empty title
    pub fn normalized(self) -> CoreResult<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::required("title"));
        }

        Ok(Self {
            title,
            description: self.description.trim().to_string(),
            status: self.status,
        })
    }
}

/// Partial update for a task
///
/// Only fields that are `Some` are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    #[serde(default)]
    pub title: Option<String>,

    /// New description
    #[serde(default)]
    pub description: Option<String>,

    /// New status
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// Trims the text fields and rejects an empty replacement title
    pub fn normalized(self) -> CoreResult<Self> {
        let title = match self.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(CoreError::required("title"));
                }
                Some(title)
            }
            None => None,
        };

        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            status: self.status,
        })
    }
}

impl Task {
    /// Builds a new task for `project_id` as of `now`
    ///
    /// Storage backends that assign identifiers themselves ignore `id`.
    pub fn new(project_id: Uuid, data: CreateTask, now: DateTime<Utc>) -> Self {
        let status = data.status.unwrap_or_default();

        Task {
            id: Uuid::new_v4(),
            project_id,
            title: data.title,
            description: data.description,
            status,
            created_at: now,
            completed_at: status.completion_stamp(now),
        }
    }

    /// Merges `update` into the task and recomputes the completion timestamp
    ///
    /// With [`CompletionStampPolicy::EveryUpdate`] the timestamp is recomputed
    /// on every call, whether or not `status` was part of the update. With
    /// [`CompletionStampPolicy::StatusChange`] it is recomputed only when the
    /// resulting status differs from the previous one.
    pub fn apply_update(&mut self, update: UpdateTask, now: DateTime<Utc>, policy: CompletionStampPolicy) {
        let previous = self.status;

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }

        if policy.restamps(previous != self.status) {
            self.completed_at = self.status.completion_stamp(now);
        }
    }
}
