/// Task progress statistics
///
/// Reduces a task collection into a fixed, ordered set of status buckets:
///
/// ```text
/// [ "To Do", "In Progress", "Completed" ]
/// ```
///
/// The order never changes and every bucket is present even when empty, so
/// charts rendered from the result stay stable.
///
/// # Example
///
/// ```
/// use tasktrack_shared::models::TaskStatus;
/// use tasktrack_shared::stats::compute_status_counts;
///
/// let counts = compute_status_counts([TaskStatus::Todo, TaskStatus::Todo, TaskStatus::Completed]);
/// assert_eq!(counts.get(TaskStatus::Todo), 2);
/// assert_eq!(counts.get(TaskStatus::InProgress), 0);
/// assert_eq!(counts.get(TaskStatus::Completed), 1);
/// ```

use serde::Serialize;

use crate::models::{Task, TaskStatus};

/// One named bucket of the distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBucket {
    /// Display label ("To Do", "In Progress", "Completed")
    pub name: &'static str,

    /// Status counted by this bucket
    pub status: TaskStatus,

    /// Number of tasks in this status
    pub value: usize,
}

/// Fixed-order status distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Buckets in display order
    pub buckets: [StatusBucket; 3],

    /// Total number of tasks counted
    pub total: usize,
}

impl StatusCounts {
    /// Count for a single status
    pub fn get(&self, status: TaskStatus) -> usize {
        self.buckets
            .iter()
            .find(|bucket| bucket.status == status)
            .map(|bucket| bucket.value)
            .unwrap_or(0)
    }
}

/// Anything that carries a task status
pub trait HasStatus {
    fn status(&self) -> TaskStatus;
}

impl HasStatus for TaskStatus {
    fn status(&self) -> TaskStatus {
        *self
    }
}

impl HasStatus for Task {
    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl<T: HasStatus + ?Sized> HasStatus for &T {
    fn status(&self) -> TaskStatus {
        (**self).status()
    }
}

fn slot(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Completed => 2,
    }
}

/// Computes the status distribution of `tasks` in a single pass
pub fn compute_status_counts<I>(tasks: I) -> StatusCounts
where
    I: IntoIterator,
    I::Item: HasStatus,
{
    let mut counts = [0usize; 3];

    for task in tasks {
        counts[slot(task.status())] += 1;
    }

    let buckets = TaskStatus::ALL.map(|status| StatusBucket {
        name: status.label(),
        status,
        value: counts[slot(status)],
    });

    StatusCounts {
        buckets,
        total: counts.iter().sum(),
    }
}
