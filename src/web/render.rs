//! Page view model for the task list.
//!
//! `TaskPage` is a pure function of the store's ordered snapshot: the full
//! list, its pending/completed partition, and the counts shown in the
//! header cards. The client never merges partial updates; it re-renders
//! from a fresh `TaskPage` after every action.

use crate::models::Task;
use serde::Serialize;

/// Counts shown in the page overview cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// The full page payload returned by every successful action.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    /// Full task list in store order (most recently created first)
    pub tasks: Vec<Task>,
    /// Tasks with `completed = false`, store order preserved
    pub pending: Vec<Task>,
    /// Tasks with `completed = true`, store order preserved
    pub completed: Vec<Task>,
    pub stats: TaskStats,
}

impl TaskPage {
    /// Build the view model from the store's ordered snapshot.
    pub fn new(tasks: Vec<Task>) -> Self {
        let (completed, pending): (Vec<Task>, Vec<Task>) =
            tasks.iter().cloned().partition(|t| t.completed);

        let stats = TaskStats {
            total: tasks.len(),
            pending: pending.len(),
            completed: completed.len(),
        };

        Self {
            tasks,
            pending,
            completed,
            stats,
        }
    }

    /// True when there are no tasks at all (distinct from the per-partition
    /// empty states).
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
