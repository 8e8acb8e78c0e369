//! Dashboard counters over a set of tasks

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entity::{Task, TaskStatus};
use super::query::week_bounds;
use crate::domain::user::UserId;

/// Per-status counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub backlog: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

impl StatusCounts {
    fn record(&mut self, status: TaskStatus) {
        let slot = match status {
            TaskStatus::Backlog => &mut self.backlog,
            TaskStatus::ToDo => &mut self.to_do,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Review => &mut self.review,
            TaskStatus::Done => &mut self.done,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub overdue: usize,
    pub due_this_week: usize,
    pub assigned_to_me: usize,
}

impl TaskStats {
    pub fn compute<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        requester: &UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let (week_start, week_end) = week_bounds(now.date_naive());
        let mut stats = Self::default();

        for task in tasks {
            stats.total += 1;
            stats.by_status.record(task.status());

            if task.is_overdue(now) {
                stats.overdue += 1;
            }

            if let Some(due) = task.due_date() {
                let day = due.date_naive();
                if day >= week_start && day <= week_end {
                    stats.due_this_week += 1;
                }
            }

            if task.assignee() == Some(requester) {
                stats.assigned_to_me += 1;
            }
        }

        stats
    }
}
