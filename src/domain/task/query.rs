//! In-scope task filtering and sorting
//!
//! A [`TaskQuery`] narrows and orders a list of tasks that has already been
//! restricted to the requester's teams. It never widens that list.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use super::entity::{Task, TaskPriority, TaskStatus};
use super::validation::TaskValidationError;
use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Assignee filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Assigned to the requester
    Me,
    Unassigned,
    /// Assigned to someone other than the requester
    Others,
    User(UserId),
}

impl FromStr for AssigneeFilter {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "me" => Ok(Self::Me),
            "unassigned" => Ok(Self::Unassigned),
            "others" => Ok(Self::Others),
            other => UserId::new(other)
                .map(Self::User)
                .map_err(|_| invalid("assignee", s)),
        }
    }
}

/// Due-date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Due in the past and not done
    Overdue,
    /// Due on the current (UTC) calendar day
    Today,
    /// Due within the current Sunday-to-Saturday week
    ThisWeek,
    /// Due after now
    Future,
    /// No due date
    None,
}

impl FromStr for DueFilter {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "this_week" | "thisweek" => Ok(Self::ThisWeek),
            "future" => Ok(Self::Future),
            "none" | "no_date" | "nodate" => Ok(Self::None),
            _ => Err(invalid("due", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    DueDate,
    Title,
    Priority,
    Status,
}

impl FromStr for TaskSortField {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created_at" | "createdat" => Ok(Self::CreatedAt),
            "due_date" | "duedate" => Ok(Self::DueDate),
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            _ => Err(invalid("sort", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(invalid("order", s)),
        }
    }
}

fn invalid(param: &'static str, value: &str) -> TaskValidationError {
    TaskValidationError::InvalidQuery {
        param,
        value: value.to_string(),
    }
}

/// Filters and ordering for a task listing
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub team: Option<TeamId>,
    pub assignee: Option<AssigneeFilter>,
    pub due: Option<DueFilter>,
    pub search: Option<String>,
    pub sort: TaskSortField,
    pub order: SortOrder,
}

impl TaskQuery {
    /// Whether `task` passes every filter of this query
    pub fn matches(&self, task: &Task, requester: &UserId, now: DateTime<Utc>) -> bool {
        if self.status.is_some_and(|status| task.status() != status) {
            return false;
        }

        if self.priority.is_some_and(|priority| task.priority() != priority) {
            return false;
        }

        if self.team.as_ref().is_some_and(|team| task.team() != team) {
            return false;
        }

        if let Some(ref assignee) = self.assignee {
            let matched = match assignee {
                AssigneeFilter::Me => task.assignee() == Some(requester),
                AssigneeFilter::Unassigned => task.assignee().is_none(),
                AssigneeFilter::Others => task.assignee().is_some_and(|a| a != requester),
                AssigneeFilter::User(user) => task.assignee() == Some(user),
            };
            if !matched {
                return false;
            }
        }

        if let Some(due) = self.due {
            if !due_matches(due, task, now) {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_title = task.title().to_lowercase().contains(&needle);
            let in_description = task
                .description()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }

    /// Filter then sort `tasks`
    pub fn apply(&self, tasks: Vec<Task>, requester: &UserId, now: DateTime<Utc>) -> Vec<Task> {
        let mut tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.matches(task, requester, now))
            .collect();

        tasks.sort_by(|a, b| self.compare(a, b));
        tasks
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.sort {
            TaskSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            TaskSortField::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
            TaskSortField::Priority => a.priority().rank().cmp(&b.priority().rank()),
            TaskSortField::Status => a.status().rank().cmp(&b.status().rank()),
            TaskSortField::DueDate => match (a.due_date(), b.due_date()) {
                (Some(a), Some(b)) => a.cmp(&b),
                // Undated tasks go last in either direction
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

fn due_matches(filter: DueFilter, task: &Task, now: DateTime<Utc>) -> bool {
    let due = task.due_date();

    match filter {
        DueFilter::Overdue => task.is_overdue(now),
        DueFilter::Today => due.is_some_and(|d| d.date_naive() == now.date_naive()),
        DueFilter::ThisWeek => due.is_some_and(|d| {
            let (start, end) = week_bounds(now.date_naive());
            let day = d.date_naive();
            day >= start && day <= end
        }),
        DueFilter::Future => due.is_some_and(|d| d > now),
        DueFilter::None => due.is_none(),
    }
}

/// First (Sunday) and last (Saturday) day of the week containing `day`
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(day.weekday().num_days_from_sunday());
    let start = day - Duration::days(offset);
    (start, start + Duration::days(6))
}
