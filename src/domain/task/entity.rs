//! Task entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_task_description, validate_task_id, validate_task_title, TaskValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Task identifier (UUID v4, text form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parse a TaskId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, TaskValidationError> {
        let id = id.into();
        validate_task_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TaskId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Backlog,
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        Self::Backlog,
        Self::ToDo,
        Self::InProgress,
        Self::Review,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    /// Position in the workflow, used for sorting
    pub fn rank(&self) -> u8 {
        match self {
            Self::Backlog => 1,
            Self::ToDo => 2,
            Self::InProgress => 3,
            Self::Review => 4,
            Self::Done => 5,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    /// Accepts the display form ("In Progress") as well as snake case
    /// ("in_progress"), case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "to do" | "todo" => Ok(Self::ToDo),
            "in progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            _ => Err(TaskValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// Serialized field holding the owning team
pub const TEAM_FIELD: &str = "team";

/// Task entity
///
/// `team` and `created_by` are fixed at construction; nothing in this type
/// can change them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<UserId>,
    team: TeamId,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in `team`, created by `created_by`
    pub fn new(
        title: impl AsRef<str>,
        team: TeamId,
        created_by: UserId,
    ) -> Result<Self, TaskValidationError> {
        let title = title.as_ref().trim().to_string();
        validate_task_title(&title)?;
        let now = Utc::now();

        Ok(Self {
            id: TaskId::generate(),
            title,
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assignee: None,
            team,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set description (builder pattern); blank descriptions are dropped
    pub fn with_description(
        mut self,
        description: Option<impl Into<String>>,
    ) -> Result<Self, TaskValidationError> {
        self.description = normalize_description(description.map(Into::into))?;
        Ok(self)
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn assignee(&self) -> Option<&UserId> {
        self.assignee.as_ref()
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overdue: has a due date in the past and is not done
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_done() && self.due_date.is_some_and(|due| due < now)
    }

    /// Apply a partial update
    ///
    /// All fields are validated before any of them is written, so a rejected
    /// patch leaves the task untouched.
    pub fn apply(&mut self, patch: TaskPatch) -> Result<(), TaskValidationError> {
        let title = match patch.title {
            Some(title) => {
                let title = title.trim().to_string();
                validate_task_title(&title)?;
                Some(title)
            }
            None => None,
        };

        let description = match patch.description {
            Some(description) => Some(normalize_description(description)?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }

        self.updated_at = Utc::now();
        Ok(())
    }
}

impl StorageEntity for Task {
    type Key = TaskId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

fn normalize_description(
    description: Option<String>,
) -> Result<Option<String>, TaskValidationError> {
    let description = description.filter(|d| !d.trim().is_empty());

    if let Some(ref d) = description {
        validate_task_description(d)?;
    }

    Ok(description)
}

/// Partial update of a task
///
/// For the optional fields the outer `Option` says whether the field is being
/// changed and the inner one carries the new value, `None` clearing it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assignee: Option<Option<UserId>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
    }
}
