//! Task repository trait

use async_trait::async_trait;

use super::entity::{Task, TaskId, TaskPatch};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository for managing tasks
#[async_trait]
pub trait TaskRepository: Send + Sync + std::fmt::Debug {
    /// Get a task by ID
    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DomainError>;

    /// Tasks belonging to any of `teams`
    ///
    /// An empty slice yields an empty list, never every task.
    async fn find_by_team_ids(&self, teams: &[TeamId]) -> Result<Vec<Task>, DomainError>;

    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task, DomainError>;

    /// Apply `patch` to the stored task as one atomic read-modify-write
    ///
    /// Returns `None` if the task does not exist. An invalid patch leaves
    /// the stored document untouched.
    async fn modify(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>, DomainError>;

    /// Delete a task, returns true if it existed
    async fn delete(&self, id: &TaskId) -> Result<bool, DomainError>;

    /// Count all tasks
    async fn count(&self) -> Result<usize, DomainError>;
}
