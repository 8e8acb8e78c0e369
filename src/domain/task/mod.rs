//! Task domain module
//!
//! Tasks belong to exactly one team for their whole lifetime and carry a
//! status and priority workflow.

mod entity;
mod query;
mod repository;
mod stats;
mod validation;

pub use entity::{Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TEAM_FIELD};
pub use query::{week_bounds, AssigneeFilter, DueFilter, SortOrder, TaskQuery, TaskSortField};
pub use repository::TaskRepository;
pub use stats::{StatusCounts, TaskStats};
pub use validation::{
    validate_task_description, validate_task_id, validate_task_title, TaskValidationError,
    MAX_TASK_DESCRIPTION_LENGTH, MAX_TASK_TITLE_LENGTH,
};
