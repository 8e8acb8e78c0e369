//! Task validation

use thiserror::Error;

/// Errors that can occur during task validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskValidationError {
    #[error("Invalid task ID: '{0}'")]
    InvalidId(String),

    #[error("Please provide a task title")]
    EmptyTitle,

    #[error("Title cannot be more than {0} characters")]
    TitleTooLong(usize),

    #[error("Description cannot be more than {0} characters")]
    DescriptionTooLong(usize),

    #[error("Invalid status '{0}'")]
    InvalidStatus(String),

    #[error("Invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("Invalid value '{value}' for '{param}'")]
    InvalidQuery { param: &'static str, value: String },
}

pub const MAX_TASK_TITLE_LENGTH: usize = 100;
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 1000;

/// Validate a task ID (UUID text form)
pub fn validate_task_id(id: &str) -> Result<(), TaskValidationError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| TaskValidationError::InvalidId(id.to_string()))
}

/// Validate an already-trimmed task title
pub fn validate_task_title(title: &str) -> Result<(), TaskValidationError> {
    if title.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(TaskValidationError::TitleTooLong(MAX_TASK_TITLE_LENGTH));
    }

    Ok(())
}

pub fn validate_task_description(description: &str) -> Result<(), TaskValidationError> {
    if description.chars().count() > MAX_TASK_DESCRIPTION_LENGTH {
        return Err(TaskValidationError::DescriptionTooLong(
            MAX_TASK_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}
