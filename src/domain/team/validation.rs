//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Invalid team ID: '{0}'")]
    InvalidId(String),

    #[error("Please provide a team name")]
    EmptyName,

    #[error("Team name cannot be more than {0} characters")]
    NameTooLong(usize),

    #[error("Description cannot be more than {0} characters")]
    DescriptionTooLong(usize),
}

pub const MAX_TEAM_NAME_LENGTH: usize = 50;
pub const MAX_TEAM_DESCRIPTION_LENGTH: usize = 200;

/// Validate a team ID (UUID text form)
pub fn validate_team_id(id: &str) -> Result<(), TeamValidationError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| TeamValidationError::InvalidId(id.to_string()))
}

/// Validate an already-trimmed team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a team description
pub fn validate_team_description(description: &str) -> Result<(), TeamValidationError> {
    if description.chars().count() > MAX_TEAM_DESCRIPTION_LENGTH {
        return Err(TeamValidationError::DescriptionTooLong(
            MAX_TEAM_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}
