//! Team domain module
//!
//! Teams group users; every task belongs to exactly one team. A team has a
//! single administrator, who is always one of its members.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId, MEMBERS_FIELD};
pub use repository::TeamRepository;
pub use validation::{
    validate_team_description, validate_team_id, validate_team_name, TeamValidationError,
    MAX_TEAM_DESCRIPTION_LENGTH, MAX_TEAM_NAME_LENGTH,
};
