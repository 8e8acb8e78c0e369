//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for managing teams
///
/// Implementations must call [`Team::enforce_admin_membership`] on every
/// document they write.
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Teams whose member list includes `user`, sorted by name
    async fn find_by_member(&self, user: &UserId) -> Result<Vec<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update an existing team
    async fn update(&self, team: Team) -> Result<Team, DomainError>;

    /// Atomically add `user` to the team's member list
    ///
    /// Set semantics: adding a present member leaves the list unchanged.
    /// Returns `None` if the team does not exist.
    async fn add_member(&self, id: &TeamId, user: &UserId) -> Result<Option<Team>, DomainError>;

    /// Count all teams
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a team exists
    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
