//! Storage-backed team repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::team::{Team, TeamId, TeamRepository, MEMBERS_FIELD};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage-backed implementation of TeamRepository
///
/// Repairs the administrator-in-members invariant before every write.
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TeamRepository for StorageTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.storage.get(id).await
    }

    async fn find_by_member(&self, user: &UserId) -> Result<Vec<Team>, DomainError> {
        let filter = DocumentFilter::contains(MEMBERS_FIELD, user.as_str());
        let mut teams = self.storage.find(&filter).await?;

        teams.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        Ok(teams)
    }

    async fn create(&self, mut team: Team) -> Result<Team, DomainError> {
        team.enforce_admin_membership();

        if self.storage.exists(team.id()).await? {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.id()
            )));
        }

        self.storage.create(team).await
    }

    async fn update(&self, mut team: Team) -> Result<Team, DomainError> {
        team.enforce_admin_membership();

        if !self.storage.exists(team.id()).await? {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                team.id()
            )));
        }

        self.storage.update(team).await
    }

    async fn add_member(&self, id: &TeamId, user: &UserId) -> Result<Option<Team>, DomainError> {
        let user = user.clone();

        self.storage
            .modify(
                id,
                Box::new(move |team: &mut Team| {
                    team.add_member(user);
                    team.enforce_admin_membership();
                    Ok(())
                }),
            )
            .await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError> {
        self.storage.exists(id).await
    }
}
