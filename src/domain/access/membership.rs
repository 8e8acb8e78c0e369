//! Membership oracle

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Answers membership questions about a (user, team) pair
///
/// Both questions fail closed: an unknown team yields `false`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    /// Whether `user` is in the team's member list
    async fn is_member(&self, user: &UserId, team: &TeamId) -> Result<bool, DomainError>;

    /// Whether `user` is the team's administrator
    async fn is_admin(&self, user: &UserId, team: &TeamId) -> Result<bool, DomainError>;
}

/// Oracle reading the team repository
#[derive(Debug, Clone)]
pub struct TeamMembershipOracle {
    teams: Arc<dyn TeamRepository>,
}

impl TeamMembershipOracle {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }
}

#[async_trait]
impl MembershipOracle for TeamMembershipOracle {
    async fn is_member(&self, user: &UserId, team: &TeamId) -> Result<bool, DomainError> {
        Ok(self
            .teams
            .get(team)
            .await?
            .is_some_and(|team| team.is_member(user)))
    }

    async fn is_admin(&self, user: &UserId, team: &TeamId) -> Result<bool, DomainError> {
        Ok(self
            .teams
            .get(team)
            .await?
            .is_some_and(|team| team.is_admin(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::Team;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::team::StorageTeamRepository;

    fn repo() -> Arc<StorageTeamRepository> {
        Arc::new(StorageTeamRepository::new(Arc::new(InMemoryStorage::<Team>::new())))
    }

    #[tokio::test]
    async fn test_member_and_admin() {
        let teams = repo();
        let admin = UserId::generate();
        let member = UserId::generate();
        let outsider = UserId::generate();

        let team = Team::new("Platform", admin.clone())
            .unwrap()
            .with_members([member.clone()]);
        let team = teams.create(team).await.unwrap();
        let oracle = TeamMembershipOracle::new(teams);

        assert!(oracle.is_member(&admin, team.id()).await.unwrap());
        assert!(oracle.is_admin(&admin, team.id()).await.unwrap());

        assert!(oracle.is_member(&member, team.id()).await.unwrap());
        assert!(!oracle.is_admin(&member, team.id()).await.unwrap());

        assert!(!oracle.is_member(&outsider, team.id()).await.unwrap());
        assert!(!oracle.is_admin(&outsider, team.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_team_fails_closed() {
        let oracle = TeamMembershipOracle::new(repo());
        let user = UserId::generate();
        let team = TeamId::generate();

        assert!(!oracle.is_member(&user, &team).await.unwrap());
        assert!(!oracle.is_admin(&user, &team).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_implies_member() {
        let teams = repo();
        let mut created = Vec::new();
        for name in ["Alpha", "Beta", "Gamma"] {
            let admin = UserId::generate();
            let team = Team::new(name, admin.clone())
                .unwrap()
                .with_members([UserId::generate(), UserId::generate()]);
            created.push((teams.create(team).await.unwrap(), admin));
        }
        let oracle = TeamMembershipOracle::new(teams);

        for (team, admin) in &created {
            for user in team.members().iter().chain(std::iter::once(admin)) {
                if oracle.is_admin(user, team.id()).await.unwrap() {
                    assert!(oracle.is_member(user, team.id()).await.unwrap());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        use crate::domain::storage::mock::MockStorage;

        let storage = Arc::new(MockStorage::<Team>::new().with_error("connection reset"));
        let oracle = TeamMembershipOracle::new(Arc::new(StorageTeamRepository::new(storage)));

        let result = oracle
            .is_member(&UserId::generate(), &TeamId::generate())
            .await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
