//! Team service: listing, creation and membership

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::access::AuthorizationGate;
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{UserId, UserRepository, UserSummary};
use crate::domain::DomainError;
use crate::infrastructure::user::load_summaries;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

/// A team with its user references resolved
#[derive(Debug, Clone)]
pub struct TeamDetails {
    pub team: Team,
    pub admin: Option<UserSummary>,
    /// In member-list order; unknown users are left out
    pub members: Vec<UserSummary>,
}

/// Team service for managing teams
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    gate: AuthorizationGate,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        gate: AuthorizationGate,
    ) -> Self {
        Self { teams, users, gate }
    }

    /// Teams the requester belongs to, sorted by name
    pub async fn list_for_user(&self, requester: &UserId) -> Result<Vec<TeamDetails>, DomainError> {
        let scope = self.gate.list_teams(requester).await?.into_result()?;
        let teams = self.teams.find_by_member(scope.member()).await?;

        debug!(user_id = %requester, count = teams.len(), "Listed teams");
        self.details(teams).await
    }

    /// Create a team administered by the requester
    pub async fn create(
        &self,
        requester: &UserId,
        request: CreateTeamRequest,
    ) -> Result<TeamDetails, DomainError> {
        let name = self
            .gate
            .create_team(requester, &request.name)
            .await?
            .into_result()?;

        let team = Team::new(&name, requester.clone())
            .and_then(|team| team.with_description(request.description))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let team = self.teams.create(team).await?;
        info!(team_id = %team.id(), name = %team.name(), admin = %requester, "Created team");

        self.detail(team).await
    }

    /// Add the user registered under `email` to a team
    pub async fn add_member(
        &self,
        requester: &UserId,
        team_id: &TeamId,
        email: &str,
    ) -> Result<TeamDetails, DomainError> {
        let addition = self
            .gate
            .add_team_member(requester, team_id, email)
            .await?
            .into_result()?;

        let team = self
            .teams
            .add_member(addition.team.id(), addition.user.id())
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        info!(
            team_id = %team.id(),
            member = %addition.user.id(),
            added_by = %requester,
            "Added team member"
        );

        self.detail(team).await
    }

    /// Storage reachability, for readiness checks
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.teams.count().await.map(|_| ())
    }

    async fn detail(&self, team: Team) -> Result<TeamDetails, DomainError> {
        let mut details = self.details(vec![team]).await?;
        details
            .pop()
            .ok_or_else(|| DomainError::internal("Team details missing"))
    }

    async fn details(&self, teams: Vec<Team>) -> Result<Vec<TeamDetails>, DomainError> {
        let ids: Vec<UserId> = teams
            .iter()
            .flat_map(|team| team.members().iter().chain(std::iter::once(team.admin())))
            .cloned()
            .collect();
        let summaries = load_summaries(self.users.as_ref(), &ids).await?;

        Ok(teams
            .into_iter()
            .map(|team| TeamDetails {
                admin: summaries.get(team.admin()).cloned(),
                members: team
                    .members()
                    .iter()
                    .filter_map(|id| summaries.get(id).cloned())
                    .collect(),
                team,
            })
            .collect())
    }
}
