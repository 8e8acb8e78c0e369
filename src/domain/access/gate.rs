//! Authorization gate
//!
//! Every listing or mutating operation on teams and tasks asks the gate
//! first. Identifier-addressed operations resolve existence before
//! permission, so a missing entity is always `NotFound` and never
//! `Forbidden`. Listings are answered with a scope the storage query is
//! restricted to, not with a filter applied to everything afterwards.
//!
//! The outer `Result` of each function carries infrastructure failures only;
//! policy outcomes are the [`Decision`] inside it.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use super::decision::{Decision, Denial};
use super::membership::MembershipOracle;
use crate::domain::task::{Task, TaskId, TaskRepository};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{normalize_email, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Operation classes guarded by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOperation {
    ListTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    ListTeams,
    CreateTeam,
    AddTeamMember,
}

impl AccessOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListTasks => "list_tasks",
            Self::CreateTask => "create_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::ListTeams => "list_teams",
            Self::CreateTeam => "create_team",
            Self::AddTeamMember => "add_team_member",
        }
    }
}

/// Teams whose tasks a user may see
#[derive(Debug, Clone, PartialEq)]
pub struct TaskScope {
    teams: Vec<TeamId>,
}

impl TaskScope {
    pub fn team_ids(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn contains(&self, team: &TeamId) -> bool {
        self.teams.contains(team)
    }
}

/// The teams a user belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct TeamScope {
    member: UserId,
}

impl TeamScope {
    pub fn member(&self) -> &UserId {
        &self.member
    }
}

/// Permission to add `user` to `team`
#[derive(Debug, Clone)]
pub struct MemberAddition {
    pub team: Team,
    pub user: User,
}

/// Per-operation access policy over teams and tasks
#[derive(Clone)]
pub struct AuthorizationGate {
    oracle: Arc<dyn MembershipOracle>,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}

impl AuthorizationGate {
    pub fn new(
        oracle: Arc<dyn MembershipOracle>,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            oracle,
            users,
            teams,
            tasks,
        }
    }

    /// Scope for listing tasks: the teams `requester` is a member of
    pub async fn list_tasks(&self, requester: &UserId) -> Result<Decision<TaskScope>, DomainError> {
        let teams = self.teams.find_by_member(requester).await?;
        let scope = TaskScope {
            teams: teams.into_iter().map(|team| team.id().clone()).collect(),
        };

        debug!(user = %requester, teams = scope.teams.len(), "Resolved task scope");
        Ok(record(AccessOperation::ListTasks, requester, Decision::Permitted(scope)))
    }

    /// Members of the target team may create tasks in it
    pub async fn create_task(
        &self,
        requester: &UserId,
        team: Option<&TeamId>,
        title: &str,
    ) -> Result<Decision<TeamId>, DomainError> {
        let decision = match team {
            None => Denial::bad_request("Please provide a team").into(),
            Some(_) if title.trim().is_empty() => {
                Denial::bad_request("Please provide a task title").into()
            }
            Some(team) => {
                if self.oracle.is_member(requester, team).await? {
                    Decision::Permitted(team.clone())
                } else {
                    Denial::forbidden("Not authorized to create tasks for this team").into()
                }
            }
        };

        Ok(record(AccessOperation::CreateTask, requester, decision))
    }

    /// Any member of the task's team may update it
    pub async fn update_task(
        &self,
        requester: &UserId,
        task: &TaskId,
    ) -> Result<Decision<Task>, DomainError> {
        let decision = match self.tasks.get(task).await? {
            None => Denial::not_found("Task not found").into(),
            Some(task) => {
                if self.oracle.is_member(requester, task.team()).await? {
                    Decision::Permitted(task)
                } else {
                    Denial::forbidden("Not authorized to update this task").into()
                }
            }
        };

        Ok(record(AccessOperation::UpdateTask, requester, decision))
    }

    /// The task's creator or its team's administrator may delete it
    pub async fn delete_task(
        &self,
        requester: &UserId,
        task: &TaskId,
    ) -> Result<Decision<Task>, DomainError> {
        let decision = match self.tasks.get(task).await? {
            None => Denial::not_found("Task not found").into(),
            Some(task) => {
                if task.created_by() == requester
                    || self.oracle.is_admin(requester, task.team()).await?
                {
                    Decision::Permitted(task)
                } else {
                    Denial::forbidden("Not authorized to delete this task").into()
                }
            }
        };

        Ok(record(AccessOperation::DeleteTask, requester, decision))
    }

    /// Scope for listing teams: those `requester` is a member of
    pub async fn list_teams(&self, requester: &UserId) -> Result<Decision<TeamScope>, DomainError> {
        let scope = TeamScope {
            member: requester.clone(),
        };
        Ok(record(AccessOperation::ListTeams, requester, Decision::Permitted(scope)))
    }

    /// Any authenticated user may create a team; the name must not be blank
    ///
    /// Permits with the trimmed name.
    pub async fn create_team(
        &self,
        requester: &UserId,
        name: &str,
    ) -> Result<Decision<String>, DomainError> {
        let name = name.trim();
        let decision = if name.is_empty() {
            Denial::bad_request("Please provide a team name").into()
        } else {
            Decision::Permitted(name.to_string())
        };

        Ok(record(AccessOperation::CreateTeam, requester, decision))
    }

    /// Only the administrator may add members, and only new ones
    ///
    /// Checks run in order: team exists, requester is administrator, target
    /// user exists, target is not already a member. The last check is
    /// advisory under concurrency; the member list itself has set semantics.
    pub async fn add_team_member(
        &self,
        requester: &UserId,
        team: &TeamId,
        email: &str,
    ) -> Result<Decision<MemberAddition>, DomainError> {
        let decision = self.decide_add_team_member(requester, team, email).await?;
        Ok(record(AccessOperation::AddTeamMember, requester, decision))
    }

    async fn decide_add_team_member(
        &self,
        requester: &UserId,
        team_id: &TeamId,
        email: &str,
    ) -> Result<Decision<MemberAddition>, DomainError> {
        let Some(team) = self.teams.get(team_id).await? else {
            return Ok(Denial::not_found("Team not found").into());
        };

        if !self.oracle.is_admin(requester, team_id).await? {
            return Ok(Denial::forbidden("Only the team admin can add members").into());
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(Denial::bad_request("Please provide an email").into());
        }

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(Denial::not_found("User not found").into());
        };

        if team.is_member(user.id()) {
            return Ok(Denial::conflict("User is already a member of this team").into());
        }

        Ok(Decision::Permitted(MemberAddition { team, user }))
    }
}

fn record<T>(operation: AccessOperation, requester: &UserId, decision: Decision<T>) -> Decision<T> {
    counter!(
        "taskflow_access_decisions_total",
        "operation" => operation.as_str(),
        "outcome" => decision.outcome()
    )
    .increment(1);

    if let Some(denial) = decision.denial() {
        warn!(
            operation = operation.as_str(),
            kind = %denial.kind,
            user = %requester,
            reason = %denial.message,
            "Access denied"
        );
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::membership::{MockMembershipOracle, TeamMembershipOracle};
    use crate::domain::access::DenialKind;
    use crate::domain::user::PasswordHash;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::task::StorageTaskRepository;
    use crate::infrastructure::team::StorageTeamRepository;
    use crate::infrastructure::user::StorageUserRepository;
    use mockall::predicate::always;
    use tokio_test::assert_ok;

    struct Fixture {
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        tasks: Arc<dyn TaskRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                users: Arc::new(StorageUserRepository::new(Arc::new(InMemoryStorage::<User>::new()))),
                teams: Arc::new(StorageTeamRepository::new(Arc::new(InMemoryStorage::<Team>::new()))),
                tasks: Arc::new(StorageTaskRepository::new(Arc::new(InMemoryStorage::<Task>::new()))),
            }
        }

        fn gate(&self) -> AuthorizationGate {
            let oracle = Arc::new(TeamMembershipOracle::new(self.teams.clone()));
            self.gate_with(oracle)
        }

        fn gate_with(&self, oracle: Arc<dyn MembershipOracle>) -> AuthorizationGate {
            AuthorizationGate::new(
                oracle,
                self.users.clone(),
                self.teams.clone(),
                self.tasks.clone(),
            )
        }

        async fn user(&self, name: &str) -> User {
            let user = User::new(
                name,
                format!("{name}@example.com"),
                PasswordHash::new("hash"),
            )
            .unwrap();
            self.users.create(user).await.unwrap()
        }

        async fn team(&self, name: &str, admin: &User, members: &[&User]) -> Team {
            let team = Team::new(name, admin.id().clone())
                .unwrap()
                .with_members(members.iter().map(|u| u.id().clone()));
            self.teams.create(team).await.unwrap()
        }

        async fn task(&self, title: &str, team: &Team, creator: &User) -> Task {
            let task = Task::new(title, team.id().clone(), creator.id().clone()).unwrap();
            self.tasks.create(task).await.unwrap()
        }
    }

    #[tokio::test]
    async fn test_non_admin_member_cannot_add_member() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let member = fx.user("bob").await;
        let newcomer = fx.user("carol").await;
        let team = fx.team("Platform", &admin, &[&member]).await;

        let decision = fx
            .gate()
            .add_team_member(member.id(), team.id(), newcomer.email())
            .await
            .unwrap();

        assert_eq!(decision.kind(), Some(DenialKind::Forbidden));
    }

    #[tokio::test]
    async fn test_adding_existing_member_is_conflict_and_leaves_members_unchanged() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let member = fx.user("bob").await;
        let team = fx.team("Platform", &admin, &[&member]).await;

        let decision = fx
            .gate()
            .add_team_member(admin.id(), team.id(), "  BOB@example.com ")
            .await
            .unwrap();

        assert_eq!(decision.kind(), Some(DenialKind::Conflict));
        let stored = fx.teams.get(team.id()).await.unwrap().unwrap();
        assert_eq!(stored.members(), team.members());
    }

    #[tokio::test]
    async fn test_adding_admin_by_email_is_conflict() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let team = fx.team("Platform", &admin, &[]).await;

        let decision = fx
            .gate()
            .add_team_member(admin.id(), team.id(), admin.email())
            .await
            .unwrap();

        assert_eq!(decision.kind(), Some(DenialKind::Conflict));
    }

    #[tokio::test]
    async fn test_add_member_permitted_for_admin() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let newcomer = fx.user("carol").await;
        let team = fx.team("Platform", &admin, &[]).await;

        let decision = fx
            .gate()
            .add_team_member(admin.id(), team.id(), newcomer.email())
            .await
            .unwrap();

        let addition = assert_ok!(decision.into_result());
        assert_eq!(addition.team.id(), team.id());
        assert_eq!(addition.user.id(), newcomer.id());
    }

    #[tokio::test]
    async fn test_add_member_check_order() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let member = fx.user("bob").await;
        let team = fx.team("Platform", &admin, &[&member]).await;
        let gate = fx.gate();

        let missing_team = gate
            .add_team_member(admin.id(), &TeamId::generate(), member.email())
            .await
            .unwrap();
        assert_eq!(missing_team.kind(), Some(DenialKind::NotFound));

        // A non-admin learns nothing about which emails are registered
        let unknown_as_member = gate
            .add_team_member(member.id(), team.id(), "ghost@example.com")
            .await
            .unwrap();
        assert_eq!(unknown_as_member.kind(), Some(DenialKind::Forbidden));

        let unknown_as_admin = gate
            .add_team_member(admin.id(), team.id(), "ghost@example.com")
            .await
            .unwrap();
        assert_eq!(unknown_as_admin.kind(), Some(DenialKind::NotFound));
    }

    #[tokio::test]
    async fn test_creator_can_delete_own_task_but_other_member_cannot() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let creator = fx.user("bob").await;
        let other = fx.user("carol").await;
        let team = fx.team("Platform", &admin, &[&creator, &other]).await;
        let task = fx.task("Ship it", &team, &creator).await;
        let gate = fx.gate();

        let by_other = gate.delete_task(other.id(), task.id()).await.unwrap();
        assert_eq!(by_other.kind(), Some(DenialKind::Forbidden));

        let by_creator = gate.delete_task(creator.id(), task.id()).await.unwrap();
        assert!(by_creator.is_permitted());
    }

    #[tokio::test]
    async fn test_team_admin_can_delete_any_task_in_team() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let creator = fx.user("bob").await;
        let team = fx.team("Platform", &admin, &[&creator]).await;
        let task = fx.task("Ship it", &team, &creator).await;

        let decision = fx.gate().delete_task(admin.id(), task.id()).await.unwrap();
        assert!(decision.is_permitted());
    }

    #[tokio::test]
    async fn test_task_scope_excludes_foreign_teams() {
        let fx = Fixture::new();
        let user = fx.user("alice").await;
        let stranger = fx.user("bob").await;
        let team_a = fx.team("A", &user, &[]).await;
        let team_b = fx.team("B", &stranger, &[]).await;
        let task_a = fx.task("in A", &team_a, &user).await;
        fx.task("in B", &team_b, &stranger).await;

        let scope = fx
            .gate()
            .list_tasks(user.id())
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert!(scope.contains(team_a.id()));
        assert!(!scope.contains(team_b.id()));

        let tasks = fx.tasks.find_by_team_ids(scope.team_ids()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id(), task_a.id());
    }

    #[tokio::test]
    async fn test_task_scope_empty_for_user_without_teams() {
        let fx = Fixture::new();
        let user = fx.user("alice").await;
        let other = fx.user("bob").await;
        let team = fx.team("B", &other, &[]).await;
        fx.task("in B", &team, &other).await;

        let scope = fx
            .gate()
            .list_tasks(user.id())
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert!(scope.team_ids().is_empty());
        assert!(fx.tasks.find_by_team_ids(scope.team_ids()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let fx = Fixture::new();
        let user = fx.user("alice").await;

        // Oracle is never consulted for a task that does not exist
        let mut oracle = MockMembershipOracle::new();
        oracle.expect_is_member().never();
        oracle.expect_is_admin().never();

        let decision = fx
            .gate_with(Arc::new(oracle))
            .update_task(user.id(), &TaskId::generate())
            .await
            .unwrap();

        assert_eq!(decision.kind(), Some(DenialKind::NotFound));
    }

    #[tokio::test]
    async fn test_update_task_requires_membership() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let outsider = fx.user("bob").await;
        let team = fx.team("Platform", &admin, &[]).await;
        let task = fx.task("Ship it", &team, &admin).await;

        let mut oracle = MockMembershipOracle::new();
        oracle
            .expect_is_member()
            .with(always(), always())
            .returning(|_, _| Ok(false));

        let decision = fx
            .gate_with(Arc::new(oracle))
            .update_task(outsider.id(), task.id())
            .await
            .unwrap();
        assert_eq!(decision.kind(), Some(DenialKind::Forbidden));

        let permitted = fx.gate().update_task(admin.id(), task.id()).await.unwrap();
        assert!(permitted.is_permitted());
    }

    #[tokio::test]
    async fn test_create_task_rules() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let outsider = fx.user("bob").await;
        let team = fx.team("Platform", &admin, &[]).await;
        let gate = fx.gate();

        let no_team = gate.create_task(admin.id(), None, "Title").await.unwrap();
        assert_eq!(no_team.kind(), Some(DenialKind::BadRequest));

        let no_title = gate
            .create_task(admin.id(), Some(team.id()), "   ")
            .await
            .unwrap();
        assert_eq!(no_title.kind(), Some(DenialKind::BadRequest));

        let outsider = gate
            .create_task(outsider.id(), Some(team.id()), "Title")
            .await
            .unwrap();
        assert_eq!(outsider.kind(), Some(DenialKind::Forbidden));

        let missing_team = gate
            .create_task(admin.id(), Some(&TeamId::generate()), "Title")
            .await
            .unwrap();
        assert_eq!(missing_team.kind(), Some(DenialKind::Forbidden));

        let permitted = gate
            .create_task(admin.id(), Some(team.id()), "Title")
            .await
            .unwrap();
        assert_eq!(permitted, Decision::Permitted(team.id().clone()));
    }

    #[tokio::test]
    async fn test_create_team_requires_name() {
        let fx = Fixture::new();
        let user = fx.user("alice").await;
        let gate = fx.gate();

        let blank = gate.create_team(user.id(), "  ").await.unwrap();
        assert_eq!(blank.kind(), Some(DenialKind::BadRequest));

        let ok = gate.create_team(user.id(), " Platform ").await.unwrap();
        assert_eq!(ok, Decision::Permitted("Platform".to_string()));
    }

    #[tokio::test]
    async fn test_oracle_failure_is_not_a_denial() {
        let fx = Fixture::new();
        let admin = fx.user("alice").await;
        let team = fx.team("Platform", &admin, &[]).await;

        let mut oracle = MockMembershipOracle::new();
        oracle
            .expect_is_member()
            .returning(|_, _| Err(DomainError::storage("connection reset")));

        let result = fx
            .gate_with(Arc::new(oracle))
            .create_task(admin.id(), Some(team.id()), "Title")
            .await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
