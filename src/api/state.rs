//! Application state for shared services

use std::sync::Arc;

use crate::domain::task::{TaskId, TaskPatch, TaskQuery, TaskStats};
use crate::domain::team::TeamId;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{IdentityResolver, TokenIssuer};
use crate::infrastructure::task::{CreateTaskRequest, TaskDetails, TaskService};
use crate::infrastructure::team::{CreateTeamRequest, TeamDetails, TeamService};
use crate::infrastructure::user::{PasswordHasher, RegisterRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub task_service: Arc<dyn TaskServiceTrait>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub identity_resolver: Arc<dyn IdentityResolver>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn list_for_user(&self, requester: &UserId) -> Result<Vec<TeamDetails>, DomainError>;
    async fn create(
        &self,
        requester: &UserId,
        request: CreateTeamRequest,
    ) -> Result<TeamDetails, DomainError>;
    async fn add_member(
        &self,
        requester: &UserId,
        team_id: &TeamId,
        email: &str,
    ) -> Result<TeamDetails, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Trait for task service operations
#[async_trait::async_trait]
pub trait TaskServiceTrait: Send + Sync {
    async fn list(&self, requester: &UserId, query: TaskQuery)
        -> Result<Vec<TaskDetails>, DomainError>;
    async fn stats(&self, requester: &UserId) -> Result<TaskStats, DomainError>;
    async fn create(
        &self,
        requester: &UserId,
        request: CreateTaskRequest,
    ) -> Result<TaskDetails, DomainError>;
    async fn update(
        &self,
        requester: &UserId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<TaskDetails, DomainError>;
    async fn delete(&self, requester: &UserId, id: &TaskId) -> Result<TaskId, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }
}

#[async_trait::async_trait]
impl TeamServiceTrait for TeamService {
    async fn list_for_user(&self, requester: &UserId) -> Result<Vec<TeamDetails>, DomainError> {
        TeamService::list_for_user(self, requester).await
    }

    async fn create(
        &self,
        requester: &UserId,
        request: CreateTeamRequest,
    ) -> Result<TeamDetails, DomainError> {
        TeamService::create(self, requester, request).await
    }

    async fn add_member(
        &self,
        requester: &UserId,
        team_id: &TeamId,
        email: &str,
    ) -> Result<TeamDetails, DomainError> {
        TeamService::add_member(self, requester, team_id, email).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        TeamService::ping(self).await
    }
}

#[async_trait::async_trait]
impl TaskServiceTrait for TaskService {
    async fn list(
        &self,
        requester: &UserId,
        query: TaskQuery,
    ) -> Result<Vec<TaskDetails>, DomainError> {
        TaskService::list(self, requester, query).await
    }

    async fn stats(&self, requester: &UserId) -> Result<TaskStats, DomainError> {
        TaskService::stats(self, requester).await
    }

    async fn create(
        &self,
        requester: &UserId,
        request: CreateTaskRequest,
    ) -> Result<TaskDetails, DomainError> {
        TaskService::create(self, requester, request).await
    }

    async fn update(
        &self,
        requester: &UserId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<TaskDetails, DomainError> {
        TaskService::update(self, requester, id, patch).await
    }

    async fn delete(&self, requester: &UserId, id: &TaskId) -> Result<TaskId, DomainError> {
        TaskService::delete(self, requester, id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        team_service: Arc<dyn TeamServiceTrait>,
        task_service: Arc<dyn TaskServiceTrait>,
        token_issuer: Arc<dyn TokenIssuer>,
        identity_resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            user_service,
            team_service,
            task_service,
            token_issuer,
            identity_resolver,
        }
    }
}
