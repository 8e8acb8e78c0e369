//! TaskFlow API
//!
//! Team and task management where every read and write is scoped by team
//! membership:
//! - Users register and authenticate with JWT bearer tokens
//! - Teams have one administrator who is always a member
//! - Tasks belong to a team and are visible to its members only

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::StorageSettings;
use domain::access::{AuthorizationGate, TeamMembershipOracle};
use domain::task::{Task, TaskRepository};
use domain::team::{Team, TeamRepository};
use domain::user::User;
use domain::DomainError;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    storage::{PostgresConfig, StorageConfig, StorageFactory, StorageType},
    task::{StorageTaskRepository, TaskService},
    team::{StorageTeamRepository, TeamService},
    user::{Argon2Hasher, StorageUserRepository, UserService},
};
use tracing::{info, warn};

/// Create the application state with default configuration (in-memory storage)
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let factory = StorageFactory::connect(&storage_config(&config.storage)?).await?;
    info!(storage = ?factory.storage_type(), "Storage initialized");

    let users = Arc::new(StorageUserRepository::new(
        factory.create::<User>("users").await?,
    ));
    let teams: Arc<dyn TeamRepository> = Arc::new(StorageTeamRepository::new(
        factory.create::<Team>("teams").await?,
    ));
    let tasks: Arc<dyn TaskRepository> = Arc::new(StorageTaskRepository::new(
        factory.create::<Task>("tasks").await?,
    ));

    let gate = AuthorizationGate::new(
        Arc::new(TeamMembershipOracle::new(teams.clone())),
        users.clone(),
        teams.clone(),
        tasks.clone(),
    );

    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(Argon2Hasher::new())));
    let team_service = Arc::new(TeamService::new(teams.clone(), users.clone(), gate.clone()));
    let task_service = Arc::new(TaskService::new(tasks, teams, users, gate));

    if config.auth.jwt_secret == JwtConfig::default().secret {
        warn!("Using the default JWT secret; set APP__AUTH__JWT_SECRET in production");
    }
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    )));

    Ok(AppState::new(
        user_service,
        team_service,
        task_service,
        jwt_service.clone(),
        jwt_service,
    ))
}

fn storage_config(settings: &StorageSettings) -> Result<StorageConfig, DomainError> {
    let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
        DomainError::configuration(format!("Unknown storage backend '{}'", settings.backend))
    })?;

    match storage_type {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => {
            let url = settings.database_url.as_deref().ok_or_else(|| {
                DomainError::configuration(
                    "PostgreSQL storage requires APP__STORAGE__DATABASE_URL or DATABASE_URL",
                )
            })?;

            Ok(StorageConfig::postgres(
                PostgresConfig::new(url).with_max_connections(settings.max_connections),
            ))
        }
    }
}
