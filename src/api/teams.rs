//! Team endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::TeamId;
use crate::domain::user::UserSummary;
use crate::infrastructure::team::{CreateTeamRequest, TeamDetails};

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/{team_id}/members", post(add_member))
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberBody {
    pub email: String,
}

/// A team with admin and members populated
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub admin: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamDetails> for TeamResponse {
    fn from(details: TeamDetails) -> Self {
        let team = details.team;

        Self {
            id: team.id().clone(),
            name: team.name().to_string(),
            description: team.description().map(str::to_string),
            admin: details.admin,
            members: details.members,
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

fn parse_team_id(raw: &str) -> Result<TeamId, ApiError> {
    TeamId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()).with_param("team_id"))
}

/// GET /api/teams
async fn list_teams(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.team_service.list_for_user(user.id()).await?;

    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

/// POST /api/teams
async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateTeamBody>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let details = state
        .team_service
        .create(
            user.id(),
            CreateTeamRequest {
                name: body.name,
                description: body.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(details))))
}

/// POST /api/teams/{team_id}/members
async fn add_member(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
    Json(body): Json<AddMemberBody>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let details = state
        .team_service
        .add_member(user.id(), &team_id, &body.email)
        .await?;

    Ok(Json(TeamResponse::from(details)))
}
