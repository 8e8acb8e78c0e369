//! Task endpoints

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::task::{
    TaskId, TaskPatch, TaskPriority, TaskQuery, TaskStats, TaskStatus, TaskValidationError,
};
use crate::domain::team::TeamId;
use crate::domain::user::{UserId, UserSummary};
use crate::infrastructure::task::{CreateTaskRequest, TaskDetails};

pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/stats", get(task_stats))
        .route("/{id}", axum::routing::put(update_task).delete(delete_task))
}

/// Query string of `GET /api/tasks`; every value is parsed strictly
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub team: Option<String>,
    pub assignee: Option<String>,
    pub due: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl TaskListParams {
    fn into_query(self) -> Result<TaskQuery, ApiError> {
        Ok(TaskQuery {
            status: parse_param(self.status.as_deref())?,
            priority: parse_param(self.priority.as_deref())?,
            team: non_empty(self.team.as_deref()).map(parse_team).transpose()?,
            assignee: parse_param(self.assignee.as_deref())?,
            due: parse_param(self.due.as_deref())?,
            search: non_empty(self.search.as_deref()).map(str::to_string),
            sort: parse_param(self.sort.as_deref())?.unwrap_or_default(),
            order: parse_param(self.order.as_deref())?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    #[serde(default)]
    pub title: String,
    pub team: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub assignee: Option<String>,
}

/// Body of `PUT /api/tasks/{id}`
///
/// A present `null` clears the field; an absent field is left alone.
/// `team` and `created_by` are not accepted and are ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub assignee: Option<Option<String>>,
}

impl UpdateTaskBody {
    fn into_patch(self) -> Result<TaskPatch, ApiError> {
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self
                .due_date
                .map(|value| parse_due_date(value.as_deref()))
                .transpose()?,
            assignee: self
                .assignee
                .map(|value| parse_assignee(value.as_deref()))
                .transpose()?,
        })
    }
}

/// Distinguishes an explicit `null` from an absent field
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct TeamRefResponse {
    pub id: TeamId,
    pub name: String,
}

/// A task with team, assignee and creator populated
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee: Option<UserSummary>,
    pub team: Option<TeamRefResponse>,
    pub created_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskDetails> for TaskResponse {
    fn from(details: TaskDetails) -> Self {
        let task = details.task;

        Self {
            id: task.id().clone(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            status: task.status(),
            priority: task.priority(),
            due_date: task.due_date(),
            assignee: details.assignee,
            team: details.team.map(|team| TeamRefResponse {
                id: team.id,
                name: team.name,
            }),
            created_by: details.created_by,
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: &'static str,
    pub id: TaskId,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = TaskValidationError>,
{
    non_empty(value)
        .map(T::from_str)
        .transpose()
        .map_err(validation_error)
}

fn validation_error(err: TaskValidationError) -> ApiError {
    let param = match &err {
        TaskValidationError::InvalidQuery { param, .. } => Some(*param),
        TaskValidationError::InvalidStatus(_) => Some("status"),
        TaskValidationError::InvalidPriority(_) => Some("priority"),
        _ => None,
    };

    let api_err = ApiError::bad_request(err.to_string());
    match param {
        Some(param) => api_err.with_param(param),
        None => api_err,
    }
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC); blank clears
fn parse_due_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Invalid due date: '{}'", raw)).with_param("due_date")
        })
}

/// A user id; blank means unassigned
fn parse_assignee(value: Option<&str>) -> Result<Option<UserId>, ApiError> {
    non_empty(value)
        .map(|raw| {
            UserId::new(raw)
                .map_err(|e| ApiError::bad_request(e.to_string()).with_param("assignee"))
        })
        .transpose()
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()).with_param("id"))
}

fn parse_team(raw: &str) -> Result<TeamId, ApiError> {
    TeamId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()).with_param("team"))
}

/// GET /api/tasks
async fn list_tasks(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<TaskListParams>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let query = params.into_query()?;
    let tasks = state.task_service.list(user.id(), query).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/tasks/stats
async fn task_stats(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<TaskStats>, ApiError> {
    Ok(Json(state.task_service.stats(user.id()).await?))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let request = CreateTaskRequest {
        title: body.title,
        team: non_empty(body.team.as_deref()).map(parse_team).transpose()?,
        description: body.description,
        status: body.status,
        priority: body.priority,
        due_date: parse_due_date(body.due_date.as_deref())?,
        assignee: parse_assignee(body.assignee.as_deref())?,
    };

    let details = state.task_service.create(user.id(), request).await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(details))))
}

/// PUT /api/tasks/{id}
async fn update_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&id)?;
    let details = state
        .task_service
        .update(user.id(), &id, body.into_patch()?)
        .await?;

    Ok(Json(TaskResponse::from(details)))
}

/// DELETE /api/tasks/{id}
async fn delete_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    let id = parse_task_id(&id)?;
    let id = state.task_service.delete(user.id(), &id).await?;

    Ok(Json(DeleteTaskResponse {
        message: "Task removed",
        id,
    }))
}
