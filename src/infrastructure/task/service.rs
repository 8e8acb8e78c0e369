//! Task service: scoped listing, stats and the task lifecycle

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::access::AuthorizationGate;
use crate::domain::task::{
    Task, TaskId, TaskPatch, TaskPriority, TaskQuery, TaskRepository, TaskStats, TaskStatus,
};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::{UserId, UserRepository, UserSummary};
use crate::domain::DomainError;
use crate::infrastructure::user::load_summaries;

/// Request for creating a task
#[derive(Debug, Clone, Default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub team: Option<TeamId>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee: Option<UserId>,
}

/// The `{id, name}` view of a task's team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
}

/// A task with its user and team references resolved
#[derive(Debug, Clone)]
pub struct TaskDetails {
    pub task: Task,
    pub team: Option<TeamRef>,
    pub assignee: Option<UserSummary>,
    pub created_by: Option<UserSummary>,
}

/// Task service
#[derive(Debug)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    gate: AuthorizationGate,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            tasks,
            teams,
            users,
            gate,
        }
    }

    /// Tasks of the requester's teams, filtered and sorted by `query`
    pub async fn list(
        &self,
        requester: &UserId,
        query: TaskQuery,
    ) -> Result<Vec<TaskDetails>, DomainError> {
        let tasks = self.scoped_tasks(requester, query.team.as_ref()).await?;
        let tasks = query.apply(tasks, requester, Utc::now());

        debug!(user_id = %requester, count = tasks.len(), "Listed tasks");
        self.details(tasks).await
    }

    /// Dashboard counters over the requester's tasks
    pub async fn stats(&self, requester: &UserId) -> Result<TaskStats, DomainError> {
        let tasks = self.scoped_tasks(requester, None).await?;
        Ok(TaskStats::compute(&tasks, requester, Utc::now()))
    }

    pub async fn create(
        &self,
        requester: &UserId,
        request: CreateTaskRequest,
    ) -> Result<TaskDetails, DomainError> {
        let team = self
            .gate
            .create_task(requester, request.team.as_ref(), &request.title)
            .await?
            .into_result()?;

        if let Some(ref assignee) = request.assignee {
            self.ensure_user_exists(assignee).await?;
        }

        let task = Task::new(&request.title, team, requester.clone())
            .and_then(|task| task.with_description(request.description))
            .map_err(|e| DomainError::validation(e.to_string()))?
            .with_status(request.status.unwrap_or_default())
            .with_priority(request.priority.unwrap_or_default())
            .with_due_date(request.due_date)
            .with_assignee(request.assignee);

        let task = self.tasks.create(task).await?;
        info!(task_id = %task.id(), team_id = %task.team(), created_by = %requester, "Created task");

        self.detail(task).await
    }

    /// Apply `patch` to a task of one of the requester's teams
    pub async fn update(
        &self,
        requester: &UserId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<TaskDetails, DomainError> {
        self.gate.update_task(requester, id).await?.into_result()?;

        if let Some(Some(ref assignee)) = patch.assignee {
            self.ensure_user_exists(assignee).await?;
        }

        let task = self
            .tasks
            .modify(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("Task not found"))?;
        info!(task_id = %task.id(), updated_by = %requester, "Updated task");

        self.detail(task).await
    }

    /// Delete a task; only its creator or the team administrator may
    pub async fn delete(&self, requester: &UserId, id: &TaskId) -> Result<TaskId, DomainError> {
        let task = self.gate.delete_task(requester, id).await?.into_result()?;

        if !self.tasks.delete(task.id()).await? {
            return Err(DomainError::not_found("Task not found"));
        }

        info!(task_id = %task.id(), deleted_by = %requester, "Deleted task");
        Ok(task.id().clone())
    }

    /// Tasks inside the requester's scope, optionally narrowed to one team
    ///
    /// A team outside the scope yields nothing.
    async fn scoped_tasks(
        &self,
        requester: &UserId,
        team: Option<&TeamId>,
    ) -> Result<Vec<Task>, DomainError> {
        let scope = self.gate.list_tasks(requester).await?.into_result()?;

        match team {
            Some(team) if !scope.contains(team) => Ok(Vec::new()),
            Some(team) => self.tasks.find_by_team_ids(std::slice::from_ref(team)).await,
            None => self.tasks.find_by_team_ids(scope.team_ids()).await,
        }
    }

    async fn ensure_user_exists(&self, id: &UserId) -> Result<(), DomainError> {
        match self.users.get(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation("Assignee is not a registered user")),
        }
    }

    async fn detail(&self, task: Task) -> Result<TaskDetails, DomainError> {
        let mut details = self.details(vec![task]).await?;
        details
            .pop()
            .ok_or_else(|| DomainError::internal("Task details missing"))
    }

    async fn details(&self, tasks: Vec<Task>) -> Result<Vec<TaskDetails>, DomainError> {
        let user_ids: Vec<UserId> = tasks
            .iter()
            .flat_map(|task| task.assignee().into_iter().chain(Some(task.created_by())))
            .cloned()
            .collect();
        let users = load_summaries(self.users.as_ref(), &user_ids).await?;

        let mut teams: HashMap<TeamId, TeamRef> = HashMap::new();
        for task in &tasks {
            if teams.contains_key(task.team()) {
                continue;
            }
            if let Some(team) = self.teams.get(task.team()).await? {
                teams.insert(
                    team.id().clone(),
                    TeamRef {
                        id: team.id().clone(),
                        name: team.name().to_string(),
                    },
                );
            }
        }

        Ok(tasks
            .into_iter()
            .map(|task| TaskDetails {
                team: teams.get(task.team()).cloned(),
                assignee: task.assignee().and_then(|id| users.get(id).cloned()),
                created_by: users.get(task.created_by()).cloned(),
                task,
            })
            .collect())
    }
}
