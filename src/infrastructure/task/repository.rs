//! Storage-backed task repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::task::{Task, TaskId, TaskPatch, TaskRepository, TEAM_FIELD};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Storage-backed implementation of TaskRepository
#[derive(Debug)]
pub struct StorageTaskRepository {
    storage: Arc<dyn Storage<Task>>,
}

impl StorageTaskRepository {
    pub fn new(storage: Arc<dyn Storage<Task>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TaskRepository for StorageTaskRepository {
    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DomainError> {
        self.storage.get(id).await
    }

    async fn find_by_team_ids(&self, teams: &[TeamId]) -> Result<Vec<Task>, DomainError> {
        if teams.is_empty() {
            return Ok(Vec::new());
        }

        let filter = DocumentFilter::one_of(TEAM_FIELD, teams.iter().map(|t| t.as_str().to_string()));
        self.storage.find(&filter).await
    }

    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        self.storage.create(task).await
    }

    async fn modify(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>, DomainError> {
        self.storage
            .modify(
                id,
                Box::new(move |task: &mut Task| {
                    task.apply(patch)
                        .map_err(|e| DomainError::validation(e.to_string()))
                }),
            )
            .await
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskStatus;
    use crate::domain::user::UserId;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_repo() -> StorageTaskRepository {
        StorageTaskRepository::new(Arc::new(InMemoryStorage::<Task>::new()))
    }

    fn task(title: &str, team: &TeamId) -> Task {
        Task::new(title, team.clone(), UserId::generate()).unwrap()
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let repo = create_repo();
        let created = repo.create(task("Ship", &TeamId::generate())).await.unwrap();

        assert_eq!(repo.get(created.id()).await.unwrap().unwrap().title(), "Ship");
        assert!(repo.delete(created.id()).await.unwrap());
        assert!(repo.get(created.id()).await.unwrap().is_none());
        assert!(!repo.delete(created.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_team_ids() {
        let repo = create_repo();
        let a = TeamId::generate();
        let b = TeamId::generate();
        let c = TeamId::generate();

        repo.create(task("a1", &a)).await.unwrap();
        repo.create(task("a2", &a)).await.unwrap();
        repo.create(task("b1", &b)).await.unwrap();
        repo.create(task("c1", &c)).await.unwrap();

        let mut found = repo.find_by_team_ids(&[a, b]).await.unwrap();
        found.sort_by(|x, y| x.title().cmp(y.title()));
        let titles: Vec<_> = found.iter().map(|t| t.title()).collect();

        assert_eq!(titles, ["a1", "a2", "b1"]);
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_find_by_no_teams_is_empty() {
        let repo = create_repo();
        repo.create(task("a1", &TeamId::generate())).await.unwrap();

        assert!(repo.find_by_team_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_patches_stored_document() {
        let repo = create_repo();
        let created = repo.create(task("orig", &TeamId::generate())).await.unwrap();
        let assignee = UserId::generate();

        // Two patches built from the same stale read touch different fields
        repo.modify(
            created.id(),
            TaskPatch {
                assignee: Some(Some(assignee.clone())),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
        let stored = repo
            .modify(
                created.id(),
                TaskPatch {
                    title: Some("renamed".to_string()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored.title(), "renamed");
        assert_eq!(stored.assignee(), Some(&assignee));
        let reloaded = repo.get(created.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.title(), "renamed");
        assert_eq!(reloaded.assignee(), Some(&assignee));
    }

    #[tokio::test]
    async fn test_modify_invalid_patch_leaves_document() {
        let repo = create_repo();
        let created = repo.create(task("orig", &TeamId::generate())).await.unwrap();

        let result = repo
            .modify(
                created.id(),
                TaskPatch {
                    title: Some("   ".to_string()),
                    status: Some(TaskStatus::Done),
                    ..TaskPatch::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        let stored = repo.get(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.title(), "orig");
        assert_eq!(stored.status(), TaskStatus::Backlog);
    }

    #[tokio::test]
    async fn test_modify_missing_task() {
        let repo = create_repo();
        let result = repo.modify(&TaskId::generate(), TaskPatch::default()).await;
        assert!(result.unwrap().is_none());
    }
}
