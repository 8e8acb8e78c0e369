//! Resolves user references to public summaries

use std::collections::HashMap;

use crate::domain::user::{UserId, UserRepository, UserSummary};
use crate::domain::DomainError;

/// Summaries for every known user among `ids`, fetched in one query
pub async fn load_summaries(
    users: &dyn UserRepository,
    ids: &[UserId],
) -> Result<HashMap<UserId, UserSummary>, DomainError> {
    let mut wanted = ids.to_vec();
    wanted.sort();
    wanted.dedup();

    let found = users.get_many(&wanted).await?;

    Ok(found
        .into_iter()
        .map(|user| (user.id().clone(), user.summary()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{PasswordHash, User};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::user::StorageUserRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_summaries() {
        let repo = StorageUserRepository::new(Arc::new(InMemoryStorage::<User>::new()));
        let alice = repo
            .create(User::new("alice", "alice@example.com", PasswordHash::new("h")).unwrap())
            .await
            .unwrap();
        let unknown = UserId::generate();

        let summaries = load_summaries(
            &repo,
            &[alice.id().clone(), alice.id().clone(), unknown.clone()],
        )
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[alice.id()].username, "alice");
        assert!(!summaries.contains_key(&unknown));
    }
}
