use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::values::{UserEmail, UserId};

/// Repository trait for User persistence.
///
/// Deletion is soft everywhere: finders never return users in the `Deleted`
/// state, and `update` is how a deletion is persisted (the aggregate carries
/// the new state). Implementations store the full primitive projection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn save(&self, user: &User) -> UserResult<()>;

    /// Find a non-deleted user by ID
    async fn find_by_id(&self, id: &UserId) -> UserResult<Option<User>>;

    /// Find a non-deleted user by (normalized) email
    async fn find_by_email(&self, email: &UserEmail) -> UserResult<Option<User>>;

    /// List all non-deleted users
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Replace the stored record for an existing user
    async fn update(&self, user: &User) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records, deleted ones included.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> UserResult<()> {
        let mut users = self.users.write().await;
        users.insert(user.id().as_str().to_string(), user.clone());

        tracing::debug!(user_id = %user.id(), "Saved user");
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .get(id.as_str())
            .filter(|u| !u.state().is_deleted())
            .cloned();
        Ok(user)
    }

    async fn find_by_email(&self, email: &UserEmail) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email() == email && !u.state().is_deleted())
            .cloned();
        Ok(user)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| !u.state().is_deleted())
            .cloned()
            .collect();

        // Stable listing order: newest first
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }

    async fn update(&self, user: &User) -> UserResult<()> {
        let mut users = self.users.write().await;

        if !users.contains_key(user.id().as_str()) {
            return Err(UserError::NotFound(user.id().as_str().to_string()));
        }

        users.insert(user.id().as_str().to_string(), user.clone());

        tracing::debug!(user_id = %user.id(), "Updated user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{UserLastName, UserName};

    fn make_user(id: &str, email: &str) -> User {
        User::create(
            UserId::new(id).unwrap(),
            UserName::new("Test").unwrap(),
            UserLastName::new("User").unwrap(),
            UserEmail::new(email).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryUserRepository::new();
        let user = make_user("u1", "test@example.com");

        repo.save(&user).await.unwrap();

        let fetched = repo.find_by_id(user.id()).await.unwrap();
        assert_eq!(fetched, Some(user));
    }

    #[tokio::test]
    async fn test_find_by_email_matches_normalized_form() {
        let repo = InMemoryUserRepository::new();
        repo.save(&make_user("u1", "test@example.com")).await.unwrap();

        let query = UserEmail::new("TEST@EXAMPLE.COM").unwrap();
        let fetched = repo.find_by_email(&query).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_finders_hide_deleted_users() {
        let repo = InMemoryUserRepository::new();
        let user = make_user("u1", "test@example.com");
        repo.save(&user).await.unwrap();

        repo.update(&user.delete()).await.unwrap();

        assert!(repo.find_by_id(user.id()).await.unwrap().is_none());
        assert!(repo.find_by_email(user.email()).await.unwrap().is_none());
        assert!(repo.find_all().await.unwrap().is_empty());
        // But the record itself survives
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_user_fails() {
        let repo = InMemoryUserRepository::new();
        let user = make_user("ghost", "ghost@example.com");

        let result = repo.update(&user).await;
        assert_eq!(result, Err(UserError::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_find_all_lists_only_live_users() {
        let repo = InMemoryUserRepository::new();
        let a = make_user("a", "a@example.com");
        let b = make_user("b", "b@example.com");
        let c = make_user("c", "c@example.com");
        for user in [&a, &b, &c] {
            repo.save(user).await.unwrap();
        }
        repo.update(&b.delete()).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|u| !u.state().is_deleted()));
    }
}
