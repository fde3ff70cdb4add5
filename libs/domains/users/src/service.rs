use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, User, UserListResponse,
    UserPrimitives, UserUpdate,
};
use crate::repository::UserRepository;
use crate::values::{UserEmail, UserId, UserLastName, UserName};

/// Service layer for User business logic.
///
/// Each method is one use case. Raw request strings are parsed into value
/// objects up front, so all validation failures surface before any
/// repository call.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with a generated ID.
    ///
    /// Fails with [`UserError::EmailAlreadyExists`] when a non-deleted user
    /// already holds the (normalized) email. A soft-deleted user's email is
    /// free to reuse.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserRequest) -> UserResult<UserPrimitives> {
        let name = UserName::new(&input.name)?;
        let last_name = UserLastName::new(&input.last_name)?;
        let email = UserEmail::new(&input.email)?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
        }

        let user = User::create(UserId::generate(), name, last_name, email);
        self.repository.save(&user).await?;

        tracing::info!(user_id = %user.id(), "Created user");
        Ok(user.to_primitives())
    }

    /// Get a single non-deleted user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<UserPrimitives> {
        let user_id = UserId::new(id)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        Ok(user.to_primitives())
    }

    /// List all non-deleted users with their count
    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> UserResult<UserListResponse> {
        let users = self.repository.find_all().await?;
        let total = users.len();
        let users = users.iter().map(User::to_primitives).collect();

        Ok(UserListResponse { users, total })
    }

    /// Update the supplied fields of an existing user.
    ///
    /// Omitted fields are left untouched. Changing the email to one held by
    /// another non-deleted user is a conflict; re-submitting the user's own
    /// email is not.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: &str,
        input: UpdateUserRequest,
    ) -> UserResult<UserPrimitives> {
        let user_id = UserId::new(id)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        let changes = UserUpdate {
            name: input.name.as_deref().map(UserName::new).transpose()?,
            last_name: input
                .last_name
                .as_deref()
                .map(UserLastName::new)
                .transpose()?,
            email: input.email.as_deref().map(UserEmail::new).transpose()?,
        };

        if let Some(ref new_email) = changes.email {
            if new_email != user.email() {
                if let Some(holder) = self.repository.find_by_email(new_email).await? {
                    if holder.id() != user.id() {
                        return Err(UserError::EmailAlreadyExists(
                            new_email.as_str().to_string(),
                        ));
                    }
                }
            }
        }

        // A request with no fields set re-persists the user as-is, without
        // refreshing updated_at.
        let updated = if changes.is_empty() {
            user
        } else {
            user.update(changes)
        };
        self.repository.update(&updated).await?;

        tracing::info!(user_id = %updated.id(), "Updated user");
        Ok(updated.to_primitives())
    }

    /// Soft-delete a user: the record is kept, marked `Deleted`, and stops
    /// appearing in any finder.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<DeleteUserResponse> {
        let user_id = UserId::new(id)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        let deleted = user.delete();
        self.repository.update(&deleted).await?;

        tracing::info!(user_id = %deleted.id(), "Deleted user");
        Ok(DeleteUserResponse {
            id: deleted.id().as_str().to_string(),
            message: "User deleted successfully".to_string(),
        })
    }
}
