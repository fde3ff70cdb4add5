//! User aggregate and request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::UserResult;
use crate::values::{UserEmail, UserId, UserLastName, UserName, UserState};

/// The flat, primitive-only projection of a [`User`].
///
/// This is the only representation crossing into persistence and HTTP
/// responses. `User::from_primitives` / `User::to_primitives` round-trip
/// all seven fields losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPrimitives {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional replacements applied by [`User::update`].
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<UserName>,
    pub last_name: Option<UserLastName>,
    pub email: Option<UserEmail>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

/// User aggregate.
///
/// Immutable: every operation that changes a field returns a new instance
/// with `updated_at` refreshed; the receiver is never mutated. Identity
/// equality is defined solely by the id.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    name: UserName,
    last_name: UserLastName,
    email: UserEmail,
    state: UserState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl User {
    /// Create a new user: state `Active`, both timestamps set to now.
    ///
    /// Inputs are already-validated value objects, so there is no error path
    /// here; invalid raw input fails earlier, at value-object construction.
    pub fn create(id: UserId, name: UserName, last_name: UserLastName, email: UserEmail) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            last_name,
            email,
            state: UserState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a user from its persisted projection, re-validating every
    /// field on the way in.
    pub fn from_primitives(primitives: UserPrimitives) -> UserResult<Self> {
        Ok(Self {
            id: UserId::new(primitives.id)?,
            name: UserName::new(&primitives.name)?,
            last_name: UserLastName::new(&primitives.last_name)?,
            email: UserEmail::new(&primitives.email)?,
            state: UserState::parse(&primitives.state)?,
            created_at: primitives.created_at,
            updated_at: primitives.updated_at,
        })
    }

    /// Project the aggregate to its flat 7-field record.
    pub fn to_primitives(&self) -> UserPrimitives {
        UserPrimitives {
            id: self.id.as_str().to_string(),
            name: self.name.as_str().to_string(),
            last_name: self.last_name.as_str().to_string(),
            email: self.email.as_str().to_string(),
            state: self.state.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Return a new aggregate with the supplied fields replaced and
    /// `updated_at` refreshed. Unsupplied fields are carried over.
    pub fn update(&self, changes: UserUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            last_name: changes.last_name.unwrap_or_else(|| self.last_name.clone()),
            email: changes.email.unwrap_or_else(|| self.email.clone()),
            state: self.state,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn update_name(&self, name: UserName) -> Self {
        self.update(UserUpdate {
            name: Some(name),
            ..Default::default()
        })
    }

    pub fn update_last_name(&self, last_name: UserLastName) -> Self {
        self.update(UserUpdate {
            last_name: Some(last_name),
            ..Default::default()
        })
    }

    pub fn update_email(&self, email: UserEmail) -> Self {
        self.update(UserUpdate {
            email: Some(email),
            ..Default::default()
        })
    }

    /// Return a new aggregate in `new_state` with `updated_at` refreshed.
    ///
    /// No transitions are forbidden at this layer; the repository is
    /// responsible for hiding `Deleted` users from queries.
    pub fn change_state(&self, new_state: UserState) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            state: new_state,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn suspend(&self) -> Self {
        self.change_state(UserState::Suspended)
    }

    pub fn activate(&self) -> Self {
        self.change_state(UserState::Active)
    }

    /// Soft delete: the record survives, marked `Deleted`.
    pub fn delete(&self) -> Self {
        self.change_state(UserState::Deleted)
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn last_name(&self) -> &UserLastName {
        &self.last_name
    }

    pub fn email(&self) -> &UserEmail {
        &self.email
    }

    pub fn state(&self) -> UserState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub last_name: String,
    pub email: String,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Listing response: all non-deleted users plus their count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserPrimitives>,
    pub total: usize,
}

/// Acknowledgment returned by the delete use case
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User::create(
            UserId::new("user-1").unwrap(),
            UserName::new("Juan").unwrap(),
            UserLastName::new("Pérez").unwrap(),
            UserEmail::new("juan.perez@example.com").unwrap(),
        )
    }

    fn sample_primitives() -> UserPrimitives {
        UserPrimitives {
            id: "user-1".to_string(),
            name: "Juan".to_string(),
            last_name: "Pérez".to_string(),
            email: "juan.perez@example.com".to_string(),
            state: "Active".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 16, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_create_sets_active_state_and_equal_timestamps() {
        let user = sample_user();
        assert_eq!(user.state(), UserState::Active);
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_primitives_round_trip_is_lossless() {
        let primitives = sample_primitives();
        let user = User::from_primitives(primitives.clone()).unwrap();
        assert_eq!(user.to_primitives(), primitives);
    }

    #[test]
    fn test_from_primitives_rejects_invalid_state() {
        let mut primitives = sample_primitives();
        primitives.state = "Archived".to_string();
        assert!(matches!(
            User::from_primitives(primitives),
            Err(crate::error::UserError::InvalidState(_))
        ));
    }

    #[test]
    fn test_update_replaces_supplied_fields_only() {
        let user = sample_user();
        let updated = user.update_name(UserName::new("Pedro").unwrap());

        assert_eq!(updated.name().as_str(), "Pedro");
        assert_eq!(updated.last_name(), user.last_name());
        assert_eq!(updated.email(), user.email());
        assert_eq!(updated.created_at(), user.created_at());
        assert!(updated.updated_at() >= user.updated_at());
        // The original aggregate is untouched
        assert_eq!(user.name().as_str(), "Juan");
    }

    #[test]
    fn test_state_transitions_refresh_updated_at_only() {
        let user = sample_user();
        let deleted = user.delete();
        assert!(deleted.state().is_deleted());
        assert_eq!(deleted.created_at(), user.created_at());
        assert_eq!(deleted.email(), user.email());

        let reactivated = deleted.activate();
        assert!(reactivated.state().is_active());

        let suspended = reactivated.suspend();
        assert!(suspended.state().is_suspended());
    }

    #[test]
    fn test_identity_equality_by_id_only() {
        let a = sample_user();
        let b = a.update_name(UserName::new("Pedro").unwrap());
        assert_eq!(a, b); // same id, different content

        let other = User::create(
            UserId::new("user-2").unwrap(),
            UserName::new("Juan").unwrap(),
            UserLastName::new("Pérez").unwrap(),
            UserEmail::new("juan.perez@example.com").unwrap(),
        );
        assert_ne!(a, other); // same content, different id
    }

    #[test]
    fn test_primitives_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(sample_primitives()).unwrap();
        assert!(json.get("lastName").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("last_name").is_none());
    }
}
