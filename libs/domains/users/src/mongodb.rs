//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserPrimitives};
use crate::repository::UserRepository;
use crate::values::{UserEmail, UserId, UserState};

/// Persisted shape of a user. The domain id doubles as the document `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    last_name: String,
    email: String,
    state: String,
    created_at: mongodb::bson::DateTime,
    updated_at: mongodb::bson::DateTime,
}

impl From<UserPrimitives> for UserDocument {
    fn from(p: UserPrimitives) -> Self {
        Self {
            id: p.id,
            name: p.name,
            last_name: p.last_name,
            email: p.email,
            state: p.state,
            created_at: mongodb::bson::DateTime::from_chrono(p.created_at),
            updated_at: mongodb::bson::DateTime::from_chrono(p.updated_at),
        }
    }
}

impl UserDocument {
    fn into_user(self) -> UserResult<User> {
        User::from_primitives(UserPrimitives {
            id: self.id,
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            state: self.state,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<UserDocument>("users");
        Self { collection }
    }

    /// Create a new MongoUserRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { collection }
    }

    /// Initialize indexes for optimal query performance.
    ///
    /// The email index is a plain lookup index, not unique: soft-deleted
    /// users keep their document, and a unique index would reserve their
    /// email forever. Uniqueness among live users is enforced in the
    /// service layer.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1, "state": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_email_state".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "state": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_state_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    /// Filter clause excluding soft-deleted documents
    fn not_deleted() -> Document {
        doc! { "state": { "$ne": UserState::Deleted.to_string() } }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn save(&self, user: &User) -> UserResult<()> {
        let document = UserDocument::from(user.to_primitives());
        self.collection.insert_one(&document).await?;

        tracing::info!(user_id = %user.id(), "User saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &UserId) -> UserResult<Option<User>> {
        let mut filter = doc! { "_id": id.as_str() };
        filter.extend(Self::not_deleted());

        let document = self.collection.find_one(filter).await?;
        document.map(UserDocument::into_user).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &UserEmail) -> UserResult<Option<User>> {
        let mut filter = doc! { "email": email.as_str() };
        filter.extend(Self::not_deleted());

        let document = self.collection.find_one(filter).await?;
        document.map(UserDocument::into_user).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::not_deleted())
            .with_options(options)
            .await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(UserDocument::into_user)
            .collect()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn update(&self, user: &User) -> UserResult<()> {
        let filter = doc! { "_id": user.id().as_str() };
        let document = UserDocument::from(user.to_primitives());

        let result = self.collection.replace_one(filter, &document).await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id().as_str().to_string()));
        }

        tracing::info!(user_id = %user.id(), "User updated");
        Ok(())
    }
}
