//! Users Domain
//!
//! This module provides a complete domain implementation for user management
//! with soft deletion and MongoDB persistence.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Use cases: create / get / get-all / update / delete
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and MongoDB impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User aggregate, value objects, DTOs
//! └─────────────┘
//! ```
//!
//! Validation lives in the value objects ([`values`]): a `UserName`,
//! `UserEmail`, etc. can only be obtained through its fallible constructor,
//! so any instance that exists already satisfies its invariant. The `User`
//! aggregate is immutable; every mutation returns a new instance.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! // Create repository and service
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod values;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, User, UserListResponse,
    UserPrimitives, UserUpdate,
};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use values::{UserEmail, UserId, UserLastName, UserName, UserState};
