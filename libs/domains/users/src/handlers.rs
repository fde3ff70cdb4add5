//! HTTP handlers for the Users API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, UserListResponse, UserPrimitives,
};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::values::UserState;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(
            UserPrimitives, CreateUserRequest, UpdateUserRequest,
            UserListResponse, DeleteUserResponse, UserState
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All non-deleted users with their count", body = UserListResponse),
        (status = 500, description = "Storage failure")
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<UserListResponse>> {
    let listing = service.get_all_users().await?;
    Ok(Json(listing))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserPrimitives),
        (status = 400, description = "Invalid name, last name or email"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Storage failure")
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<CreateUserRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserPrimitives),
        (status = 404, description = "No non-deleted user with this ID"),
        (status = 500, description = "Storage failure")
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<UserPrimitives>> {
    let user = service.get_user(&id).await?;
    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserPrimitives),
        (status = 400, description = "Invalid supplied field"),
        (status = 404, description = "No non-deleted user with this ID"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Storage failure")
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRequest>,
) -> UserResult<Json<UserPrimitives>> {
    let user = service.update_user(&id, input).await?;
    Ok(Json(user))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = DeleteUserResponse),
        (status = 404, description = "No non-deleted user with this ID"),
        (status = 500, description = "Storage failure")
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<DeleteUserResponse>> {
    let ack = service.delete_user(&id).await?;
    Ok(Json(ack))
}
