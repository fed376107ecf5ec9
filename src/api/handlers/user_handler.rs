//! User CRUD handlers.
//!
//! One handler per route. Each parses transport input, invokes the
//! matching repository operation, and shapes the HTTP response.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::{UserId, ValidatedJson};
use crate::domain::{User, UserPayload};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UserRepository;

/// Response for a successful create
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Confirmation message
    #[schema(example = "User created")]
    pub message: String,
    /// The created record, including the store-assigned id
    pub user: User,
}

/// Response carrying a single user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

/// Response carrying every user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// Message-only response (update and delete)
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User updated")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the user router with an injected repository
pub fn user_routes(users: Arc<dyn UserRepository>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(users)
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Malformed payload"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn create_user(
    State(users): State<Arc<dyn UserRepository>>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let user = users.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User created".to_string(),
            user,
        }),
    ))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No user with this id"),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn get_user(
    State(users): State<Arc<dyn UserRepository>>,
    UserId(id): UserId,
) -> AppResult<Json<UserResponse>> {
    let user = users.find_by_id(id).await?.ok_or_not_found()?;

    Ok(Json(UserResponse { user }))
}

/// Overwrite a user record
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "Update applied (or target absent)", body = MessageResponse),
        (status = 400, description = "Malformed id or payload"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn update_user(
    State(users): State<Arc<dyn UserRepository>>,
    UserId(id): UserId,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> AppResult<Json<MessageResponse>> {
    users.update(id, payload).await?;

    // 200 whether or not the target existed; absent ids are a no-op
    Ok(Json(MessageResponse::new("User updated")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Delete applied (idempotent)", body = MessageResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn delete_user(
    State(users): State<Arc<dyn UserRepository>>,
    UserId(id): UserId,
) -> AppResult<Json<MessageResponse>> {
    users.delete(id).await?;

    Ok(Json(MessageResponse::new("User deleted")))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user record", body = UserListResponse),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn list_users(
    State(users): State<Arc<dyn UserRepository>>,
) -> AppResult<Json<UserListResponse>> {
    let users = users.list().await?;

    Ok(Json(UserListResponse { users }))
}
