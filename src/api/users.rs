//! User endpoints

use axum::{extract::State, http::StatusCode};
use sqlx::SqlitePool;

use crate::domain::{UserChanges, UserEntity, UserPayload};
use crate::error::{AppError, AppResult};
use crate::store::UserRepository;

use super::extract::{Json, Path};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User {}", id))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users/create/",
    tag = "users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserEntity),
        (status = 400, description = "Invalid payload or email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<SqlitePool>,
    Json(payload): Json<UserPayload>,
) -> AppResult<(StatusCode, Json<UserEntity>)> {
    let new_user = payload.into_new_user()?;
    let user = UserRepository::new(pool).create(&new_user).await?;

    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users/list/",
    tag = "users",
    responses((status = 200, description = "All users", body = [UserEntity]))
)]
pub async fn list_users(State(pool): State<SqlitePool>) -> AppResult<Json<Vec<UserEntity>>> {
    let users = UserRepository::new(pool).list().await?;
    tracing::debug!("Listed {} users", users.len());
    Ok(Json(users))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/detail/{id}/",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserEntity),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserEntity>> {
    UserRepository::new(pool)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Replace every field of a user
#[utoipa::path(
    put,
    path = "/users/detail/{id}/",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserEntity),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> AppResult<Json<UserEntity>> {
    let repo = UserRepository::new(pool);
    if !repo.exists(id).await? {
        return Err(not_found(id));
    }

    let changes: UserChanges = payload.into_new_user()?.into();
    let user = repo.update(id, &changes).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, "User replaced");
    Ok(Json(user))
}

/// Update some fields of a user
#[utoipa::path(
    patch,
    path = "/users/detail/{id}/",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserEntity),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> AppResult<Json<UserEntity>> {
    let repo = UserRepository::new(pool);
    if !repo.exists(id).await? {
        return Err(not_found(id));
    }

    let changes = payload.into_changes()?;
    let user = repo.update(id, &changes).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, "User updated");
    Ok(Json(user))
}

/// Delete a user together with its transactions
#[utoipa::path(
    delete,
    path = "/users/detail/{id}/",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !UserRepository::new(pool).delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
