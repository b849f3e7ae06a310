use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo_types::User,
    services::{self, not_found},
};
use crate::{error::AppError, state::AppState, validation::parse_id};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(payload) = payload?;
    let user = services::create_user(state.users.as_ref(), &state.hasher, payload).await?;
    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list().await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, not_found)?;
    state
        .users
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, not_found)?;
    let Json(payload) = payload?;
    let user = services::update_user(state.users.as_ref(), &state.hasher, id, payload).await?;
    info!(user_id = %user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, not_found)?;
    if !state.users.delete(id).await? {
        return Err(not_found());
    }
    info!(user_id = %id, "user deleted");
    Ok(Json(json!({ "message": "User deleted" })))
}
