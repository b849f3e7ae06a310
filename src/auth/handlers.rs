use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{LoginRequest, LoginResponse},
    error::AppError,
    state::AppState,
    validation::normalize_email,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    let user = match state.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%email, "login unknown email");
            return Err(AppError::NotFound("User not found".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e);
        }
    };

    let ok = state
        .hasher
        .verify_password(&payload.password, &user.password)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            AppError::from(e)
        })?;

    if !ok {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let token = state.jwt.issue(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
    }))
}
