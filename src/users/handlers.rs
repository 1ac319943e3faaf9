use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::RegisterRequest,
        repo_types::User,
        services::{is_valid_email, Registration},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        warn!("empty username");
        return Err(ApiError::Validation("Username must not be empty".into()));
    }

    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email.trim()) {
            warn!(email = %email, "invalid email");
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    let user = state
        .registration
        .register(Registration {
            username: payload.username,
            email: payload.email.map(|e| e.trim().to_lowercase()),
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .registration
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(user))
}
