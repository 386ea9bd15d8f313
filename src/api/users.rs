use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::{parse_id, ApiError, AppState};
use crate::domain::{NewUser, Role, User};
use crate::security::Principal;

pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let user = state.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {id}")))?;
    Ok(Json(user))
}

/// Admin only.
pub async fn list_users(State(state): State<AppState>, principal: Principal) -> Result<Json<Vec<User>>, ApiError> {
    state.guard.authorize(&principal, Role::Admin).await?;
    Ok(Json(state.users.list_users().await?))
}
