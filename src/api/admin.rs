use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState};
use crate::domain::{ProfileUpdate, Role};
use crate::security::Principal;

/// Target of an admin mutation. The acting admin comes from the bearer token.
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub user_id: String,
}

pub async fn update_user_role(
    State(state): State<AppState>,
    principal: Principal,
    query: Result<Query<TargetQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(target) = query?;
    let target = parse_id(&target.user_id)?;

    let grant = state.guard.authorize(&principal, Role::Admin).await?;
    state.users.promote_to_admin(&grant, target).await?;
    Ok(Json(json!({ "message": "User role updated to admin successfully" })))
}

pub async fn update_user_profile(
    State(state): State<AppState>,
    principal: Principal,
    query: Result<Query<TargetQuery>, QueryRejection>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(target) = query?;
    let target = parse_id(&target.user_id)?;
    let Json(update) = payload?;

    let grant = state.guard.authorize(&principal, Role::Admin).await?;
    state.users.update_profile(&grant, target, update).await?;
    Ok(Json(json!({ "message": "User profile updated successfully" })))
}
