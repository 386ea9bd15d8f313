use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::{parse_id, ApiError, AppState};
use crate::domain::{NewOrder, Order, OrderReplace, OrderStatus};

#[derive(Debug, Deserialize)]
pub struct PaymentProofBody {
    pub payment_proof: String,
}

pub async fn add_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let order = state.orders.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_orders().await?))
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {id}")))?;
    Ok(Json(order))
}

/// Full replace. May set any status, bypassing the fulfillment chain.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderReplace>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    Ok(Json(state.orders.replace_order(id, body).await?))
}

pub async fn delete_order(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn advance_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderStatus>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.orders.advance_order(id).await?))
}

pub async fn set_payment_proof(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentProofBody>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    if body.payment_proof.trim().is_empty() {
        return Err(ApiError::BadRequest("payment_proof must not be empty".into()));
    }
    Ok(Json(state.orders.set_payment_proof(id, body.payment_proof).await?))
}
