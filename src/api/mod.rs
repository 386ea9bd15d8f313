//! HTTP surface.

pub mod admin;
pub mod error;
pub mod orders;
pub mod users;

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_system::OrderSystem;
use crate::clients::{OrderClient, UserClient};
use crate::domain::ObjectId;
use crate::security::{Principal, RoleGuard, TokenKeys};
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub users: UserClient,
    pub guard: RoleGuard,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn from_system(system: &OrderSystem) -> Self {
        Self {
            orders: system.order_client.clone(),
            users: system.user_client.clone(),
            guard: system.guard.clone(),
            keys: system.keys.clone(),
        }
    }
}

/// Resolves the acting user from a verified bearer token.
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
        Ok(state.keys.verify_bearer(header)?)
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    Ok(ObjectId::parse_str(raw)?)
}

/// `TimeoutLayer` answers with an empty 408; give it the usual error body.
fn timeout_body(response: Response, request_timeout: Duration) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout(request_timeout).into_response();
    }
    response
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/orders", get(orders::list_orders).post(orders::add_order))
        .route(
            "/orders/{id}",
            get(orders::get_order).put(orders::update_order).delete(orders::delete_order),
        )
        .route("/orders/advance/{id}", patch(orders::advance_order_status))
        .route("/orders/payment-proof/{id}", patch(orders::set_payment_proof))
        .route("/admin/update-user-role", put(admin::update_user_role))
        .route("/admin/update-user-profile", put(admin::update_user_profile))
        .route("/users", get(users::list_users).post(users::register_user))
        .route("/users/{id}", get(users::get_user))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(move |response: Response| async move {
            timeout_body(response, request_timeout)
        }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
