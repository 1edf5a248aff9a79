//! Read access to the most recent complete order.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Json};

use tandoor_types::Order;

use crate::AppState;

/// GET /orders/latest
///
/// The most recent order assembled by any completion event, or 404 before
/// the first one.
pub async fn latest_order_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Order>, StatusCode> {
    state
        .latest_order
        .read()
        .expect("latest-order lock poisoned")
        .clone()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
