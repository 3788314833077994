//! Operator-facing order handlers.
//!
//! Thin layer: extract inputs, delegate to the order lifecycle service,
//! return JSON. Tenant scoping comes from the `OperatorIdentity`
//! injected by the auth middleware.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use uuid::Uuid;

use crate::{
    error::Result,
    middleware::auth::OperatorIdentity,
    models::requests::UpdateOrderStatusRequest,
    services::orders,
    state::AppState,
};

/// GET /api/v1/orders
///
/// Lists the caller's orders, newest first, with line items and a
/// customer summary per order.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
) -> Result<Json<serde_json::Value>> {
    let orders = orders::list_orders(&state, operator.restaurant_id).await?;

    Ok(Json(serde_json::json!({
        "orders": orders,
        "count": orders.len(),
    })))
}

/// PATCH /api/v1/orders/{id}/status
///
/// Applies a status and/or payment-status change. Responds 422 with the
/// allowed target set when the transition is not in the table, 403 when
/// the order belongs to another restaurant, 404 when it does not exist.
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let order = orders::update_status(&state, order_id, operator.restaurant_id, request).await?;

    Ok(Json(serde_json::json!({
        "order": order,
    })))
}
