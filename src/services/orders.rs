//! Order lifecycle manager.
//!
//! Operators move orders through a fixed forward-only status machine.
//! `plan_update` is the pure validation/derivation step; `update_status`
//! wraps it with tenant enforcement, per-order serialization, and the
//! best-effort customer notification.

use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::{
        orders::{Order, OrderDetails, OrderStatus, PaymentStatus},
        requests::UpdateOrderStatusRequest,
    },
    queries,
    services::conversation::replies,
    state::AppState,
};

/// The merged update derived from a validated request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdatePlan {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Validates the requested change against the transition table and
/// derives the coupled payment side effect.
///
/// Rules, in order:
/// - at least one of status/payment status must be requested;
/// - a requested status must be in the current status's allowed set
///   (terminal statuses allow nothing, and there are no self-loops);
/// - CONFIRMED forces payment to VERIFIED, overriding any explicit
///   payment status in the same call;
/// - CANCELLED forces an unsettled payment to FAILED and ignores any
///   explicit payment status;
/// - otherwise an explicit payment status applies as-is.
pub fn plan_update(
    current_status: OrderStatus,
    current_payment: PaymentStatus,
    request: &UpdateOrderStatusRequest,
) -> Result<UpdatePlan> {
    if request.status.is_none() && request.payment_status.is_none() {
        return Err(Error::Validation(
            "At least one of status or paymentStatus is required".to_string(),
        ));
    }

    if let Some(new_status) = request.status {
        if !current_status.can_transition_to(new_status) {
            return Err(Error::InvalidTransition {
                from: current_status.to_string(),
                requested: new_status.to_string(),
                allowed: current_status
                    .allowed_targets()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            });
        }

        let payment_status = match current_payment.after_transition(new_status) {
            Some(forced) => Some(forced),
            None if matches!(new_status, OrderStatus::Confirmed | OrderStatus::Cancelled) => None,
            None => request.payment_status,
        };

        return Ok(UpdatePlan {
            status: Some(new_status),
            payment_status,
        });
    }

    Ok(UpdatePlan {
        status: None,
        payment_status: request.payment_status,
    })
}

/// Ownership precondition plus transition planning.
///
/// The tenant check comes first: a caller holding another restaurant's
/// order id is rejected as forbidden regardless of whether the
/// requested transition would otherwise be valid.
pub fn authorize_update(
    order: &Order,
    restaurant_id: Uuid,
    request: &UpdateOrderStatusRequest,
) -> Result<UpdatePlan> {
    if order.restaurant_id != restaurant_id {
        // Distinct from not-found so the operator layer can report it
        // without leaking existence across tenants.
        return Err(Error::Forbidden(
            "Order does not belong to your restaurant".to_string(),
        ));
    }

    plan_update(order.status, order.payment_status, request)
}

/// Applies a status/payment change to an order on behalf of an operator.
pub async fn update_status(
    state: &AppState,
    order_id: Uuid,
    restaurant_id: Uuid,
    request: UpdateOrderStatusRequest,
) -> Result<OrderDetails> {
    if request.status.is_none() && request.payment_status.is_none() {
        return Err(Error::Validation(
            "At least one of status or paymentStatus is required".to_string(),
        ));
    }

    // Hold the order's lock across validate-then-persist so two racing
    // operators cannot both pass validation against the same prior
    // status.
    let _guard = state.order_locks.acquire(order_id).await;

    let mut conn = state.pool.acquire().await?;

    let order = queries::orders::get_by_id(&mut conn, order_id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))?;

    let plan = authorize_update(&order, restaurant_id, &request)?;
    let updated =
        queries::orders::apply_update(&mut conn, order_id, plan.status, plan.payment_status)
            .await?;

    let customer = queries::orders::customer_summary(&mut conn, updated.customer_id).await?;
    let items = queries::orders::items_for_orders(&mut conn, &[updated.id]).await?;

    tracing::info!(
        order_id = %updated.id,
        order_number = %updated.order_number,
        status = %updated.status,
        payment_status = %updated.payment_status,
        "order updated"
    );

    // Fire-and-forget notification: a gateway failure is logged on the
    // detached task and never rolls back the committed transition.
    if let Some(new_status) = plan.status {
        if let Some(body) = replies::status_notification(&updated.order_number, new_status) {
            let gateway = state.gateway.clone();
            let to = customer.phone.clone();
            let order_number = updated.order_number.clone();
            tokio::spawn(async move {
                if let Err(error) = gateway.send_text(&to, &body).await {
                    tracing::error!(%order_number, %error, "status notification failed");
                }
            });
        }
    }

    Ok(OrderDetails {
        order: updated,
        customer,
        items,
    })
}

/// All orders for a restaurant, newest first, with line items and
/// customer summaries.
pub async fn list_orders(state: &AppState, restaurant_id: Uuid) -> Result<Vec<OrderDetails>> {
    let mut conn = state.pool.acquire().await?;

    let orders = queries::orders::list_for_restaurant(&mut conn, restaurant_id).await?;
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items = queries::orders::items_for_orders(&mut conn, &order_ids).await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        let customer = queries::orders::customer_summary(&mut conn, order.customer_id).await?;
        let (own, rest): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|item| item.order_id == order.id);
        items = rest;
        details.push(OrderDetails {
            order,
            customer,
            items: own,
        });
    }

    Ok(details)
}
