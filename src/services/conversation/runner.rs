//! I/O adapter around the pure dialogue engine.
//!
//! One inbound message = one call to [`handle_message`]: resolve the
//! customer, serialize on their conversation lock, prefetch what the
//! engine asked for, run the pure step, apply the domain action,
//! persist the new state, and only then dispatch replies. A gateway
//! failure after the persist is logged and swallowed so a flaky channel
//! cannot corrupt the stored conversation.

use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::{
        catalog::Restaurant,
        conversations::CartLine,
        orders::PaymentStatus,
    },
    queries,
    services::conversation::{
        engine::{self, DomainAction, Prefetch, Reply},
        replies,
    },
    state::AppState,
};

/// Drives one dialogue step for an inbound message.
pub async fn handle_message(
    state: &AppState,
    restaurant: &Restaurant,
    from: &str,
    input: &str,
    contact_name: Option<&str>,
) -> Result<()> {
    let mut conn = state.pool.acquire().await?;

    let customer =
        queries::customers::find_or_create(&mut conn, restaurant.id, from, contact_name).await?;

    // Serialize all processing for this customer: duplicate channel
    // deliveries would otherwise both read the same prior state.
    let _guard = state.conversation_locks.acquire(customer.id).await;

    let conversation =
        queries::conversations::get_or_create(&mut conn, customer.id, restaurant.id).await?;
    let current = conversation.dialogue();

    tracing::debug!(
        customer_id = %customer.id,
        restaurant_id = %restaurant.id,
        state = current.tag(),
        "processing inbound message"
    );

    // Resolve the data the pure step will need.
    let spec = engine::required_lookup(&current, input);
    let mut prefetch = Prefetch::default();
    if spec.categories {
        prefetch.categories = queries::catalog::active_categories(&mut conn, restaurant.id).await?;
    }
    if let Some(category_id) = spec.items_in_category {
        prefetch.items =
            queries::catalog::available_items(&mut conn, restaurant.id, category_id).await?;
    }
    if let Some(item_id) = spec.item {
        prefetch.item = queries::catalog::item_by_id(&mut conn, restaurant.id, item_id).await?;
    }
    if spec.latest_order {
        prefetch.latest_order =
            queries::orders::latest_for_customer(&mut conn, customer.id).await?;
    }

    let outcome = engine::step(current, input, restaurant, &prefetch);

    // Apply the domain action before dispatch; order creation may add a
    // follow-up reply of its own.
    let mut replies = outcome.replies;
    match outcome.action {
        Some(DomainAction::CancelUnpaidOrders) => {
            let cancelled =
                queries::orders::cancel_unpaid_for_customer(&mut conn, customer.id).await?;
            tracing::info!(customer_id = %customer.id, cancelled, "restart cancelled unpaid orders");
        }
        Some(DomainAction::PlaceOrder { lines, total }) => {
            let order = place_order(state, restaurant.id, customer.id, &lines, total).await?;
            tracing::info!(
                order_id = %order.id,
                order_number = %order.order_number,
                total_amount = order.total_amount,
                "order placed from conversation"
            );
            replies.push(Reply::Text(replies::payment_instructions(&order, restaurant)));
        }
        Some(DomainAction::MarkPaymentPending { order_id }) => {
            queries::orders::set_payment_status(
                &mut conn,
                order_id,
                PaymentStatus::PendingVerification,
            )
            .await?;
            tracing::info!(%order_id, "payment reported by customer, pending verification");
        }
        None => {}
    }

    // Persist before dispatch: the committed state must not depend on
    // whether the channel accepted our messages.
    queries::conversations::update_state(&mut conn, customer.id, &outcome.next).await?;
    drop(conn);

    for reply in replies {
        let result = match &reply {
            Reply::Text(body) => state.gateway.send_text(&customer.phone, body).await,
            Reply::List(message) => state.gateway.send_list(&customer.phone, message).await,
        };
        if let Err(error) = result {
            tracing::error!(
                customer_id = %customer.id,
                %error,
                "outbound message dispatch failed"
            );
        }
    }

    Ok(())
}

/// Creates the order and its line-item snapshots in one transaction.
async fn place_order(
    state: &AppState,
    restaurant_id: Uuid,
    customer_id: Uuid,
    lines: &[CartLine],
    total: f64,
) -> Result<crate::models::orders::Order> {
    let order_number = generate_order_number();

    let mut tx = state.pool.begin().await?;
    let order = queries::orders::insert_order(
        tx.as_mut(),
        &order_number,
        customer_id,
        restaurant_id,
        total,
    )
    .await?;
    for line in lines {
        queries::orders::insert_order_item(tx.as_mut(), order.id, line).await?;
    }
    tx.commit().await.map_err(Error::Sqlx)?;

    Ok(order)
}

/// `ORD-<millis base36>-<4 random>`: globally unique and sortable by
/// placement time at a glance.
fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();

    format!("ORD-{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
