use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::{
        conversations::CartLine,
        orders::{CustomerSummary, Order, OrderItem, OrderStatus, PaymentStatus},
    },
};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, restaurant_id, total_amount, \
                             status, payment_status, created_at, updated_at";

/// Inserts a new order in PENDING/UNPAID.
pub async fn insert_order(
    conn: &mut DbConn,
    order_number: &str,
    customer_id: Uuid,
    restaurant_id: Uuid,
    total_amount: f64,
) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        INSERT INTO orders (id, order_number, customer_id, restaurant_id, total_amount, status, payment_status)
        VALUES ($1, $2, $3, $4, $5, 'PENDING', 'UNPAID')
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(order_number)
    .bind(customer_id)
    .bind(restaurant_id)
    .bind(total_amount)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(order)
}

/// Inserts one immutable line-item snapshot for an order.
pub async fn insert_order_item(
    conn: &mut DbConn,
    order_id: Uuid,
    line: &CartLine,
) -> Result<OrderItem> {
    let item = sqlx::query_as::<_, OrderItem>(
        r#"
        INSERT INTO order_items (id, order_id, menu_item_id, item_name, item_price, quantity, subtotal)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, order_id, menu_item_id, item_name, item_price, quantity, subtotal
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(order_id)
    .bind(line.menu_item_id)
    .bind(&line.name)
    .bind(line.unit_price)
    .bind(line.quantity as i32)
    .bind(line.subtotal())
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(item)
}

/// Gets a single order by id, without a tenant filter: the lifecycle
/// manager distinguishes not-found from forbidden itself.
pub async fn get_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<Order>> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Error::Sqlx)?;

    Ok(order)
}

/// The customer's most recent order, if any.
pub async fn latest_for_customer(conn: &mut DbConn, customer_id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE customer_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(customer_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(order)
}

/// Cancels every order of the customer whose payment has not settled.
/// Returns the number of orders cancelled.
pub async fn cancel_unpaid_for_customer(conn: &mut DbConn, customer_id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE orders
        SET status = 'CANCELLED', updated_at = now()
        WHERE customer_id = $1 AND payment_status IN ('UNPAID', 'PENDING_VERIFICATION')
        "#,
    )
    .bind(customer_id)
    .execute(&mut *conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}

/// Sets the payment status alone (customer replied PAID).
pub async fn set_payment_status(
    conn: &mut DbConn,
    order_id: Uuid,
    payment_status: PaymentStatus,
) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        UPDATE orders
        SET payment_status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(order_id)
    .bind(payment_status)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(order)
}

/// Applies a validated status/payment update in a single statement.
pub async fn apply_update(
    conn: &mut DbConn,
    order_id: Uuid,
    status: Option<OrderStatus>,
    payment_status: Option<PaymentStatus>,
) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        UPDATE orders
        SET status = COALESCE($2, status),
            payment_status = COALESCE($3, payment_status),
            updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(order_id)
    .bind(status)
    .bind(payment_status)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(order)
}

/// Lists all orders for a restaurant, newest first.
pub async fn list_for_restaurant(conn: &mut DbConn, restaurant_id: Uuid) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE restaurant_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(restaurant_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(orders)
}

/// Line items for a batch of orders in one query, avoiding one query
/// per order when listing.
pub async fn items_for_orders(conn: &mut DbConn, order_ids: &[Uuid]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, order_id, menu_item_id, item_name, item_price, quantity, subtotal
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(order_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(items)
}

/// Name and phone of the order's customer, for the operator surface
/// and for notification dispatch.
pub async fn customer_summary(conn: &mut DbConn, customer_id: Uuid) -> Result<CustomerSummary> {
    let summary = sqlx::query_as::<_, CustomerSummary>(
        r#"
        SELECT name, phone
        FROM customers
        WHERE id = $1
        "#,
    )
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(summary)
}
