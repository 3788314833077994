use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::customers::Customer,
};

/// Finds a customer by (phone, restaurant) or creates one.
///
/// Uniqueness of the pair is enforced by the database; the insert races
/// benignly with a concurrent first message thanks to ON CONFLICT.
pub async fn find_or_create(
    conn: &mut DbConn,
    restaurant_id: Uuid,
    phone: &str,
    name: Option<&str>,
) -> Result<Customer> {
    let existing = sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, phone, name, restaurant_id, created_at, updated_at
        FROM customers
        WHERE restaurant_id = $1 AND phone = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(phone)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    if let Some(customer) = existing {
        return Ok(customer);
    }

    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (id, phone, name, restaurant_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (phone, restaurant_id) DO UPDATE SET updated_at = now()
        RETURNING id, phone, name, restaurant_id, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(phone)
    .bind(name)
    .bind(restaurant_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(customer)
}
