use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::catalog::{MenuCategory, MenuItem, Restaurant},
};

const RESTAURANT_COLUMNS: &str = "id, name, phone, whatsapp_number, momo_number, momo_name, \
                                  api_key, created_at, updated_at";

/// Resolves the tenant an inbound message was addressed to, by the
/// business number the customer wrote to.
pub async fn restaurant_by_display_phone(
    conn: &mut DbConn,
    display_phone: &str,
) -> Result<Option<Restaurant>> {
    // The webhook reports the number without a leading '+'.
    let prefixed = format!("+{display_phone}");
    let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants \
         WHERE whatsapp_number = $1 OR phone = $1"
    ))
    .bind(prefixed)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(restaurant)
}

/// Resolves an operator API key to its restaurant.
pub async fn restaurant_by_api_key(
    conn: &mut DbConn,
    api_key: &str,
) -> Result<Option<Restaurant>> {
    let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE api_key = $1"
    ))
    .bind(api_key)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(restaurant)
}

/// Lists a restaurant's active categories in menu order.
pub async fn active_categories(
    conn: &mut DbConn,
    restaurant_id: Uuid,
) -> Result<Vec<MenuCategory>> {
    let categories = sqlx::query_as::<_, MenuCategory>(
        r#"
        SELECT id, restaurant_id, name, description, sort_order, is_active
        FROM menu_categories
        WHERE restaurant_id = $1 AND is_active = TRUE
        ORDER BY sort_order ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(categories)
}

/// Lists available items in a category. Filtered by tenant as well as
/// category so a forged category id cannot leak another menu.
pub async fn available_items(
    conn: &mut DbConn,
    restaurant_id: Uuid,
    category_id: Uuid,
) -> Result<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, category_id, restaurant_id, name, description, price, is_available, sort_order
        FROM menu_items
        WHERE restaurant_id = $1 AND category_id = $2 AND is_available = TRUE
        ORDER BY sort_order ASC
        "#,
    )
    .bind(restaurant_id)
    .bind(category_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(items)
}

/// Gets a single menu item within the tenant. The item may not exist.
pub async fn item_by_id(
    conn: &mut DbConn,
    restaurant_id: Uuid,
    item_id: Uuid,
) -> Result<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, category_id, restaurant_id, name, description, price, is_available, sort_order
        FROM menu_items
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(item)
}
