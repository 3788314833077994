use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::conversations::{Conversation, DialogueState},
};

/// Gets the customer's conversation, creating it in `WELCOME` on the
/// first inbound message. Exactly one conversation per customer.
pub async fn get_or_create(
    conn: &mut DbConn,
    customer_id: Uuid,
    restaurant_id: Uuid,
) -> Result<Conversation> {
    let existing = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, customer_id, restaurant_id, state, context, last_message_at
        FROM conversations
        WHERE customer_id = $1
        "#,
    )
    .bind(customer_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    if let Some(conversation) = existing {
        return Ok(conversation);
    }

    let welcome = DialogueState::Welcome;
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (id, customer_id, restaurant_id, state, context)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (customer_id) DO UPDATE SET last_message_at = now()
        RETURNING id, customer_id, restaurant_id, state, context, last_message_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(customer_id)
    .bind(restaurant_id)
    .bind(welcome.tag())
    .bind(serde_json::to_value(&welcome).map_err(|e| Error::Internal(e.to_string()))?)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(conversation)
}

/// Persists the next dialogue state and touches `last_message_at`.
pub async fn update_state(
    conn: &mut DbConn,
    customer_id: Uuid,
    next: &DialogueState,
) -> Result<Conversation> {
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        UPDATE conversations
        SET state = $2, context = $3, last_message_at = now()
        WHERE customer_id = $1
        RETURNING id, customer_id, restaurant_id, state, context, last_message_at
        "#,
    )
    .bind(customer_id)
    .bind(next.tag())
    .bind(serde_json::to_value(next).map_err(|e| Error::Internal(e.to_string()))?)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(conversation)
}
