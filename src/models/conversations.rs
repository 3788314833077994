//! Persisted dialogue state for the conversational ordering flow.
//!
//! The dialogue state is a closed tagged union: each state carries only
//! the data that state actually needs, so "quantity entered with no item
//! selected" is unrepresentable rather than guarded at runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One in-progress cart entry, captured from the menu at selection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Dialogue state machine, one value per customer.
///
/// Serialized adjacently tagged so the stored document reads as
/// `{"state": "SELECT_ITEM", "context": {...}}`, mirroring the
/// state/context split of the conversations table.
///
/// There are no terminal states: order placement and payment
/// confirmation both loop back to `Welcome`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "context", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogueState {
    /// Entry point: list categories on the next inbound message.
    #[default]
    Welcome,
    /// Category list was sent; waiting for a category row selection.
    SelectCategory { items: Vec<CartLine> },
    /// Item list was sent; waiting for an item row selection.
    SelectItem { items: Vec<CartLine>, category_id: Uuid },
    /// Quantity prompt was sent for the selected item.
    SelectQuantity { items: Vec<CartLine>, item_id: Uuid },
    /// Waiting for a yes/no on adding further items.
    AddMore { items: Vec<CartLine> },
    /// Summary was sent; waiting for CONFIRM or CANCEL.
    ConfirmOrder { items: Vec<CartLine> },
    /// Payment instructions were sent; waiting for PAID.
    PaymentConfirmation,
}

impl DialogueState {
    /// The stored `state` column value for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Welcome => "WELCOME",
            Self::SelectCategory { .. } => "SELECT_CATEGORY",
            Self::SelectItem { .. } => "SELECT_ITEM",
            Self::SelectQuantity { .. } => "SELECT_QUANTITY",
            Self::AddMore { .. } => "ADD_MORE",
            Self::ConfirmOrder { .. } => "CONFIRM_ORDER",
            Self::PaymentConfirmation => "PAYMENT_CONFIRMATION",
        }
    }

    /// Decodes a stored dialogue document.
    ///
    /// An unrecognized state tag or undecodable context falls back to
    /// `Welcome` so a corrupted conversation self-heals instead of
    /// wedging the customer.
    pub fn decode(stored: &serde_json::Value) -> Self {
        serde_json::from_value(stored.clone()).unwrap_or_default()
    }
}

/// Persisted conversation row, exactly one per customer.
///
/// Created lazily on the first inbound message, mutated on every
/// processed message, never deleted (only reset to `Welcome`).
#[derive(Debug, Clone, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub state: String,
    pub context: serde_json::Value,
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    pub fn dialogue(&self) -> DialogueState {
        DialogueState::decode(&self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_line_subtotal() {
        let line = CartLine {
            menu_item_id: Uuid::now_v7(),
            name: "Jollof Rice".to_string(),
            unit_price: 12.50,
            quantity: 7,
        };
        assert_eq!(line.subtotal(), 87.50);
    }

    #[test]
    fn dialogue_round_trips_through_json() {
        let state = DialogueState::SelectQuantity {
            items: vec![CartLine {
                menu_item_id: Uuid::now_v7(),
                name: "Burger".to_string(),
                unit_price: 25.0,
                quantity: 2,
            }],
            item_id: Uuid::now_v7(),
        };

        let stored = serde_json::to_value(&state).unwrap();
        assert_eq!(stored["state"], "SELECT_QUANTITY");
        // Quantity must survive as a number, not a string.
        assert!(stored["context"]["items"][0]["quantity"].is_u64());
        assert_eq!(DialogueState::decode(&stored), state);
    }

    #[test]
    fn unknown_state_tag_falls_back_to_welcome() {
        let stored = serde_json::json!({
            "state": "PAYMENT_INSTRUCTIONS",
            "context": { "items": [] }
        });
        assert_eq!(DialogueState::decode(&stored), DialogueState::Welcome);
    }

    #[test]
    fn garbage_context_falls_back_to_welcome() {
        assert_eq!(
            DialogueState::decode(&serde_json::json!({})),
            DialogueState::Welcome
        );
        assert_eq!(
            DialogueState::decode(&serde_json::json!({
                "state": "SELECT_QUANTITY",
                "context": { "items": "not-a-list" }
            })),
            DialogueState::Welcome
        );
    }

    #[test]
    fn state_tags_match_stored_column_values() {
        let states = [
            (DialogueState::Welcome, "WELCOME"),
            (DialogueState::AddMore { items: vec![] }, "ADD_MORE"),
            (DialogueState::PaymentConfirmation, "PAYMENT_CONFIRMATION"),
        ];
        for (state, tag) in states {
            assert_eq!(state.tag(), tag);
            assert_eq!(serde_json::to_value(&state).unwrap()["state"], tag);
        }
    }
}
