//! Order rows and the order lifecycle state machine.
//!
//! The transition table is the single source of truth for which status
//! changes an operator may apply. Orders only move forward through the
//! lifecycle; `Completed` and `Cancelled` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Fulfillment status of an order.
///
/// # State Transitions
///
/// - Pending → Confirmed, Cancelled
/// - Confirmed → Preparing, Cancelled
/// - Preparing → Ready, Cancelled
/// - Ready → Completed, Cancelled
/// - Completed, Cancelled → (terminal)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "CONFIRMED")]
    Confirmed,
    #[sqlx(rename = "PREPARING")]
    Preparing,
    #[sqlx(rename = "READY")]
    Ready,
    #[sqlx(rename = "COMPLETED")]
    Completed,
    #[sqlx(rename = "CANCELLED")]
    Cancelled,
}

/// Settlement status, tracked separately from fulfillment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    #[sqlx(rename = "UNPAID")]
    Unpaid,
    #[sqlx(rename = "PENDING_VERIFICATION")]
    PendingVerification,
    #[sqlx(rename = "VERIFIED")]
    Verified,
    #[sqlx(rename = "FAILED")]
    Failed,
}

impl OrderStatus {
    /// The statuses an order in this status may move to.
    ///
    /// Terminal statuses return an empty slice; there are no
    /// self-transitions anywhere in the table.
    pub fn allowed_targets(self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Ready, Self::Cancelled],
            Self::Ready => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

impl PaymentStatus {
    /// Payment side effect coupled to a status transition.
    ///
    /// - Confirming an order implies payment was accepted: always `Verified`.
    /// - Cancelling an order fails an unsettled payment; an already
    ///   `Verified` payment is left alone (refunds are handled outside
    ///   this system).
    pub fn after_transition(self, new_status: OrderStatus) -> Option<PaymentStatus> {
        match new_status {
            OrderStatus::Confirmed => Some(Self::Verified),
            OrderStatus::Cancelled => match self {
                Self::Unpaid | Self::PendingVerification => Some(Self::Failed),
                Self::Verified | Self::Failed => None,
            },
            _ => None,
        }
    }
}

/// A placed order. Created once with `Pending`/`Unpaid`; mutated only
/// through the lifecycle manager's validated transitions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable line-item snapshot taken at order placement, decoupled
/// from later menu edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub item_price: f64,
    pub quantity: i32,
    pub subtotal: f64,
}

/// Customer fields exposed alongside an order on the operator surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerSummary {
    pub name: Option<String>,
    pub phone: String,
}

/// An order with its line items and customer summary, as returned to
/// operators.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub customer: CustomerSummary,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn transition_table_is_exhaustive() {
        let allowed: &[(OrderStatus, OrderStatus)] = &[
            (OrderStatus::Pending, OrderStatus::Confirmed),
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Confirmed, OrderStatus::Preparing),
            (OrderStatus::Confirmed, OrderStatus::Cancelled),
            (OrderStatus::Preparing, OrderStatus::Ready),
            (OrderStatus::Preparing, OrderStatus::Cancelled),
            (OrderStatus::Ready, OrderStatus::Completed),
            (OrderStatus::Ready, OrderStatus::Cancelled),
        ];

        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn no_self_transitions() {
        for status in ALL_STATUSES {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn terminal_statuses_have_empty_target_sets() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Completed.allowed_targets().is_empty());
        assert!(OrderStatus::Cancelled.allowed_targets().is_empty());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn confirmed_always_verifies_payment() {
        for payment in [
            PaymentStatus::Unpaid,
            PaymentStatus::PendingVerification,
            PaymentStatus::Verified,
            PaymentStatus::Failed,
        ] {
            assert_eq!(
                payment.after_transition(OrderStatus::Confirmed),
                Some(PaymentStatus::Verified)
            );
        }
    }

    #[test]
    fn cancelled_fails_only_unsettled_payments() {
        assert_eq!(
            PaymentStatus::Unpaid.after_transition(OrderStatus::Cancelled),
            Some(PaymentStatus::Failed)
        );
        assert_eq!(
            PaymentStatus::PendingVerification.after_transition(OrderStatus::Cancelled),
            Some(PaymentStatus::Failed)
        );
        // Post-payment cancellation is a refund scenario, not handled here.
        assert_eq!(
            PaymentStatus::Verified.after_transition(OrderStatus::Cancelled),
            None
        );
        assert_eq!(
            PaymentStatus::Failed.after_transition(OrderStatus::Cancelled),
            None
        );
    }

    #[test]
    fn intermediate_statuses_leave_payment_alone() {
        for status in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert_eq!(PaymentStatus::Verified.after_transition(status), None);
            assert_eq!(PaymentStatus::Unpaid.after_transition(status), None);
        }
    }

    #[test]
    fn statuses_render_as_screaming_snake_case() {
        assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
        assert_eq!(
            PaymentStatus::PendingVerification.to_string(),
            "PENDING_VERIFICATION"
        );
        assert_eq!(
            serde_json::to_value(OrderStatus::Cancelled).unwrap(),
            "CANCELLED"
        );
    }
}
