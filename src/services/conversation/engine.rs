//! Pure decision core of the ordering dialogue.
//!
//! `step` maps (current state, inbound input, prefetched data) to the
//! next state, the replies to send, and at most one domain action. It
//! performs no I/O: the runner resolves `required_lookup` against the
//! catalog/order stores beforehand and interprets the outcome
//! afterwards, so every transition here is testable with plain values.

use uuid::Uuid;

use crate::{
    gateway::ListMessage,
    models::{
        catalog::{MenuCategory, MenuItem, Restaurant},
        conversations::{CartLine, DialogueState},
        orders::Order,
    },
    services::conversation::replies,
};

/// An outbound message produced by a dialogue step. The runner fills
/// in the destination address.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    List(ListMessage),
}

/// A state-transition side effect on the order store.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainAction {
    /// Cancel every order of this customer whose payment has not
    /// settled (the `restart` override).
    CancelUnpaidOrders,
    /// Create an order plus line-item snapshots from the cart. The
    /// runner follows up with payment instructions for the created
    /// order.
    PlaceOrder { lines: Vec<CartLine>, total: f64 },
    /// Customer claims payment was sent; move it to verification.
    MarkPaymentPending { order_id: Uuid },
}

/// What a step needs loaded before it can run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupSpec {
    pub categories: bool,
    pub items_in_category: Option<Uuid>,
    pub item: Option<Uuid>,
    pub latest_order: bool,
}

/// Data resolved by the runner according to [`LookupSpec`]. Fields the
/// lookup did not ask for stay empty.
#[derive(Debug, Clone, Default)]
pub struct Prefetch {
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
    pub item: Option<MenuItem>,
    pub latest_order: Option<Order>,
}

/// The result of one dialogue step.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub next: DialogueState,
    pub replies: Vec<Reply>,
    pub action: Option<DomainAction>,
}

impl Outcome {
    fn stay(current: DialogueState, reply: Reply) -> Self {
        Self {
            next: current,
            replies: vec![reply],
            action: None,
        }
    }
}

fn normalized(input: &str) -> String {
    input.trim().to_lowercase()
}

fn parse_id(input: &str) -> Option<Uuid> {
    Uuid::parse_str(input.trim()).ok()
}

/// Tells the runner which catalog/order data the coming step will read.
pub fn required_lookup(current: &DialogueState, input: &str) -> LookupSpec {
    if normalized(input) == "restart" {
        // Restart re-enters WELCOME, which lists categories.
        return LookupSpec {
            categories: true,
            ..Default::default()
        };
    }

    match current {
        DialogueState::Welcome => LookupSpec {
            categories: true,
            ..Default::default()
        },
        DialogueState::SelectCategory { .. } => LookupSpec {
            // Categories are also needed for the empty-category fallback.
            categories: true,
            items_in_category: parse_id(input),
            ..Default::default()
        },
        DialogueState::SelectItem { .. } => LookupSpec {
            item: parse_id(input),
            ..Default::default()
        },
        DialogueState::SelectQuantity { item_id, .. } => LookupSpec {
            item: Some(*item_id),
            ..Default::default()
        },
        DialogueState::AddMore { .. } => {
            let answer = normalized(input);
            LookupSpec {
                categories: answer == "yes" || answer == "y",
                ..Default::default()
            }
        }
        DialogueState::ConfirmOrder { .. } => LookupSpec::default(),
        DialogueState::PaymentConfirmation => LookupSpec {
            latest_order: normalized(input) == "paid",
            ..Default::default()
        },
    }
}

/// Runs one dialogue step. Pure: all data comes in via `prefetch`.
pub fn step(
    current: DialogueState,
    input: &str,
    restaurant: &Restaurant,
    prefetch: &Prefetch,
) -> Outcome {
    // Global override, evaluated before the state dispatch.
    if normalized(input) == "restart" {
        let (next, mut replies) = enter_welcome(
            restaurant,
            &prefetch.categories,
            Vec::new(),
            DialogueState::Welcome,
        );
        replies.insert(0, Reply::Text(replies::restart_notice()));
        return Outcome {
            next,
            replies,
            action: Some(DomainAction::CancelUnpaidOrders),
        };
    }

    match current {
        DialogueState::Welcome => {
            let (next, replies) = enter_welcome(
                restaurant,
                &prefetch.categories,
                Vec::new(),
                DialogueState::Welcome,
            );
            Outcome {
                next,
                replies,
                action: None,
            }
        }

        DialogueState::SelectCategory { items } => {
            if prefetch.items.is_empty() {
                // Unknown id and genuinely empty category take the same
                // path: tell the customer and re-list the menu. The cart
                // is carried, not dropped.
                let (next, mut replies) = enter_welcome(
                    restaurant,
                    &prefetch.categories,
                    items.clone(),
                    DialogueState::SelectCategory { items },
                );
                replies.insert(0, Reply::Text(replies::empty_category()));
                return Outcome {
                    next,
                    replies,
                    action: None,
                };
            }

            // Non-empty prefetch implies the input was a valid id.
            let category_id = prefetch.items[0].category_id;
            Outcome {
                next: DialogueState::SelectItem { items, category_id },
                replies: vec![Reply::List(replies::item_list(&prefetch.items))],
                action: None,
            }
        }

        DialogueState::SelectItem { items, category_id } => match available_item(prefetch) {
            Some(item) => Outcome {
                next: DialogueState::SelectQuantity {
                    items,
                    item_id: item.id,
                },
                replies: vec![Reply::Text(replies::quantity_prompt(item))],
                action: None,
            },
            None => Outcome::stay(
                DialogueState::SelectItem { items, category_id },
                Reply::Text(replies::item_unavailable()),
            ),
        },

        DialogueState::SelectQuantity { items, item_id } => {
            let Ok(quantity) = input.trim().parse::<u32>() else {
                return Outcome::stay(
                    DialogueState::SelectQuantity { items, item_id },
                    Reply::Text(replies::invalid_quantity()),
                );
            };
            if quantity < 1 {
                return Outcome::stay(
                    DialogueState::SelectQuantity { items, item_id },
                    Reply::Text(replies::invalid_quantity()),
                );
            }

            // Selected item vanished from the catalog between prompt and
            // answer: corruption recovery, reset rather than fail.
            let Some(item) = prefetch.item.as_ref() else {
                return Outcome {
                    next: DialogueState::Welcome,
                    replies: vec![Reply::Text(replies::something_went_wrong())],
                    action: None,
                };
            };

            let line = CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
            };
            let confirmation = replies::item_added(&line);

            let mut items = items;
            items.push(line);
            Outcome {
                next: DialogueState::AddMore { items },
                replies: vec![Reply::Text(confirmation)],
                action: None,
            }
        }

        DialogueState::AddMore { items } => match normalized(input).as_str() {
            "yes" | "y" => {
                // Carry the cart into a fresh category listing.
                let (next, replies) = enter_welcome(
                    restaurant,
                    &prefetch.categories,
                    items.clone(),
                    DialogueState::AddMore { items },
                );
                Outcome {
                    next,
                    replies,
                    action: None,
                }
            }
            "no" | "n" => {
                if items.is_empty() {
                    return Outcome::stay(
                        DialogueState::AddMore { items },
                        Reply::Text(replies::empty_cart()),
                    );
                }
                let summary = replies::order_summary(&items);
                Outcome {
                    next: DialogueState::ConfirmOrder { items },
                    replies: vec![Reply::Text(summary)],
                    action: None,
                }
            }
            _ => Outcome::stay(
                DialogueState::AddMore { items },
                Reply::Text(replies::add_more_reprompt()),
            ),
        },

        DialogueState::ConfirmOrder { items } => match normalized(input).as_str() {
            "cancel" => Outcome {
                next: DialogueState::Welcome,
                replies: vec![Reply::Text(replies::order_cancelled())],
                action: None,
            },
            "confirm" => {
                if items.is_empty() {
                    // Should be unreachable: the summary path requires a
                    // non-empty cart. Recover by resetting.
                    return Outcome {
                        next: DialogueState::Welcome,
                        replies: vec![Reply::Text(replies::something_went_wrong())],
                        action: None,
                    };
                }
                let total = items.iter().map(CartLine::subtotal).sum();
                Outcome {
                    next: DialogueState::PaymentConfirmation,
                    // Payment instructions follow from the runner once
                    // the order row exists and has a number.
                    replies: Vec::new(),
                    action: Some(DomainAction::PlaceOrder {
                        lines: items,
                        total,
                    }),
                }
            }
            _ => Outcome::stay(
                DialogueState::ConfirmOrder { items },
                Reply::Text(replies::confirm_reprompt()),
            ),
        },

        DialogueState::PaymentConfirmation => {
            if normalized(input) != "paid" {
                return Outcome::stay(
                    DialogueState::PaymentConfirmation,
                    Reply::Text(replies::payment_reprompt()),
                );
            }
            match prefetch.latest_order.as_ref() {
                Some(order) => Outcome {
                    next: DialogueState::Welcome,
                    replies: vec![Reply::Text(replies::payment_received(order))],
                    action: Some(DomainAction::MarkPaymentPending { order_id: order.id }),
                },
                None => Outcome::stay(
                    DialogueState::PaymentConfirmation,
                    Reply::Text(replies::no_recent_order()),
                ),
            }
        }
    }
}

/// Entry into WELCOME: list categories, or report an unavailable menu
/// and remain in `stay`. `carried` preserves the cart across a
/// mid-session re-listing; when the menu is empty the caller's state
/// (and its cart) is kept untouched, a mid-session menu deactivation
/// must not clear the cart.
fn enter_welcome(
    restaurant: &Restaurant,
    categories: &[MenuCategory],
    carried: Vec<CartLine>,
    stay: DialogueState,
) -> (DialogueState, Vec<Reply>) {
    if categories.is_empty() {
        return (stay, vec![Reply::Text(replies::menu_unavailable(restaurant))]);
    }
    (
        DialogueState::SelectCategory { items: carried },
        vec![Reply::List(replies::welcome_list(restaurant, categories))],
    )
}

fn available_item(prefetch: &Prefetch) -> Option<&MenuItem> {
    prefetch.item.as_ref().filter(|item| item.is_available)
}
