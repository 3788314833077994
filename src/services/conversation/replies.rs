//! Customer-facing message templates for the ordering dialogue.

use crate::{
    gateway::{ListMessage, ListRow},
    models::{
        catalog::{MenuCategory, MenuItem, Restaurant},
        conversations::CartLine,
        orders::{Order, OrderStatus},
    },
};

/// Prices are displayed in Ghana cedis with two decimals.
pub fn format_price(amount: f64) -> String {
    format!("GHS {amount:.2}")
}

pub fn welcome_list(restaurant: &Restaurant, categories: &[MenuCategory]) -> ListMessage {
    ListMessage {
        header: Some("🎉 Welcome!".to_string()),
        body: format!(
            "Welcome to {}! Please select a category to start ordering:",
            restaurant.name
        ),
        button: "View Menu".to_string(),
        section_title: "Food Categories".to_string(),
        rows: categories
            .iter()
            .map(|category| ListRow {
                id: category.id.to_string(),
                title: category.name.clone(),
                description: category.description.clone(),
            })
            .collect(),
    }
}

pub fn menu_unavailable(restaurant: &Restaurant) -> String {
    format!(
        "🍽️ Welcome {}! Our menu is being updated. Please check back later.",
        restaurant.name
    )
}

pub fn item_list(items: &[MenuItem]) -> ListMessage {
    ListMessage {
        header: None,
        body: "Select an item from this category:".to_string(),
        button: "Choose Item".to_string(),
        section_title: "Available Items".to_string(),
        rows: items
            .iter()
            .map(|item| ListRow {
                id: item.id.to_string(),
                title: item.name.clone(),
                description: Some(match &item.description {
                    Some(description) => format!("{} - {description}", format_price(item.price)),
                    None => format_price(item.price),
                }),
            })
            .collect(),
    }
}

pub fn empty_category() -> String {
    "😕 This category has no items available. Let me show you the menu again.".to_string()
}

pub fn item_unavailable() -> String {
    "😕 This item is not available right now.".to_string()
}

pub fn quantity_prompt(item: &MenuItem) -> String {
    format!(
        "📝 {}\n💰 {}\n\nHow many would you like? (Enter a number)",
        item.name,
        format_price(item.price)
    )
}

pub fn invalid_quantity() -> String {
    "❌ Please enter a valid quantity (e.g., 1, 2, 3)".to_string()
}

pub fn item_added(line: &CartLine) -> String {
    format!(
        "✅ Added {}x {} ({})\n\nWould you like to add more items?\nReply YES to continue or NO to complete your order.",
        line.quantity,
        line.name,
        format_price(line.subtotal())
    )
}

pub fn add_more_reprompt() -> String {
    "Please reply YES to add more items or NO to complete your order.".to_string()
}

pub fn empty_cart() -> String {
    "You haven't added any items yet.".to_string()
}

pub fn order_summary(items: &[CartLine]) -> String {
    let mut summary = String::from("📋 *Your Order Summary*\n\n");
    let mut total = 0.0;

    for (index, line) in items.iter().enumerate() {
        let subtotal = line.subtotal();
        total += subtotal;
        summary.push_str(&format!(
            "{}. {}\n   {}x @ {} = {}\n\n",
            index + 1,
            line.name,
            line.quantity,
            format_price(line.unit_price),
            format_price(subtotal)
        ));
    }

    summary.push_str(&format!("💰 *Total: {}*\n\n", format_price(total)));
    summary.push_str("Reply CONFIRM to place your order or CANCEL to start over.");
    summary
}

pub fn confirm_reprompt() -> String {
    "Please reply CONFIRM to place your order or CANCEL to start over.".to_string()
}

pub fn order_cancelled() -> String {
    "❌ Order cancelled. Type HI to start a new order.".to_string()
}

pub fn payment_instructions(order: &Order, restaurant: &Restaurant) -> String {
    format!(
        "✅ *Order Confirmed!*\n\n\
         📝 Order Number: {}\n\
         💰 Total Amount: {}\n\n\
         *Payment Instructions:*\n\
         Please send {} to:\n\n\
         📱 MTN MoMo: {}\n\
         👤 Name: {}\n\n\
         Reply *PAID* once you have completed the payment.",
        order.order_number,
        format_price(order.total_amount),
        format_price(order.total_amount),
        restaurant.momo_number,
        restaurant.momo_name
    )
}

pub fn payment_received(order: &Order) -> String {
    format!(
        "✅ Thank you! We have received your payment notification.\n\n\
         Order #{} is being verified.\n\
         You will be notified once confirmed.\n\n\
         Type HI to place a new order.",
        order.order_number
    )
}

pub fn payment_reprompt() -> String {
    "Please reply *PAID* once you have completed the payment, or type HI to start a new order."
        .to_string()
}

pub fn no_recent_order() -> String {
    "❌ No recent order found.".to_string()
}

pub fn restart_notice() -> String {
    "🔄 Your previous order has been cleared.\n\nLet's start fresh!".to_string()
}

pub fn something_went_wrong() -> String {
    "❌ Something went wrong. Let me restart.".to_string()
}

/// Notification template for a lifecycle status change. Statuses with
/// no customer-facing template return None.
pub fn status_notification(order_number: &str, new_status: OrderStatus) -> Option<String> {
    match new_status {
        OrderStatus::Confirmed => Some(format!(
            "🎉 Your order *#{order_number}* has been confirmed!\nWe are preparing it now."
        )),
        OrderStatus::Cancelled => Some(format!(
            "❌ Your order *#{order_number}* was rejected.\nIf payment was made, please contact support."
        )),
        OrderStatus::Preparing => Some(format!(
            "👨‍🍳 Your order *#{order_number}* is being prepared."
        )),
        OrderStatus::Ready => Some(format!("📦 Your order *#{order_number}* is ready!")),
        OrderStatus::Completed => Some(format!(
            "✅ Your order *#{order_number}* is complete. Thank you!"
        )),
        OrderStatus::Pending => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn prices_use_two_decimals() {
        assert_eq!(format_price(50.0), "GHS 50.00");
        assert_eq!(format_price(12.5), "GHS 12.50");
        assert_eq!(format_price(87.5), "GHS 87.50");
    }

    #[test]
    fn summary_lists_lines_and_grand_total() {
        let items = vec![CartLine {
            menu_item_id: Uuid::now_v7(),
            name: "Burger".to_string(),
            unit_price: 25.0,
            quantity: 2,
        }];

        let summary = order_summary(&items);
        assert!(summary.contains("1. Burger"));
        assert!(summary.contains("2x @ GHS 25.00 = GHS 50.00"));
        assert!(summary.contains("*Total: GHS 50.00*"));
        assert!(summary.contains("Reply CONFIRM"));
    }

    #[test]
    fn only_customer_visible_statuses_have_notifications() {
        assert!(status_notification("ORD-1", OrderStatus::Confirmed).is_some());
        assert!(status_notification("ORD-1", OrderStatus::Cancelled).is_some());
        assert!(status_notification("ORD-1", OrderStatus::Preparing).is_some());
        assert!(status_notification("ORD-1", OrderStatus::Ready).is_some());
        assert!(status_notification("ORD-1", OrderStatus::Completed).is_some());
        assert!(status_notification("ORD-1", OrderStatus::Pending).is_none());
    }
}
