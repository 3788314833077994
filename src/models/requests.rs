//! Wire-level request types: the WhatsApp webhook payload and the
//! operator status-change request.

use serde::{Deserialize, Serialize};

use crate::models::orders::{OrderStatus, PaymentStatus};

/// PATCH /api/v1/orders/{id}/status body. At least one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// One normalized inbound event: the single field of user intent is the
/// list/button selection id when the message was interactive, else the
/// free text body.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Customer channel address (WhatsApp phone number).
    pub from: String,
    /// Normalized input: selection id or text body.
    pub input: String,
    /// The business number the customer wrote to; resolves the tenant.
    pub display_phone_number: String,
    /// Contact profile name, when the channel shares it.
    pub contact_name: Option<String>,
}

// ── WhatsApp Cloud API webhook payload ──────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub value: WebhookValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookValue {
    pub metadata: WebhookMetadata,
    #[serde(default)]
    pub contacts: Vec<WebhookContact>,
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMetadata {
    pub display_phone_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookContact {
    pub profile: WebhookProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookProfile {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<WebhookText>,
    pub interactive: Option<WebhookInteractive>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookText {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInteractive {
    pub list_reply: Option<WebhookReply>,
    pub button_reply: Option<WebhookReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookReply {
    pub id: String,
}

impl WebhookPayload {
    /// Flattens the nested webhook payload into normalized inbound
    /// messages. Non-message changes and unsupported message kinds
    /// yield nothing.
    pub fn inbound_messages(&self) -> Vec<InboundMessage> {
        if self.object != "whatsapp_business_account" {
            return Vec::new();
        }

        let mut inbound = Vec::new();
        for entry in &self.entry {
            for change in &entry.changes {
                let value = &change.value;
                let contact_name = value.contacts.first().map(|c| c.profile.name.clone());

                for message in &value.messages {
                    let input = match message.kind.as_str() {
                        "text" => message.text.as_ref().map(|t| t.body.clone()),
                        "interactive" => message.interactive.as_ref().and_then(|i| {
                            i.list_reply
                                .as_ref()
                                .or(i.button_reply.as_ref())
                                .map(|r| r.id.clone())
                        }),
                        _ => None,
                    };

                    let Some(input) = input else { continue };
                    inbound.push(InboundMessage {
                        from: message.from.clone(),
                        input,
                        display_phone_number: value.metadata.display_phone_number.clone(),
                        contact_name: contact_name.clone(),
                    });
                }
            }
        }
        inbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn extracts_text_message() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "display_phone_number": "233200000001" },
                        "contacts": [{ "profile": { "name": "Ama" } }],
                        "messages": [{
                            "from": "233540000002",
                            "type": "text",
                            "text": { "body": "hi" }
                        }]
                    }
                }]
            }]
        }));

        let messages = payload.inbound_messages();
        assert_eq!(
            messages,
            vec![InboundMessage {
                from: "233540000002".to_string(),
                input: "hi".to_string(),
                display_phone_number: "233200000001".to_string(),
                contact_name: Some("Ama".to_string()),
            }]
        );
    }

    #[test]
    fn interactive_reply_uses_selection_id() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "display_phone_number": "233200000001" },
                        "messages": [{
                            "from": "233540000002",
                            "type": "interactive",
                            "interactive": {
                                "list_reply": { "id": "0198c1f3-0000-7000-8000-000000000001" }
                            }
                        }]
                    }
                }]
            }]
        }));

        let messages = payload.inbound_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].input, "0198c1f3-0000-7000-8000-000000000001");
        assert_eq!(messages[0].contact_name, None);
    }

    #[test]
    fn ignores_non_whatsapp_objects_and_status_changes() {
        let other = payload(serde_json::json!({
            "object": "page",
            "entry": []
        }));
        assert!(other.inbound_messages().is_empty());

        // Delivery status callbacks carry no messages array.
        let status_only = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "display_phone_number": "233200000001" }
                    }
                }]
            }]
        }));
        assert!(status_only.inbound_messages().is_empty());
    }

    #[test]
    fn unsupported_message_kinds_are_skipped() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "metadata": { "display_phone_number": "233200000001" },
                        "messages": [{ "from": "233540000002", "type": "image" }]
                    }
                }]
            }]
        }));
        assert!(payload.inbound_messages().is_empty());
    }

    #[test]
    fn update_request_accepts_camel_case_payment_status() {
        let req: UpdateOrderStatusRequest =
            serde_json::from_str(r#"{"status":"CONFIRMED","paymentStatus":"VERIFIED"}"#).unwrap();
        assert_eq!(req.status, Some(OrderStatus::Confirmed));
        assert_eq!(req.payment_status, Some(PaymentStatus::Verified));
    }
}
