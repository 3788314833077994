//! WhatsApp Cloud API client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::WhatsAppConfig,
    error::{Error, Result},
    gateway::{ListMessage, MessagingGateway},
};

pub struct WhatsAppGateway {
    client: reqwest::Client,
    messages_url: String,
    token: SecretString,
}

impl WhatsAppGateway {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_secs))
            .build()
            .map_err(|e| Error::Gateway(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            messages_url: format!("{}/{}/messages", config.api_base, config.phone_number_id),
            token: config.token.clone(),
        })
    }

    async fn post(&self, payload: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(self.token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("WhatsApp API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "WhatsApp API returned {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for WhatsAppGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "body": body }
        }))
        .await
    }

    async fn send_list(&self, to: &str, message: &ListMessage) -> Result<()> {
        if message.is_truncated() {
            tracing::warn!(
                to,
                rows = message.rows.len(),
                "list message exceeds the channel row limit, truncating"
            );
        }

        let rows: Vec<serde_json::Value> = message
            .rows_for_send()
            .iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.id,
                    "title": row.title,
                    "description": row.description,
                })
            })
            .collect();

        let mut interactive = serde_json::json!({
            "type": "list",
            "body": { "text": message.body },
            "action": {
                "button": message.button,
                "sections": [{
                    "title": message.section_title,
                    "rows": rows,
                }],
            },
        });
        if let Some(header) = &message.header {
            interactive["header"] = serde_json::json!({ "type": "text", "text": header });
        }

        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "interactive",
            "interactive": interactive,
        }))
        .await
    }
}
