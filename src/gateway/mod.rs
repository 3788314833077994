//! Outbound messaging gateway.
//!
//! The conversation engine and the order lifecycle manager only see the
//! `MessagingGateway` trait; the WhatsApp Cloud API client lives behind
//! it so tests can substitute an in-memory fake.

pub mod whatsapp;

use async_trait::async_trait;

use crate::error::Result;

pub use whatsapp::WhatsAppGateway;

/// WhatsApp caps interactive list sections at ten selectable rows.
pub const MAX_SECTION_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

/// A single-select list message with one section.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMessage {
    pub header: Option<String>,
    pub body: String,
    pub button: String,
    pub section_title: String,
    pub rows: Vec<ListRow>,
}

impl ListMessage {
    /// The rows that actually go on the wire. Catalog results beyond
    /// the channel's row limit are truncated; callers that care should
    /// warn when `self.rows` is longer than this.
    pub fn rows_for_send(&self) -> &[ListRow] {
        &self.rows[..self.rows.len().min(MAX_SECTION_ROWS)]
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() > MAX_SECTION_ROWS
    }
}

/// Sends outbound messages to a channel address. Sends may fail
/// transiently; callers treat delivery as best-effort.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<()>;

    async fn send_list(&self, to: &str, message: &ListMessage) -> Result<()>;
}
