use std::sync::Arc;

use crate::{database::DbPool, gateway::MessagingGateway, services::locks::LockRegistry};

/// Application state shared across all HTTP handlers
///
/// Collaborators are injected here rather than constructed at module
/// scope, so tests can swap the gateway for an in-memory fake and the
/// pool for a lazily-connected one.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Outbound messaging gateway (WhatsApp Cloud API in production)
    pub gateway: Arc<dyn MessagingGateway>,
    /// Per-customer serialization of conversation steps
    pub conversation_locks: Arc<LockRegistry>,
    /// Per-order serialization of lifecycle updates
    pub order_locks: Arc<LockRegistry>,
    /// Shared secret echoed during webhook registration
    pub webhook_verify_token: String,
}

impl AppState {
    pub fn new(pool: DbPool, gateway: Arc<dyn MessagingGateway>, webhook_verify_token: String) -> Self {
        Self {
            pool,
            gateway,
            conversation_locks: Arc::new(LockRegistry::new()),
            order_locks: Arc::new(LockRegistry::new()),
            webhook_verify_token,
        }
    }
}
