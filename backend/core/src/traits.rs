use async_trait::async_trait;

use crate::error::BotResult;
use crate::types::{InventoryRecord, OrderRecord};

/// Tabular data source that answers order and inventory lookups.
///
/// `Ok(None)` means the source was reachable but no row matched.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable source name for logging.
    fn name(&self) -> &str;

    /// Find the order whose id matches `order_id`.
    async fn find_order(&self, order_id: &str) -> BotResult<Option<OrderRecord>>;

    /// Find the inventory row whose SKU matches `sku`.
    async fn find_inventory(&self, sku: &str) -> BotResult<Option<InventoryRecord>>;
}

/// Outbound side of a messaging channel.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Channel name (e.g., "whatsapp").
    fn name(&self) -> &str;

    /// Deliver a plain text message to `to`.
    async fn send_text(&self, to: &str, body: &str) -> BotResult<()>;
}
