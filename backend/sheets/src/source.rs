use async_trait::async_trait;
use tracing::debug;

use sheetbot_core::{BotResult, InventoryRecord, OrderRecord, RecordSource};

use crate::client::SheetsClient;
use crate::table::{self, Table};

/// Answers lookups by reading the orders and inventory ranges of one
/// spreadsheet on every request. Nothing is cached between messages.
pub struct SheetRecordSource {
    client: SheetsClient,
    orders_range: String,
    inventory_range: String,
}

impl SheetRecordSource {
    pub fn new(
        client: SheetsClient,
        orders_range: impl Into<String>,
        inventory_range: impl Into<String>,
    ) -> Self {
        Self {
            client,
            orders_range: orders_range.into(),
            inventory_range: inventory_range.into(),
        }
    }

    pub fn client(&self) -> &SheetsClient {
        &self.client
    }

    pub fn orders_range(&self) -> &str {
        &self.orders_range
    }

    pub fn inventory_range(&self) -> &str {
        &self.inventory_range
    }

    async fn table(&self, range: &str) -> BotResult<Table> {
        let values = self.client.values(range).await?;
        Ok(Table::from_values(values))
    }
}

#[async_trait]
impl RecordSource for SheetRecordSource {
    fn name(&self) -> &str {
        "google_sheets"
    }

    async fn find_order(&self, order_id: &str) -> BotResult<Option<OrderRecord>> {
        let table = self.table(&self.orders_range).await?;
        let found = table::find_order(&table, order_id)?;
        debug!(rows = table.row_count(), found = found.is_some(), "Order lookup");
        Ok(found)
    }

    async fn find_inventory(&self, sku: &str) -> BotResult<Option<InventoryRecord>> {
        let table = self.table(&self.inventory_range).await?;
        let found = table::find_inventory(&table, sku)?;
        debug!(rows = table.row_count(), found = found.is_some(), "Inventory lookup");
        Ok(found)
    }
}
