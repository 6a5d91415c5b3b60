//! Header-driven row mapping.
//!
//! The first row of a range is its header. Columns are located by
//! normalized header name, so `Order ID`, `order_id` and `OrderId` all
//! address the same column and column order in the sheet does not matter.

use sheetbot_core::{BotError, BotResult, InventoryRecord, OrderRecord};

const ORDER_ID: &[&str] = &["orderid", "order", "id", "orderno", "ordernumber"];
const STATUS: &[&str] = &["status", "orderstatus"];
const ETA: &[&str] = &["eta", "estimateddelivery", "deliverydate"];
const CUSTOMER: &[&str] = &["customer", "customername", "name"];
const NOTES: &[&str] = &["notes", "note", "comments"];

const SKU: &[&str] = &["sku"];
const NAME: &[&str] = &["name", "product", "item", "productname", "itemname", "description"];
const IN_STOCK: &[&str] = &["instock", "qty", "quantity", "stock", "onhand"];
const LOCATION: &[&str] = &["location", "warehouse", "bin"];
const UPDATED_AT: &[&str] = &["updatedat", "updated", "lastupdated"];

/// Lowercase and keep only ASCII letters and digits.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A fetched range: a normalized header plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let header = values.remove(0).iter().map(|h| normalize_header(h)).collect();
        Self { header, rows: values }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column matching an alias; earlier aliases win.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.header.iter().position(|h| h == alias))
    }

    /// First row whose `col` cell equals `key`, ignoring surrounding
    /// whitespace and ASCII case.
    pub fn find_row(&self, col: usize, key: &str) -> Option<&[String]> {
        let key = key.trim();
        self.rows
            .iter()
            .find(|row| {
                row.get(col)
                    .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(key))
            })
            .map(Vec::as_slice)
    }
}

/// Trimmed cell value; blank and missing cells (rows shorter than the
/// header) are `None`.
fn cell(row: &[String], col: Option<usize>) -> Option<String> {
    col.and_then(|c| row.get(c))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn key_column(table: &Table, aliases: &[&str], sheet: &str, label: &str) -> BotResult<usize> {
    table
        .column(aliases)
        .ok_or_else(|| BotError::Malformed(format!("{sheet} sheet has no {label} column")))
}

/// Find an order row by id. An empty range has no orders.
pub fn find_order(table: &Table, order_id: &str) -> BotResult<Option<OrderRecord>> {
    if table.is_empty() {
        return Ok(None);
    }
    let id_col = key_column(table, ORDER_ID, "orders", "order id")?;
    let Some(row) = table.find_row(id_col, order_id) else {
        return Ok(None);
    };

    Ok(Some(OrderRecord {
        order_id: cell(row, Some(id_col)).unwrap_or_else(|| order_id.to_string()),
        status: cell(row, table.column(STATUS)).unwrap_or_default(),
        eta: cell(row, table.column(ETA)),
        customer: cell(row, table.column(CUSTOMER)),
        notes: cell(row, table.column(NOTES)),
    }))
}

/// Find an inventory row by SKU. An empty range has no items.
pub fn find_inventory(table: &Table, sku: &str) -> BotResult<Option<InventoryRecord>> {
    if table.is_empty() {
        return Ok(None);
    }
    let sku_col = key_column(table, SKU, "inventory", "sku")?;
    let Some(row) = table.find_row(sku_col, sku) else {
        return Ok(None);
    };

    Ok(Some(InventoryRecord {
        sku: cell(row, Some(sku_col)).unwrap_or_else(|| sku.to_string()),
        name: cell(row, table.column(NAME)),
        in_stock: cell(row, table.column(IN_STOCK)),
        location: cell(row, table.column(LOCATION)),
        updated_at: cell(row, table.column(UPDATED_AT)),
    }))
}
