//! Reply rendering: lookup results as the plain text sent back.

use sheetbot_core::{InventoryRecord, OrderRecord};

/// Sent when the message is not a recognized lookup.
pub const USAGE_HINT: &str = r#"Send "order 12345" or "inventory SKU123" to get details."#;

pub fn order_not_found(order_id: &str) -> String {
    format!("Order {order_id} not found.")
}

pub fn inventory_not_found(sku: &str) -> String {
    format!("SKU {sku} not found.")
}

/// `Label: value`, or nothing when the value is blank.
fn labeled(label: &str, value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| format!("{label}: {v}"))
}

/// One line per populated field; status always present, `N/A` when blank.
pub fn format_order(record: &OrderRecord) -> String {
    let status = match record.status.trim() {
        "" => "N/A",
        s => s,
    };
    let lines = [
        Some(format!("Order {}", record.order_id)),
        Some(format!("Status: {status}")),
        labeled("ETA", record.eta.as_deref()),
        labeled("Customer", record.customer.as_deref()),
        labeled("Notes", record.notes.as_deref()),
    ];
    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

/// One line per populated field.
pub fn format_inventory(record: &InventoryRecord) -> String {
    let lines = [
        Some(format!("SKU {}", record.sku)),
        labeled("Name", record.name.as_deref()),
        labeled("In Stock", record.in_stock.as_deref()),
        labeled("Location", record.location.as_deref()),
        labeled("Updated", record.updated_at.as_deref()),
    ];
    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_order_summary() {
        let record = OrderRecord {
            order_id: "1001".into(),
            status: "Shipped".into(),
            eta: Some("2024-06-01".into()),
            customer: Some("Ada".into()),
            notes: Some("Leave at door".into()),
        };
        assert_eq!(
            format_order(&record),
            "Order 1001\nStatus: Shipped\nETA: 2024-06-01\nCustomer: Ada\nNotes: Leave at door"
        );
    }

    #[test]
    fn blank_status_reads_na_and_optional_lines_drop() {
        let record = OrderRecord {
            order_id: "7".into(),
            status: "  ".into(),
            eta: Some(String::new()),
            customer: None,
            notes: None,
        };
        assert_eq!(format_order(&record), "Order 7\nStatus: N/A");
    }

    #[test]
    fn inventory_summary_keeps_zero_stock() {
        let record = InventoryRecord {
            sku: "XL-RED".into(),
            name: Some("Red shirt XL".into()),
            in_stock: Some("0".into()),
            location: None,
            updated_at: Some("2024-05-30".into()),
        };
        assert_eq!(
            format_inventory(&record),
            "SKU XL-RED\nName: Red shirt XL\nIn Stock: 0\nUpdated: 2024-05-30"
        );
    }

    #[test]
    fn not_found_messages() {
        assert_eq!(order_not_found("42"), "Order 42 not found.");
        assert_eq!(inventory_not_found("AB-1"), "SKU AB-1 not found.");
        assert_eq!(
            USAGE_HINT,
            "Send \"order 12345\" or \"inventory SKU123\" to get details."
        );
    }
}
