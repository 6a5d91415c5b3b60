use std::fmt;

use serde::{Deserialize, Serialize};

/// A text message pulled out of an inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender address (a WhatsApp phone number, no leading `+`).
    pub from: String,
    /// Message body. Empty for non-text messages.
    pub text: String,
}

impl InboundMessage {
    pub fn new(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            text: text.into(),
        }
    }
}

/// Which table a lookup goes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Order,
    Inventory,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Order => write!(f, "order"),
            QueryKind::Inventory => write!(f, "inventory"),
        }
    }
}

/// A classified lookup request, e.g. `order 12345`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    pub kind: QueryKind,
    pub key: String,
}

impl LookupQuery {
    pub fn order(key: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::Order,
            key: key.into(),
        }
    }

    pub fn inventory(key: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::Inventory,
            key: key.into(),
        }
    }
}

/// One row of the orders sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: String,
    /// Empty when the sheet has no status for the order.
    pub status: String,
    pub eta: Option<String>,
    pub customer: Option<String>,
    pub notes: Option<String>,
}

/// One row of the inventory sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub sku: String,
    pub name: Option<String>,
    /// Kept as the sheet's formatted text, so "0" and "12 boxes" both survive.
    pub in_stock: Option<String>,
    pub location: Option<String>,
    pub updated_at: Option<String>,
}
