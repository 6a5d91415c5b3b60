use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::QueryKind;

/// Record of one handled inbound message.
/// Every message that reaches the dispatcher ends in exactly one Event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    /// Sender the reply went to.
    pub sender: String,
    /// Order id or SKU, when a query was parsed.
    pub key: Option<String>,
}

/// What the dispatcher did with a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Text did not parse; the usage hint was sent
    UsageHintSent,
    /// Order row found and summarized
    OrderFound,
    /// No order row matched
    OrderNotFound,
    /// Inventory row found and summarized
    InventoryFound,
    /// No inventory row matched
    InventoryNotFound,
}

impl EventKind {
    /// Outcome of a lookup of the given kind.
    pub fn for_lookup(kind: QueryKind, found: bool) -> Self {
        match (kind, found) {
            (QueryKind::Order, true) => EventKind::OrderFound,
            (QueryKind::Order, false) => EventKind::OrderNotFound,
            (QueryKind::Inventory, true) => EventKind::InventoryFound,
            (QueryKind::Inventory, false) => EventKind::InventoryNotFound,
        }
    }
}

impl Event {
    pub fn new(kind: EventKind, sender: impl Into<String>, key: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            sender: sender.into(),
            key,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}
