//! Lookup command detection: classify inbound text as an order or
//! inventory query.

use once_cell::sync::Lazy;
use regex::Regex;

use sheetbot_core::{LookupQuery, QueryKind};

/// `order 123`, `status: A-1`, `track #99`, `order123`.
static ORDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:order|status|track)\s*[:#\-]?\s*((?-u:\w)(?-u:[\w\-])*)").unwrap()
});

/// `inventory abc`, `stock: 42`, `sku-xl-red`.
static INVENTORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:inventory|stock|sku)\s*[:#\-]?\s*((?-u:\w)(?-u:[\w\-])*)").unwrap()
});

/// Detect a lookup query at the start of a message.
///
/// The text is trimmed and lowercased before matching, so keywords are
/// case-insensitive and the key comes back lowercased. The key is the first
/// run of ASCII word characters and hyphens after an optional `:`, `#` or
/// `-` separator. Order keywords are tried before inventory keywords.
/// Returns `None` for anything else, including a bare keyword.
pub fn parse_query(text: &str) -> Option<LookupQuery> {
    let lowered = text.trim().to_lowercase();

    [
        (QueryKind::Order, &*ORDER_PATTERN),
        (QueryKind::Inventory, &*INVENTORY_PATTERN),
    ]
    .into_iter()
    .find_map(|(kind, pattern)| {
        pattern.captures(&lowered).map(|caps| LookupQuery {
            kind,
            key: caps[1].to_string(),
        })
    })
}
