pub mod detection;
pub mod dispatch;
pub mod format;

pub use detection::parse_query;
pub use dispatch::{resolve, LookupDispatcher, Resolution};
pub use format::{format_inventory, format_order, USAGE_HINT};
