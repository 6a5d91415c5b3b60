pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::{BotError, BotResult};
pub use event::{Event, EventKind};
pub use traits::{MessageSender, RecordSource};
pub use types::{InboundMessage, InventoryRecord, LookupQuery, OrderRecord, QueryKind};
