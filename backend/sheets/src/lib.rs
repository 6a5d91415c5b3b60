//! Google Sheets backed [`RecordSource`](sheetbot_core::RecordSource).

pub mod auth;
pub mod client;
pub mod source;
pub mod table;

pub use auth::{ServiceAccountAuth, SheetsAuth, SHEETS_READONLY_SCOPE};
pub use client::{http_client, SheetsClient};
pub use source::SheetRecordSource;
pub use table::{normalize_header, Table};
