//! Structured logging for SheetBot.
//!
//! Console output (pretty or JSON), optional daily-rolling NDJSON files,
//! and redaction of phone numbers and tokens before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::{mask_sender, redact_sensitive_data};
