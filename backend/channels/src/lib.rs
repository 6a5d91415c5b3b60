//! Messaging channel plumbing for SheetBot.
//!
//! `whatsapp` handles the inbound webhook (handshake + delivery payload),
//! `wa_send` delivers replies through the Graph API.

pub mod wa_send;
pub mod whatsapp;

pub use wa_send::{WhatsAppClient, WhatsAppClientConfig};
pub use whatsapp::{extract_message, parse_delivery, verify_subscription, VerifyQuery};
