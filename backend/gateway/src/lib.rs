//! SheetBot Gateway HTTP Server
//!
//! Hosts the WhatsApp webhook, the health check, and a landing page.

pub mod health_api;
pub mod landing;
pub mod server;
pub mod webhook;

pub use server::{build_router, start_server, GatewayState};
