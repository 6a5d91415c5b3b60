//! WhatsApp Cloud API inbound side: the subscription handshake and the
//! message delivery payload.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use sheetbot_core::InboundMessage;

/// Subscription handshake query (`GET ?hub.mode=subscribe&...`).
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Decide the subscription handshake.
///
/// Returns the challenge to echo (empty when the platform sent none) if
/// the mode is `subscribe` and the token matches; `None` otherwise.
pub fn verify_subscription(query: &VerifyQuery, expected_token: &str) -> Option<String> {
    if expected_token.is_empty() {
        warn!("WhatsApp verify token is not configured; rejecting handshake");
        return None;
    }
    let mode_ok = query.mode.as_deref() == Some("subscribe");
    let token_ok = query.verify_token.as_deref() == Some(expected_token);
    if mode_ok && token_ok {
        Some(query.challenge.clone().unwrap_or_default())
    } else {
        None
    }
}

/// Pull the first message out of a delivery.
///
/// Only `entry[0].changes[0].value.messages[0]` is read; the rest of the
/// payload may hold anything. The sender must be a non-empty string. A
/// missing or null body (image, sticker, ...) yields an empty `text`, any
/// other non-string body yields `None`.
pub fn extract_message(payload: &Value) -> Option<InboundMessage> {
    let message = payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?
        .get("messages")?
        .get(0)?;

    let from = message
        .get("from")
        .and_then(Value::as_str)
        .filter(|f| !f.is_empty())?;
    let text = match message.get("text").and_then(|t| t.get("body")) {
        None | Some(Value::Null) => "",
        Some(Value::String(body)) => body.as_str(),
        Some(_) => return None,
    };

    debug!(
        message_id = message.get("id").and_then(serde_json::Value::as_str).unwrap_or(""),
        msg_type = message.get("type").and_then(serde_json::Value::as_str).unwrap_or(""),
        "Extracted WhatsApp message"
    );
    Some(InboundMessage::new(from, text))
}

/// Parse a raw POST body and extract its first message.
///
/// Malformed JSON yields `None`.
pub fn parse_delivery(body: &[u8]) -> Option<InboundMessage> {
    match serde_json::from_slice::<Value>(body) {
        Ok(payload) => extract_message(&payload),
        Err(e) => {
            debug!(error = %e, "Ignoring undecodable WhatsApp delivery");
            None
        }
    }
}
