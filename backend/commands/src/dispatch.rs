//! Lookup dispatch: route a parsed query to the record source and send the
//! rendered reply back over the channel.

use std::sync::Arc;

use tracing::{debug, info};

use sheetbot_core::{
    BotResult, Event, EventKind, InboundMessage, MessageSender, QueryKind, RecordSource,
};
use sheetbot_logging::{mask_sender, redact_sensitive_data};

use crate::detection::parse_query;
use crate::format;

/// What a message resolves to before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kind: EventKind,
    /// Order id or SKU, when the text parsed as a query.
    pub key: Option<String>,
    /// Text to send back.
    pub reply: String,
}

/// Parse `text`, look it up in `source`, and render the reply.
///
/// Unrecognized text resolves to the usage hint without touching the
/// source. Source errors propagate; no reply is rendered for them.
pub async fn resolve(source: &dyn RecordSource, text: &str) -> BotResult<Resolution> {
    let Some(query) = parse_query(text) else {
        return Ok(Resolution {
            kind: EventKind::UsageHintSent,
            key: None,
            reply: format::USAGE_HINT.to_string(),
        });
    };

    debug!(kind = %query.kind, key = %query.key, source = source.name(), "Looking up record");

    let (found, reply) = match query.kind {
        QueryKind::Order => match source.find_order(&query.key).await? {
            Some(record) => (true, format::format_order(&record)),
            None => (false, format::order_not_found(&query.key)),
        },
        QueryKind::Inventory => match source.find_inventory(&query.key).await? {
            Some(record) => (true, format::format_inventory(&record)),
            None => (false, format::inventory_not_found(&query.key)),
        },
    };

    Ok(Resolution {
        kind: EventKind::for_lookup(query.kind, found),
        key: Some(query.key),
        reply,
    })
}

/// Wires a record source to a reply channel.
pub struct LookupDispatcher {
    source: Arc<dyn RecordSource>,
    sender: Arc<dyn MessageSender>,
}

impl LookupDispatcher {
    pub fn new(source: Arc<dyn RecordSource>, sender: Arc<dyn MessageSender>) -> Self {
        Self { source, sender }
    }

    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// Resolve `text` against the source without sending anything.
    pub async fn resolve(&self, text: &str) -> BotResult<Resolution> {
        resolve(self.source.as_ref(), text).await
    }

    /// Resolve a message and send the reply to its sender.
    pub async fn handle(&self, message: &InboundMessage) -> BotResult<Event> {
        info!(
            from = %mask_sender(&message.from),
            text = %redact_sensitive_data(&message.text),
            "Handling inbound message"
        );

        let resolution = resolve(self.source.as_ref(), &message.text).await?;
        self.sender
            .send_text(&message.from, &resolution.reply)
            .await?;

        let event = Event::new(resolution.kind, message.from.clone(), resolution.key);
        info!(
            event_id = %event.id,
            kind = %event.kind,
            channel = self.sender.name(),
            "Reply sent"
        );
        Ok(event)
    }
}
