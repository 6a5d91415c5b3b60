//! WhatsApp Sender
//!
//! Sends plain text replies through the Cloud API `/{phone_number_id}/messages`
//! endpoint of the Graph API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use sheetbot_core::{BotError, BotResult, MessageSender};
use sheetbot_logging::mask_sender;

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct WhatsAppClientConfig {
    /// Graph API origin, e.g. `https://graph.facebook.com`.
    pub graph_base_url: String,
    /// Version segment, e.g. `v21.0`.
    pub api_version: String,
    pub phone_number_id: String,
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// Graph wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OutboundText<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    preview_url: bool,
    body: &'a str,
}

#[derive(Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

/// Pull `error.message` out of a Graph API error body, if it has one.
fn graph_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GraphErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct WhatsAppClient {
    config: WhatsAppClientConfig,
    http: Client,
}

impl WhatsAppClient {
    pub fn new(config: WhatsAppClientConfig) -> BotResult<Self> {
        let http = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(Self::with_http(config, http))
    }

    pub fn with_http(config: WhatsAppClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.config.graph_base_url.trim_end_matches('/'),
            self.config.api_version,
            self.config.phone_number_id
        )
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send_text(&self, to: &str, body: &str) -> BotResult<()> {
        let payload = OutboundText {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody {
                preview_url: false,
                body,
            },
        };

        let res = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let raw = res.text().await.unwrap_or_default();
            let message = graph_error_message(&raw).unwrap_or(raw);
            error!(status = status.as_u16(), %message, "WhatsApp send failed");
            return Err(BotError::WhatsApp {
                status: status.as_u16(),
                message,
            });
        }

        info!(to = %mask_sender(to), "Sent WhatsApp text");
        Ok(())
    }
}
