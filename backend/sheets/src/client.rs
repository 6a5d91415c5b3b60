use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use sheetbot_core::{BotError, BotResult};

use crate::auth::SheetsAuth;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client shared by the values API and the token exchange.
pub fn http_client() -> BotResult<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| BotError::Transport(e.to_string()))
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

/// Cells come back as formatted strings, but numbers and booleans can
/// still appear; render them as text.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Read-only client for one spreadsheet.
pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    auth: SheetsAuth,
}

impl SheetsClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        auth: SheetsAuth,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            auth,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn auth(&self) -> &SheetsAuth {
        &self.auth
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// Fetch `range` as rows of formatted cell text.
    pub async fn values(&self, range: &str) -> BotResult<Vec<Vec<String>>> {
        let request = self.http.get(self.values_url(range)).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]);
        let res = self
            .auth
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let raw = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            warn!(status = status.as_u16(), %range, %message, "Sheets read failed");
            return Err(BotError::Sheets {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = res
            .json()
            .await
            .map_err(|e| BotError::Malformed(format!("unreadable values response: {e}")))?;

        let rows: Vec<Vec<String>> = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        debug!(%range, rows = rows.len(), "Fetched sheet range");
        Ok(rows)
    }
}
