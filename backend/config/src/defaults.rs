//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{LoggingConfig, ServerConfig, SheetbotConfig, SheetsConfig, WhatsAppConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/whatsapp";

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_GRAPH_API_VERSION: &str = "v21.0";

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_ORDERS_RANGE: &str = "Orders!A:Z";
pub const DEFAULT_INVENTORY_RANGE: &str = "Inventory!A:Z";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SheetbotConfig) -> SheetbotConfig {
    let config = apply_server_defaults(config);
    let config = apply_whatsapp_defaults(config);
    let config = apply_sheets_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: SheetbotConfig) -> SheetbotConfig {
    let server = &mut config.server;
    server.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    server
        .webhook_path
        .get_or_insert_with(|| DEFAULT_WEBHOOK_PATH.to_string());
    config
}

fn apply_whatsapp_defaults(mut config: SheetbotConfig) -> SheetbotConfig {
    let wa = &mut config.whatsapp;
    wa.api_version
        .get_or_insert_with(|| DEFAULT_GRAPH_API_VERSION.to_string());
    wa.graph_base_url
        .get_or_insert_with(|| DEFAULT_GRAPH_BASE_URL.to_string());
    config
}

fn apply_sheets_defaults(mut config: SheetbotConfig) -> SheetbotConfig {
    let sheets = &mut config.sheets;
    sheets
        .orders_range
        .get_or_insert_with(|| DEFAULT_ORDERS_RANGE.to_string());
    sheets
        .inventory_range
        .get_or_insert_with(|| DEFAULT_INVENTORY_RANGE.to_string());
    sheets
        .base_url
        .get_or_insert_with(|| DEFAULT_SHEETS_BASE_URL.to_string());
    sheets
        .token_url
        .get_or_insert_with(|| DEFAULT_TOKEN_URL.to_string());
    config
}

fn apply_logging_defaults(mut config: SheetbotConfig) -> SheetbotConfig {
    let logging = &mut config.logging;
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

// ---------------------------------------------------------------------------
// Accessors that fall back to the defaults above
// ---------------------------------------------------------------------------

impl ServerConfig {
    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn webhook_path(&self) -> &str {
        self.webhook_path.as_deref().unwrap_or(DEFAULT_WEBHOOK_PATH)
    }

    /// `bind:port`, ready for a listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind(), self.port())
    }
}

impl WhatsAppConfig {
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_GRAPH_API_VERSION)
    }

    pub fn graph_base_url(&self) -> &str {
        self.graph_base_url.as_deref().unwrap_or(DEFAULT_GRAPH_BASE_URL)
    }
}

impl SheetsConfig {
    pub fn orders_range(&self) -> &str {
        self.orders_range.as_deref().unwrap_or(DEFAULT_ORDERS_RANGE)
    }

    pub fn inventory_range(&self) -> &str {
        self.inventory_range.as_deref().unwrap_or(DEFAULT_INVENTORY_RANGE)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_SHEETS_BASE_URL)
    }

    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL)
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_defaultable_field() {
        let cfg = apply_all_defaults(SheetbotConfig::default());
        assert_eq!(cfg.server.port, Some(DEFAULT_PORT));
        assert_eq!(cfg.server.webhook_path.as_deref(), Some("/api/whatsapp"));
        assert_eq!(cfg.whatsapp.api_version.as_deref(), Some("v21.0"));
        assert_eq!(cfg.sheets.orders_range.as_deref(), Some("Orders!A:Z"));
        assert_eq!(cfg.logging.json, Some(false));
        // Secrets have no defaults.
        assert!(cfg.whatsapp.verify_token.is_none());
        assert!(cfg.sheets.spreadsheet_id.is_none());
    }

    #[test]
    fn keeps_explicit_values() {
        let mut cfg = SheetbotConfig::default();
        cfg.server.port = Some(8443);
        cfg.sheets.orders_range = Some("Pedidos!A1:F".into());
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.server.port(), 8443);
        assert_eq!(cfg.sheets.orders_range(), "Pedidos!A1:F");
        assert_eq!(cfg.server.listen_addr(), "0.0.0.0:8443");
    }
}
