//! Config validation: checks with user-friendly error messages.

use crate::schema::SheetbotConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).map(str::is_empty).unwrap_or(true)
}

/// `:id`, `*rest` and `{id}` are parameter syntax to the router, not literals.
fn is_route_pattern(segment: &str) -> bool {
    segment.starts_with(':') || segment.starts_with('*') || segment.contains(['{', '}'])
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SheetbotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_whatsapp(config, &mut report);
    validate_sheets(config, &mut report);
    report
}

fn validate_server(config: &SheetbotConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if let Some(port) = server.port {
        if port == 0 {
            report.error("server.port", "Port must be > 0");
        } else if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "server.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
    if let Some(path) = &server.webhook_path {
        if !path.starts_with('/') {
            report.error(
                "server.webhookPath",
                format!("Webhook path '{path}' must start with '/'"),
            );
        } else if path == "/" || path == "/api/health" {
            report.error(
                "server.webhookPath",
                format!("Webhook path '{path}' collides with a built-in route"),
            );
        } else if let Some(segment) = path.split('/').find(|s| is_route_pattern(s)) {
            report.error(
                "server.webhookPath",
                format!("Webhook path segment '{segment}' would be read as a route parameter"),
            );
        }
    }
}

fn validate_whatsapp(config: &SheetbotConfig, report: &mut ValidationReport) {
    let wa = &config.whatsapp;
    if is_blank(wa.verify_token.as_deref()) {
        report.error(
            "whatsapp.verifyToken",
            "Verify token is required (WHATSAPP_VERIFY_TOKEN)",
        );
    }
    if is_blank(wa.access_token.as_deref()) {
        report.error(
            "whatsapp.accessToken",
            "Access token is required to send replies (WHATSAPP_TOKEN)",
        );
    }
    if is_blank(wa.phone_number_id.as_deref()) {
        report.error(
            "whatsapp.phoneNumberId",
            "Phone number id is required to send replies (WHATSAPP_PHONE_NUMBER_ID)",
        );
    }
}

fn validate_sheets(config: &SheetbotConfig, report: &mut ValidationReport) {
    let sheets = &config.sheets;
    if is_blank(sheets.spreadsheet_id.as_deref()) {
        report.error(
            "sheets.spreadsheetId",
            "Spreadsheet id is required (GOOGLE_SHEETS_ID)",
        );
    }

    for (path, range) in [
        ("sheets.ordersRange", &sheets.orders_range),
        ("sheets.inventoryRange", &sheets.inventory_range),
    ] {
        if let Some(range) = range {
            if range.trim().is_empty() {
                report.error(path, "Range cannot be empty");
            } else if !range.contains('!') {
                report.warn(
                    path,
                    format!("Range '{range}' has no sheet name; the first tab will be used"),
                );
            }
        }
    }

    match (&sheets.service_account, is_blank(sheets.api_key.as_deref())) {
        (Some(account), api_key_missing) => {
            if account.client_email.trim().is_empty() {
                report.error(
                    "sheets.serviceAccount.clientEmail",
                    "Service account email is required (GOOGLE_SERVICE_ACCOUNT_EMAIL)",
                );
            }
            if !account.private_key.contains("PRIVATE KEY") {
                report.error(
                    "sheets.serviceAccount.privateKey",
                    "Private key must be a PEM block (GOOGLE_PRIVATE_KEY)",
                );
            }
            if !api_key_missing {
                report.warn(
                    "sheets.apiKey",
                    "Both an API key and a service account are set; the service account is used",
                );
            }
        }
        (None, true) => {
            report.error(
                "sheets",
                "Either a service account or an API key is required to read the spreadsheet",
            );
        }
        (None, false) => {}
    }
}
