//! CLI Doctor Command
//!
//! Reports which settings are present and replays the validation report.

use anyhow::Result;

use sheetbot_config::{LoadedConfig, SheetbotConfig};

use crate::terminal_output::{
    note_error, note_info, note_success, note_warn, paint, render_table, DIM, GREEN, RED, YELLOW,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    Set,
    Missing,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub setting: &'static str,
    pub env: &'static str,
    pub state: CheckState,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn check(setting: &'static str, env: &'static str, is_set: bool, required: bool) -> Check {
    let state = match (is_set, required) {
        (true, _) => CheckState::Set,
        (false, true) => CheckState::Missing,
        (false, false) => CheckState::Optional,
    };
    Check { setting, env, state }
}

/// One row per setting the bridge reads.
pub fn checks(config: &SheetbotConfig) -> Vec<Check> {
    let wa = &config.whatsapp;
    let sheets = &config.sheets;
    let has_service_account = sheets
        .service_account
        .as_ref()
        .is_some_and(|sa| !sa.client_email.is_empty() && !sa.private_key.is_empty());
    let has_api_key = present(sheets.api_key.as_deref());
    let has_credentials = has_service_account || has_api_key;

    vec![
        check("whatsapp.verifyToken", "WHATSAPP_VERIFY_TOKEN", present(wa.verify_token.as_deref()), true),
        check("whatsapp.accessToken", "WHATSAPP_TOKEN", present(wa.access_token.as_deref()), true),
        check(
            "whatsapp.phoneNumberId",
            "WHATSAPP_PHONE_NUMBER_ID",
            present(wa.phone_number_id.as_deref()),
            true,
        ),
        check("sheets.spreadsheetId", "GOOGLE_SHEETS_ID", present(sheets.spreadsheet_id.as_deref()), true),
        // Either credential satisfies the requirement; the other becomes optional.
        check(
            "sheets.serviceAccount",
            "GOOGLE_SERVICE_ACCOUNT_EMAIL + GOOGLE_PRIVATE_KEY",
            has_service_account,
            !has_credentials,
        ),
        check("sheets.apiKey", "GOOGLE_API_KEY", has_api_key, !has_credentials),
        check("sheets.ordersRange", "ORDERS_RANGE", sheets.orders_range.is_some(), false),
        check("sheets.inventoryRange", "INVENTORY_RANGE", sheets.inventory_range.is_some(), false),
        check("logging.dir", "SHEETBOT_LOG_DIR", config.logging.dir.is_some(), false),
    ]
}

/// Executes the full diagnosis. Returns whether everything required is in place.
pub fn run(loaded: &LoadedConfig) -> Result<bool> {
    println!("\n🔍 Running SheetBot Doctor...\n");

    match &loaded.source {
        Some(path) => note_info(&format!("Config file: {}", path.display())),
        None => note_info("No config file found; using environment variables only"),
    }
    println!();

    let rows: Vec<Vec<String>> = checks(&loaded.config)
        .into_iter()
        .map(|c| {
            let status = match c.state {
                CheckState::Set => paint(GREEN, "set"),
                CheckState::Missing => paint(RED, "MISSING"),
                CheckState::Optional => paint(DIM, "not set"),
            };
            vec![status, c.setting.to_string(), paint(DIM, c.env)]
        })
        .collect();
    print!("{}", render_table(&["Status", "Setting", "Environment"], &rows));
    println!();

    for warning in &loaded.report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &loaded.report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    let healthy = loaded.report.is_valid();
    if healthy {
        note_success("All required settings are in place.");
    } else {
        println!("{}", paint(YELLOW, "Fix the errors above before running `sheetbot serve`."));
    }
    Ok(healthy)
}
