//! CLI Status Command
//!
//! Asks a running gateway for its health report.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{note_error, note_success};

pub async fn run(port: u16) -> Result<bool> {
    let url = format!("http://127.0.0.1:{port}/api/health");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: Value = resp.json().await?;
            note_success(&format!("SheetBot is running on port {port}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(true)
        }
        Ok(resp) => {
            note_error(&format!("Health check on port {port} returned {}", resp.status()));
            Ok(false)
        }
        Err(_) => {
            note_error(&format!("SheetBot is not running on port {port}"));
            Ok(false)
        }
    }
}
