//! CLI Lookup Command
//!
//! Runs a message through the live sheet without going through WhatsApp,
//! optionally delivering the reply to a real number.

use anyhow::Result;

use sheetbot_commands::resolve;
use sheetbot_config::SheetbotConfig;
use sheetbot_core::MessageSender;

use crate::config;
use crate::terminal_output::{note_info, note_success, paint, DIM};

pub async fn run(cfg: &SheetbotConfig, text: &str, send_to: Option<&str>) -> Result<()> {
    let source = config::record_source(cfg)?;
    let resolution = resolve(&source, text).await?;

    note_info(&format!(
        "{} {}",
        resolution.kind,
        paint(DIM, resolution.key.as_deref().unwrap_or("-"))
    ));
    println!("{}", resolution.reply);

    if let Some(to) = send_to {
        let sender = config::whatsapp_client(cfg)?;
        sender.send_text(to, &resolution.reply).await?;
        note_success(&format!("Reply sent to {to}"));
    }
    Ok(())
}
