mod config;
mod config_cmd;
mod doctor_cmd;
mod lookup_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use sheetbot_config::LoadedConfig;
use sheetbot_core::RecordSource;
use sheetbot_gateway::{start_server, GatewayState};
use sheetbot_logging::init_logger;

#[derive(Parser)]
#[command(name = "sheetbot")]
#[command(about = "SheetBot: WhatsApp order and inventory lookups backed by Google Sheets")]
#[command(version)]
struct Cli {
    /// YAML config file (default: $SHEETBOT_CONFIG, then ./sheetbot.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether a local server is up
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer a message against the live sheet and print the reply
    Lookup {
        /// Message text, e.g. "order 12345"
        text: String,
        /// Also send the reply to this WhatsApp number
        #[arg(long)]
        send_to: Option<String>,
    },
    /// Report missing or invalid settings
    Doctor,
    /// Print the effective config with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            terminal_output::note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let loaded = config::load(cli.config.as_deref()).await?;

    // Only the server logs at the configured level; the one-shot commands
    // keep stdout for their own output.
    let level = match cli.command {
        Commands::Serve { .. } => None,
        _ => Some("warn"),
    };
    init_logger(&config::log_options(&loaded.config, level))
        .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve { port } => {
            run_server(loaded, port).await?;
            Ok(true)
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or_else(|| loaded.config.server.port())).await
        }
        Commands::Lookup { text, send_to } => {
            lookup_cmd::run(&loaded.config, &text, send_to.as_deref()).await?;
            Ok(true)
        }
        Commands::Doctor => doctor_cmd::run(&loaded),
        Commands::Config => {
            config_cmd::run(&loaded)?;
            Ok(true)
        }
    }
}

async fn run_server(loaded: LoadedConfig, port: Option<u16>) -> Result<()> {
    loaded.log_report();
    if !loaded.report.is_valid() {
        bail!(
            "config has {} error(s); run `sheetbot doctor` for details",
            loaded.report.errors.len()
        );
    }

    let mut cfg = loaded.config;
    if let Some(port) = port {
        cfg.server.port = Some(port);
    }

    let dispatcher = config::dispatcher(&cfg)?;
    info!(
        source = dispatcher.source().name(),
        config = ?loaded.source,
        "Lookup dispatcher ready"
    );

    let state = GatewayState::new(
        cfg.whatsapp.verify_token.clone().unwrap_or_default(),
        cfg.server.webhook_path(),
        Arc::new(dispatcher),
    );
    let addr: SocketAddr = cfg
        .server
        .listen_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", cfg.server.listen_addr()))?;

    info!(%addr, "Starting SheetBot");
    start_server(addr, state).await
}
