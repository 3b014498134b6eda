//! ircrelay - single-threaded IRC-style chat relay.

use clap::Parser;
use ircrelay::config::{self, Config};
use ircrelay::network::Gateway;
use ircrelay::state::ServerInfo;
use ircrelay::{Hub, telemetry};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "ircrelay", version, about = "Single-threaded IRC-style chat relay")]
struct Cli {
    /// Port to listen on.
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Password every client must send with PASS.
    password: String,

    /// Optional TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server name used as the source of replies.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| {
            eprintln!("failed to load {}: {e}", path.display());
            e
        })?,
        None => Config::default(),
    };
    let config = config.with_overrides(Some(cli.port), Some(cli.password), cli.name);

    telemetry::init(config.server.log_format);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration rejected with {} error(s)", errors.len());
    }

    let password = config.server.password.clone().unwrap_or_default();
    let server = ServerInfo::new(config.server.name.clone(), password);
    info!(server = %server.name, port = config.listen.port, "Starting ircrelay");

    let hub = Hub::new(server, config.limits.clone());
    let gateway = Gateway::bind(config.listen.socket_addr(), hub).await?;

    gateway
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Shutdown complete");
    Ok(())
}
