mod routes;
mod singleton;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workday_core::WorkdayConfig;

use crate::state::AppState;

/// HTTP server for the club work-day volunteer signup page
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/workday/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding events.json and volunteers.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut WorkdayConfig) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("workday_server=info,workday_core=info,tower_http=info")
        }))
        .init();

    let cli = Cli::parse();
    let mut config = WorkdayConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Ensure only one instance owns the data directory
    let data_path = config.data_path();
    let _lock = singleton::acquire_lock(&data_path)?;

    let state = AppState::from_config(&config)?;
    if matches!(state.notifier, workday_core::Notifier::Disabled) {
        tracing::info!("no notify command configured, signup notifications are disabled");
    }

    let app = routes::app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(data_dir = %data_path.display(), "workday-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["workday-server", "--port", "8081", "--data-dir", "/tmp/wd"]);
        let mut config = WorkdayConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.port, 8081);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wd"));
        assert_eq!(config.host, "127.0.0.1");
    }
}
