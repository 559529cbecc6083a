use anyhow::Result;
use clap::Parser;
use scsc_core::config::{self, ServiceConfig};
use scsc_server::app::{router, AppState};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "SCSC evaluation API", long_about = None)]
struct Args {
    /// Listen address (overrides SCSC_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// SQLite result log (overrides SCSC_DB)
    #[arg(long)]
    db: Option<PathBuf>,
}

use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(event = "scsc.server.signal_error", error = %e);
    }
    tracing::info!(event = "scsc.server.shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging needs the level before the rest of the config is validated.
    config::load_dotenv();
    init_logging(&std::env::var("SCSC_LOG").unwrap_or_else(|_| "info".to_string()));

    let mut cfg = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(event = "scsc.server.config_error", error = %e);
            return Err(e.into());
        }
    };
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(db) = args.db {
        cfg.db_path = db;
    }

    tracing::info!(event = "scsc.server.start", config = ?cfg);

    let state = AppState::from_config(&cfg)?;
    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    tracing::info!(event = "scsc.server.listening", addr = %listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
