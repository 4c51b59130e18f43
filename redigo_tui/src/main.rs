//! redigo: terminal console for a RediGo command gateway.

mod app;
mod http;
mod input;
mod paths;
mod poller;
mod session;
mod settings;
mod ui;

use clap::Parser;
use paths::AppPaths;
use settings::{Args, Settings};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup application paths
    let paths = AppPaths::new()?;
    let log_file = args.log_file.clone().unwrap_or_else(|| paths.log_file());
    init_logging(&log_file)?;
    info!("Data directory: {:?}", paths.data_dir());

    let settings = Settings::resolve(&args, &paths)?;
    app::run(settings).await?;
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("REDIGO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
