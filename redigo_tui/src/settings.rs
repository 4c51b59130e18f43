//! Layered settings: defaults, then the JSON config file, then the
//! environment and command line.

use clap::Parser;
use redigo_console::{ConsoleConfig, Theme};
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::paths::AppPaths;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid gateway URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Default, Parser)]
#[command(name = "redigo", version, about = "Interactive console for a RediGo command gateway")]
pub struct Args {
    /// Base URL of the command gateway
    #[arg(long, env = "REDIGO_GATEWAY_URL")]
    pub gateway: Option<String>,

    /// Stats polling period in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Colour theme: gruvbox, github or plain
    #[arg(long)]
    pub theme: Option<Theme>,

    /// JSON config file (defaults to config.json in the data directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file (defaults to redigo.log in the data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    gateway_url: Option<String>,
    poll_interval_ms: Option<u64>,
    theme: Option<Theme>,
    console: ConsoleConfig,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub gateway_url: Url,
    pub poll_interval: Duration,
    pub theme: Theme,
    pub console: ConsoleConfig,
}

impl Settings {
    pub fn resolve(args: &Args, paths: &AppPaths) -> Result<Self, SettingsError> {
        let file = match &args.config {
            Some(path) => load_file(path)?,
            None => {
                let path = paths.config_file();
                if path.exists() {
                    load_file(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        let raw_url = args
            .gateway
            .clone()
            .or(file.gateway_url)
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
        let gateway_url = parse_gateway_url(&raw_url)?;

        let poll_ms = args
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .max(MIN_POLL_INTERVAL_MS);

        Ok(Self {
            gateway_url,
            poll_interval: Duration::from_millis(poll_ms),
            theme: args.theme.or(file.theme).unwrap_or_default(),
            console: file.console,
        })
    }
}

fn load_file(path: &Path) -> Result<FileConfig, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {:?}", path);
    Ok(cfg)
}

fn parse_gateway_url(raw: &str) -> Result<Url, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
