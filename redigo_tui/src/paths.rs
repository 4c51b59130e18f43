//! Where redigo keeps its config and log file.

use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "redigo";

#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// `<OS data dir>/redigo`, created if missing.
    pub fn new() -> io::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no data directory for this platform")
        })?;
        let root = base.join(APP_DIR);
        std::fs::create_dir_all(&root).map_err(|e| {
            io::Error::new(e.kind(), format!("cannot create {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    #[cfg(test)]
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("redigo.log")
    }
}
