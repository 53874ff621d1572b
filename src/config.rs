/// Runtime configuration resolved from CLI flags and the environment.
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::store::STORE_FILE_NAME;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>, log_level: String) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            log_level,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Creates the data directory if needed.
    pub fn ensure_data_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(&self.data_dir)
    }
}

/// Returns the default data directory inside the user's local data dir.
/// Falls back to the working directory when no data dir is found.
pub fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("loopos"),
        None => PathBuf::from("."),
    }
}
