//! Data directory utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Root of everything the CLI writes; an explicit directory wins over the platform default
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::data_dir()
            .context("Could not determine data directory")
            .map(|p| p.join("tabview")),
    }
}

pub fn filters_db(data_dir: &Path) -> PathBuf {
    data_dir.join("filters.db")
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

pub fn ensure_directories(data_dir: &Path) -> Result<()> {
    for dir in [data_dir.to_path_buf(), log_dir(data_dir)] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
    }
    Ok(())
}
