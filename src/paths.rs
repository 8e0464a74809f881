//! XDG locations for files the client writes

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Compute the XDG-compliant log file path.
/// Uses `state_dir` on platforms that have it, falls back to `cache_dir`.
pub fn resolve_log_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .context("Could not determine state or cache directory")?;

    let log_dir = base.join("booksmart");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {log_dir:?}"))?;

    Ok(log_dir.join("booksmart.log"))
}
