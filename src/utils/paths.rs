//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.interview-coach/.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application directory (~/.interview-coach/)
pub fn app_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".interview-coach"))
}

/// Get the config file path (~/.interview-coach/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Read a material file (question bank, resume, job description) as text.
///
/// Empty or whitespace-only files count as absent.
pub fn read_material(path: &Path) -> AppResult<Option<String>> {
    if !path.exists() {
        return Err(AppError::not_found(format!(
            "material file {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(content).filter(|c| !c.trim().is_empty()))
}
