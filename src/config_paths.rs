//! Centralized configuration paths for mdview
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/mdview/`
//! - Windows: `%APPDATA%\mdview\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "mdview";

/// Base config directory for mdview
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/mdview`
///   - Else: `~/.config/mdview`
///
/// Windows:
///   - `%APPDATA%\mdview`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/mdview/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/mdview/keymap.yaml`
pub fn keymap_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keymap.yaml"))
}

/// `~/.config/mdview/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// `~/.config/mdview/registry/` - shared between running instances
pub fn registry_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("registry"))
}

/// `~/.config/mdview/preview/`
pub fn preview_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("preview"))
}

/// `~/.config/mdview/queries/` - user overrides for highlight queries
pub fn queries_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("queries"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

/// Ensure registry dir exists, returning it
pub fn ensure_registry_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let registry = config.join("registry");
    ensure_dir(&registry)?;
    Ok(registry)
}

/// Ensure preview dir exists, returning it
pub fn ensure_preview_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let preview = config.join("preview");
    ensure_dir(&preview)?;
    Ok(preview)
}
