//! User configuration loading for kakikomi.
//!
//! User config location: $XDG_CONFIG_HOME/kakikomi/kakikomi.toml
//! Fallback: the platform config directory (`dirs::config_dir`)

use super::settings::SnapshotConfig;
use crate::error::{SnapshotError, SnapshotResult};
use std::fs;
use std::path::PathBuf;

/// Returns the path to the user configuration file.
///
/// Returns None if neither $XDG_CONFIG_HOME nor a platform config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::config_dir()?,
    };
    Some(base.join("kakikomi").join("kakikomi.toml"))
}

/// Load the user configuration, if one exists.
///
/// A missing file is `Ok(None)`; an unreadable or malformed file is an error.
pub fn load_user_config() -> SnapshotResult<Option<SnapshotConfig>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|err| SnapshotError::config(format!("{}: {}", path.display(), err)))
}
