use super::settings::{SnapshotConfig, SnapshotSettings};
use super::{merge_all, user::load_user_config};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = "kakikomi.toml";
pub const ENV_RECORD: &str = "KAKIKOMI_RECORD";
pub const ENV_TIMEOUT_MS: &str = "KAKIKOMI_TIMEOUT_MS";
pub const ENV_ATTACHMENTS_DIR: &str = "KAKIKOMI_ATTACHMENTS_DIR";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Default, Debug)]
pub struct SettingsLoadOutcome {
    pub settings: SnapshotSettings,
    pub events: Vec<SettingsEvent>,
}

impl SettingsLoadOutcome {
    /// Forward collected events to the `log` facade.
    pub fn log_events(&self) {
        for event in &self.events {
            match event.kind {
                SettingsEventKind::Info => {
                    log::info!(target: "kakikomi::settings", "{}", event.message)
                }
                SettingsEventKind::Warning => {
                    log::warn!(target: "kakikomi::settings", "{}", event.message)
                }
            }
        }
    }
}

/// Resolve settings from every layer.
///
/// Precedence: defaults < user config < `<root>/kakikomi.toml` < environment.
/// Never fails; unreadable layers are skipped with a warning event.
pub fn load_settings(root_path: Option<&Path>) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let user_config = load_user_config_with_events(&mut events);
    let project_config = load_project_config(root_path, &mut events);
    let env_config = load_env_config(&mut events);

    let merged = merge_all(&[user_config, project_config, env_config]);
    let settings = merged.map(SnapshotSettings::from).unwrap_or_default();

    SettingsLoadOutcome { settings, events }
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<SnapshotConfig> {
    match load_user_config() {
        Ok(Some(config)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(config)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_project_config(
    root_path: Option<&Path>,
    events: &mut Vec<SettingsEvent>,
) -> Option<SnapshotConfig> {
    let config_path = root_path?.join(PROJECT_CONFIG_FILE);
    if !config_path.exists() {
        return None;
    }

    match fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<SnapshotConfig>(&contents) {
            Ok(config) => {
                events.push(SettingsEvent::info(format!(
                    "Loaded {}",
                    config_path.display()
                )));
                Some(config)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {}: {}",
                config_path.display(),
                err
            )));
            None
        }
    }
}

fn load_env_config(events: &mut Vec<SettingsEvent>) -> Option<SnapshotConfig> {
    let record = std::env::var(ENV_RECORD)
        .ok()
        .and_then(|value| match parse_flag(&value) {
            Some(flag) => Some(flag),
            None => {
                events.push(SettingsEvent::warning(format!(
                    "Ignoring {}={:?}: expected true/false",
                    ENV_RECORD, value
                )));
                None
            }
        });

    let timeout_ms = std::env::var(ENV_TIMEOUT_MS)
        .ok()
        .and_then(|value| match value.trim().parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Ignoring {}={:?}: {}",
                    ENV_TIMEOUT_MS, value, err
                )));
                None
            }
        });

    let attachments_dir = std::env::var_os(ENV_ATTACHMENTS_DIR)
        .filter(|value: &OsString| !value.is_empty())
        .map(PathBuf::from);

    if record.is_none() && timeout_ms.is_none() && attachments_dir.is_none() {
        return None;
    }
    Some(SnapshotConfig {
        record,
        timeout_ms,
        attachments_dir,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
