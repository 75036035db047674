pub mod load;
pub mod settings;
pub mod user;

pub use load::{
    ENV_ATTACHMENTS_DIR, ENV_RECORD, ENV_TIMEOUT_MS, PROJECT_CONFIG_FILE, SettingsEvent,
    SettingsEventKind, SettingsLoadOutcome, load_settings,
};
pub use settings::{DEFAULT_TIMEOUT, SnapshotConfig, SnapshotSettings};
pub use user::{load_user_config, user_config_path};

/// Merge a stack of optional configs; later entries take precedence.
pub fn merge_all(configs: &[Option<SnapshotConfig>]) -> Option<SnapshotConfig> {
    configs.iter().cloned().reduce(merge_config).flatten()
}

/// Merge two SnapshotConfigs, preferring values from `primary` over `fallback`
pub fn merge_config(
    fallback: Option<SnapshotConfig>,
    primary: Option<SnapshotConfig>,
) -> Option<SnapshotConfig> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(config), None) => Some(config),
        (None, Some(config)) => Some(config),
        (Some(fallback), Some(primary)) => Some(SnapshotConfig {
            record: primary.record.or(fallback.record),
            timeout_ms: primary.timeout_ms.or(fallback.timeout_ms),
            attachments_dir: primary.attachments_dir.or(fallback.attachments_dir),
        }),
    }
}
