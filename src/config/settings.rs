use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How long a strategy may take to deliver a snapshot unless configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One layer of configuration as written in `kakikomi.toml`.
///
/// Every field is optional so layers can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SnapshotConfig {
    pub record: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub attachments_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSettings {
    /// Rewrite every mismatching snapshot instead of failing
    pub record: bool,
    pub timeout: Duration,
    /// Where diff attachments are written for failing assertions
    pub attachments_dir: Option<PathBuf>,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            record: false,
            timeout: DEFAULT_TIMEOUT,
            attachments_dir: None,
        }
    }
}

impl From<SnapshotConfig> for SnapshotSettings {
    fn from(config: SnapshotConfig) -> Self {
        let defaults = SnapshotSettings::default();
        Self {
            record: config.record.unwrap_or(defaults.record),
            timeout: config
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            attachments_dir: config.attachments_dir,
        }
    }
}
