pub mod config;
pub mod error;
pub mod recording;
pub mod text;
pub mod verify;

pub use config::{SnapshotSettings, load_settings};
pub use error::{SnapshotError, SnapshotResult};
pub use recording::{FileRecording, RecordingLedger, RewriteContext, rewrite};
pub use text::extract_literal;
pub use verify::{
    CallSite, DeliverySink, DiffAttachment, DiffReport, InlineSnapshotVerifier, Lines,
    PrettyDebug, Snapshotting, VerifyOptions,
};
