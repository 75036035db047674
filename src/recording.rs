//! Source recording: rewriting inline literals and tracking line drift.
//!
//! Call sites report the line they had when the test binary was built. Once
//! one rewrite grows or shrinks a file, every later call site in that file is
//! off by the accumulated delta; the [`RecordingLedger`] keeps that delta.

pub mod ledger;
pub mod rewriter;
mod store;

pub use ledger::{FileRecording, RecordingLedger};
pub use rewriter::{RewriteContext, rewrite};
pub use store::write_source;
