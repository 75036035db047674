//! Verification of inline snapshots.
//!
//! A test hands the verifier a value producer, a [`Snapshotting`] strategy,
//! the reference literal from its own source, and where it was called from.
//! The verifier answers with `None` (pass) or a failure message, rewriting
//! the source file when recording is requested or the reference is empty.

pub mod attachments;
pub mod delivery;
pub mod strategy;
mod verifier;

pub use attachments::{AttachmentSink, DirectoryAttachments, LogAttachments};
pub use delivery::{Delivery, DeliveryReceiver, DeliverySink};
pub use strategy::{DiffAttachment, DiffReport, Lines, PrettyDebug, Snapshotting, line_diff};
pub use verifier::{CallSite, InlineSnapshotVerifier, VerifyOptions};
