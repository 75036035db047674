use super::delivery::DeliverySink;
use similar::TextDiff;
use std::fmt::Debug;

/// Named text produced alongside a failed comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffAttachment {
    pub name: String,
    pub content: String,
}

impl DiffAttachment {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Why a snapshot differs from its reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffReport {
    pub message: String,
    pub attachments: Vec<DiffAttachment>,
}

/// Turns values of type `V` into text and compares two such texts.
pub trait Snapshotting<V> {
    /// Serialize `value` and hand the result to `sink` exactly once.
    fn snapshot(&self, value: V, sink: DeliverySink);

    /// `None` when `actual` matches `reference`.
    fn diff(&self, reference: &str, actual: &str) -> Option<DiffReport>;
}

/// Snapshots string values as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lines;

impl<V: AsRef<str>> Snapshotting<V> for Lines {
    fn snapshot(&self, value: V, sink: DeliverySink) {
        sink.deliver(value.as_ref());
    }

    fn diff(&self, reference: &str, actual: &str) -> Option<DiffReport> {
        line_diff(reference, actual)
    }
}

/// Snapshots any `Debug` value through its pretty (`{:#?}`) form.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrettyDebug;

impl<V: Debug> Snapshotting<V> for PrettyDebug {
    fn snapshot(&self, value: V, sink: DeliverySink) {
        sink.deliver(format!("{value:#?}"));
    }

    fn diff(&self, reference: &str, actual: &str) -> Option<DiffReport> {
        line_diff(reference, actual)
    }
}

/// Line-level comparison rendered as a unified diff.
pub fn line_diff(reference: &str, actual: &str) -> Option<DiffReport> {
    if reference == actual {
        return None;
    }

    let diff = TextDiff::from_lines(reference, actual);
    let patch = diff
        .unified_diff()
        .context_radius(3)
        .header("reference", "actual")
        .to_string();

    Some(DiffReport {
        message: patch.clone(),
        attachments: vec![DiffAttachment::new("difference.patch", patch)],
    })
}
