//! Where diff attachments of failing assertions end up.
//!
//! Attachments are best effort: a sink that cannot store them logs and moves
//! on, and never changes whether the assertion passed.

use super::strategy::DiffAttachment;
use std::fs;
use std::path::PathBuf;

pub trait AttachmentSink: Send + Sync {
    fn attach(&self, test_name: &str, attachments: &[DiffAttachment]);
}

/// Emits attachments at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAttachments;

impl AttachmentSink for LogAttachments {
    fn attach(&self, test_name: &str, attachments: &[DiffAttachment]) {
        for attachment in attachments {
            log::debug!(
                target: "kakikomi::attachments",
                "{} / {}:\n{}",
                test_name,
                attachment.name,
                attachment.content
            );
        }
    }
}

/// Writes each attachment to `<dir>/<test name>-<attachment name>`.
#[derive(Clone, Debug)]
pub struct DirectoryAttachments {
    dir: PathBuf,
}

impl DirectoryAttachments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, test_name: &str, attachment_name: &str) -> PathBuf {
        self.dir.join(format!(
            "{}-{}",
            sanitize_file_name(test_name),
            sanitize_file_name(attachment_name)
        ))
    }
}

impl AttachmentSink for DirectoryAttachments {
    fn attach(&self, test_name: &str, attachments: &[DiffAttachment]) {
        if attachments.is_empty() {
            return;
        }
        if let Err(err) = fs::create_dir_all(&self.dir) {
            log::warn!(
                target: "kakikomi::attachments",
                "Cannot create attachment directory {}: {}",
                self.dir.display(),
                err
            );
            return;
        }
        for attachment in attachments {
            let path = self.path_for(test_name, &attachment.name);
            match fs::write(&path, &attachment.content) {
                Ok(()) => log::info!(
                    target: "kakikomi::attachments",
                    "Wrote {}",
                    path.display()
                ),
                Err(err) => log::warn!(
                    target: "kakikomi::attachments",
                    "Failed to write {}: {}",
                    path.display(),
                    err
                ),
            }
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
