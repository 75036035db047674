use path_clean::PathClean;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One rewrite already committed to a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileRecording {
    /// Call site line as originally reported, before drift correction
    pub line: usize,
    /// Net number of lines the rewrite added (negative when it removed lines)
    pub difference: isize,
}

impl FileRecording {
    pub fn new(line: usize, difference: isize) -> Self {
        Self { line, difference }
    }
}

/// Rewrites applied during one run, per file, in the order they happened.
///
/// The ledger is append-only for its lifetime. Hold one per test process (or
/// call [`RecordingLedger::clear`] between independent runs); it is not
/// synchronised, so rewrites of the same file must be sequential.
#[derive(Clone, Debug, Default)]
pub struct RecordingLedger {
    files: HashMap<PathBuf, Vec<FileRecording>>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(file: &Path) -> PathBuf {
        file.clean()
    }

    /// Current position of a call site originally reported at `line`.
    ///
    /// Adds the deltas of every earlier rewrite whose original line is
    /// strictly before `line`.
    pub fn offset_for(&self, file: &Path, line: usize) -> usize {
        let drift: isize = self
            .recordings(file)
            .iter()
            .filter(|recording| recording.line < line)
            .map(|recording| recording.difference)
            .sum();
        (line as isize + drift).max(0) as usize
    }

    /// Append a recording for `file`.
    ///
    /// The recording is always kept, since its lines are already in the file.
    /// Returns `false` when an identical recording was present before.
    pub fn record(&mut self, file: &Path, recording: FileRecording) -> bool {
        let entries = self.files.entry(Self::key(file)).or_default();
        let repeated = entries.contains(&recording);
        entries.push(recording);
        !repeated
    }

    /// Whether the latest recording for `file` repeats an earlier one.
    pub fn last_is_repeat(&self, file: &Path) -> bool {
        self.recordings(file)
            .split_last()
            .is_some_and(|(last, earlier)| earlier.contains(last))
    }

    pub fn recordings(&self, file: &Path) -> &[FileRecording] {
        self.files
            .get(&Self::key(file))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len_for(&self, file: &Path) -> usize {
        self.recordings(file).len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
