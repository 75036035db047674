use crate::error::SnapshotResult;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` through a sibling temp file.
///
/// The original file keeps its permissions and stays intact if writing fails.
pub fn write_source(path: &Path, contents: &str) -> SnapshotResult<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|err| err.error)?;

    log::trace!(
        target: "kakikomi::rewrite",
        "Wrote {} bytes to {}",
        contents.len(),
        path.display()
    );
    Ok(())
}
