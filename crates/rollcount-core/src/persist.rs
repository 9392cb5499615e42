//! Small synchronous file helpers shared by the counter and override stores.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Read a whole file as UTF-8. A missing file is `Ok(None)`, not an error.
pub fn read_text(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Atomic write: write to a uniquely named sibling temp file, then rename
/// over `path`. Parent directories are created as needed.
///
/// Concurrent writers to the same path each get their own temp file, so the
/// last rename wins and the file is never a mix of two writes. On failure the
/// temp file is removed when it is dropped.
pub fn write_text(path: &Path, content: &str) -> Result<(), StoreError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}
