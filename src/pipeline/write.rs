//! Atomic output writes for the file-based entry points.

use crate::error::DocFitError;
use std::path::Path;

/// Write `bytes` to `path` via a sibling temp file and a rename, so a
/// failed run never leaves a truncated artifact behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocFitError> {
    let fail = |source| DocFitError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    std::fs::write(tmp_path, bytes).map_err(fail)?;
    std::fs::rename(tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(tmp_path);
        fail(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/compressed.pdf");
        write_atomic(&path, b"%PDF-1.5").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
        assert!(!dir.path().join("out/nested/compressed.pdf.tmp").exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passport_photo.jpg");
        std::fs::write(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
