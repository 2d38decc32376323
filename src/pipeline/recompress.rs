//! Stream recompression: rewrite a PDF more compactly without changing what
//! it renders.
//!
//! The document is reloaded, unreachable objects are pruned, every
//! uncompressed stream is flate-compressed, and the result is saved through
//! a named temporary file. The temp file is owned by a
//! [`tempfile::NamedTempFile`], so it is removed when this function returns
//! on every path, including early `?` returns.

use crate::error::DocFitError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Recompress `pdf`, staging the output in the system temp directory.
pub fn recompress(pdf: &[u8]) -> Result<Vec<u8>, DocFitError> {
    recompress_in(&std::env::temp_dir(), pdf)
}

/// Recompress `pdf`, staging the output in `temp_dir`.
pub fn recompress_in(temp_dir: &Path, pdf: &[u8]) -> Result<Vec<u8>, DocFitError> {
    let mut doc = Document::load_mem(pdf)
        .map_err(|e| DocFitError::PdfWriteFailed(format!("reload for recompression: {e}")))?;

    let pruned = doc.prune_objects();
    doc.compress();
    debug!(
        "Recompressing {} objects ({} pruned)",
        doc.objects.len(),
        pruned.len()
    );

    let out = stage_through_tempfile(temp_dir, |path| {
        doc.save(path)
            .map(|_| ())
            .map_err(|e| DocFitError::PdfWriteFailed(format!("save: {e}")))
    })?;

    debug!("Recompressed {} → {} bytes", pdf.len(), out.len());
    Ok(out)
}

/// Create a temp file in `temp_dir`, let `write` fill it by path, and read
/// it back. The file is removed on return whether `write` succeeds or not.
fn stage_through_tempfile<F>(temp_dir: &Path, write: F) -> Result<Vec<u8>, DocFitError>
where
    F: FnOnce(&Path) -> Result<(), DocFitError>,
{
    let tmp = tempfile::Builder::new()
        .prefix("docfit-")
        .suffix(".pdf")
        .tempfile_in(temp_dir)
        .map_err(|e| DocFitError::Internal(format!("tempfile: {e}")))?;
    debug!("Staging recompressed PDF at {}", tmp.path().display());

    write(tmp.path())?;
    std::fs::read(tmp.path())
        .map_err(|e| DocFitError::Internal(format!("read back {}: {e}", tmp.path().display())))
}
