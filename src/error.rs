//! Error types for the docfit library.
//!
//! Every public operation returns [`DocFitError`] on failure. All variants
//! are terminal for the current request: the pipeline stops and no partial
//! artifact is returned.
//!
//! Going over a size budget is *not* represented here. A PDF
//! still above its budget or a photo still above its cap at the lowest
//! quality is a best-effort result, reported through the `within_budget`
//! flag on [`crate::output::PdfStats`] and [`crate::output::PhotoOutput`].

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which kind of input failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputKind {
    Pdf,
    Image,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Pdf => f.write_str("PDF"),
            InputKind::Image => f.write_str("image"),
        }
    }
}

/// All fatal errors returned by the docfit library.
#[derive(Debug, Error)]
pub enum DocFitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes are not a readable document or image.
    #[error("Could not decode {kind}: {detail}")]
    Decode { kind: InputKind, detail: String },

    /// The PDF is password-protected.
    #[error("PDF is password-protected. Upload it without a password.")]
    EncryptedInput,

    /// The uploaded photo is larger than the accepted upload size.
    #[error("Photo is {size} bytes, larger than the {limit}-byte upload limit")]
    OversizeUpload { size: usize, limit: usize },

    /// Face-aware cropping found no face in the photo.
    #[error("No face detected in the photo.\nUse a frontal photo or switch to --mode central.")]
    NoFaceDetected,

    // ── PDF pipeline errors ───────────────────────────────────────────────
    /// No page images reached the assembly step.
    #[error("Document has no pages; nothing to assemble")]
    EmptyDocument,

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// lopdf could not build, load, or save a document.
    #[error("Failed to write PDF: {0}")]
    PdfWriteFailed(String),

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The JPEG encoder rejected the image.
    #[error("JPEG encoding failed: {0}")]
    EncodeFailed(String),

    // ── Engine binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Place libpdfium next to the binary's working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    /// The face-detection model could not be loaded.
    #[error("Face model unavailable at '{path}': {detail}\nSet DOCFIT_FACE_MODEL or pass --face-model.")]
    FaceModelUnavailable { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocFitError {
    pub(crate) fn pdf_decode(detail: impl Into<String>) -> Self {
        DocFitError::Decode {
            kind: InputKind::Pdf,
            detail: detail.into(),
        }
    }

    pub(crate) fn image_decode(detail: impl Into<String>) -> Self {
        DocFitError::Decode {
            kind: InputKind::Image,
            detail: detail.into(),
        }
    }
}
