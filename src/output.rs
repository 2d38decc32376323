//! Result types returned by the two pipelines.
//!
//! Both carry the encoded artifact plus enough metadata to report what was
//! achieved. The artifact bytes are skipped during serialisation so the
//! structs can be printed as JSON reports.

use crate::config::CropMode;
use crate::face::FaceBounds;
use serde::Serialize;

/// MIME type of [`PdfOutput::bytes`].
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of [`PhotoOutput::bytes`].
pub const JPEG_MIME: &str = "image/jpeg";

/// A shrunken, image-only PDF.
#[derive(Debug, Clone, Serialize)]
pub struct PdfOutput {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub stats: PdfStats,
}

/// What the PDF pipeline did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PdfStats {
    /// Always [`PDF_MIME`].
    pub mime: &'static str,
    pub page_count: usize,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub dpi: u32,
    pub jpeg_quality: u8,
    pub max_output_bytes: usize,
    /// `false` when the result is still above `max_output_bytes`.
    pub within_budget: bool,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl PdfStats {
    pub fn output_kb(&self) -> f64 {
        self.output_bytes as f64 / 1024.0
    }
}

/// A fixed-size passport photo.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoOutput {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Always [`JPEG_MIME`].
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
    /// JPEG quality the ladder settled on.
    pub quality: u8,
    pub size_bytes: usize,
    pub max_bytes: usize,
    /// `false` when even the floor quality exceeded `max_bytes`.
    pub within_budget: bool,
    pub crop_mode: CropMode,
    /// Face the crop was built around, in source pixels (face mode only).
    pub face: Option<FaceBounds>,
}

impl PhotoOutput {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}
