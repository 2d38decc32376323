//! Configuration types for the PDF and photo pipelines.
//!
//! Every knob lives in an explicit struct passed into the pipeline call;
//! there is no process-wide state, so two requests never observe each
//! other's settings.
//!
//! Both structs are built via builders whose setters clamp into the accepted
//! range; `build()` re-validates so that configs assembled field-by-field
//! are held to the same rules.

use crate::error::DocFitError;
use crate::progress::RenderProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

// ── Constants ────────────────────────────────────────────────────────────

/// Size budget for shrunken PDFs: 1200 KB.
pub const MAX_PDF_BYTES: usize = 1200 * 1024;

/// Upload cap and output budget for passport photos: 150 KB.
pub const MAX_PHOTO_BYTES: usize = 150 * 1024;

/// Passport photo resolution: 2.5×3.5 in at 300 DPI.
pub const TARGET_PHOTO_PX: (u32, u32) = (750, 1050);

/// Density written into the passport photo's JFIF header.
pub const PHOTO_DPI: u16 = 300;

pub const DEFAULT_DPI: u32 = 150;
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 300;

pub const DEFAULT_JPEG_QUALITY: u8 = 50;
pub const MIN_JPEG_QUALITY: u8 = 10;
pub const MAX_JPEG_QUALITY: u8 = 95;

// ── PDF ──────────────────────────────────────────────────────────────────

/// Configuration for [`crate::pdf::shrink_pdf`].
///
/// # Example
/// ```rust
/// use docfit::PdfConfig;
///
/// let config = PdfConfig::builder()
///     .dpi(120)
///     .jpeg_quality(40)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 120);
/// ```
///
/// Serialises without the progress callback; missing fields deserialise to
/// their defaults. Deserialised configs are not validated until they reach a
/// pipeline call.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Rasterisation DPI. Range: 72–300. Default: 150.
    ///
    /// Pages are rendered at `dpi / 72` times their point size and then
    /// shrunk to fit a letter page (8.5×11 in) at this DPI.
    pub dpi: u32,

    /// JPEG quality for page images. Range: 10–95. Default: 50.
    pub jpeg_quality: u8,

    /// Size budget in bytes. Default: 1200 KB.
    ///
    /// Exceeding it only produces a warning; the result is still returned.
    pub max_output_bytes: usize,

    /// Explicit pdfium library location (file or directory).
    /// Falls back to `PDFIUM_LIB_PATH`, then `./`, then the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Per-page rendering events.
    #[serde(skip)]
    pub progress: Option<Arc<dyn RenderProgress>>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_output_bytes: MAX_PDF_BYTES,
            pdfium_lib_path: None,
            progress: None,
        }
    }
}

impl fmt::Debug for PdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfConfig")
            .field("dpi", &self.dpi)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("max_output_bytes", &self.max_output_bytes)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn RenderProgress>"))
            .finish()
    }
}

impl PdfConfig {
    /// Create a new builder for `PdfConfig`.
    pub fn builder() -> PdfConfigBuilder {
        PdfConfigBuilder {
            config: Self::default(),
        }
    }

    /// Pixel bound of a letter page at this config's DPI.
    pub fn page_bound(&self) -> (u32, u32) {
        crate::geometry::letter_page_bound(self.dpi)
    }

    pub(crate) fn validate(&self) -> Result<(), DocFitError> {
        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(DocFitError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                self.dpi
            )));
        }
        if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&self.jpeg_quality) {
            return Err(DocFitError::InvalidConfig(format!(
                "JPEG quality must be {MIN_JPEG_QUALITY}–{MAX_JPEG_QUALITY}, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_output_bytes == 0 {
            return Err(DocFitError::InvalidConfig(
                "Size budget must be > 0 bytes".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`PdfConfig`].
#[derive(Debug)]
pub struct PdfConfigBuilder {
    config: PdfConfig,
}

impl PdfConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY);
        self
    }

    pub fn max_output_bytes(mut self, bytes: usize) -> Self {
        self.config.max_output_bytes = bytes;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress(mut self, progress: Arc<dyn RenderProgress>) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfConfig, DocFitError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Photo ────────────────────────────────────────────────────────────────

/// How the photo is framed before it is fitted to 750×1050.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Largest centered box with the target aspect ratio, stretched to fill.
    #[default]
    Central,
    /// Padded box around the largest detected face, letterboxed on white.
    Face,
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropMode::Central => f.write_str("central"),
            CropMode::Face => f.write_str("face"),
        }
    }
}

/// Configuration for [`crate::photo::make_passport_photo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Framing strategy. Default: [`CropMode::Central`].
    pub crop_mode: CropMode,

    /// Uploads larger than this are rejected before decoding. Default: 150 KB.
    pub max_upload_bytes: usize,

    /// Output cap the quality ladder tries to meet. Default: 150 KB.
    pub max_output_bytes: usize,

    /// SeetaFace model used by the built-in detector in face mode.
    /// Falls back to `DOCFIT_FACE_MODEL`.
    pub face_model_path: Option<PathBuf>,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            crop_mode: CropMode::default(),
            max_upload_bytes: MAX_PHOTO_BYTES,
            max_output_bytes: MAX_PHOTO_BYTES,
            face_model_path: None,
        }
    }
}

impl PhotoConfig {
    /// Create a new builder for `PhotoConfig`.
    pub fn builder() -> PhotoConfigBuilder {
        PhotoConfigBuilder {
            config: Self::default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DocFitError> {
        if self.max_upload_bytes == 0 {
            return Err(DocFitError::InvalidConfig(
                "Upload limit must be > 0 bytes".into(),
            ));
        }
        if self.max_output_bytes == 0 {
            return Err(DocFitError::InvalidConfig(
                "Output cap must be > 0 bytes".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`PhotoConfig`].
#[derive(Debug)]
pub struct PhotoConfigBuilder {
    config: PhotoConfig,
}

impl PhotoConfigBuilder {
    pub fn crop_mode(mut self, mode: CropMode) -> Self {
        self.config.crop_mode = mode;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn max_output_bytes(mut self, bytes: usize) -> Self {
        self.config.max_output_bytes = bytes;
        self
    }

    pub fn face_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.face_model_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PhotoConfig, DocFitError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
