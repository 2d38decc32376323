//! # docfit
//!
//! Fit documents and photos under upload limits.
//!
//! Two independent pipelines:
//!
//! * **PDF shrinking**: rasterise every page, rebuild an image-only PDF from
//!   JPEG page images, recompress it, and report whether it fits the
//!   1200 KB budget.
//! * **Passport photos**: frame a photo (central crop or around the largest
//!   detected face), produce an exact 750×1050 image, and walk a JPEG
//!   quality ladder until it fits in 150 KB.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF    ─▶ check ─▶ render (pdfium) ─▶ fit to letter ─▶ JPEG pages ─▶ lopdf ─▶ recompress
//! Photo  ─▶ cap    ─▶ decode ─▶ central | face crop ─▶ 750×1050 ─▶ quality ladder ─▶ JPEG
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docfit::{make_passport_photo, shrink_pdf, PdfConfig, PhotoConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pdf = std::fs::read("scan.pdf")?;
//!     let out = shrink_pdf(&pdf, &PdfConfig::default())?;
//!     println!("{} pages, {:.1} KB", out.stats.page_count, out.stats.output_kb());
//!
//!     let photo = std::fs::read("me.jpg")?;
//!     let out = make_passport_photo(&photo, &PhotoConfig::default(), None)?;
//!     println!("quality {}, {:.1} KB", out.quality, out.size_kb());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature       | Default | Description |
//! |---------------|---------|-------------|
//! | `cli`         | on      | Enables the `docfit` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `face-detect` | on      | Built-in SeetaFace detector via `rustface` |
//!
//! Without `face-detect`, face mode needs a caller-supplied [`FaceDetector`].
//!
//! ## Runtime requirements
//!
//! The PDF pipeline binds the pdfium shared library at runtime. Point
//! `PDFIUM_LIB_PATH` at it, place it in the working directory, or install
//! it system-wide. The face detector needs a SeetaFace model file
//! (`DOCFIT_FACE_MODEL`).

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod face;
pub mod geometry;
pub mod output;
pub mod pdf;
pub mod photo;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CropMode, PdfConfig, PdfConfigBuilder, PhotoConfig, PhotoConfigBuilder};
pub use error::{DocFitError, InputKind};
#[cfg(feature = "face-detect")]
pub use face::RustfaceDetector;
pub use face::{select_largest_face, FaceBounds, FaceDetector};
pub use output::{PdfOutput, PdfStats, PhotoOutput};
pub use pdf::{shrink_pdf, shrink_pdf_file, shrink_pdf_with};
pub use photo::{make_passport_photo, make_passport_photo_file, normalize_central, normalize_face};
pub use progress::{NoopProgress, ProgressCallback, RenderProgress};
