//! PDF size reduction entry points.
//!
//! The output is always an image-only PDF: every page is rasterised, so
//! text becomes unselectable and vector content is flattened. That trade is
//! what makes scanned or image-heavy documents fit under an upload limit.

use crate::config::PdfConfig;
use crate::error::DocFitError;
use crate::output::{PdfOutput, PdfStats, PDF_MIME};
use crate::pipeline::{assemble, input, recompress, render, write};
use pdfium_render::prelude::Pdfium;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Shrink a PDF held in memory.
///
/// Binds pdfium according to `config.pdfium_lib_path` (see
/// [`render::bind_pdfium`]) and runs the full pipeline.
///
/// # Returns
/// `Ok(PdfOutput)` even when the result is above the size budget; check
/// `output.stats.within_budget`.
///
/// # Errors
/// - [`DocFitError::Decode`] when the bytes are not a PDF
/// - [`DocFitError::EncryptedInput`] for password-protected files
/// - [`DocFitError::RasterisationFailed`] when any page fails to render
/// - [`DocFitError::PdfiumBindingFailed`] when no pdfium library is found
pub fn shrink_pdf(bytes: &[u8], config: &PdfConfig) -> Result<PdfOutput, DocFitError> {
    config.validate()?;
    input::check_pdf_magic(bytes)?;
    let pdfium = render::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    shrink_pdf_with(&pdfium, bytes, config)
}

/// Shrink a PDF with an already-bound pdfium instance.
///
/// Binding is the slow part of a one-off run; callers processing many
/// documents bind once and call this directly.
pub fn shrink_pdf_with(
    pdfium: &Pdfium,
    bytes: &[u8],
    config: &PdfConfig,
) -> Result<PdfOutput, DocFitError> {
    let total_start = Instant::now();
    config.validate()?;
    input::check_pdf_magic(bytes)?;
    info!(
        "Shrinking PDF ({} bytes) at {} DPI, quality {}",
        bytes.len(),
        config.dpi,
        config.jpeg_quality
    );

    // ── Rasterise ────────────────────────────────────────────────────────
    let render_start = Instant::now();
    let pages = render::render_pages(pdfium, bytes, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("Rendered {} pages in {}ms", pages.len(), render_duration_ms);

    // ── Rebuild and recompress ───────────────────────────────────────────
    let assembled = assemble::images_to_pdf(&pages, config.dpi, config.jpeg_quality)?;
    let out = recompress::recompress(&assembled)?;

    let stats = PdfStats {
        mime: PDF_MIME,
        page_count: pages.len(),
        input_bytes: bytes.len(),
        output_bytes: out.len(),
        dpi: config.dpi,
        jpeg_quality: config.jpeg_quality,
        max_output_bytes: config.max_output_bytes,
        within_budget: out.len() <= config.max_output_bytes,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    if stats.within_budget {
        info!(
            "Compressed PDF: {:.1} KB ({} pages)",
            stats.output_kb(),
            stats.page_count
        );
    } else {
        warn!(
            "Compressed PDF is {:.1} KB, above the {:.0} KB limit; lower the DPI or quality",
            stats.output_kb(),
            config.max_output_bytes as f64 / 1024.0
        );
    }

    Ok(PdfOutput { bytes: out, stats })
}

/// Shrink the PDF at `input_path` and write the result to `output_path`.
///
/// The output is written atomically; on error no file is created.
pub fn shrink_pdf_file(
    input_path: &Path,
    output_path: &Path,
    config: &PdfConfig,
) -> Result<PdfStats, DocFitError> {
    let bytes = input::read_pdf(input_path)?;
    let output = shrink_pdf(&bytes, config)?;
    write::write_atomic(output_path, &output.bytes)?;
    info!("Wrote {}", output_path.display());
    Ok(output.stats)
}
