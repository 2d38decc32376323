//! PDF rasterisation: render every page to an RGB image via pdfium.
//!
//! Pages are rendered at `dpi / 72` times their point size, so a page keeps
//! its physical size at the chosen DPI, then shrunk (never enlarged) to fit
//! a letter page at that DPI. Oversized sources such as posters therefore
//! end up at most 8.5×11 in worth of pixels.
//!
//! The document is opened without a password. A password-protected file
//! fails at load time with [`DocFitError::EncryptedInput`], before any page
//! is touched.

use crate::config::PdfConfig;
use crate::error::DocFitError;
use crate::geometry::fit_within;
use image::imageops::FilterType;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an existing pdfium library.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to the pdfium shared library.
///
/// Resolution order (first match wins):
/// 1. `lib_path` — a library file or a directory containing one
/// 2. `PDFIUM_LIB_PATH`
/// 3. the current directory
/// 4. the system library search path
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, DocFitError> {
    let explicit = lib_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(PDFIUM_LIB_ENV).map(PathBuf::from));

    let bindings = match explicit {
        Some(path) => {
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| DocFitError::PdfiumBindingFailed(e.to_string()))?;

    Ok(Pdfium::new(bindings))
}

/// Rasterise every page of `pdf`, in order.
///
/// Any page failure aborts the whole render; no partial page list is
/// returned.
pub fn render_pages(
    pdfium: &Pdfium,
    pdf: &[u8],
    config: &PdfConfig,
) -> Result<Vec<RgbImage>, DocFitError> {
    let document = pdfium
        .load_pdf_from_byte_slice(pdf, None)
        .map_err(|e| classify_load_error(format!("{:?}", e)))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(ref cb) = config.progress {
        cb.on_render_start(total_pages);
    }

    let scale = config.dpi as f32 / 72.0;
    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(scale)
        .render_form_data(true);
    let bound = config.page_bound();

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            DocFitError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let rendered = bitmap.as_image().to_rgb8();
        let (rw, rh) = rendered.dimensions();
        let image = shrink_to_bound(rendered, bound);
        debug!(
            "Rendered page {} → {}x{} px, fitted to {}x{}",
            idx + 1,
            rw,
            rh,
            image.width(),
            image.height()
        );

        if let Some(ref cb) = config.progress {
            cb.on_page_rendered(idx + 1, total_pages, image.width(), image.height());
        }
        results.push(image);
    }

    if let Some(ref cb) = config.progress {
        cb.on_render_complete(total_pages);
    }

    Ok(results)
}

/// Shrink `image` to fit `bound` with Lanczos3, leaving smaller images alone.
pub fn shrink_to_bound(image: RgbImage, bound: (u32, u32)) -> RgbImage {
    let (w, h) = image.dimensions();
    let (fw, fh) = fit_within(w, h, bound);
    if (fw, fh) == (w, h) {
        return image;
    }
    image::imageops::resize(&image, fw, fh, FilterType::Lanczos3)
}

/// Map a pdfium load failure onto the error taxonomy.
///
/// pdfium reports a missing password as its own internal error code; any
/// other load failure means the bytes are not a usable PDF.
fn classify_load_error(detail: String) -> DocFitError {
    if detail.contains("Password") || detail.contains("password") {
        DocFitError::EncryptedInput
    } else {
        DocFitError::pdf_decode(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn password_errors_map_to_encrypted_input() {
        assert!(matches!(
            classify_load_error("PdfiumLibraryInternalError(PasswordError)".into()),
            DocFitError::EncryptedInput
        ));
    }

    #[test]
    fn other_load_errors_map_to_decode() {
        assert!(matches!(
            classify_load_error("PdfiumLibraryInternalError(FormatError)".into()),
            DocFitError::Decode { .. }
        ));
    }

    #[test]
    fn shrink_leaves_small_pages_alone() {
        let img = RgbImage::from_pixel(600, 800, Rgb([1, 2, 3]));
        let out = shrink_to_bound(img.clone(), (1275, 1650));
        assert_eq!(out, img);
    }

    #[test]
    fn shrink_fits_oversized_pages() {
        // A3 at 150 DPI exceeds the letter bound on both axes.
        let img = RgbImage::from_pixel(1754, 2480, Rgb([255, 255, 255]));
        let out = shrink_to_bound(img, (1275, 1650));
        assert!(out.width() <= 1275 && out.height() <= 1650);
        assert_eq!(out.height(), 1650);
    }

    #[test]
    fn bind_with_bogus_path_fails_cleanly() {
        let err = bind_pdfium(Some(Path::new("/nonexistent/libpdfium.so")))
            .err()
            .expect("binding a missing library must fail");
        assert!(matches!(err, DocFitError::PdfiumBindingFailed(_)));
    }
}
