//! Input validation: read files, check formats and the upload cap.
//!
//! Everything here runs before any engine call. A PDF without a `%PDF-`
//! header or a photo over the upload cap is rejected with a precise error
//! instead of whatever pdfium or the image decoder would report.

use crate::error::DocFitError;
use image::{ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// How far into the file the `%PDF-` header may appear.
const PDF_HEADER_WINDOW: usize = 1024;

/// Read a local input file, distinguishing missing files from permission errors.
pub fn read_input(path: &Path) -> Result<Vec<u8>, DocFitError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!("Read {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(DocFitError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(DocFitError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a local PDF and check its header before any engine call.
pub fn read_pdf(path: &Path) -> Result<Vec<u8>, DocFitError> {
    let bytes = read_input(path)?;
    check_pdf_magic(&bytes)?;
    Ok(bytes)
}

/// Verify the `%PDF-` header appears within the first kilobyte.
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), DocFitError> {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        return Ok(());
    }
    let shown: Vec<u8> = bytes.iter().take(4).copied().collect();
    Err(DocFitError::pdf_decode(format!(
        "missing %PDF- header (first bytes: {shown:?})"
    )))
}

/// Reject uploads larger than `limit` bytes.
pub fn check_upload_size(size: usize, limit: usize) -> Result<(), DocFitError> {
    if size > limit {
        return Err(DocFitError::OversizeUpload { size, limit });
    }
    Ok(())
}

/// Decode a photo of any supported format and normalise it to 8-bit RGB.
pub fn decode_photo(bytes: &[u8]) -> Result<RgbImage, DocFitError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DocFitError::image_decode(e.to_string()))?
        .decode()
        .map_err(|e| DocFitError::image_decode(e.to_string()))?;
    debug!(
        "Decoded photo {}x{} ({:?})",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    #[test]
    fn pdf_magic_at_start() {
        assert!(check_pdf_magic(b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn pdf_magic_after_leading_junk() {
        let mut bytes = vec![b' '; 100];
        bytes.extend_from_slice(b"%PDF-1.4\n");
        assert!(check_pdf_magic(&bytes).is_ok());
    }

    #[test]
    fn non_pdf_is_decode_error() {
        let err = check_pdf_magic(b"PK\x03\x04zipfile").unwrap_err();
        assert!(matches!(err, DocFitError::Decode { .. }));
        assert!(check_pdf_magic(b"").is_err());
    }

    #[test]
    fn upload_cap_is_inclusive() {
        assert!(check_upload_size(153_600, 153_600).is_ok());
        assert!(matches!(
            check_upload_size(153_601, 153_600),
            Err(DocFitError::OversizeUpload {
                size: 153_601,
                limit: 153_600
            })
        ));
    }

    #[test]
    fn decode_drops_alpha() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 128]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let rgb = decode_photo(&png).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_photo(b"definitely not an image"),
            Err(DocFitError::Decode { .. })
        ));
    }

    #[test]
    fn read_missing_file() {
        let err = read_input(Path::new("/no/such/input.pdf")).unwrap_err();
        assert!(matches!(err, DocFitError::FileNotFound { .. }));
    }

    #[test]
    fn read_pdf_rejects_non_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.pdf");
        std::fs::write(&path, b"\xFF\xD8\xFF\xE0 jpeg in disguise").unwrap();
        assert!(matches!(
            read_pdf(&path),
            Err(DocFitError::Decode { .. })
        ));
    }

    #[test]
    fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        assert_eq!(read_input(&path).unwrap(), b"%PDF-1.4");
    }
}
