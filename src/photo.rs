//! Passport photo pipeline.
//!
//! ```text
//! bytes ─▶ upload cap ─▶ decode (RGB) ─▶ normalise ─▶ quality ladder ─▶ JPEG
//!                                        │
//!                                        ├─ central: centred target-ratio crop, stretched
//!                                        └─ face:    padded face crop, letterboxed on white
//! ```
//!
//! Both normalisers return an image of exactly [`TARGET_PHOTO_PX`]. They
//! differ on purpose: the central crop already has the target aspect ratio
//! and is resized to fill, while the face crop keeps its own aspect ratio
//! and is centred on a white canvas.

use crate::config::{CropMode, PhotoConfig, PHOTO_DPI, TARGET_PHOTO_PX};
use crate::error::DocFitError;
use crate::face::{select_largest_face, FaceBounds, FaceDetector};
use crate::geometry::{central_crop_box, centre_offset, face_crop_box, fit_within, CropBox};
use crate::output::{PhotoOutput, JPEG_MIME};
use crate::pipeline::{encode, input, write};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, info, warn};

/// Canvas colour behind a letterboxed face crop.
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

fn crop(img: &RgbImage, b: &CropBox) -> RgbImage {
    imageops::crop_imm(img, b.x0, b.y0, b.width(), b.height()).to_image()
}

/// Centred crop with the target aspect ratio, stretched to exactly 750×1050.
/// No face awareness.
pub fn normalize_central(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let b = central_crop_box(w, h, TARGET_PHOTO_PX);
    debug!("Central crop of {}x{}: {:?}", w, h, b);
    imageops::resize(
        &crop(img, &b),
        TARGET_PHOTO_PX.0,
        TARGET_PHOTO_PX.1,
        FilterType::Lanczos3,
    )
}

/// Head-and-shoulders crop around the largest detected face, shrunk to fit
/// and centred on a white 750×1050 canvas.
///
/// # Errors
/// [`DocFitError::NoFaceDetected`] when the detector finds nothing. There is
/// no fallback to the central crop.
pub fn normalize_face(
    img: &RgbImage,
    detector: &dyn FaceDetector,
) -> Result<(RgbImage, FaceBounds), DocFitError> {
    let (w, h) = img.dimensions();
    let gray = imageops::grayscale(img);
    let faces = detector.detect(gray.as_raw(), w, h)?;
    let face = select_largest_face(&faces).ok_or(DocFitError::NoFaceDetected)?;
    debug!("Selected face {:?} out of {}", face, faces.len());

    let b = face_crop_box(&face, w, h);
    let cropped = crop(img, &b);
    let (fw, fh) = fit_within(b.width(), b.height(), TARGET_PHOTO_PX);
    let fitted = if (fw, fh) == (b.width(), b.height()) {
        cropped
    } else {
        imageops::resize(&cropped, fw, fh, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::from_pixel(TARGET_PHOTO_PX.0, TARGET_PHOTO_PX.1, BACKGROUND);
    let x = centre_offset(TARGET_PHOTO_PX.0, fw);
    let y = centre_offset(TARGET_PHOTO_PX.1, fh);
    imageops::overlay(&mut canvas, &fitted, x as i64, y as i64);
    Ok((canvas, face))
}

/// Turn an uploaded photo into a size-bounded 750×1050 JPEG.
///
/// `detector` is used in [`CropMode::Face`]. When it is `None`, the
/// built-in SeetaFace detector is loaded from `config.face_model_path` or
/// `DOCFIT_FACE_MODEL` (feature `face-detect`).
pub fn make_passport_photo(
    bytes: &[u8],
    config: &PhotoConfig,
    detector: Option<&dyn FaceDetector>,
) -> Result<PhotoOutput, DocFitError> {
    config.validate()?;
    input::check_upload_size(bytes.len(), config.max_upload_bytes)?;
    let img = input::decode_photo(bytes)?;
    info!(
        "Photo {}x{} ({} bytes), {} crop",
        img.width(),
        img.height(),
        bytes.len(),
        config.crop_mode
    );

    let (normalized, face) = match config.crop_mode {
        CropMode::Central => (normalize_central(&img), None),
        CropMode::Face => {
            let (out, face) = match detector {
                Some(d) => normalize_face(&img, d)?,
                None => {
                    let builtin = builtin_detector(config)?;
                    normalize_face(&img, builtin.as_ref())?
                }
            };
            (out, Some(face))
        }
    };

    let jpeg = encode::encode_within_budget(&normalized, config.max_output_bytes, Some(PHOTO_DPI))?;
    let size_bytes = jpeg.bytes.len();
    if jpeg.within_budget {
        info!(
            "Passport photo: {:.1} KB at quality {}",
            size_bytes as f64 / 1024.0,
            jpeg.quality
        );
    } else {
        warn!(
            "Passport photo is {:.1} KB, above the {:.1} KB cap; use another photo or crop it manually",
            size_bytes as f64 / 1024.0,
            config.max_output_bytes as f64 / 1024.0
        );
    }

    Ok(PhotoOutput {
        bytes: jpeg.bytes,
        mime: JPEG_MIME,
        width: normalized.width(),
        height: normalized.height(),
        quality: jpeg.quality,
        size_bytes,
        max_bytes: config.max_output_bytes,
        within_budget: jpeg.within_budget,
        crop_mode: config.crop_mode,
        face,
    })
}

/// Read a photo from `input`, process it, and write the JPEG to `output`.
pub fn make_passport_photo_file(
    input_path: &Path,
    output_path: &Path,
    config: &PhotoConfig,
    detector: Option<&dyn FaceDetector>,
) -> Result<PhotoOutput, DocFitError> {
    let bytes = input::read_input(input_path)?;
    let photo = make_passport_photo(&bytes, config, detector)?;
    write::write_atomic(output_path, &photo.bytes)?;
    Ok(photo)
}

#[cfg(feature = "face-detect")]
fn builtin_detector(config: &PhotoConfig) -> Result<Box<dyn FaceDetector>, DocFitError> {
    let d = crate::face::RustfaceDetector::resolve(config.face_model_path.as_deref())?;
    Ok(Box::new(d))
}

#[cfg(not(feature = "face-detect"))]
fn builtin_detector(_config: &PhotoConfig) -> Result<Box<dyn FaceDetector>, DocFitError> {
    Err(DocFitError::InvalidConfig(
        "face mode needs a FaceDetector; rebuild with the `face-detect` feature or pass one in"
            .into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reports a fixed list of faces regardless of input.
    struct FixedFaces(Vec<FaceBounds>);

    impl FaceDetector for FixedFaces {
        fn detect(&self, _gray: &[u8], _w: u32, _h: u32) -> Result<Vec<FaceBounds>, DocFitError> {
            Ok(self.0.clone())
        }
    }

    /// Fails the way a broken model would.
    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(&self, _gray: &[u8], _w: u32, _h: u32) -> Result<Vec<FaceBounds>, DocFitError> {
            Err(DocFitError::FaceModelUnavailable {
                path: "broken.bin".into(),
                detail: "truncated".into(),
            })
        }
    }

    fn fb(x: i32, y: i32, w: u32, h: u32) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width: w,
            height: h,
            score: 5.0,
        }
    }

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 128])
        })
    }

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn central_output_is_target_for_any_shape() {
        for (w, h) in [(1000, 1000), (1920, 1080), (300, 900), (750, 1050), (7, 3)] {
            let out = normalize_central(&gradient(w, h));
            assert_eq!(out.dimensions(), TARGET_PHOTO_PX, "source {w}x{h}");
        }
    }

    #[test]
    fn face_output_is_letterboxed_on_white() {
        let img = RgbImage::from_pixel(400, 400, Rgb([30, 60, 90]));
        let detector = FixedFaces(vec![fb(150, 150, 100, 100)]);
        let (out, face) = normalize_face(&img, &detector).unwrap();

        assert_eq!(out.dimensions(), TARGET_PHOTO_PX);
        assert_eq!(face, fb(150, 150, 100, 100));
        // 150×150 crop, no upscale, centred at (300, 450).
        assert_eq!(*out.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*out.get_pixel(749, 1049), BACKGROUND);
        assert_eq!(*out.get_pixel(299, 525), BACKGROUND);
        assert_eq!(*out.get_pixel(300, 450), Rgb([30, 60, 90]));
        assert_eq!(*out.get_pixel(449, 599), Rgb([30, 60, 90]));
        assert_eq!(*out.get_pixel(450, 599), BACKGROUND);
        assert_eq!(*out.get_pixel(375, 600), BACKGROUND);
    }

    #[test]
    fn large_face_crop_is_shrunk_to_fit() {
        let img = gradient(2000, 2000);
        let detector = FixedFaces(vec![fb(400, 400, 1200, 1200)]);
        let (out, _) = normalize_face(&img, &detector).unwrap();
        assert_eq!(out.dimensions(), TARGET_PHOTO_PX);
        // 1800×1800 crop → 750×750, centred vertically.
        assert_eq!(*out.get_pixel(375, 149), BACKGROUND);
        assert_ne!(*out.get_pixel(375, 150), BACKGROUND);
        assert_eq!(*out.get_pixel(375, 900), BACKGROUND);
    }

    #[test]
    fn no_face_is_an_error_not_a_fallback() {
        let img = gradient(500, 700);
        let err = normalize_face(&img, &FixedFaces(vec![])).unwrap_err();
        assert!(matches!(err, DocFitError::NoFaceDetected));
    }

    #[test]
    fn detector_failure_is_not_reported_as_no_face() {
        let err = normalize_face(&gradient(300, 300), &BrokenDetector).unwrap_err();
        assert!(matches!(err, DocFitError::FaceModelUnavailable { .. }), "got {err:?}");
    }

    #[test]
    fn oversize_upload_rejected_before_decode() {
        let config = PhotoConfig::builder().max_upload_bytes(10).build().unwrap();
        let err = make_passport_photo(&[0u8; 11], &config, None).unwrap_err();
        assert!(matches!(err, DocFitError::OversizeUpload { size: 11, limit: 10 }));
    }

    #[test]
    fn central_photo_end_to_end() {
        let bytes = png_bytes(&gradient(300, 300));
        let out = make_passport_photo(&bytes, &PhotoConfig::default(), None).unwrap();
        assert_eq!((out.width, out.height), TARGET_PHOTO_PX);
        assert_eq!(&out.bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(out.size_bytes, out.bytes.len());
        assert!(out.within_budget);
        assert!(out.size_bytes <= 150 * 1024);
        assert!(out.face.is_none());
        assert!((10..=90).contains(&out.quality));
    }

    #[test]
    fn face_photo_uses_injected_detector() {
        let bytes = png_bytes(&gradient(400, 500));
        let config = PhotoConfig::builder()
            .crop_mode(CropMode::Face)
            .build()
            .unwrap();
        let detector = FixedFaces(vec![fb(100, 100, 50, 50), fb(150, 200, 120, 140)]);
        let out = make_passport_photo(&bytes, &config, Some(&detector)).unwrap();
        assert_eq!(out.face, Some(fb(150, 200, 120, 140)));
        assert_eq!(out.crop_mode, CropMode::Face);
        assert_eq!((out.width, out.height), TARGET_PHOTO_PX);
    }

    #[test]
    fn tiny_cap_reports_shortfall_at_floor_quality() {
        let bytes = png_bytes(&gradient(200, 200));
        let config = PhotoConfig::builder().max_output_bytes(100).build().unwrap();
        let out = make_passport_photo(&bytes, &config, None).unwrap();
        assert!(!out.within_budget);
        assert_eq!(out.quality, 10);
        assert!(out.size_bytes > 100);
    }

    #[test]
    fn same_input_same_output() {
        let bytes = png_bytes(&gradient(640, 480));
        let a = make_passport_photo(&bytes, &PhotoConfig::default(), None).unwrap();
        let b = make_passport_photo(&bytes, &PhotoConfig::default(), None).unwrap();
        assert_eq!(a.quality, b.quality);
        assert_eq!(a.bytes, b.bytes);
    }
}
