//! JPEG encoding and the size-capped quality ladder.
//!
//! The ladder is a plain descending walk (90, 80, …, 10), not a binary
//! search. Identical input and cap therefore always select the same rung and
//! produce byte-identical output.

use crate::error::DocFitError;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::RgbImage;
use tracing::{debug, warn};

/// First quality tried by [`encode_within_budget`].
pub const QUALITY_START: u8 = 90;
/// Decrement between rungs.
pub const QUALITY_STEP: u8 = 10;
/// Lowest quality ever selected.
pub const QUALITY_FLOOR: u8 = 10;

/// The descending quality ladder: 90, 80, …, 10.
pub fn quality_ladder() -> impl Iterator<Item = u8> {
    (QUALITY_FLOOR..=QUALITY_START)
        .rev()
        .step_by(QUALITY_STEP as usize)
}

/// Encode `img` as a baseline JPEG at `quality`, optionally stamping a DPI
/// into the JFIF header.
pub fn encode_jpeg(img: &RgbImage, quality: u8, dpi: Option<u16>) -> Result<Vec<u8>, DocFitError> {
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        if let Some(dpi) = dpi {
            encoder.set_pixel_density(PixelDensity::dpi(dpi));
        }
        encoder
            .encode_image(img)
            .map_err(|e| DocFitError::EncodeFailed(e.to_string()))?;
    }
    Ok(buf)
}

/// Result of walking the quality ladder.
#[derive(Debug, Clone)]
pub struct BudgetedJpeg {
    pub bytes: Vec<u8>,
    /// Quality of the returned encoding.
    pub quality: u8,
    /// `false` when even the floor quality exceeded the cap.
    pub within_budget: bool,
}

/// Encode at decreasing quality until the output fits in `max_bytes`.
///
/// Stops at the first rung whose encoding is `<= max_bytes`. If none fits,
/// the floor-quality encoding is returned with `within_budget = false`;
/// that is a degraded result, not an error.
pub fn encode_within_budget(
    img: &RgbImage,
    max_bytes: usize,
    dpi: Option<u16>,
) -> Result<BudgetedJpeg, DocFitError> {
    let mut last: Option<(u8, Vec<u8>)> = None;

    for quality in quality_ladder() {
        let bytes = encode_jpeg(img, quality, dpi)?;
        debug!("quality {} → {} bytes (cap {})", quality, bytes.len(), max_bytes);
        if bytes.len() <= max_bytes {
            return Ok(BudgetedJpeg {
                bytes,
                quality,
                within_budget: true,
            });
        }
        last = Some((quality, bytes));
    }

    let (quality, bytes) =
        last.ok_or_else(|| DocFitError::Internal("quality ladder is empty".into()))?;
    warn!(
        "Still {} bytes at quality {}, above the {}-byte cap",
        bytes.len(),
        quality,
        max_bytes
    );
    Ok(BudgetedJpeg {
        bytes,
        quality,
        within_budget: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Deterministic high-entropy image; compresses poorly at every quality.
    fn noise(width: u32, height: u32) -> RgbImage {
        let mut state: u32 = 0x1234_5678;
        RgbImage::from_fn(width, height, |_, _| {
            let mut next = || {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            };
            Rgb([next(), next(), next()])
        })
    }

    #[test]
    fn ladder_is_ninety_down_to_ten() {
        let rungs: Vec<u8> = quality_ladder().collect();
        assert_eq!(rungs, vec![90, 80, 70, 60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn encode_writes_jfif_density() {
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]));
        let jpeg = encode_jpeg(&img, 80, Some(300)).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[6..11], b"JFIF\0");
        assert_eq!(jpeg[13], 1, "density unit should be dots per inch");
        assert_eq!(&jpeg[14..18], &[0x01, 0x2C, 0x01, 0x2C]);
    }

    #[test]
    fn generous_cap_keeps_top_quality() {
        let img = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
        let r = encode_within_budget(&img, 1 << 20, None).unwrap();
        assert_eq!(r.quality, 90);
        assert!(r.within_budget);
    }

    #[test]
    fn impossible_cap_stops_at_floor() {
        let img = noise(64, 64);
        let r = encode_within_budget(&img, 1, None).unwrap();
        assert_eq!(r.quality, QUALITY_FLOOR);
        assert!(!r.within_budget);
        assert_eq!(r.bytes, encode_jpeg(&img, QUALITY_FLOOR, None).unwrap());
    }

    #[test]
    fn mid_cap_selects_first_fitting_rung() {
        let img = noise(128, 128);
        let cap = encode_jpeg(&img, 50, None).unwrap().len();
        let r = encode_within_budget(&img, cap, None).unwrap();
        assert!(r.within_budget);
        assert!(r.quality >= 50);
        assert!(r.bytes.len() <= cap);
        for q in quality_ladder().take_while(|&q| q > r.quality) {
            assert!(encode_jpeg(&img, q, None).unwrap().len() > cap, "rung {q} fit but was skipped");
        }
    }

    #[test]
    fn ladder_is_deterministic() {
        let img = noise(96, 96);
        let cap = encode_jpeg(&img, 40, None).unwrap().len();
        let a = encode_within_budget(&img, cap, Some(300)).unwrap();
        let b = encode_within_budget(&img, cap, Some(300)).unwrap();
        assert_eq!(a.quality, b.quality);
        assert_eq!(a.bytes, b.bytes);
    }
}
