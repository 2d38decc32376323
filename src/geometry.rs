//! Pixel geometry shared by both pipelines.
//!
//! Everything here is pure integer/float arithmetic on dimensions, with no
//! pixel data involved, so the invariants (output sizes, clamping, centring)
//! are tested directly rather than through encoded images.

use crate::face::FaceBounds;
use serde::Serialize;

/// Integer crop rectangle `[x0, x1) × [y0, y1)` inside a source image.
///
/// Constructors in this module guarantee `x0 < x1 ≤ width` and
/// `y0 < y1 ≤ height` for the image they were computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Pixel bound of an 8.5×11 in letter page at `dpi`, floored.
pub fn letter_page_bound(dpi: u32) -> (u32, u32) {
    (17 * dpi / 2, 11 * dpi)
}

/// Largest box with the aspect ratio of `target`, centred in a
/// `width × height` image.
///
/// A source wider than the target keeps its full height; otherwise it keeps
/// its full width. Sizes and offsets are floored.
pub fn central_crop_box(width: u32, height: u32, target: (u32, u32)) -> CropBox {
    let target_ratio = target.0 as f64 / target.1 as f64;
    let source_ratio = width as f64 / height as f64;

    let (crop_w, crop_h) = if source_ratio > target_ratio {
        ((height as f64 * target_ratio) as u32, height)
    } else {
        (width, (width as f64 / target_ratio) as u32)
    };
    let crop_w = crop_w.clamp(1, width.max(1));
    let crop_h = crop_h.clamp(1, height.max(1));

    let left = (width - crop_w) / 2;
    let top = (height - crop_h) / 2;
    CropBox {
        x0: left,
        y0: top,
        x1: left + crop_w,
        y1: top + crop_h,
    }
}

/// Expand a detected face into a head-and-shoulders box.
///
/// Half the face height is added vertically: a quarter above for hair and
/// forehead, the remainder below for chin and shoulders. A quarter of the
/// face width is added on each side. Every edge is clamped to the image.
pub fn face_crop_box(face: &FaceBounds, width: u32, height: u32) -> CropBox {
    let fw = face.width as i64;
    let fh = face.height as i64;
    let pad_top = (fh as f64 * 0.25) as i64;
    let pad_bottom = (fh as f64 * 0.5) as i64 - pad_top;
    let pad_x = (fw as f64 * 0.25) as i64;

    let (w, h) = (width as i64, height as i64);
    let x0 = (face.x as i64 - pad_x).clamp(0, (w - 1).max(0));
    let y0 = (face.y as i64 - pad_top).clamp(0, (h - 1).max(0));
    let x1 = (face.x as i64 + fw + pad_x).clamp(x0 + 1, w.max(x0 + 1));
    let y1 = (face.y as i64 + fh + pad_bottom).clamp(y0 + 1, h.max(y0 + 1));

    CropBox {
        x0: x0 as u32,
        y0: y0 as u32,
        x1: x1 as u32,
        y1: y1 as u32,
    }
}

/// Shrink `width × height` to fit inside `bound`, preserving aspect ratio.
///
/// Never upscales: a size already inside the bound is returned unchanged.
pub fn fit_within(width: u32, height: u32, bound: (u32, u32)) -> (u32, u32) {
    let (bw, bh) = bound;
    if width <= bw && height <= bh {
        return (width, height);
    }
    let scale = f64::min(bw as f64 / width as f64, bh as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, bw.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, bh.max(1));
    (w, h)
}

/// Offset that centres `inner` inside `outer` (floored).
pub fn centre_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

/// Page size in PDF points for an image of `px` pixels placed at `dpi`.
pub fn pixels_to_points(px: u32, dpi: u32) -> f32 {
    px as f32 * 72.0 / dpi as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: (u32, u32) = (750, 1050);

    fn face(x: i32, y: i32, width: u32, height: u32) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width,
            height,
            score: 1.0,
        }
    }

    #[test]
    fn letter_bound_floors_half_inch() {
        assert_eq!(letter_page_bound(72), (612, 792));
        assert_eq!(letter_page_bound(150), (1275, 1650));
        assert_eq!(letter_page_bound(75), (637, 825));
        assert_eq!(letter_page_bound(300), (2550, 3300));
    }

    #[test]
    fn central_crop_square_source() {
        let b = central_crop_box(1000, 1000, TARGET);
        assert_eq!(b, CropBox { x0: 143, y0: 0, x1: 857, y1: 1000 });
        assert_eq!(b.width(), 714);
    }

    #[test]
    fn central_crop_tall_source_keeps_full_width() {
        let b = central_crop_box(600, 2000, TARGET);
        assert_eq!(b.width(), 600);
        assert_eq!(b.height(), 840);
        assert_eq!(b.y0, (2000 - 840) / 2);
        assert_eq!(b.x0, 0);
    }

    #[test]
    fn central_crop_exact_ratio_is_identity() {
        let b = central_crop_box(750, 1050, TARGET);
        assert_eq!(b, CropBox { x0: 0, y0: 0, x1: 750, y1: 1050 });
    }

    #[test]
    fn central_crop_stays_in_bounds_for_extreme_shapes() {
        for (w, h) in [(1, 1), (5000, 3), (3, 5000), (2, 1), (1, 2)] {
            let b = central_crop_box(w, h, TARGET);
            assert!(b.x0 < b.x1 && b.x1 <= w, "{w}x{h}: {b:?}");
            assert!(b.y0 < b.y1 && b.y1 <= h, "{w}x{h}: {b:?}");
        }
    }

    #[test]
    fn face_box_pads_quarter_above_and_rest_below() {
        let b = face_crop_box(&face(200, 200, 100, 100), 1000, 1000);
        assert_eq!(b, CropBox { x0: 175, y0: 175, x1: 325, y1: 325 });

        // Odd height: floor(0.25 * 101) = 25 above, floor(50.5) - 25 = 25 below.
        let b = face_crop_box(&face(200, 200, 100, 101), 1000, 1000);
        assert_eq!((b.y0, b.y1), (175, 326));
    }

    #[test]
    fn face_box_clamps_to_image() {
        let b = face_crop_box(&face(10, 5, 100, 100), 120, 110);
        assert_eq!(b, CropBox { x0: 0, y0: 0, x1: 120, y1: 110 });
    }

    #[test]
    fn face_box_handles_negative_detector_origin() {
        let b = face_crop_box(&face(-20, -10, 60, 60), 200, 200);
        assert_eq!((b.x0, b.y0), (0, 0));
        assert_eq!(b.x1, 55);
        assert_eq!(b.y1, 65);
    }

    #[test]
    fn fit_within_never_upscales() {
        assert_eq!(fit_within(100, 200, TARGET), (100, 200));
        assert_eq!(fit_within(750, 1050, TARGET), (750, 1050));
    }

    #[test]
    fn fit_within_shrinks_preserving_aspect() {
        assert_eq!(fit_within(1500, 1500, TARGET), (750, 750));
        assert_eq!(fit_within(2550, 3300, (1275, 1650)), (1275, 1650));
        let (w, h) = fit_within(3000, 1000, (1275, 1650));
        assert_eq!((w, h), (1275, 425));
    }

    #[test]
    fn fit_within_respects_bound_for_every_dpi() {
        // A4 portrait rendered at dpi/72 scale: 595×842 pt.
        for dpi in 72..=300u32 {
            let rendered = (595 * dpi / 72, 842 * dpi / 72);
            let bound = letter_page_bound(dpi);
            let (w, h) = fit_within(rendered.0, rendered.1, bound);
            assert!(w <= bound.0 && h <= bound.1, "dpi {dpi}: {w}x{h} > {bound:?}");
            let before = rendered.0 as f64 / rendered.1 as f64;
            let after = w as f64 / h as f64;
            assert!((before - after).abs() < 0.01, "dpi {dpi}: ratio drift");
        }
    }

    #[test]
    fn centre_offset_floors() {
        assert_eq!(centre_offset(750, 150), 300);
        assert_eq!(centre_offset(1050, 151), 449);
        assert_eq!(centre_offset(10, 20), 0);
    }

    #[test]
    fn points_at_72_dpi_equal_pixels() {
        assert_eq!(pixels_to_points(612, 72), 612.0);
        assert_eq!(pixels_to_points(1275, 150), 612.0);
    }
}
