//! Face detection seam for the face-aware photo normaliser.
//!
//! The pipeline only needs "give me face boxes for this grayscale buffer",
//! so detection sits behind the [`FaceDetector`] trait. The built-in
//! [`RustfaceDetector`] (feature `face-detect`) runs the SeetaFace frontal
//! cascade; tests and embedders can supply their own implementation.

#[cfg(feature = "face-detect")]
mod seeta;

#[cfg(feature = "face-detect")]
pub use seeta::{RustfaceDetector, FACE_MODEL_ENV};

use crate::error::DocFitError;
use serde::Serialize;

/// Bounding box of a detected face, in source-image pixels.
///
/// `x`/`y` may be slightly negative: cascade detectors can place a window
/// partly outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Detector confidence; not used for selection.
    pub score: f64,
}

impl FaceBounds {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width × height` bytes.
    ///
    /// An empty `Vec` means "no face". Backend failures are errors and must
    /// not be reported as an empty result.
    fn detect(&self, gray: &[u8], width: u32, height: u32)
        -> Result<Vec<FaceBounds>, DocFitError>;
}

/// Pick the face to frame: the largest box by area.
///
/// Boxes sharing the maximal area are resolved top-most first, then
/// left-most, so the choice never depends on the order the detector
/// happened to report them in.
pub fn select_largest_face(faces: &[FaceBounds]) -> Option<FaceBounds> {
    faces
        .iter()
        .copied()
        .min_by(|a, b| {
            b.area()
                .cmp(&a.area())
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
        })
}
