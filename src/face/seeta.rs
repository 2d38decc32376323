//! SeetaFace frontal detector backed by `rustface`.

use super::{FaceBounds, FaceDetector};
use crate::error::DocFitError;
use rustface::ImageData;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the SeetaFace model file.
pub const FACE_MODEL_ENV: &str = "DOCFIT_FACE_MODEL";

/// Built-in detector using the SeetaFace frontal cascade.
///
/// The model is read once at construction. `rustface` detectors need
/// `&mut self`, so a fresh detector is instantiated from the cached model
/// bytes on every call.
pub struct RustfaceDetector {
    path: PathBuf,
    model: Vec<u8>,
}

impl RustfaceDetector {
    /// Load the model from `path`.
    pub fn from_path(path: &Path) -> Result<Self, DocFitError> {
        let model = std::fs::read(path).map_err(|e| DocFitError::FaceModelUnavailable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        // Corrupt models fail here rather than inside `detect`.
        rustface::read_model(Cursor::new(&model)).map_err(|e| {
            DocFitError::FaceModelUnavailable {
                path: path.to_path_buf(),
                detail: e.to_string(),
            }
        })?;
        debug!("Loaded face model: {} ({} bytes)", path.display(), model.len());
        Ok(Self {
            path: path.to_path_buf(),
            model,
        })
    }

    /// Load the model from `path`, falling back to `DOCFIT_FACE_MODEL`.
    pub fn resolve(path: Option<&Path>) -> Result<Self, DocFitError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var(FACE_MODEL_ENV).map(PathBuf::from).map_err(|_| {
                DocFitError::FaceModelUnavailable {
                    path: PathBuf::from(format!("${FACE_MODEL_ENV}")),
                    detail: "no model path given and the variable is unset".into(),
                }
            })?,
        };
        Self::from_path(&path)
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<FaceBounds>, DocFitError> {
        let model = rustface::read_model(Cursor::new(&self.model)).map_err(|e| {
            DocFitError::FaceModelUnavailable {
                path: self.path.clone(),
                detail: e.to_string(),
            }
        })?;
        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let mut image = ImageData::new(gray, width, height);
        let faces: Vec<FaceBounds> = detector
            .detect(&mut image)
            .into_iter()
            .map(|info| {
                let bbox = info.bbox();
                FaceBounds {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                    score: info.score(),
                }
            })
            .collect();
        debug!("Detector found {} face(s) in {}x{}", faces.len(), width, height);
        Ok(faces)
    }
}
