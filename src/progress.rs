//! Progress-callback trait for per-page rendering events.
//!
//! Inject an [`Arc<dyn RenderProgress>`] via
//! [`crate::config::PdfConfigBuilder::progress`] to be told as each page of
//! a document is rasterised. Rendering is the slow stage of the PDF pipeline
//! (hundreds of milliseconds per page at 300 DPI), so it is the only one
//! that reports progress.
//!
//! # Example
//!
//! ```rust
//! use docfit::{PdfConfig, RenderProgress};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl RenderProgress for Counter {
//!     fn on_page_rendered(&self, page_num: usize, total_pages: usize, width: u32, height: u32) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num}/{total_pages}: {width}x{height}");
//!     }
//! }
//!
//! let config = PdfConfig::builder()
//!     .progress(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the PDF pipeline while it rasterises pages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The trait is `Send + Sync` so a config holding it
/// can be shared freely.
pub trait RenderProgress: Send + Sync {
    /// Called once after the document is opened, before any page is rendered.
    fn on_render_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been rendered and fitted to the page bound.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `width`, `height` — final pixel size of the page image
    fn on_page_rendered(&self, page_num: usize, total_pages: usize, width: u32, height: u32) {
        let _ = (page_num, total_pages, width, height);
    }

    /// Called once after every page has been rendered.
    fn on_render_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl RenderProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::PdfConfig`].
pub type ProgressCallback = Arc<dyn RenderProgress>;
