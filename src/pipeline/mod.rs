//! Pipeline stages for the PDF and photo paths.
//!
//! Each submodule implements exactly one transformation step so each can be
//! tested on its own and swapped without touching its neighbours.
//!
//! ## Data Flow
//!
//! ```text
//! PDF:    input ──▶ render ──▶ assemble ──▶ recompress
//!         (bytes)   (pdfium)   (lopdf+jpeg)  (lopdf, temp file)
//!
//! Photo:  input ──▶ [crate::photo normalise] ──▶ encode
//!         (size cap, decode)                     (quality ladder)
//! ```
//!
//! 1. [`input`]      — read files, check magic bytes and the upload cap,
//!    decode photos to RGB
//! 2. [`render`]     — bind pdfium and rasterise every page, shrinking each
//!    to the letter-page bound
//! 3. [`assemble`]   — one JPEG image XObject per page in a fresh document
//! 4. [`recompress`] — prune and flate-compress through a temporary file
//! 5. [`encode`]     — JPEG encoding and the size-capped quality ladder
//! 6. [`write`]      — atomic output writes for the file-based wrappers

pub mod assemble;
pub mod encode;
pub mod input;
pub mod recompress;
pub mod render;
pub mod write;
