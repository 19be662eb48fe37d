// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The OCR engine boundary.

use std::path::Path;

use pagescribe_core::Detection;
use pagescribe_core::error::Result;

/// How an engine should treat the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionMode {
    /// Locate text regions before recognising them. When `false` the whole
    /// image is treated as one line of text.
    pub detect_regions: bool,
}

impl Default for RecognitionMode {
    fn default() -> Self {
        Self {
            detect_regions: true,
        }
    }
}

/// An OCR engine: detects and recognises the text regions of one image.
///
/// Engines are constructed explicitly and borrowed by the extractor for the
/// length of a run; model loading belongs in the constructor, not here.
pub trait TextRecognizer {
    /// Short engine identifier used in logs (e.g. "tesseract", "ocrs").
    fn name(&self) -> &'static str;

    /// Recognise the image at `image`, returning regions in reading order.
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::OcrFailure`](pagescribe_core::ScribeError::OcrFailure)
    /// if the image cannot be read or the engine fails.
    fn recognize(&self, image: &Path, mode: RecognitionMode) -> Result<Vec<Detection>>;
}
