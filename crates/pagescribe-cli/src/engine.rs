// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine construction. The engine is built once per process and lent to
// the pipeline.

use pagescribe_core::config::{OcrEngineKind, OcrSettings};
use pagescribe_core::error::Result;
use pagescribe_document::{TesseractRecognizer, TextRecognizer};
use tracing::info;

/// Build the engine named in `settings`.
///
/// # Errors
///
/// Returns [`pagescribe_core::ScribeError::OcrEngine`] if the engine cannot
/// start, including `ocrs` requested from a build without the "ocr" feature.
pub fn build_recognizer(settings: &OcrSettings) -> Result<Box<dyn TextRecognizer>> {
    let recognizer: Box<dyn TextRecognizer> = match settings.engine {
        OcrEngineKind::Tesseract => Box::new(TesseractRecognizer::from_settings(settings)),
        OcrEngineKind::Ocrs => ocrs_recognizer(settings)?,
    };
    info!(engine = recognizer.name(), "OCR engine ready");
    Ok(recognizer)
}

#[cfg(feature = "ocr")]
fn ocrs_recognizer(settings: &OcrSettings) -> Result<Box<dyn TextRecognizer>> {
    Ok(Box::new(pagescribe_document::OcrsRecognizer::from_settings(
        settings,
    )?))
}

#[cfg(not(feature = "ocr"))]
fn ocrs_recognizer(_settings: &OcrSettings) -> Result<Box<dyn TextRecognizer>> {
    Err(pagescribe_core::ScribeError::OcrEngine(
        "this build has no ocrs support; rebuild with `--features ocr` or use tesseract".into(),
    ))
}
