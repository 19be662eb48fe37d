// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: image enumeration, the OCR engine boundary, and
// per-image text extraction.

pub mod enumerate;
pub mod extract;
pub mod recognizer;
pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use enumerate::ImageEnumerator;
pub use extract::TextExtractor;
pub use recognizer::{RecognitionMode, TextRecognizer};
pub use tesseract::TesseractRecognizer;

#[cfg(feature = "ocr")]
pub use ocr::OcrsRecognizer;
