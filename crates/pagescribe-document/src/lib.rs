// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagescribe-document: Image-folder OCR and document output for pagescribe.
//
// Provides image enumeration, OCR text extraction behind the `TextRecognizer`
// trait (tesseract always, `ocrs` with the "ocr" feature), page-per-image
// DOCX and PDF writers, and the `Pipeline` that runs them in order.

pub mod docx;
pub mod pdf;
pub mod pipeline;
pub mod scan;

// Re-export the primary structs so callers can use `pagescribe_document::PdfWriter` etc.
pub use docx::writer::DocxWriter;
pub use pdf::writer::PdfWriter;
pub use pipeline::{ImageProgress, Pipeline, RunOutput};
pub use scan::enumerate::ImageEnumerator;
pub use scan::extract::TextExtractor;
pub use scan::recognizer::{RecognitionMode, TextRecognizer};
pub use scan::tesseract::TesseractRecognizer;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrsRecognizer;
