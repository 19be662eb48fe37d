// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline: image folder in, DOCX and PDF out.
//
// Steps run strictly in order: list the input folder, create the output
// folder, recognise every image, write the DOCX, write the PDF. The first
// error stops the run and nothing already written is removed, so a PDF
// failure leaves a complete DOCX behind.

use std::path::{Path, PathBuf};

use pagescribe_core::error::{Result, ScribeError};
use pagescribe_core::{AppConfig, ImageText};
use tracing::{info, instrument, warn};

use crate::docx::writer::DocxWriter;
use crate::pdf::writer::PdfWriter;
use crate::scan::enumerate::ImageEnumerator;
use crate::scan::extract::TextExtractor;
use crate::scan::recognizer::TextRecognizer;

/// Progress notification sent before each image is recognised.
#[derive(Debug, Clone, Copy)]
pub struct ImageProgress<'a> {
    /// Zero-based position of the image in the run.
    pub index: usize,
    pub total: usize,
    pub path: &'a Path,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub docx_path: PathBuf,
    pub pdf_path: PathBuf,
    /// Number of image texts written to each document.
    pub pages: usize,
    /// Images left out because recognition failed (skip policy only).
    pub skipped: Vec<PathBuf>,
}

/// One conversion run over an injected OCR engine.
pub struct Pipeline<'a> {
    recognizer: &'a dyn TextRecognizer,
    config: &'a AppConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(recognizer: &'a dyn TextRecognizer, config: &'a AppConfig) -> Self {
        Self { recognizer, config }
    }

    /// Convert every image in `input_dir` and write both documents into
    /// `output_dir`.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunOutput> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_image` before each image.
    ///
    /// # Errors
    ///
    /// - [`ScribeError::DirectoryNotFound`] before anything is created when
    ///   `input_dir` is missing.
    /// - [`ScribeError::WriteFailure`] if the output folder or a document
    ///   cannot be written.
    /// - [`ScribeError::OcrFailure`] for the first image that fails, unless
    ///   `skip_failed_images` is set.
    #[instrument(skip_all, fields(
        input = %input_dir.display(),
        output = %output_dir.display(),
        engine = self.recognizer.name(),
    ))]
    pub fn run_with_progress<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        mut on_image: F,
    ) -> Result<RunOutput>
    where
        F: FnMut(ImageProgress<'_>),
    {
        self.config.validate()?;

        let images = ImageEnumerator::new(&self.config.extensions).enumerate(input_dir)?;
        info!(images = images.len(), "Found images");

        std::fs::create_dir_all(output_dir).map_err(|err| ScribeError::write(output_dir, err))?;

        let extractor = TextExtractor::new(self.recognizer);
        let total = images.len();
        let mut texts: Vec<ImageText> = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (index, path) in images.iter().enumerate() {
            on_image(ImageProgress { index, total, path });
            info!(image = index + 1, total, "Processing: {}", path.display());

            match extractor.extract(path) {
                Ok(text) => texts.push(text),
                Err(err @ ScribeError::OcrFailure { .. }) if self.config.skip_failed_images => {
                    warn!(error = %err, "Skipping image");
                    skipped.push(path.clone());
                }
                Err(err) => return Err(err),
            }
        }

        let docx_path = self.config.docx_path(output_dir);
        let pdf_path = self.config.pdf_path(output_dir);

        DocxWriter::new().write_to_file(&texts, &docx_path)?;

        let mut pdf = PdfWriter::new(self.config.pdf.clone());
        pdf.set_title(&self.config.output_basename);
        pdf.write_to_file(&texts, &pdf_path)?;

        info!(
            pages = texts.len(),
            skipped = skipped.len(),
            "Output saved to: {}, {}",
            docx_path.display(),
            pdf_path.display()
        );

        Ok(RunOutput {
            docx_path,
            pdf_path,
            pages: texts.len(),
            skipped,
        })
    }
}
