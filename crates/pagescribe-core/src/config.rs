// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScribeError};
use crate::types::{FontFamily, PaperSize};

/// Settings for a conversion run.
///
/// Input and output directories are not part of the settings; they are passed
/// to the pipeline per run. Every field has a default so a settings file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File stem shared by the generated `.docx` and `.pdf`.
    pub output_basename: String,
    /// Image extensions picked up from the input directory (case-insensitive).
    pub extensions: Vec<String>,
    /// Skip images whose recognition fails instead of aborting the run.
    pub skip_failed_images: bool,
    /// PDF page layout.
    pub pdf: PdfLayout,
    /// OCR engine selection.
    pub ocr: OcrSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_basename: "output".into(),
            extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            skip_failed_images: false,
            pdf: PdfLayout::default(),
            ocr: OcrSettings::default(),
        }
    }
}

impl AppConfig {
    /// Read settings from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ScribeError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let name = self.output_basename.as_str();
        if name.trim().is_empty() {
            return Err(ScribeError::Config("output_basename is empty".into()));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ScribeError::Config(format!(
                "output_basename must be a plain file name, got {name:?}"
            )));
        }
        if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(ScribeError::Config("no image extensions configured".into()));
        }
        self.pdf.validate()
    }

    /// Destination of the word-processor document inside `output_dir`.
    pub fn docx_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.docx", self.output_basename))
    }

    /// Destination of the PDF inside `output_dir`.
    pub fn pdf_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.pdf", self.output_basename))
    }
}

/// PDF page geometry and typeface. Lengths are millimetres unless suffixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    pub paper_size: PaperSize,
    pub font: FontFamily,
    pub font_size_pt: f32,
    /// Vertical advance per text line.
    pub line_height_mm: f32,
    /// Left, right, and top margin.
    pub margin_mm: f32,
    /// Space kept free at the page bottom; text continues on a new page past it.
    pub bottom_margin_mm: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            font: FontFamily::Times,
            font_size_pt: 12.0,
            line_height_mm: 10.0,
            margin_mm: 10.0,
            bottom_margin_mm: 15.0,
        }
    }
}

impl PdfLayout {
    pub fn validate(&self) -> Result<()> {
        if !(self.font_size_pt > 0.0) {
            return Err(ScribeError::Config("pdf.font_size_pt must be positive".into()));
        }
        if !(self.line_height_mm > 0.0) {
            return Err(ScribeError::Config("pdf.line_height_mm must be positive".into()));
        }
        if self.margin_mm < 0.0 || self.bottom_margin_mm < 0.0 {
            return Err(ScribeError::Config("pdf margins must not be negative".into()));
        }

        let (width, height) = self.paper_size.dimensions_mm();
        let usable_width = width as f32 - 2.0 * self.margin_mm;
        let usable_height = height as f32 - self.margin_mm - self.bottom_margin_mm;
        if usable_width <= 0.0 || usable_height < self.line_height_mm {
            return Err(ScribeError::Config(format!(
                "pdf margins leave no room for text on {:?} paper",
                self.paper_size
            )));
        }
        Ok(())
    }
}

/// Which OCR engine to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// The external `tesseract` command.
    #[default]
    Tesseract,
    /// The built-in `ocrs` neural engine.
    Ocrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub engine: OcrEngineKind,
    /// Program name or path of the tesseract binary.
    pub tesseract_binary: String,
    /// Tesseract language code.
    pub language: String,
    /// Directory holding the ocrs `.rten` models; `None` uses the cache dir.
    pub model_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            tesseract_binary: "tesseract".into(),
            language: "eng".into(),
            model_dir: None,
        }
    }
}
