// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for pagescribe.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The text recognised in one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageText {
    /// The image the text came from.
    pub source: PathBuf,
    /// Recognised lines joined with `\n`.
    pub content: String,
}

impl ImageText {
    pub fn new(source: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One text region reported by an OCR engine.
///
/// Only the text is consumed downstream; the confidence is kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Recognised text of the region.
    pub text: String,
    /// Engine confidence in `0.0..=1.0`, if the engine reports one.
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }
}

/// Standard paper sizes for the PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
        }
    }
}

/// Built-in PDF font families available for the text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Times Roman (serif).
    #[default]
    Times,
    Helvetica,
    Courier,
}

impl FontFamily {
    /// Average glyph advance as a fraction of the font size.
    ///
    /// Used to estimate how many characters fit on a line without embedding
    /// font metrics.
    pub fn average_char_width_em(&self) -> f32 {
        match self {
            Self::Times => 0.45,
            Self::Helvetica => 0.50,
            Self::Courier => 0.60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_the_default_paper() {
        assert_eq!(PaperSize::default(), PaperSize::A4);
        assert_eq!(PaperSize::default().dimensions_mm(), (210, 297));
    }

    #[test]
    fn font_family_uses_lowercase_names() {
        let json = serde_json::to_string(&FontFamily::Helvetica).unwrap();
        assert_eq!(json, "\"helvetica\"");
        let parsed: FontFamily = serde_json::from_str("\"courier\"").unwrap();
        assert_eq!(parsed, FontFamily::Courier);
    }

    #[test]
    fn detection_constructors() {
        assert_eq!(Detection::new("Foo").confidence, None);
        assert_eq!(Detection::with_confidence("Foo", 0.9).confidence, Some(0.9));
    }
}
