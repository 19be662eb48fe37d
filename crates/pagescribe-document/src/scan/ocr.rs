// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in OCR backend using the `ocrs` crate, a pure-Rust OCR engine backed by
// neural network models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// pagescribe-document = { path = "crates/pagescribe-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine requires two model files:
//
// - **Detection model** (`text-detection.rten`): locates text regions in the image.
// - **Recognition model** (`text-recognition.rten`): decodes characters from detected regions.
//
// Running the `ocrs-cli` tool once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where `OcrConfig::default` looks.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use pagescribe_core::Detection;
use pagescribe_core::config::OcrSettings;
use pagescribe_core::error::{Result, ScribeError};
use rten::Model;
use tracing::{debug, info, instrument};

use super::recognizer::{RecognitionMode, TextRecognizer};

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    /// Returns a config pointing at the default model cache directory.
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// The `model_dir` from the settings, or the cache directory.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        match &settings.model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(ScribeError::OcrEngine(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR through the `ocrs` engine.
///
/// Models are loaded once in [`new`](Self::new) and reused for every image.
///
/// **Important:** `ocrs` and `rten` must be compiled with optimisations; debug
/// builds are 10-100x slower.
pub struct OcrsRecognizer {
    engine: OcrsEngine,
}

impl OcrsRecognizer {
    /// Load both models named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::OcrEngine`] if model files are missing or corrupt.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            ScribeError::OcrEngine(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;

        info!("Loading OCR recognition model");
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                ScribeError::OcrEngine(format!(
                    "failed to load recognition model from {}: {}",
                    config.recognition_model_path.display(),
                    err
                ))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| ScribeError::OcrEngine(format!("failed to initialise ocrs: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Load models from the location named in the settings.
    pub fn from_settings(settings: &OcrSettings) -> Result<Self> {
        Self::new(OcrConfig::from_settings(settings))
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    #[instrument(skip_all, fields(image = %image.display()))]
    fn recognize(&self, image: &Path, mode: RecognitionMode) -> Result<Vec<Detection>> {
        if !mode.detect_regions {
            return Err(ScribeError::ocr(
                image,
                "ocrs always detects text regions; single-line mode is not supported",
            ));
        }

        let decoded = ::image::open(image)
            .map_err(|err| ScribeError::ocr(image, format!("failed to decode image: {err}")))?;

        // ocrs expects RGB8.
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            ScribeError::ocr(
                image,
                format!("failed to create image source ({width}x{height}): {err}"),
            )
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| ScribeError::ocr(image, format!("preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| ScribeError::ocr(image, format!("word detection failed: {err}")))?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        debug!(
            words = word_rects.len(),
            lines = line_rects.len(),
            "Text regions detected"
        );

        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| ScribeError::ocr(image, format!("line recognition failed: {err}")))?;

        let detections: Vec<Detection> = line_texts
            .iter()
            .flatten()
            .map(|line| line.to_string())
            .filter(|text| !text.trim().is_empty())
            .map(Detection::new)
            .collect();

        debug!(recognized = detections.len(), "ocrs recognition complete");
        Ok(detections)
    }
}
