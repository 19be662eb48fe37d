// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extractor: turns one image into one newline-joined text block.

use std::path::Path;

use pagescribe_core::ImageText;
use pagescribe_core::error::{Result, ScribeError};
use tracing::{debug, instrument};

use super::recognizer::{RecognitionMode, TextRecognizer};

/// Runs an injected [`TextRecognizer`] over single images.
///
/// The extractor makes exactly one recognition attempt per image and keeps
/// only the text of each detection, in the order the engine reported them.
pub struct TextExtractor<'a> {
    recognizer: &'a dyn TextRecognizer,
    mode: RecognitionMode,
}

impl<'a> TextExtractor<'a> {
    /// Create an extractor with region detection enabled.
    pub fn new(recognizer: &'a dyn TextRecognizer) -> Self {
        Self {
            recognizer,
            mode: RecognitionMode::default(),
        }
    }

    /// Override the recognition mode passed to the engine.
    pub fn with_mode(mut self, mode: RecognitionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Name of the underlying engine.
    pub fn engine_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Recognise `path` and join the detected lines with `\n`.
    ///
    /// # Errors
    ///
    /// Always [`ScribeError::OcrFailure`]: engine errors of another kind are
    /// rewrapped with the image path.
    #[instrument(skip_all, fields(engine = self.recognizer.name(), path = %path.display()))]
    pub fn extract(&self, path: &Path) -> Result<ImageText> {
        if !path.is_file() {
            return Err(ScribeError::ocr(path, "not a regular file or unreadable"));
        }

        let detections = self
            .recognizer
            .recognize(path, self.mode)
            .map_err(|err| match err {
                ScribeError::OcrFailure { .. } => err,
                other => ScribeError::ocr(path, other),
            })?;

        let content = detections
            .iter()
            .map(|detection| detection.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            detections = detections.len(),
            chars = content.len(),
            "Text extracted"
        );
        Ok(ImageText::new(path, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagescribe_core::Detection;
    use std::cell::Cell;

    struct FixedRecognizer {
        detections: Vec<Detection>,
        calls: Cell<usize>,
        last_mode: Cell<Option<RecognitionMode>>,
    }

    impl FixedRecognizer {
        fn new(texts: &[&str]) -> Self {
            Self {
                detections: texts.iter().map(|t| Detection::with_confidence(*t, 1.0)).collect(),
                calls: Cell::new(0),
                last_mode: Cell::new(None),
            }
        }
    }

    impl TextRecognizer for FixedRecognizer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn recognize(&self, _image: &Path, mode: RecognitionMode) -> Result<Vec<Detection>> {
            self.calls.set(self.calls.get() + 1);
            self.last_mode.set(Some(mode));
            Ok(self.detections.clone())
        }
    }

    struct BrokenRecognizer;

    impl TextRecognizer for BrokenRecognizer {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn recognize(&self, _image: &Path, _mode: RecognitionMode) -> Result<Vec<Detection>> {
            Err(std::io::Error::other("device lost").into())
        }
    }

    fn image_file() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, b"png").unwrap();
        (dir, path)
    }

    #[test]
    fn joins_detections_with_newlines() {
        let (_dir, path) = image_file();
        let engine = FixedRecognizer::new(&["Hello", "World"]);

        let text = TextExtractor::new(&engine).extract(&path).unwrap();
        assert_eq!(text.content, "Hello\nWorld");
        assert_eq!(text.source, path);
    }

    #[test]
    fn no_detections_give_empty_text() {
        let (_dir, path) = image_file();
        let engine = FixedRecognizer::new(&[]);

        let text = TextExtractor::new(&engine).extract(&path).unwrap();
        assert_eq!(text.content, "");
    }

    #[test]
    fn detection_is_enabled_and_called_once() {
        let (_dir, path) = image_file();
        let engine = FixedRecognizer::new(&["Foo"]);

        TextExtractor::new(&engine).extract(&path).unwrap();
        assert_eq!(engine.calls.get(), 1);
        assert_eq!(
            engine.last_mode.get(),
            Some(RecognitionMode {
                detect_regions: true
            })
        );
    }

    #[test]
    fn missing_file_fails_before_engine_runs() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FixedRecognizer::new(&["Foo"]);

        let err = TextExtractor::new(&engine)
            .extract(&dir.path().join("gone.png"))
            .unwrap_err();
        assert!(matches!(err, ScribeError::OcrFailure { .. }));
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn foreign_engine_errors_become_ocr_failures() {
        let (_dir, path) = image_file();

        let err = TextExtractor::new(&BrokenRecognizer).extract(&path).unwrap_err();
        match err {
            ScribeError::OcrFailure { path: failed, reason } => {
                assert_eq!(failed, path);
                assert!(reason.contains("device lost"));
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
