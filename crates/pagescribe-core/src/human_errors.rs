// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every error is mapped to a one-line summary and a concrete next step. The
// summary names the file involved so a failed batch can be diagnosed without
// re-running it with debug logging.

use crate::error::ScribeError;

/// Whether fixing the problem needs the user or just another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run may succeed if repeated unchanged (disk briefly full, etc.).
    Transient,
    /// The user must change an input, a setting, or the installation.
    ActionRequired,
}

/// A plain-language error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Summary line.
    pub message: String,
    /// What to try next.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a [`ScribeError`] into a [`HumanError`] for display.
pub fn humanize_error(err: &ScribeError) -> HumanError {
    match err {
        ScribeError::DirectoryNotFound(path) => HumanError {
            message: format!("The input folder {} does not exist.", path.display()),
            suggestion: "Check the path and make sure it points at a folder of images.".into(),
            severity: Severity::ActionRequired,
        },

        ScribeError::OcrFailure { path, reason } => humanize_ocr_failure(path, reason),

        ScribeError::OcrEngine(detail) => {
            if detail.contains("model not found") {
                HumanError {
                    message: "The OCR models are not installed.".into(),
                    suggestion: format!(
                        "Download text-detection.rten and text-recognition.rten, then pass --model-dir. ({detail})"
                    ),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The OCR engine could not be started.".into(),
                    suggestion: format!("Check the engine installation. ({detail})"),
                    severity: Severity::ActionRequired,
                }
            }
        }

        ScribeError::WriteFailure { path, reason } => {
            let lower = reason.to_lowercase();
            let severity = if lower.contains("no space") || lower.contains("interrupted") {
                Severity::Transient
            } else {
                Severity::ActionRequired
            };
            HumanError {
                message: format!("Could not write {}.", path.display()),
                suggestion: format!(
                    "Make sure the output folder is writable and the disk has free space. ({reason})"
                ),
                severity,
            }
        }

        ScribeError::Config(detail) => HumanError {
            message: "The settings are not valid.".into(),
            suggestion: format!("Fix the settings file or command-line options. ({detail})"),
            severity: Severity::ActionRequired,
        },

        ScribeError::Io(io) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check folder permissions and try again. ({io})"),
            severity: Severity::Transient,
        },

        ScribeError::Serialization(detail) => HumanError {
            message: "The settings file is not valid JSON.".into(),
            suggestion: format!("Fix the syntax error and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_ocr_failure(path: &std::path::Path, reason: &str) -> HumanError {
    let lower = reason.to_lowercase();

    if lower.contains("not found") && lower.contains("tesseract") {
        HumanError {
            message: "The tesseract program is not installed.".into(),
            suggestion: "Install tesseract, or choose the built-in engine with --engine ocrs.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("decode") || lower.contains("not a regular file") {
        HumanError {
            message: format!("{} could not be read as an image.", path.display()),
            suggestion: "Remove or re-export the file, or rerun with --skip-failed.".into(),
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: format!("Text recognition failed on {}.", path.display()),
            suggestion: format!("Rerun with --skip-failed to continue past this image. ({reason})"),
            severity: Severity::ActionRequired,
        }
    }
}
