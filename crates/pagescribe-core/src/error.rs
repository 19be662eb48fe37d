// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pagescribe.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type for all pagescribe operations.
#[derive(Debug, Error)]
pub enum ScribeError {
    // -- Input --
    #[error("input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    // -- Recognition --
    #[error("OCR failed for {}: {reason}", path.display())]
    OcrFailure { path: PathBuf, reason: String },

    #[error("OCR engine unavailable: {0}")]
    OcrEngine(String),

    // -- Output --
    #[error("cannot write {}: {reason}", path.display())]
    WriteFailure { path: PathBuf, reason: String },

    // -- Settings --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScribeError {
    /// Build an [`ScribeError::OcrFailure`] for `path`.
    pub fn ocr(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> Self {
        Self::OcrFailure {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`ScribeError::WriteFailure`] for `path`.
    pub fn write(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> Self {
        Self::WriteFailure {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScribeError>;
