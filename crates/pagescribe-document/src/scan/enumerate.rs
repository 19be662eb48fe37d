// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image enumerator: lists the image files directly inside an input folder.

use std::path::{Path, PathBuf};

use pagescribe_core::error::{Result, ScribeError};
use tracing::{debug, instrument};

/// Finds image files in a directory by extension.
///
/// Matching is case-insensitive (`scan.PNG` matches `png`). Only regular files
/// directly inside the directory are considered; subdirectories are skipped,
/// not descended into. Results are sorted by file name so output documents
/// are reproducible across platforms.
#[derive(Debug, Clone)]
pub struct ImageEnumerator {
    /// Lowercase extensions without the leading dot.
    extensions: Vec<String>,
}

impl Default for ImageEnumerator {
    fn default() -> Self {
        Self::new(["png", "jpg", "jpeg"])
    }
}

impl ImageEnumerator {
    /// Create an enumerator for the given extension set.
    ///
    /// Extensions may be given with or without a leading dot and in any case.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        extensions.sort();
        extensions.dedup();
        Self { extensions }
    }

    /// The normalised extension set.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` carries one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    /// List matching image files in `dir`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::DirectoryNotFound`] if `dir` is missing or is not
    /// a directory, and [`ScribeError::Io`] if listing it fails.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn enumerate(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ScribeError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut images = Vec::new();
        let mut ignored = 0usize;
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            // Follows symlinks, so a link to an image counts as an image.
            if path.is_file() && self.matches(&path) {
                images.push(path);
            } else {
                ignored += 1;
            }
        }

        images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!(images = images.len(), ignored, "Input directory listed");
        Ok(images)
    }
}
