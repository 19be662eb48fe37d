// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer: one paragraph per image, separated by explicit page breaks,
// using `docx-rs`.

use std::io::Cursor;
use std::path::Path;

use docx_rs::{BreakType, Docx, Paragraph, Run};
use pagescribe_core::ImageText;
use pagescribe_core::error::{Result, ScribeError};
use tracing::{debug, info, instrument};

/// Builds the word-processor document.
///
/// Each [`ImageText`] becomes exactly one paragraph. Lines inside a text are
/// kept apart with line breaks in the same paragraph, and every paragraph but
/// the last ends with a page break, so N texts give N paragraphs and N-1 page
/// breaks.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render `texts` into DOCX bytes.
    #[instrument(skip_all, fields(entries = texts.len()))]
    pub fn create_document(&self, texts: &[ImageText]) -> Result<Vec<u8>> {
        let mut docx = Docx::new();
        let last = texts.len().saturating_sub(1);

        for (index, text) in texts.iter().enumerate() {
            let mut paragraph = Paragraph::new().add_run(text_run(text.content()));
            if index < last {
                paragraph = paragraph.add_run(Run::new().add_break(BreakType::Page));
            }
            docx = docx.add_paragraph(paragraph);
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|err| ScribeError::write("<docx buffer>", format!("packing failed: {err}")))?;

        let bytes = buffer.into_inner();
        debug!(bytes = bytes.len(), "DOCX assembled");
        Ok(bytes)
    }

    /// Render `texts` and write the document to `path`.
    pub fn write_to_file(&self, texts: &[ImageText], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.create_document(texts).map_err(|err| match err {
            ScribeError::WriteFailure { reason, .. } => ScribeError::write(path, reason),
            other => other,
        })?;
        std::fs::write(path, &bytes).map_err(|err| ScribeError::write(path, err))?;
        info!("Wrote DOCX to {}", path.display());
        Ok(())
    }
}

/// A run holding `content`, with `\n` turned into line breaks.
fn text_run(content: &str) -> Run {
    let mut run = Run::new();
    for (index, line) in content.split('\n').enumerate() {
        if index > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        if !line.is_empty() {
            run = run.add_text(line);
        }
    }
    run
}
