// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: one text page (or more, on overflow) per source image, using
// `printpdf` 0.8.
//
// Text is set in a builtin Type 1 font declared with WinAnsiEncoding. printpdf
// writes builtin-font text as raw UTF-8, so each line is transcoded to
// Windows-1252 here and shown with a plain `Tj`. Characters outside that code
// page print as `?`.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use pagescribe_core::config::PdfLayout;
use pagescribe_core::error::{Result, ScribeError};
use pagescribe_core::{FontFamily, ImageText};
use encoding_rs::WINDOWS_1252;
use printpdf::{
    BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
};
use tracing::{debug, info, instrument};

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Horizontal padding between the margin and the first glyph.
const CELL_PADDING_MM: f32 = 1.0;

/// The wrapped lines placed on one PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLines {
    /// Index of the [`ImageText`] the page belongs to.
    pub entry: usize,
    pub lines: Vec<String>,
}

/// Creates the page-per-image PDF.
///
/// Every entry starts on a fresh page. An entry longer than one page continues
/// on as many following pages as it needs, breaking at the bottom margin.
pub struct PdfWriter {
    layout: PdfLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(PdfLayout::default())
    }
}

impl PdfWriter {
    pub fn new(layout: PdfLayout) -> Self {
        Self { layout, title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn layout(&self) -> &PdfLayout {
        &self.layout
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.layout.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    fn builtin_font(&self) -> BuiltinFont {
        match self.layout.font {
            FontFamily::Times => BuiltinFont::TimesRoman,
            FontFamily::Helvetica => BuiltinFont::Helvetica,
            FontFamily::Courier => BuiltinFont::Courier,
        }
    }

    /// Characters that fit on one line, estimated from the average glyph width.
    fn max_chars_per_line(&self) -> usize {
        let (page_w, _) = self.page_dimensions();
        let usable_width_mm = page_w.0 - 2.0 * (self.layout.margin_mm + CELL_PADDING_MM);
        let avg_char_width_mm =
            self.layout.font.average_char_width_em() * self.layout.font_size_pt * MM_PER_PT;
        ((usable_width_mm / avg_char_width_mm) as usize).max(1)
    }

    /// Lines that fit between the top margin and the bottom break margin.
    fn lines_per_page(&self) -> usize {
        let (_, page_h) = self.page_dimensions();
        let usable_height_mm = page_h.0 - self.layout.margin_mm - self.layout.bottom_margin_mm;
        ((usable_height_mm / self.layout.line_height_mm) as usize).max(1)
    }

    /// Distribute `texts` over pages.
    ///
    /// Each entry yields at least one page, even when empty. No entries yield a
    /// single blank page so the document is never page-less.
    pub fn paginate(&self, texts: &[ImageText]) -> Vec<PageLines> {
        let max_chars = self.max_chars_per_line();
        let per_page = self.lines_per_page();

        let mut pages = Vec::with_capacity(texts.len().max(1));
        for (entry, text) in texts.iter().enumerate() {
            let wrapped = wrap_text(text.content(), max_chars);
            if wrapped.is_empty() {
                pages.push(PageLines {
                    entry,
                    lines: Vec::new(),
                });
                continue;
            }
            for chunk in wrapped.chunks(per_page) {
                pages.push(PageLines {
                    entry,
                    lines: chunk.to_vec(),
                });
            }
        }

        if pages.is_empty() {
            pages.push(PageLines {
                entry: 0,
                lines: Vec::new(),
            });
        }
        pages
    }

    /// Render `texts` into PDF bytes.
    #[instrument(skip_all, fields(entries = texts.len()))]
    pub fn create_document(&self, texts: &[ImageText]) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("pagescribe");
        let font = self.builtin_font();
        let font_size_pt = self.layout.font_size_pt;

        info!(paper = ?self.layout.paper_size, font = ?self.layout.font, title, "Creating text PDF");

        let left_pt = Mm(self.layout.margin_mm + CELL_PADDING_MM).into_pt().0;
        let page_h_pt = page_h.into_pt().0;
        // Baseline sits in the lower part of each line cell: half the cell
        // height plus 0.3 of the glyph size below the cell top.
        let first_baseline_mm = self.layout.margin_mm
            + 0.5 * self.layout.line_height_mm
            + 0.3 * font_size_pt * MM_PER_PT;

        let laid_out = self.paginate(texts);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(laid_out.len());
        let mut replaced = 0usize;
        for page in &laid_out {
            let mut ops: Vec<Op> = Vec::new();
            for (line_idx, line) in page.lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline_mm =
                    first_baseline_mm + line_idx as f32 * self.layout.line_height_mm;
                let y_pt = page_h_pt - Mm(baseline_mm).into_pt().0;

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(left_pt),
                        y: Pt(y_pt),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(font_size_pt),
                    font,
                });
                let (encoded, unmapped) = encode_win_ansi(line);
                replaced += unmapped;
                // Empty items emit nothing but register the font on the page.
                ops.push(Op::WriteTextBuiltinFont {
                    items: Vec::new(),
                    font,
                });
                ops.push(Op::Unknown {
                    key: "Tj".into(),
                    value: vec![DictItem::String {
                        data: encoded,
                        literal: false,
                    }],
                });
                ops.push(Op::EndTextSection);
            }
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        let mut doc = PdfDocument::new(title);
        doc.with_pages(pages);

        debug!(pages = doc.pages.len(), "Text layout complete");
        if replaced > 0 {
            debug!(replaced, "Characters outside WinAnsi printed as '?'");
        }

        // `secure` drops raw operators, which would drop every `Tj` above.
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }

    /// Render `texts` and write the PDF to `path`.
    pub fn write_to_file(&self, texts: &[ImageText], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.create_document(texts)?;
        std::fs::write(path, &bytes).map_err(|err| ScribeError::write(path, err))?;
        info!("Wrote PDF to {}", path.display());
        Ok(())
    }
}

// -- Text encoding and wrapping helpers ---------------------------------------

/// Windows-1252 bytes for `line` and the number of characters replaced by `?`.
fn encode_win_ansi(line: &str) -> (Vec<u8>, usize) {
    let mut bytes = Vec::with_capacity(line.len());
    let mut replaced = 0;
    let mut scratch = [0u8; 4];
    for ch in line.chars() {
        let (encoded, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut scratch));
        if unmappable {
            bytes.push(b'?');
            replaced += 1;
        } else {
            bytes.extend_from_slice(&encoded);
        }
    }
    (bytes, replaced)
}

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then word-wraps each paragraph at single
/// spaces. Runs of spaces and leading indentation survive; only the space at a
/// wrap point is dropped. Words longer than `max_width` are force-broken on
/// character boundaries. An empty string yields no lines.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();
    if text.is_empty() {
        return result;
    }

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0usize;
        let mut started = false;

        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            if word_len > max_width {
                if current_len > 0 {
                    result.push(std::mem::take(&mut current_line));
                }
                current_line.clear();
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        result.push(piece);
                    } else {
                        current_len = chunk.len();
                        current_line = piece;
                    }
                }
            } else if !started {
                current_line.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_string()));
                current_len = word_len;
            }
            started = true;
        }

        result.push(current_line);
    }

    result
}
