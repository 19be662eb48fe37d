// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the conversion pipeline with a scripted OCR engine.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use lopdf::content::Content;
use lopdf::{Document, Object};
use pagescribe_core::error::{Result, ScribeError};
use pagescribe_core::{AppConfig, Detection};
use pagescribe_document::{Pipeline, RecognitionMode, TextRecognizer};

/// Answers with canned detections keyed by file name.
struct ScriptedRecognizer {
    script: HashMap<&'static str, Vec<(&'static str, f32)>>,
}

impl ScriptedRecognizer {
    fn new(entries: &[(&'static str, &[(&'static str, f32)])]) -> Self {
        Self {
            script: entries
                .iter()
                .map(|(name, detections)| (*name, detections.to_vec()))
                .collect(),
        }
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn recognize(&self, image: &Path, mode: RecognitionMode) -> Result<Vec<Detection>> {
        assert!(mode.detect_regions, "region detection must be enabled");
        let name = image.file_name().unwrap().to_string_lossy();
        let detections = self
            .script
            .get(&*name)
            .ok_or_else(|| ScribeError::ocr(image, "no script entry"))?;
        Ok(detections
            .iter()
            .map(|(text, conf)| Detection::with_confidence(*text, *conf))
            .collect())
    }
}

fn write_images(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"\x89PNG").unwrap();
    }
}

/// Paragraph count, page-break count, and raw `word/document.xml`.
fn docx_summary(path: &Path) -> (usize, usize, String) {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    let paragraphs = xml.matches("<w:p>").count() + xml.matches("<w:p ").count();
    let page_breaks = xml.matches(r#"w:type="page""#).count();
    (paragraphs, page_breaks, xml)
}

/// Shown text per PDF page, one string per show-text operation, decoded with
/// the builtin fonts' WinAnsi code page.
fn pdf_pages(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter_map(|op| {
                    let mut parts = Vec::new();
                    for operand in &op.operands {
                        collect_strings(operand, &mut parts);
                    }
                    (!parts.is_empty()).then(|| parts.concat())
                })
                .collect()
        })
        .collect()
}

fn collect_strings(object: &Object, out: &mut Vec<String>) {
    match object {
        Object::String(bytes, _) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            out.push(text.into_owned());
        }
        Object::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

#[test]
fn two_images_give_two_pages() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_images(input.path(), &["1.png", "2.png"]);

    let engine = ScriptedRecognizer::new(&[
        ("1.png", &[("Hello", 1.0), ("World", 1.0)]),
        ("2.png", &[("Grüße – Foo", 1.0)]),
    ]);
    let config = AppConfig::default();

    let result = Pipeline::new(&engine, &config)
        .run(input.path(), output.path())
        .unwrap();
    assert_eq!(result.pages, 2);
    assert!(result.skipped.is_empty());

    let (paragraphs, page_breaks, xml) = docx_summary(&result.docx_path);
    assert_eq!(paragraphs, 2);
    assert_eq!(page_breaks, 1);
    assert!(xml.contains("Hello") && xml.contains("World") && xml.contains("Grüße – Foo"));

    let pages = pdf_pages(&result.pdf_path);
    assert_eq!(pages, [vec!["Hello", "World"], vec!["Grüße – Foo"]]);
}

#[test]
fn pages_follow_file_name_order() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_images(input.path(), &["c.jpeg", "a.png", "b.jpg"]);

    let engine = ScriptedRecognizer::new(&[
        ("a.png", &[("alpha", 0.9)]),
        ("b.jpg", &[("bravo", 0.9)]),
        ("c.jpeg", &[("charlie", 0.9)]),
    ]);
    let config = AppConfig::default();

    let result = Pipeline::new(&engine, &config)
        .run(input.path(), output.path())
        .unwrap();

    let pages = pdf_pages(&result.pdf_path);
    assert_eq!(pages, [vec!["alpha"], vec!["bravo"], vec!["charlie"]]);

    let (_, _, xml) = docx_summary(&result.docx_path);
    let positions: Vec<usize> = ["alpha", "bravo", "charlie"]
        .iter()
        .map(|word| xml.find(word).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn repeated_runs_produce_the_same_documents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_images(input.path(), &["a.png", "b.png"]);

    let engine = ScriptedRecognizer::new(&[
        ("a.png", &[("first", 1.0), ("page", 1.0)]),
        ("b.png", &[("second", 1.0)]),
    ]);
    let config = AppConfig::default();
    let pipeline = Pipeline::new(&engine, &config);

    let first = pipeline.run(input.path(), output.path()).unwrap();
    let first_docx = docx_summary(&first.docx_path);
    let first_pdf = pdf_pages(&first.pdf_path);

    let second = pipeline.run(input.path(), output.path()).unwrap();
    assert_eq!(first, second);

    let second_docx = docx_summary(&second.docx_path);
    assert_eq!(first_docx.0, second_docx.0);
    assert_eq!(first_docx.1, second_docx.1);
    assert_eq!(first_pdf, pdf_pages(&second.pdf_path));
}

#[test]
fn missing_input_creates_nothing() {
    let scratch = tempfile::tempdir().unwrap();
    let input = scratch.path().join("no-such-dir");
    let output = scratch.path().join("out");

    let engine = ScriptedRecognizer::new(&[]);
    let config = AppConfig::default();

    let err = Pipeline::new(&engine, &config)
        .run(&input, &output)
        .unwrap_err();
    assert!(matches!(err, ScribeError::DirectoryNotFound(path) if path == input));
    assert!(!output.exists());
}

#[test]
fn empty_input_still_writes_both_documents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("readme.md"), b"# not an image").unwrap();

    let engine = ScriptedRecognizer::new(&[]);
    let config = AppConfig::default();

    let result = Pipeline::new(&engine, &config)
        .run(input.path(), output.path())
        .unwrap();
    assert_eq!(result.pages, 0);

    let (paragraphs, page_breaks, _) = docx_summary(&result.docx_path);
    assert_eq!((paragraphs, page_breaks), (0, 0));
    assert_eq!(pdf_pages(&result.pdf_path).len(), 1);
}

#[test]
fn pdf_failure_keeps_the_docx() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_images(input.path(), &["a.png"]);

    let config = AppConfig {
        output_basename: "scan".into(),
        ..AppConfig::default()
    };
    // A directory where the PDF should go makes the PDF write fail.
    std::fs::create_dir(config.pdf_path(output.path())).unwrap();

    let engine = ScriptedRecognizer::new(&[("a.png", &[("kept", 1.0)])]);
    let err = Pipeline::new(&engine, &config)
        .run(input.path(), output.path())
        .unwrap_err();

    assert!(matches!(err, ScribeError::WriteFailure { path, .. } if path == config.pdf_path(output.path())));
    let (paragraphs, _, xml) = docx_summary(&config.docx_path(output.path()));
    assert_eq!(paragraphs, 1);
    assert!(xml.contains("kept"));
}

#[test]
fn unscripted_image_fails_the_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_images(input.path(), &["a.png", "b.png"]);

    let engine = ScriptedRecognizer::new(&[("a.png", &[("ok", 1.0)])]);
    let config = AppConfig::default();

    let err = Pipeline::new(&engine, &config)
        .run(input.path(), output.path())
        .unwrap_err();
    match err {
        ScribeError::OcrFailure { path, .. } => assert_eq!(path, input.path().join("b.png")),
        other => panic!("unexpected error variant: {other}"),
    }
}
