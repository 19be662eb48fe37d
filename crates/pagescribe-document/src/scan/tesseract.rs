// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract backend: runs the `tesseract` command and reads its TSV report.
//
// The TSV report has one row per layout element. Word rows (level 5) carry the
// text and a 0-100 confidence; words sharing (page, block, paragraph, line)
// form one text line. The report is checked column by column, so an
// unexpected tesseract version fails loudly instead of producing garbage.

use std::path::{Path, PathBuf};
use std::process::Command;

use pagescribe_core::Detection;
use pagescribe_core::config::OcrSettings;
use pagescribe_core::error::{Result, ScribeError};
use tracing::{debug, instrument};

use super::recognizer::{RecognitionMode, TextRecognizer};

/// Column names of the tesseract TSV header, in order.
const TSV_COLUMNS: [&str; 12] = [
    "level", "page_num", "block_num", "par_num", "line_num", "word_num", "left", "top", "width",
    "height", "conf", "text",
];

/// Layout level of a single word in the TSV report.
const WORD_LEVEL: u32 = 5;

/// Page segmentation: fully automatic, no orientation detection.
const PSM_AUTO: &str = "3";
/// Page segmentation: treat the image as a single text line.
const PSM_SINGLE_LINE: &str = "7";

/// OCR via an installed `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl TesseractRecognizer {
    /// Use `binary` (a program name on `PATH` or a path) with language `language`.
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    /// Build from the `ocr` section of the settings.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::new(&settings.tesseract_binary, &settings.language)
    }

    fn command(&self, image: &Path, mode: RecognitionMode) -> Command {
        let psm = if mode.detect_regions {
            PSM_AUTO
        } else {
            PSM_SINGLE_LINE
        };
        let mut command = Command::new(&self.binary);
        command
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .args(["--psm", psm])
            .arg("tsv");
        command
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    #[instrument(skip_all, fields(image = %image.display(), lang = %self.language))]
    fn recognize(&self, image: &Path, mode: RecognitionMode) -> Result<Vec<Detection>> {
        let output = self.command(image, mode).output().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ScribeError::ocr(
                    image,
                    format!("tesseract binary not found: {}", self.binary.display()),
                )
            } else {
                ScribeError::ocr(image, format!("failed to run tesseract: {err}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScribeError::ocr(
                image,
                format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let report = String::from_utf8(output.stdout)
            .map_err(|err| ScribeError::ocr(image, format!("tesseract output is not UTF-8: {err}")))?;

        let detections = parse_tsv(&report).map_err(|reason| ScribeError::ocr(image, reason))?;
        debug!(lines = detections.len(), "Tesseract report parsed");
        Ok(detections)
    }
}

/// Key identifying one text line in the report.
type LineKey = (u32, u32, u32, u32);

struct LineAccumulator {
    key: LineKey,
    words: Vec<String>,
    confidence_sum: f32,
}

/// Parse a tesseract TSV report into one detection per text line.
///
/// Returns a description of the first schema violation as the error.
fn parse_tsv(report: &str) -> std::result::Result<Vec<Detection>, String> {
    let mut rows = report.lines().filter(|line| !line.trim().is_empty());

    let header = rows.next().ok_or("empty TSV report")?;
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    if columns != TSV_COLUMNS {
        return Err(format!("unexpected TSV header: {header:?}"));
    }

    let mut lines: Vec<LineAccumulator> = Vec::new();
    for (index, row) in rows.enumerate() {
        let row_number = index + 2;
        let fields: Vec<&str> = row.splitn(TSV_COLUMNS.len(), '\t').collect();
        // Rows for non-word elements may omit the trailing empty text column.
        if fields.len() < TSV_COLUMNS.len() - 1 {
            return Err(format!(
                "row {row_number} has {} fields, expected {}",
                fields.len(),
                TSV_COLUMNS.len()
            ));
        }

        let int = |column: usize| -> std::result::Result<u32, String> {
            fields[column].trim().parse::<u32>().map_err(|_| {
                format!(
                    "row {row_number}: {} is not an integer: {:?}",
                    TSV_COLUMNS[column], fields[column]
                )
            })
        };

        let level = int(0)?;
        let key = (int(1)?, int(2)?, int(3)?, int(4)?);
        let confidence: f32 = fields[10].trim().parse().map_err(|_| {
            format!("row {row_number}: conf is not a number: {:?}", fields[10])
        })?;
        let text = fields.get(11).map(|t| t.trim()).unwrap_or_default();

        if level != WORD_LEVEL || text.is_empty() {
            continue;
        }

        match lines.iter_mut().find(|line| line.key == key) {
            Some(line) => {
                line.words.push(text.to_string());
                line.confidence_sum += confidence;
            }
            None => lines.push(LineAccumulator {
                key,
                words: vec![text.to_string()],
                confidence_sum: confidence,
            }),
        }
    }

    Ok(lines
        .into_iter()
        .map(|line| {
            let mean = line.confidence_sum / line.words.len() as f32;
            Detection::with_confidence(line.words.join(" "), (mean / 100.0).clamp(0.0, 1.0))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn report(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn words_are_grouped_into_lines() {
        let tsv = report(&[
            "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t",
            "4\t1\t1\t1\t1\t0\t10\t10\t200\t20\t-1\t",
            "5\t1\t1\t1\t1\t1\t10\t10\t90\t20\t96.0\tHello",
            "5\t1\t1\t1\t1\t2\t110\t10\t90\t20\t90.0\tthere",
            "5\t1\t1\t1\t2\t1\t10\t40\t90\t20\t88.5\tWorld",
        ]);

        let detections = parse_tsv(&tsv).unwrap();
        let texts: Vec<&str> = detections.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, ["Hello there", "World"]);

        let confidence = detections[0].confidence.unwrap();
        assert!((confidence - 0.93).abs() < 1e-4);
    }

    #[test]
    fn blank_words_are_dropped() {
        let tsv = report(&[
            "5\t1\t1\t1\t1\t1\t10\t10\t90\t20\t95\t ",
            "5\t1\t1\t1\t2\t1\t10\t40\t90\t20\t95\tFoo",
        ]);
        let detections = parse_tsv(&tsv).unwrap();
        assert_eq!(detections, [Detection::with_confidence("Foo", 0.95)]);
    }

    #[test]
    fn header_only_means_no_text() {
        assert!(parse_tsv(&report(&[])).unwrap().is_empty());
    }

    #[test]
    fn wrong_header_is_rejected() {
        let err = parse_tsv("text\tconf\nHello\t90\n").unwrap_err();
        assert!(err.contains("unexpected TSV header"));
    }

    #[test]
    fn empty_report_is_rejected() {
        assert!(parse_tsv("").is_err());
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = parse_tsv(&report(&["5\t1\t1\t1\tHello"])).unwrap_err();
        assert!(err.contains("row 2"), "{err}");
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let err = parse_tsv(&report(&["5\t1\tB\t1\t1\t1\t10\t10\t90\t20\t95\tHello"])).unwrap_err();
        assert!(err.contains("block_num"), "{err}");

        let err = parse_tsv(&report(&["5\t1\t1\t1\t1\t1\t10\t10\t90\t20\thigh\tHello"])).unwrap_err();
        assert!(err.contains("conf"), "{err}");
    }

    #[test]
    fn single_line_mode_changes_segmentation() {
        let engine = TesseractRecognizer::default();
        let args = |mode| {
            engine
                .command(Path::new("a.png"), mode)
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
        };

        let detect = args(RecognitionMode { detect_regions: true });
        assert_eq!(detect, ["a.png", "stdout", "-l", "eng", "--psm", "3", "tsv"]);

        let single = args(RecognitionMode { detect_regions: false });
        assert!(single.windows(2).any(|w| w == ["--psm", "7"]));
    }

    #[test]
    fn missing_binary_is_an_ocr_failure() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.png");
        std::fs::write(&image, b"png").unwrap();

        let engine = TesseractRecognizer::new(dir.path().join("no-such-tesseract"), "eng");
        let err = engine.recognize(&image, RecognitionMode::default()).unwrap_err();
        match err {
            ScribeError::OcrFailure { reason, .. } => assert!(reason.contains("not found")),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    /// An executable shell script standing in for the tesseract binary.
    #[cfg(unix)]
    fn script_engine(dir: &Path, body: &str) -> TesseractRecognizer {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        TesseractRecognizer::new(path, "deu")
    }

    #[cfg(unix)]
    #[test]
    fn report_from_the_command_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = script_engine(
            dir.path(),
            r#"echo "$@" > "$(dirname "$0")/args"
printf 'level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n'
printf '5\t1\t1\t1\t1\t1\t10\t10\t90\t20\t90\tGuten\n'
printf '5\t1\t1\t1\t1\t2\t110\t10\t90\t20\t80\tTag\n'"#,
        );
        let image = dir.path().join("page.png");

        let detections = engine.recognize(&image, RecognitionMode::default()).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].text, "Guten Tag");
        assert!((detections[0].confidence.unwrap() - 0.85).abs() < 1e-4);

        let args = std::fs::read_to_string(dir.path().join("args")).unwrap();
        assert_eq!(
            args.trim(),
            format!("{} stdout -l deu --psm 3 tsv", image.display())
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = script_engine(
            dir.path(),
            "echo 'Error opening data file deu.traineddata' >&2\nexit 1",
        );
        let image = dir.path().join("page.png");

        let err = engine.recognize(&image, RecognitionMode::default()).unwrap_err();
        match err {
            ScribeError::OcrFailure { path, reason } => {
                assert_eq!(path, image);
                assert!(reason.contains("Error opening data file"), "{reason}");
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn malformed_report_from_the_command_is_an_ocr_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = script_engine(dir.path(), "echo 'not a tsv report'");

        let err = engine
            .recognize(&dir.path().join("page.png"), RecognitionMode::default())
            .unwrap_err();
        match err {
            ScribeError::OcrFailure { reason, .. } => {
                assert!(reason.contains("unexpected TSV header"), "{reason}")
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
