// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagescribe: OCR an image folder into a page-per-image DOCX and PDF.
//
// Entry point. Parses arguments, initialises logging, builds the OCR engine,
// and runs the pipeline with a progress bar.

mod engine;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagescribe_core::config::OcrEngineKind;
use pagescribe_core::error::Result;
use pagescribe_core::human_errors::humanize_error;
use pagescribe_core::AppConfig;
use pagescribe_document::{Pipeline, RunOutput};

#[derive(Debug, Parser)]
#[command(name = "pagescribe")]
#[command(version)]
#[command(about = "OCR a folder of images into a DOCX and a PDF, one page per image", long_about = None)]
struct Cli {
    /// Folder containing .png / .jpg / .jpeg images
    #[arg(value_name = "INPUT_DIR")]
    input: PathBuf,

    /// Folder for the generated documents (created if missing)
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// JSON settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base name of the output files
    #[arg(short, long, value_name = "BASENAME")]
    name: Option<String>,

    /// OCR engine
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// Tesseract language code
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// Directory with the ocrs detection and recognition models
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Skip images that fail OCR instead of stopping
    #[arg(long)]
    skip_failed: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    /// External tesseract command
    Tesseract,
    /// Built-in ocrs engine (needs the "ocr" feature)
    Ocrs,
}

impl From<EngineArg> for OcrEngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Tesseract => OcrEngineKind::Tesseract,
            EngineArg::Ocrs => OcrEngineKind::Ocrs,
        }
    }
}

impl Cli {
    /// Settings from the optional file with command-line flags applied on top.
    fn settings(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(name) = &self.name {
            config.output_basename = name.clone();
        }
        if let Some(engine) = self.engine {
            config.ocr.engine = engine.into();
        }
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if let Some(dir) = &self.model_dir {
            config.ocr.model_dir = Some(dir.clone());
        }
        if self.skip_failed {
            config.skip_failed_images = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The progress bar and log lines share stderr; keep logs quiet while the
    // bar is drawn unless RUST_LOG asks otherwise.
    let default_filter = if cli.no_progress { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match run(&cli) {
        Ok(output) => {
            print_summary(&output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "conversion failed");
            let human = humanize_error(&err);
            eprintln!("{}: {}", "Error".red().bold(), human.message);
            eprintln!("  {} {}", "hint:".yellow(), human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunOutput> {
    let config = cli.settings()?;
    let recognizer = engine::build_recognizer(&config.ocr)?;
    let pipeline = Pipeline::new(recognizer.as_ref(), &config);

    let progress = progress_bar(cli.no_progress);
    let result = pipeline.run_with_progress(&cli.input, &cli.output, |step| {
        progress.set_length(step.total as u64);
        progress.set_position(step.index as u64);
        progress.set_message(display_name(step.path));
    });

    match &result {
        Ok(_) => progress.finish_and_clear(),
        Err(_) => progress.abandon(),
    }
    result
}

fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(output: &RunOutput) {
    println!(
        "{} {} page(s)",
        "Converted".green().bold(),
        output.pages
    );
    println!("  {} {}", "├─".dimmed(), output.docx_path.display());
    println!("  {} {}", "└─".dimmed(), output.pdf_path.display());

    if !output.skipped.is_empty() {
        println!("{}", "Skipped (OCR failed):".yellow());
        for path in &output.skipped {
            println!("  {} {}", "-".dimmed(), path.display());
        }
    }
}
