//! docsentry: identity-card and forgery checks over image files.

mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docsentry_core::{ForgeryReport, RegistryStore, Settings, VerificationReport};
use docsentry_forensics::ForgeryAnalyzer;
use docsentry_ocr::{IdentityVerifier, Recognizer};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docsentry", version, about = "Document authenticity checks")]
struct Cli {
    /// JSON settings file; keys it leaves out keep their defaults.
    #[arg(long, global = true, env = "DOCSENTRY_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find and verify the 12-digit identity number on card photos.
    Identity {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        #[command(flatten)]
        ocr: OcrArgs,
    },
    /// Error-level, metadata and marks checks on scanned documents.
    Forgery {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// ELA standard deviation above which a document is suspect.
        #[arg(long, env = "DOCSENTRY_ELA_THRESHOLD")]
        ela_threshold: Option<f64>,
        /// Where `ela_<filename>` difference images are written.
        #[arg(long, env = "DOCSENTRY_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        ocr: OcrArgs,
    },
    /// List the seeded registry, sorted.
    Registry,
}

#[derive(Args, Debug)]
#[cfg_attr(not(feature = "tesseract"), allow(dead_code))]
struct OcrArgs {
    /// Tesseract language.
    #[arg(long, default_value = "eng")]
    lang: String,
    /// Directory holding `*.traineddata`.
    #[arg(long)]
    tessdata: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "docsentry starting");

    match cli.command {
        Command::Identity { images, ocr } => {
            let recognizer = engine(&ocr)?;
            run_identity(&settings, recognizer, &images, cli.json)
        }
        Command::Forgery {
            images,
            ela_threshold,
            output_dir,
            ocr,
        } => {
            if let Some(threshold) = ela_threshold {
                settings.forensics.ela_threshold = threshold;
            }
            if let Some(dir) = output_dir {
                settings.forensics.output_dir = dir;
            }
            let recognizer = engine(&ocr)?;
            run_forgery(&settings, recognizer, &images, cli.json)
        }
        Command::Registry => run_registry(&settings, cli.json),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

// ── OCR engine ──

#[cfg(feature = "tesseract")]
type Engine = docsentry_ocr::TesseractRecognizer;

#[cfg(feature = "tesseract")]
fn engine(args: &OcrArgs) -> Result<Engine> {
    let recognizer = docsentry_ocr::TesseractRecognizer::new(&args.lang);
    Ok(match &args.tessdata {
        Some(dir) => recognizer.with_datapath(dir.clone()),
        None => recognizer,
    })
}

#[cfg(not(feature = "tesseract"))]
type Engine = fn(
    &image::DynamicImage,
    &docsentry_ocr::OcrConfig,
) -> Result<String, docsentry_ocr::OcrError>;

#[cfg(not(feature = "tesseract"))]
fn engine(_args: &OcrArgs) -> Result<Engine> {
    anyhow::bail!("this build has no OCR engine; rebuild with `--features tesseract`")
}

// ── Commands ──

#[derive(Serialize)]
struct IdentityEntry<'a> {
    file: &'a Path,
    #[serde(flatten)]
    report: &'a VerificationReport,
}

fn run_identity<R: Recognizer>(
    settings: &Settings,
    recognizer: R,
    images: &[PathBuf],
    json: bool,
) -> Result<()> {
    let registry = RegistryStore::build(&settings.registry).context("building registry")?;
    let verifier = IdentityVerifier::new(recognizer, &registry);

    let reports: Vec<VerificationReport> = images.iter().map(|p| verifier.analyze(p)).collect();

    if json {
        let entries: Vec<IdentityEntry<'_>> = images
            .iter()
            .zip(&reports)
            .map(|(file, report)| IdentityEntry { file, report })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (path, report) in images.iter().zip(&reports) {
            print!("{}", display::identity_card(path, report));
        }
    }
    Ok(())
}

fn run_forgery<R: Recognizer>(
    settings: &Settings,
    recognizer: R,
    images: &[PathBuf],
    json: bool,
) -> Result<()> {
    let analyzer = ForgeryAnalyzer::new(recognizer, settings.forensics.clone());
    let reports: Vec<ForgeryReport> = images.iter().map(|p| analyzer.analyze(p)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", display::forgery_table(report));
        }
    }
    Ok(())
}

fn run_registry(settings: &Settings, json: bool) -> Result<()> {
    let registry = RegistryStore::build(&settings.registry).context("building registry")?;
    if json {
        let ids: Vec<&str> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else {
        print!("{}", display::registry_listing(&registry));
    }
    Ok(())
}
