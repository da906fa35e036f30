//! Analyze command implementation

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument, warn};

use zipfian_core::config::Config;
use zipfian_core::session::{self, DocumentOutcome, DocumentReport, InputBlob, SessionOptions};
use zipfian_core::{Boundary, ShortSeriesPolicy};

use super::{expand_paths, read_input_file};
use crate::plot;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text files or directories to analyze.
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Number of top-ranked words per document.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub depth: Option<u16>,

    /// Spline end conditions.
    #[arg(long, value_enum)]
    pub boundary: Option<Boundary>,

    /// What to do with documents that have two or three distinct words.
    #[arg(long, value_enum)]
    pub short_series: Option<ShortSeriesPolicy>,

    /// Write an SVG chart of all curves to FILE.
    #[arg(long, value_name = "FILE")]
    pub svg: Option<Utf8PathBuf>,
}

/// Analyze every input and print the ranked results.
#[instrument(name = "cmd_analyze", skip_all, fields(paths = args.paths.len()))]
pub fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(paths = ?args.paths, depth = ?args.depth, "executing analyze command");

    let mut options = SessionOptions::from(config);
    if let Some(depth) = args.depth {
        options.depth = usize::from(depth);
    }
    if let Some(boundary) = args.boundary {
        options.smoothing.boundary = boundary;
    }
    if let Some(policy) = args.short_series {
        options.smoothing.short_series = policy;
    }

    let include = config.include_set()?;
    let files = expand_paths(&args.paths, &include)?;
    if files.is_empty() {
        bail!("no input files matched {}", config.include.join(", "));
    }

    let limit = config.input_limit();
    let mut inputs = Vec::with_capacity(files.len());
    for file in &files {
        let bytes = read_input_file(file, limit)?;
        let name = file.file_name().unwrap_or(file.as_str());
        inputs.push(InputBlob::new(name, bytes));
    }

    let report = session::run(inputs, &options).context("analysis failed")?;

    if let Some(ref path) = args.svg {
        let svg = plot::render_svg(&report).context("failed to render chart")?;
        std::fs::write(path.as_std_path(), svg)
            .with_context(|| format!("failed to write {path}"))?;
        debug!(path = %path, "wrote chart");
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.documents {
            match outcome {
                DocumentOutcome::Analyzed(doc) => print_document(doc),
                DocumentOutcome::Failed { name, reason } => {
                    println!("{} {name}: {reason}", "SKIP:".yellow());
                }
            }
        }
        if report.reference.is_none() {
            println!(
                "{} no Zipfian reference for depth {}",
                "NOTE:".dimmed(),
                report.depth
            );
        }
        if let Some(ref path) = args.svg {
            println!("{} {path}", "Chart:".cyan());
        }
    }

    if report.failed_count() == report.documents.len() {
        bail!("none of the {} inputs could be decoded as UTF-8", files.len());
    }
    if report.failed_count() > 0 {
        warn!(failed = report.failed_count(), "some inputs were skipped");
    }

    Ok(())
}

fn print_document(doc: &DocumentReport) {
    println!("{}", doc.label.bold());
    if let Some(ref reason) = doc.skipped {
        println!("  {} {reason}", "SKIP:".yellow());
    }
    let width = doc
        .top_words
        .iter()
        .map(|w| w.word.chars().count())
        .max()
        .unwrap_or(0);
    for (rank, (word, pct)) in doc.top_words.iter().zip(&doc.percentages).enumerate() {
        println!(
            "  {:>3}  {:<width$}  {:>7}  {:>3}%",
            rank + 1,
            word.word,
            word.count,
            pct,
        );
    }
    println!();
}
