//! Reference command implementation

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use zipfian_core::config::Config;
use zipfian_core::curve::{self, SmoothedCurve};
use zipfian_core::session::SessionOptions;

/// Arguments for the `reference` subcommand.
#[derive(Args, Debug, Default)]
pub struct ReferenceArgs {
    /// Number of ranks.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub depth: Option<u16>,
}

#[derive(Serialize)]
struct ReferenceOutput {
    depth: usize,
    sequence: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    curve: Option<SmoothedCurve>,
}

/// Print `100 / rank` for each rank, and its smoothed curve with `--json`.
#[instrument(name = "cmd_reference", skip_all)]
pub fn cmd_reference(args: ReferenceArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let mut options = SessionOptions::from(config);
    if let Some(depth) = args.depth {
        options.depth = usize::from(depth);
    }
    debug!(depth = options.depth, "executing reference command");

    let sequence = curve::zipf_sequence(options.depth);

    if global_json {
        let curve = match curve::smooth_with(&sequence, &options.smoothing) {
            Ok(curve) => Some(curve),
            Err(err) => {
                debug!(error = %err, "reference not smoothed");
                None
            }
        };
        let output = ReferenceOutput {
            depth: options.depth,
            sequence,
            curve,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize reference")?
        );
        return Ok(());
    }

    println!("{}", curve::ZIPF_LABEL.bold());
    for (i, value) in sequence.iter().enumerate() {
        println!("  {:>3}  {:>6.2}%", i + 1, value);
    }
    Ok(())
}
