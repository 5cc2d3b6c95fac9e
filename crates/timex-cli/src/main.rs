//! CLI for recognizing date/time expressions and printing their resolutions.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::Deserialize;
use timex_engine::{parse_reference, DateTimeRecognizer, EntityType, Recognized};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timex",
    about = "Recognize date/time expressions and resolve them to timex values",
    version
)]
struct Args {
    /// Text to scan (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Reference instant, YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS] (default: now)
    #[arg(short = 'r', long = "reference")]
    reference: Option<String>,

    /// Only report these entity types (comma-separated, e.g. date,daterange)
    #[arg(short = 't', long = "types", value_delimiter = ',')]
    types: Vec<EntityType>,

    /// JSON file with default options; flags override it
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print full parse results instead of flattened resolutions
    #[arg(long = "raw")]
    raw: bool,

    /// Pretty-print the JSON output
    #[arg(short = 'p', long = "pretty")]
    pretty: bool,

    /// Log parser decisions to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Options that can be stored in a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RecognizerOptions {
    reference: Option<String>,
    types: Vec<EntityType>,
}

impl RecognizerOptions {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Command-line values win over file values.
    fn merge(mut self, args: &Args) -> Self {
        if args.reference.is_some() {
            self.reference = args.reference.clone();
        }
        if !args.types.is_empty() {
            self.types = args.types.clone();
        }
        self
    }

    fn reference(&self) -> Result<NaiveDateTime> {
        match &self.reference {
            Some(s) => parse_reference(s).context("Invalid --reference"),
            None => Ok(chrono::Local::now().naive_local()),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_text(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = match &args.config {
        Some(path) => RecognizerOptions::load(path)?,
        None => RecognizerOptions::default(),
    }
    .merge(&args);
    let reference = options.reference()?;
    let text = read_text(args.text.clone())?;

    let recognizer = DateTimeRecognizer::english().context("Failed to load English locale")?;
    let results = recognizer
        .recognize_types(&text, reference, &options.types)
        .context("Recognition failed")?;
    tracing::debug!(count = results.len(), %reference, "recognized");

    let json = if args.raw {
        serde_json::to_value(&results)
    } else {
        serde_json::to_value(results.iter().map(Recognized::from).collect::<Vec<_>>())
    }
    .context("Failed to serialize results")?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
    .context("Failed to serialize results")?;
    println!("{output}");
    Ok(())
}
