use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use sentencify::{FormatOutcome, FormatStats, FormatStrategy, SegmentStrategy, SmartFormatter};

#[derive(Parser, Debug)]
#[command(name = "sentencify")]
#[command(about = "Sentence-per-paragraph text formatter with quote protection")]
#[command(version)]
struct Args {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Write formatted text to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Formatting mode
    #[arg(long, value_enum, default_value_t = Mode::Basic)]
    mode: Mode,

    /// Local splitter behavior (quote-aware is the published default)
    #[arg(long, value_enum, default_value_t = Splitter::QuoteAware)]
    splitter: Splitter,

    /// Display character/sentence/paragraph counts on stderr
    #[arg(long)]
    stats: bool,

    /// Stats output file path (JSON)
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Fail instead of falling back to local segmentation when smart mode errors
    #[arg(long)]
    no_fallback: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Deterministic local segmentation
    Basic,
    /// Delegated language-model formatting (falls back to basic on failure)
    Smart,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Splitter {
    /// State-aware scanner that protects quoted content
    QuoteAware,
    /// Whole-text substitution without quote tracking
    Substitution,
}

impl From<Splitter> for SegmentStrategy {
    fn from(splitter: Splitter) -> Self {
        match splitter {
            Splitter::QuoteAware => SegmentStrategy::QuoteAware,
            Splitter::Substitution => SegmentStrategy::Substitution,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting sentencify");
    info!(?args, "Parsed CLI arguments");

    // WHY: validate input path early to fail fast with a clear error
    if let Some(path) = &args.input {
        if !path.exists() {
            anyhow::bail!("Input file does not exist: {}", path.display());
        }
        if !path.is_file() {
            anyhow::bail!("Input path is not a file: {}", path.display());
        }
    }

    let text = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            buffer
        }
    };

    info!("Read {} characters of input", text.chars().count());

    let outcome = match args.mode {
        Mode::Basic => {
            let strategy = FormatStrategy::Basic(args.splitter.into());
            FormatOutcome {
                text: strategy.format(&text).await?,
                fell_back: false,
            }
        }
        Mode::Smart => match SmartFormatter::from_env() {
            Ok(formatter) => {
                let strategy = FormatStrategy::Smart(formatter);
                if args.no_fallback {
                    FormatOutcome {
                        text: strategy.format(&text).await?,
                        fell_back: false,
                    }
                } else {
                    strategy.format_with_fallback(&text).await
                }
            }
            Err(error) => {
                if args.no_fallback {
                    return Err(error);
                }
                warn!("Smart formatter unavailable, using local segmentation: {error:#}");
                FormatOutcome {
                    text: sentencify::segment(&text),
                    fell_back: true,
                }
            }
        },
    };

    if outcome.fell_back {
        eprintln!("Smart formatting is unavailable; the local splitter was used instead.");
    }

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &outcome.text)
                .await
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Wrote formatted text to {}", path.display());
        }
        None => println!("{}", outcome.text),
    }

    if args.stats || args.stats_out.is_some() {
        let stats = FormatStats::compute(&text, &outcome.text);

        if args.stats {
            eprintln!(
                "Input: {} chars, {} sentences",
                stats.original_chars, stats.sentences
            );
            eprintln!(
                "Output: {} chars, {} paragraphs",
                stats.formatted_chars, stats.paragraphs
            );
        }

        if let Some(path) = &args.stats_out {
            let json = serde_json::to_string_pretty(&stats)?;
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write stats file: {}", path.display()))?;
            info!("Wrote stats to {}", path.display());
        }
    }

    Ok(())
}
