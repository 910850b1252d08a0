use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use briefrank::{config, LengthChoice, Summarizer, Summary, SummaryKind};

#[derive(Parser, Debug)]
#[command(
    name = "briefrank",
    version,
    about = "Extractive summaries of policy briefs"
)]
struct Cli {
    /// Text file to summarize (stdin when omitted)
    file: Option<PathBuf>,

    /// Summary length preset
    #[arg(long, value_parser = ["short", "medium", "long"])]
    length: Option<String>,

    /// Fraction of sentences to keep, overriding the length preset's ratio
    #[arg(long)]
    ratio: Option<f64>,

    /// Rendering register
    #[arg(long, value_parser = ["academic", "easy"])]
    tone: Option<String>,

    /// Sentence similarity
    #[arg(long, value_parser = ["lexical", "semantic"])]
    strategy: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentence-encoder directory for the semantic strategy
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Print the whole summary as JSON
    #[arg(long, conflicts_with = "structured")]
    json: bool,

    /// Print the abstract and category groups
    #[arg(long)]
    structured: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::load().context("loading config")?,
    };
    if let Some(length) = &cli.length {
        cfg.length = length.parse::<LengthChoice>()?;
    }
    if let Some(ratio) = cli.ratio {
        cfg.ratio = Some(ratio);
    }
    if let Some(tone) = &cli.tone {
        cfg.tone = tone.parse()?;
    }
    if let Some(strategy) = &cli.strategy {
        cfg.strategy = strategy.parse()?;
    }
    if let Some(dir) = cli.model_dir {
        cfg.model_dir = Some(dir);
    }

    let text = read_input(cli.file.as_ref())?;
    let summarizer = Summarizer::from_config(cfg, None)?;
    let summary = summarizer.summarize(&text)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if cli.structured {
        print_structured(&summary);
    } else {
        print_plain(&summary);
    }
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn print_plain(summary: &Summary) {
    if summary.kind == SummaryKind::Empty {
        eprintln!("no sentences found in input");
        return;
    }
    if let Some(title) = &summary.title {
        println!("{title}\n");
    }
    println!("{}", summary.text());
    eprintln!(
        "\n{} of {} sentences ({}%)",
        summary.stats.summary_sentences,
        summary.stats.original_sentences,
        summary.stats.compression_ratio
    );
}

fn print_structured(summary: &Summary) {
    if let Some(title) = &summary.title {
        println!("# {title}\n");
    }
    if !summary.structured.abstract_text.is_empty() {
        println!("{}\n", summary.structured.abstract_text);
    }
    for group in &summary.structured.groups {
        println!("## {}", group.label);
        for bullet in &group.bullets {
            println!("- {bullet}");
        }
        println!();
    }
}
