use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use logcloud::core::config::Config;
use logcloud::core::AnalysisConfig;
use logcloud::feeds::{FileSource, ListRequest, Order, StdinSource};
use logcloud::pipeline::{self, Outcome};

const DEBUG_LOG: &str = "/tmp/logcloud-debug.log";

#[derive(Parser)]
#[command(name = "logcloud", about = "Word and phrase clouds from Cloud Logging exports")]
struct Cli {
    /// Project the log belongs to.
    project_id: String,

    /// Log to analyze, short (`app`) or qualified (`projects/p/logs/app`).
    log_name: String,

    /// Maximum number of entries to analyze.
    #[arg(long, alias = "num_entries")]
    num_entries: Option<usize>,

    /// Where the SVG word cloud is written.
    #[arg(long, alias = "output_file")]
    output_file: Option<PathBuf>,

    /// Filter expression, e.g. `severity>=ERROR AND textPayload:timeout`.
    #[arg(long)]
    filter: Option<String>,

    /// Count phrases of `--ngram-size` words instead of single words.
    #[arg(long, alias = "analyze_phrases")]
    analyze_phrases: bool,

    #[arg(long, alias = "ngram_size", allow_negative_numbers = true)]
    ngram_size: Option<i64>,

    /// Log export file (JSON array or JSON lines), or `-` for raw lines on stdin.
    #[arg(long, default_value = "-")]
    input: String,

    /// `svg` or `terminal`.
    #[arg(long)]
    format: Option<String>,

    /// `default` or `gruvbox_dark`.
    #[arg(long)]
    theme: Option<String>,

    /// Config file to use instead of ~/.config/logcloud/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/logcloud-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// CLI flags win over every config layer.
    fn apply(&self, config: &mut Config) {
        if let Some(n) = self.num_entries {
            config.source.num_entries = n;
        }
        if let Some(path) = &self.output_file {
            config.render.output_file = path.clone();
        }
        if self.analyze_phrases {
            config.analysis.mode = "phrase".to_string();
        }
        if let Some(n) = self.ngram_size {
            config.analysis.ngram_size = n;
        }
        if let Some(format) = &self.format {
            config.render.format = format.clone();
        }
        if let Some(theme) = &self.theme {
            config.render.theme = theme.clone();
        }
    }
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let filter = |fallback: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback))
    };

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG)
            .with_context(|| format!("failed to open {DEBUG_LOG}"))?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("logcloud debug log started, tail -f {DEBUG_LOG}");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter("warn"))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };
    cli.apply(&mut config);

    // Validate everything before touching the log source.
    let analysis = AnalysisConfig::from_settings(&config.analysis)
        .map_err(pipeline::PipelineError::from)?;
    let order: Order = config
        .source
        .order
        .parse()
        .map_err(pipeline::PipelineError::from)?;
    let mut renderer = logcloud::render::from_settings(&config.render).context("render")?;

    let request = ListRequest::new(&cli.project_id, &cli.log_name, config.source.num_entries)
        .with_filter(cli.filter.clone())
        .with_order(order);

    let outcome = if cli.input == "-" {
        pipeline::run(&StdinSource::new(), &request, &analysis, &mut renderer).await?
    } else {
        pipeline::run(&FileSource::new(&cli.input), &request, &analysis, &mut renderer).await?
    };

    match outcome {
        Outcome::NoEntries => println!("No log entries found."),
        Outcome::NoTokens { messages } => {
            println!("No words left to plot after filtering {messages} log messages.")
        }
        Outcome::Rendered { artifact, .. } => println!("{artifact}"),
    }
    Ok(())
}
