//! `iat`: run IAT blocks in a terminal.
//!
//! Each block is a JSON definition file. Answer a trial by typing the left or
//! right key (E / I by default) and pressing Enter; Enter alone dismisses a
//! splash message. Logs go to stderr, controlled by `RUST_LOG`.

mod keyboard;
mod presenter;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use engine::results::SessionSummary;
use engine::{ChannelInput, IatConfig, JsonFileSource, SessionStore, TaskRunner};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keyboard::SplashSlot;
use presenter::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run Implicit Association Test blocks in the terminal", long_about = None)]
struct Args {
    /// Block definition files, run in the order given
    #[arg(required = true)]
    blocks: Vec<PathBuf>,

    /// Engine configuration (JSON, durations in milliseconds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Response window per attempt, in milliseconds
    #[arg(long)]
    window_ms: Option<u64>,

    /// Seed for a reproducible trial order
    #[arg(long)]
    seed: Option<u64>,

    /// Print every recorded block as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(args: &Args) -> anyhow::Result<IatConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path).await?,
        None => IatConfig::default(),
    };
    if let Some(ms) = args.window_ms {
        config = config.with_response_window(Duration::from_millis(ms));
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

async fn read_config(path: &Path) -> anyhow::Result<IatConfig> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn print_session(store: &SessionStore<String>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(store)?);
        return Ok(());
    }

    let summary = SessionSummary::from_store(store);
    println!();
    for block in &summary.blocks {
        println!("{}", block.headline());
    }
    println!(
        "{} blocks, {} errors in total",
        summary.blocks.len(),
        summary.total_errors()
    );
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args).await?;
    info!(
        blocks = args.blocks.len(),
        window_ms = config.response_window.as_millis() as u64,
        "starting session"
    );

    let (keys, input) = ChannelInput::channel();
    let splash = SplashSlot::default();
    let reader = tokio::spawn(keyboard::pump(
        BufReader::new(tokio::io::stdin()),
        splash.clone(),
        keys,
    ));

    let presenter = TerminalPresenter::new(config.bindings, splash);
    let sources: Vec<JsonFileSource> = args.blocks.iter().map(JsonFileSource::new).collect();
    let mut runner = TaskRunner::<String, _, _>::new(config, presenter, input);
    let outcome = runner.run_all(&sources).await.map(|_| ());
    reader.abort();

    if let Err(err) = &outcome {
        warn!(error = %err, completed = runner.store().len(), "session stopped early");
    }
    print_session(runner.store(), args.json)?;
    outcome.context("session did not complete")
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;
    let result = runtime.block_on(run(args));
    // The blocking stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}
