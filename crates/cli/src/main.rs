//! Arbiter CLI - evaluate release candidates against search criteria.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arbiter_core::{
    default_registry, load_config, metrics, validate_config, Config, DecisionEngine,
    SpecificationRegistry,
};

mod batch;

use batch::EvaluationBatch;

/// Decide which release candidates to grab.
#[derive(Parser, Debug)]
#[command(name = "arbiter", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long, global = true, env = "ARBITER_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a batch file and print one decision per candidate as JSON.
    Evaluate {
        /// Batch file with `criteria` and `candidates`.
        batch: PathBuf,

        /// Keep evaluating after a permanent rejection.
        #[arg(long)]
        no_short_circuit: bool,

        /// Print Prometheus metrics to stderr when done.
        #[arg(long)]
        metrics: bool,
    },

    /// List active specifications in evaluation order.
    Specs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };
    validate_config(&config).context("Configuration validation failed")?;

    match cli.command {
        Commands::Evaluate {
            batch,
            no_short_circuit,
            metrics,
        } => evaluate(config, &batch, no_short_circuit, metrics).await,
        Commands::Specs => {
            print_specs(&default_registry(&config, None));
            Ok(())
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
}

async fn evaluate(
    mut config: Config,
    batch_path: &Path,
    no_short_circuit: bool,
    print_metrics: bool,
) -> Result<()> {
    if no_short_circuit {
        config.engine.short_circuit = false;
    }

    let batch = EvaluationBatch::load(batch_path)?;
    let registry = Arc::new(default_registry(&config, None));
    let engine = DecisionEngine::new(registry, config.engine.clone());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling evaluation");
            on_interrupt.cancel();
        }
    });

    let decisions = engine
        .get_decisions(batch.candidates, &batch.criteria, &cancel)
        .await
        .context("Evaluation failed")?;

    let output = serde_json::to_string_pretty(&decisions).context("Failed to encode decisions")?;
    println!("{}", output);

    if print_metrics {
        let text = metrics::encode_text().context("Failed to encode metrics")?;
        eprintln!("{}", text);
    }

    Ok(())
}

fn print_specs(registry: &SpecificationRegistry) {
    println!(
        "{:<26} {:<10} {:<13} REQUIRES",
        "NAME", "SEVERITY", "TIER"
    );
    for spec in registry.iter() {
        println!(
            "{:<26} {:<10} {:<13} {}",
            spec.name(),
            spec.rejection_type().to_string(),
            format!("{:?}", spec.priority()),
            spec.requires()
        );
    }
}
