use crate::{
    error::CliError,
    jobs::JobContext,
    output::ArtifactWriter,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::Commands;
use connectors::rpc::reader::{ChainReader, HttpChainReader};
use engine_config::{env::EnvVars, settings::scan::ScanSettings};
use engine_core::metrics::Metrics;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod jobs;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "chain-scan",
    version,
    about = "Dump token holder and planted balances from a chain node"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Initialize logger
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, &shutdown).await {
        Ok(()) => ExitCode::Success,
        Err(err) if err.is_cancellation() || shutdown.is_shutdown_requested() => {
            warn!("Stopped before completion, nothing was written: {}", err);
            ExitCode::ShutdownRequested
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    let settings = load_settings()?;
    info!(
        "Using node {} (timeout {:?}, deadline {:?})",
        settings.node_url, settings.request_timeout, settings.scan_deadline
    );

    let reader: Arc<dyn ChainReader> = Arc::new(HttpChainReader::new(
        &settings.node_url,
        settings.request_timeout,
    )?);
    let writer = ArtifactWriter::new(
        settings.output_dir.clone(),
        output::timestamp(chrono::Local::now()),
    );

    let ctx = JobContext {
        settings,
        reader,
        metrics: Metrics::new(),
        cancel: shutdown.cancel_token(),
    };

    match command {
        Commands::Balances => {
            info!("Getting balances");
            let enrichment = jobs::collect_balances(&ctx).await?;
            writer
                .write_balances(&enrichment.records, &enrichment.failures)
                .await?;
            info!(
                "Balances saved: {} ({} accounts failed)",
                enrichment.records.len(),
                enrichment.failures.len()
            );
        }
        Commands::Planted => {
            info!("Getting planted");
            let planted = jobs::collect_planted(&ctx).await?;
            writer.write_planted(planted.rows()).await?;
        }
    }

    info!("Run metrics: {:?}", ctx.metrics.snapshot());
    Ok(())
}

fn load_settings() -> Result<ScanSettings, CliError> {
    let mut env = EnvVars::from_process();
    if env.load_file_if_present(".env")? {
        info!("Loaded settings overrides from .env");
    }
    Ok(ScanSettings::from_env(&env)?)
}
