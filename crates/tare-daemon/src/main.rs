use anyhow::Context;
use clap::Parser;
use tare_config::TareConfig;
use tare_daemon::Runtime;
use tare_sync::DisabledBackend;

/// Smart-scale weight tracking daemon.
#[derive(Debug, Parser)]
#[command(name = "tared", version, about = "Tare - balance board weight tracker")]
struct Cli {
    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tared error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = TareConfig::load_with_dotenv().context("failed to load configuration")?;
    tracing::info!(
        log_path = %config.store.log_path,
        sync_enabled = config.sync.enabled,
        "starting tared"
    );
    if config.sync.enabled {
        // The HTTP sync client is wired in by the integration build; this
        // binary ships with the disabled capability, so a reconciler cycle
        // finds nobody authorized and entries accumulate unsynced.
        tracing::warn!("sync.enabled is set but no sync backend is configured");
    }

    let runtime = Runtime::start(&config, DisabledBackend);
    // The Bluetooth layer feeds board sessions into
    // `runtime.session_sender()`; without it the daemon idles here.
    tracing::info!("waiting for board connections");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("shutdown signal received, draining");
    runtime.shutdown().await;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TARE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
