//! gridtest CLI - runs the URL suite across remote browsers.

mod cli_args;
pub mod suite;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use gridtest_config::GridConfig;

pub use cli_args::Cli;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    let browsers = if cli.browsers.is_empty() {
        None
    } else {
        Some(cli.browsers.clone())
    };
    let config = GridConfig::load_with_overrides(
        cli.config.as_deref(),
        cli.remote_url.clone(),
        cli.test_host.clone(),
        browsers,
    )?;

    info!(
        remote_url = %config.remote_url,
        browsers = ?config.browsers,
        "starting URL suite"
    );

    suite::run_url_suite(&config).await?;

    info!("all branches passed");
    Ok(())
}

/// Initialize logging based on CLI verbosity settings.
fn initialize_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::from_default_env()
            .add_directive("gridtest=debug".parse().unwrap())
            .add_directive("gridtest_core=debug".parse().unwrap())
            .add_directive("gridtest_cli=debug".parse().unwrap())
            .add_directive("gridtest_config=debug".parse().unwrap())
    } else {
        EnvFilter::from_default_env()
            .add_directive("gridtest=info".parse().unwrap())
            .add_directive("gridtest_core=info".parse().unwrap())
            .add_directive("gridtest_cli=info".parse().unwrap())
            .add_directive("gridtest_config=info".parse().unwrap())
    };

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
