use anyhow::Result;
use clap::Parser;
use moodrx::{cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    // Config first: it carries the log level and directory
    let config = cli::load_config(cli_args.config.as_deref())?;

    let log_dir = logging::resolve_log_dir(config.logging.dir.as_deref());
    let log_config = logging::LogConfig::new()
        .with_level(config.logging.level.clone())
        .with_debug_mode(cli_args.debug)
        .with_terminal_owned(cli_args.owns_terminal())
        .with_log_dir(log_dir.clone());
    let writes_to_file = log_config.writes_to_file();

    let _guard = logging::init_logging(log_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Loading ran before the subscriber existed
    tracing::debug!(
        sources = ?cli::config_sources(cli_args.config.as_deref()),
        "Configuration loaded"
    );

    // Clean up old log files (keep last 7 days)
    if writes_to_file
        && let Ok(removed) = logging::cleanup_logs_in(&log_dir, 7)
        && removed > 0
    {
        tracing::info!("🧹 Cleaned up {} old log file(s)", removed);
    }

    cli::run(cli_args, config).await
}
