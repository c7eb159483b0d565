//! CLI Module
//!
//! Command-line interface for the MoodRx kiosk using Clap v4.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::analysis::{AnalysisClient, Analyzer};
use crate::config::Config;
use crate::logging;
use crate::media::{ImageBlob, format_size};
use crate::slip::PrescriptionSlip;

/// MoodRx - facial-expression literary prescription kiosk
#[derive(Parser, Debug)]
#[command(name = "moodrx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level to files in .moodrx/logs/
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the command takes over the terminal with a full-screen UI
    pub fn owns_terminal(&self) -> bool {
        matches!(self.command, None | Some(Commands::Kiosk))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the full-screen kiosk (default)
    Kiosk,

    /// Analyze one photo and print the prescription
    Analyze {
        /// Path to the photo
        image: PathBuf,

        /// Patient name sent with the photo
        #[arg(short, long, default_value = "")]
        name: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Slip width in columns (text format)
        #[arg(short, long, default_value = "42")]
        width: usize,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Config,

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Main CLI entry point
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        None | Some(Commands::Kiosk) => cmd_kiosk(&config).await,
        Some(Commands::Analyze {
            image,
            name,
            format,
            width,
        }) => cmd_analyze(&config, &image, &name, format, width).await,
        Some(Commands::Init { force }) => cmd_init(force).await,
        Some(Commands::Config) => cmd_config(&config).await,
        Some(Commands::Logs { operation }) => cmd_logs(&config, operation).await,
    }
}

/// Load configuration from file or defaults
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    config.validate()?;

    Ok(config)
}

/// Files `load_config` reads, lowest priority first
pub fn config_sources(config_path: Option<&str>) -> Vec<PathBuf> {
    match config_path {
        Some(path) => vec![PathBuf::from(path)],
        None => Config::layer_paths(),
    }
}

/// Full-screen kiosk
async fn cmd_kiosk(config: &Config) -> Result<()> {
    tracing::info!(
        endpoint = %config.analysis.endpoint,
        theme = %config.theme.name,
        "Starting kiosk"
    );
    crate::tui::run(config).await
}

/// One-shot analysis of a photo on disk
async fn cmd_analyze(
    config: &Config,
    image: &Path,
    name: &str,
    format: OutputFormat,
    width: usize,
) -> Result<()> {
    let client = AnalysisClient::new(config.analysis.endpoint.clone());
    let output = analyze_to_string(
        &client,
        image,
        name,
        format,
        width,
        &config.analysis.fallback_error,
    )
    .await?;
    print!("{}", output);
    Ok(())
}

async fn analyze_to_string(
    analyzer: &dyn Analyzer,
    image: &Path,
    name: &str,
    format: OutputFormat,
    width: usize,
    fallback_error: &str,
) -> Result<String> {
    let blob = ImageBlob::from_file(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let result = analyzer.analyze(&blob, name).await.map_err(|e| {
        let message = e.user_message(fallback_error);
        anyhow::Error::new(e).context(message)
    })?;

    match format {
        OutputFormat::Text => {
            Ok(PrescriptionSlip::issued_today(name, &result).render_plain(width))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&result)
                .context("Failed to serialize analysis result")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Initialize configuration file
async fn cmd_init(force: bool) -> Result<()> {
    let config_path =
        Config::system_config_path().context("Could not determine config directory")?;

    println!("💊 MoodRx Configuration Initialization\n");
    init_config_at(&config_path, force)?;

    println!("✅ Configuration initialized at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Point [analysis] endpoint at your analysis service");
    println!("   2. Adjust [camera] program/args for your capture device");
    println!("   3. Run 'moodrx' to start the kiosk");

    Ok(())
}

fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }
    Config::default().save(path)
}

/// Show configuration
async fn cmd_config(config: &Config) -> Result<()> {
    println!("💊 MoodRx Configuration\n");
    let rendered =
        toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    println!("{}", rendered);
    Ok(())
}

/// Summary of the debug log directory
#[derive(Debug, Default, PartialEq, Eq)]
struct LogStatus {
    file_count: usize,
    total_size: u64,
    newest: Option<PathBuf>,
}

fn log_status(log_dir: &Path) -> Result<LogStatus> {
    let mut status = LogStatus::default();
    if !log_dir.exists() {
        return Ok(status);
    }

    let mut newest_time = std::time::UNIX_EPOCH;
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("moodrx"));
        if !is_log {
            continue;
        }
        status.file_count += 1;
        if let Ok(metadata) = entry.metadata() {
            status.total_size += metadata.len();
            if let Ok(modified) = metadata.modified() {
                if modified >= newest_time {
                    newest_time = modified;
                    status.newest = Some(path);
                }
            }
        }
    }
    Ok(status)
}

/// Log management
async fn cmd_logs(config: &Config, operation: LogCommands) -> Result<()> {
    let log_dir = logging::resolve_log_dir(config.logging.dir.as_deref());

    match operation {
        LogCommands::Status => {
            println!("📊 MoodRx Logging Status\n");
            println!("Log directory: {}", log_dir.display());

            let status = log_status(&log_dir)?;
            if status.file_count > 0 {
                println!("Status: ✅ Active");
                println!("Log files: {}", status.file_count);
                println!("Total size: {}", format_size(status.total_size as usize));
                if let Some(newest) = status.newest {
                    println!("Latest log: {}", newest.display());
                }
            } else {
                println!("Status: ❌ No logs found");
                println!("\n💡 To enable debug logging, run with -d flag:");
                println!("   moodrx -d");
            }
            Ok(())
        }

        LogCommands::Clean { days } => {
            println!("🧹 Cleaning up log files older than {} days...\n", days);

            match logging::cleanup_logs_in(&log_dir, days) {
                Ok(removed) if removed > 0 => println!("✅ Removed {} old log file(s)", removed),
                Ok(_) => println!("✅ No old log files to remove"),
                Err(e) => println!("❌ Error cleaning logs: {}", e),
            }
            Ok(())
        }
    }
}
