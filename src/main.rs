//! roastctl - RepoRoast client for the terminal
//!
//! Sends a GitHub repository URL to a RepoRoast analysis service, rotates
//! agent-progress messages while it waits, and renders the verdict, the
//! roast, the good things and the suggestions.
//!
//! Exit codes:
//!   0 - Success (or interactive session ended)
//!   1 - Runtime error (empty URL, connection, timeout, config, etc.)
//!   2 - The analysis service rejected the repository

mod cli;
mod config;
mod controller;
mod error;
mod loading;
mod models;
mod render;
mod report;
mod service;
mod view;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use controller::Controller;
use render::ResultsPanel;
use report::ReportMetadata;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use view::TerminalView;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so `general.verbose` can pick the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("roastctl v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("roastctl failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .roastctl.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the service URL, timeout and loading messages.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Where and how finished results are written.
struct Output {
    format: OutputFormat,
    file: Option<PathBuf>,
    service_url: String,
}

impl Output {
    /// The terminal banner is printed by the view unless a machine-readable
    /// report is going to stdout instead.
    fn view_prints_banner(&self) -> bool {
        self.format == OutputFormat::Terminal || self.file.is_some()
    }

    /// Write the report to the output file, or to `stdout` for
    /// machine-readable formats. Nothing else goes to `stdout`.
    fn emit(
        &self,
        stdout: &mut impl Write,
        panel: &ResultsPanel,
        repo_url: &str,
        started: Instant,
    ) -> Result<()> {
        let metadata = ReportMetadata {
            repo_url: repo_url.to_string(),
            service_url: self.service_url.clone(),
            analysis_date: Utc::now(),
            duration_seconds: started.elapsed().as_secs_f64(),
        };
        let report = report::generate_report(self.format, panel, &metadata)?;

        match &self.file {
            Some(path) => {
                report::write_report(path, &report)?;
                eprintln!("📝 Report saved to: {}", path.display());
            }
            None if self.format != OutputFormat::Terminal => {
                writeln!(stdout, "{}", report).context("Failed to write report to stdout")?;
            }
            None => {}
        }
        Ok(())
    }
}

/// Run a one-shot or interactive session. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let output = Output {
        format: args.format,
        file: config.general.output.as_ref().map(PathBuf::from),
        service_url: config.service.url.clone(),
    };

    let service = service::from_config(&config.service)?;
    let view = Arc::new(TerminalView::new(args.quiet, output.view_prints_banner()));
    let controller = Controller::new(service, view, config.loading.clone());

    match args.repo {
        Some(ref url) => run_once(&controller, url, &output).await,
        None => run_interactive(&controller, &output).await,
    }
}

async fn run_once(controller: &Controller, url: &str, output: &Output) -> Result<i32> {
    let started = Instant::now();

    match controller.submit(url).await {
        Ok(panel) => {
            output.emit(&mut std::io::stdout(), &panel, url, started)?;
            Ok(0)
        }
        Err(e) => Ok(e.exit_code()),
    }
}

/// Read URLs from stdin, one submission per line, until EOF.
async fn run_interactive(controller: &Controller, output: &Output) -> Result<i32> {
    eprintln!("🔥 Paste a GitHub repository URL and press Enter (Ctrl-D to quit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut roasted = 0usize;

    loop {
        eprint!("repo> ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        let url = line.trim_end_matches('\r');

        let started = Instant::now();
        if let Ok(panel) = controller.submit(url).await {
            roasted += 1;
            if let Err(e) = output.emit(&mut std::io::stdout(), &panel, url, started) {
                warn!("Could not write report: {:#}", e);
                eprintln!("⚠️  {:#}", e);
            }
        }
        debug!("Controller state: {:?}", controller.state());
    }

    eprintln!();
    info!("Session ended after {} roast(s)", roasted);
    Ok(0)
}

/// Where the effective configuration came from.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    /// The default file exists but could not be used.
    Fallback(anyhow::Error),
}

impl ConfigSource {
    /// Logged once the subscriber is installed.
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
