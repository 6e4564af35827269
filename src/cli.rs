//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// roastctl - get your GitHub repo roasted from the terminal
///
/// Sends a repository URL to a RepoRoast analysis service and renders
/// the verdict, the roast, the good things and the suggestions.
///
/// Examples:
///   roastctl --repo https://github.com/owner/repo
///   roastctl --repo https://github.com/owner/repo --server https://roast.example.com
///   roastctl --repo https://github.com/owner/repo --format markdown --output roast.md
///   roastctl --stream --repo https://github.com/owner/repo
///   roastctl            (interactive: one URL per line on stdin)
///   roastctl --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub repository URL to roast
    ///
    /// When omitted, URLs are read from stdin one per line.
    #[arg(short, long, value_name = "URL")]
    pub repo: Option<String>,

    /// Base URL of the analysis service
    #[arg(short, long, value_name = "URL", env = "ROASTCTL_SERVER")]
    pub server: Option<String>,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use the streaming endpoint and show live agent progress
    #[arg(long)]
    pub stream: bool,

    /// Milliseconds between loading message rotations
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Output format for the report
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Also write the report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .roastctl.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .roastctl.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Banner and bullet lists (default)
    #[default]
    Terminal,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// An empty `--repo` is not rejected here; the controller reports it
    /// like any other empty submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref server) = self.server {
            if !server.starts_with("http://") && !server.starts_with("https://") {
                return Err("Server URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.interval_ms == Some(0) {
            return Err("Interval must be at least 1 millisecond".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_default` comes from `general.verbose` in the config file;
    /// `--quiet` always wins.
    pub fn log_level(&self, verbose_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
