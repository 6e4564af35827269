//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.roastctl.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".roastctl.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Loading indicator settings.
    #[serde(default)]
    pub loading: LoadingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Write every rendered report to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Analysis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the analysis service.
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Request timeout in seconds. 0 waits forever.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Use the `/stream_analyze` event stream instead of `POST /analyze`.
    #[serde(default)]
    pub streaming: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_seconds: default_timeout(),
            streaming: false,
        }
    }
}

impl ServiceConfig {
    /// The request timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    300
}

/// Loading indicator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Milliseconds between message rotations.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Messages cycled while a request is pending.
    #[serde(default = "default_messages")]
    pub messages: Vec<String>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            messages: default_messages(),
        }
    }
}

impl LoadingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    1200
}

/// The canned agent-progress messages.
pub fn default_messages() -> Vec<String> {
    vec![
        "🔍 Agent 1: Scouting Repository Metadata...",
        "📂 Agent 1: analyzing folder structure...",
        "📜 Agent 2: Reading README (judging your grammar)...",
        "🐍 Agent 2: Checking language distribution...",
        "🧠 Senior Dev Agent: Formulating roasting strategy...",
        "⚖️ Senior Dev Agent: Writing final verdict...",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject values the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.loading.interval_ms == 0 {
            bail!("loading.interval_ms must be greater than 0");
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.roastctl.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref server) = args.server {
            self.service.url = server.clone();
        }

        if let Some(timeout) = args.timeout {
            self.service.timeout_seconds = timeout;
        }

        if args.stream {
            self.service.streaming = true;
        }

        if let Some(interval_ms) = args.interval_ms {
            self.loading.interval_ms = interval_ms;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }

        // An empty rotation would have nothing to show
        if self.loading.messages.is_empty() {
            self.loading.messages = default_messages();
        }

        // A zero period cannot drive the rotation timer
        if self.loading.interval_ms == 0 {
            self.loading.interval_ms = default_interval_ms();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
