use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::browser::webdriver::WebDriverOptions;
use crate::catalog::flows::Flow;
use crate::catalog::pages::DEFAULT_BASE_URL;
use crate::wait::policy::WaitConfig;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "swag-scenarios.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "swag-scenarios",
    version,
    about = "Browser scenarios for the Swag Labs storefront"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: swag-scenarios.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// WebDriver endpoint, e.g. http://localhost:9515
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Storefront base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    pub headless: bool,

    /// Append a JSONL step trace to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run catalog flows or scenario YAML files
    Run {
        /// Catalog flows to run (default: all)
        #[arg(long, value_enum, value_delimiter = ',')]
        flow: Vec<Flow>,

        /// Scenario YAML file or directory; replaces the catalog flows
        #[arg(long)]
        scenarios: Option<String>,

        /// Run the whole selection this many times, fresh session per scenario
        #[arg(long)]
        repeat: Option<usize>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write every catalog scenario as a YAML file
    Catalog {
        /// Output directory for the scenario files
        #[arg(short, long, default_value = "scenarios")]
        output_dir: String,
    },

    /// List catalog flows and their scenarios
    List,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `swag-scenarios.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub wait: WaitSettings,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebDriverConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_browser")]
    pub browser: String,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_true")]
    pub maximize: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            browser: default_browser(),
            headless: false,
            maximize: true,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitSettings {
    /// Bound for element checks: clickability, banner text, badge count
    #[serde(default = "default_element_timeout_ms")]
    pub element_timeout_ms: u64,

    /// Bound for page checks: title and URL after navigation
    #[serde(default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            element_timeout_ms: default_element_timeout_ms(),
            page_timeout_ms: default_page_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WaitSettings {
    pub fn to_wait_config(&self) -> WaitConfig {
        WaitConfig {
            element_timeout: Duration::from_millis(self.element_timeout_ms),
            page_timeout: Duration::from_millis(self.page_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default)]
    pub trace: Option<String>,

    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trace: None,
            repeat: default_repeat(),
        }
    }
}

// Serde default helpers
fn default_endpoint() -> String { "http://localhost:9515".to_string() }
fn default_browser() -> String { "chrome".to_string() }
fn default_true() -> bool { true }
fn default_request_timeout_secs() -> u64 { 60 }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_element_timeout_ms() -> u64 { 20_000 }
fn default_page_timeout_ms() -> u64 { 30_000 }
fn default_poll_interval_ms() -> u64 { 250 }
fn default_repeat() -> usize { 1 }

// ============================================================================
// Config File Loading
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Read and validate a config file.
pub fn try_load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let config: AppConfig = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load config from a YAML file. Returns defaults if the file is missing,
/// and defaults plus a warning if it is malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = Path::new(path.unwrap_or(DEFAULT_CONFIG_FILE));
    if !config_path.exists() {
        if path.is_some() {
            warn!("config file '{}' not found, using defaults", config_path.display());
        }
        return AppConfig::default();
    }

    match try_load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            AppConfig::default()
        }
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.wait.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid("wait.poll_interval_ms must be greater than 0".into()));
    }
    if config.webdriver.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("webdriver.endpoint must not be empty".into()));
    }
    if config.target.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("target.base_url must not be empty".into()));
    }
    Ok(())
}

// ============================================================================
// Settings (merge CLI args with config file)
// ============================================================================

/// Everything a run needs, after applying CLI > config file > defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub webdriver: WebDriverOptions,
    pub base_url: String,
    pub waits: WaitConfig,
    pub trace: Option<String>,
    pub repeat: usize,
}

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> Settings {
    let webdriver = WebDriverOptions {
        endpoint: cli
            .webdriver_url
            .clone()
            .unwrap_or_else(|| config.webdriver.endpoint.clone()),
        browser: config.webdriver.browser.clone(),
        headless: cli.headless || config.webdriver.headless,
        maximize: config.webdriver.maximize,
        request_timeout: Duration::from_secs(config.webdriver.request_timeout_secs),
    };

    let repeat = match &cli.command {
        Commands::Run { repeat: Some(n), .. } => *n,
        _ => config.run.repeat,
    };

    Settings {
        webdriver,
        base_url: cli
            .base_url
            .clone()
            .unwrap_or_else(|| config.target.base_url.clone()),
        waits: config.wait.to_wait_config(),
        trace: cli.trace.clone().or_else(|| config.run.trace.clone()),
        repeat: repeat.max(1),
    }
}
