use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ScanError;
use crate::snapshot::{DEFAULT_MAX_ELEMENTS, DisposalStrategy, ScanMode};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "a11y-scan",
    version,
    about = "Accessibility rule scanner for UI element trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: a11y-scan.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture a tree fixture and run every rule against it
    Scan(ScanArgs),

    /// List the rule catalog
    Rules {
        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// JSON tree fixture to scan
    #[arg(long)]
    pub tree: String,

    /// Automation id of the element to scan (default: the fixture root)
    #[arg(long)]
    pub target: Option<String>,

    /// Maximum number of elements to capture
    #[arg(long)]
    pub max_elements: Option<usize>,

    /// Capture mode: live or test
    #[arg(long)]
    pub mode: Option<String>,

    /// Output format: console, json
    #[arg(long)]
    pub format: Option<String>,

    /// Also evaluate elements inside embedded web content
    #[arg(long)]
    pub include_web_content: bool,

    /// Append a JSONL scan trace to this file
    #[arg(long)]
    pub trace: Option<String>,

    /// Fingerprint history file to diff against and update
    #[arg(long)]
    pub history: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `a11y-scan.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,

    #[serde(default)]
    pub mode: ScanMode,

    #[serde(default)]
    pub disposal: DisposalStrategy,

    #[serde(default = "default_console")]
    pub format: String,

    #[serde(default)]
    pub include_web_content: bool,

    pub trace: Option<String>,

    pub history: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_elements: DEFAULT_MAX_ELEMENTS,
            mode: ScanMode::default(),
            disposal: DisposalStrategy::default(),
            format: "console".to_string(),
            include_web_content: false,
            trace: None,
            history: None,
        }
    }
}

// Serde default helpers
fn default_max_elements() -> usize { DEFAULT_MAX_ELEMENTS }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("a11y-scan.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ScanError> {
    Ok(serde_yaml::from_str(content)?)
}

// ============================================================================
// Settings (merge CLI args with config file)
// ============================================================================

/// Output formats the scan command can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        match value.to_ascii_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            other => Err(ScanError::parameter("format", format!("unknown format '{}'", other))),
        }
    }
}

pub fn parse_mode(value: &str) -> Result<ScanMode, ScanError> {
    match value.to_ascii_lowercase().as_str() {
        "live" => Ok(ScanMode::Live),
        "test" => Ok(ScanMode::Test),
        other => Err(ScanError::parameter("mode", format!("unknown mode '{}'", other))),
    }
}

/// Fully resolved scan settings: CLI > config file > defaults.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub tree: String,
    pub target: Option<String>,
    pub max_elements: usize,
    pub mode: ScanMode,
    pub disposal: DisposalStrategy,
    pub format: OutputFormat,
    pub include_web_content: bool,
    pub trace: Option<String>,
    pub history: Option<String>,
    pub output: Option<String>,
}

pub fn resolve_scan_settings(args: &ScanArgs, config: &ScanConfig) -> Result<ScanSettings, ScanError> {
    let mode = match args.mode.as_deref() {
        Some(mode) => parse_mode(mode)?,
        None => config.mode,
    };
    let max_elements = args.max_elements.unwrap_or(config.max_elements);
    if max_elements == 0 {
        return Err(ScanError::parameter("max_elements", "must be at least 1"));
    }

    Ok(ScanSettings {
        tree: args.tree.clone(),
        target: args.target.clone(),
        max_elements,
        mode,
        disposal: config.disposal,
        format: OutputFormat::parse(args.format.as_deref().unwrap_or(&config.format))?,
        include_web_content: args.include_web_content || config.include_web_content,
        trace: args.trace.clone().or_else(|| config.trace.clone()),
        history: args.history.clone().or_else(|| config.history.clone()),
        output: args.output.clone(),
    })
}
