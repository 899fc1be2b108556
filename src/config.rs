//! Dashboard configuration
//!
//! Loaded from `config/dashboard.yml` under the root directory. Every section
//! has defaults, so an empty file (or no file at all) gives a dashboard over
//! `tracking/leads.csv` with the lexicon classifier and the stub notifier.
//! Secrets are referenced by environment variable name only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.yml";
pub const DEFAULT_CSV_PATH: &str = "tracking/leads.csv";
pub const DEFAULT_ERROR_LOG: &str = "aaas_errors.log";
pub const DEFAULT_TEMPLATE: &str = "Hello {name}! Thanks for reaching out via {platform}.";
pub const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";
pub const DEFAULT_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// CSV export of one Google Sheets worksheet
    Sheet {
        spreadsheet_id: String,
        #[serde(default)]
        gid: Option<String>,
        #[serde(default)]
        token_env: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
    Csv { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Csv {
            path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentimentConfig {
    #[default]
    Lexicon,
    /// Hosted inference endpoint answering `[{label, score}]`
    Remote {
        url: String,
        #[serde(default)]
        token_env: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            channel: ChannelConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelConfig {
    #[default]
    Stub,
    Webhook {
        url: String,
        #[serde(default)]
        token_env: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Drive folder id the backup lands in
    #[serde(default = "default_parent")]
    pub parent: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
            token_env: default_token_env(),
            mime_type: default_mime_type(),
            parent: default_parent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `None` logs to stderr instead of a file
    #[serde(default = "default_error_log")]
    pub error_log: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            error_log: default_error_log(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub include_metrics: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_metrics: true,
        }
    }
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_upload_url() -> String {
    DRIVE_UPLOAD_URL.to_string()
}

fn default_token_env() -> Option<String> {
    Some(DEFAULT_TOKEN_ENV.to_string())
}

fn default_mime_type() -> String {
    "text/csv".to_string()
}

fn default_parent() -> String {
    "root".to_string()
}

fn default_error_log() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_ERROR_LOG))
}

fn default_title() -> String {
    "Social Seller Report".to_string()
}

fn default_true() -> bool {
    true
}

/// Parse a configuration document
pub fn parse_config(content: &str) -> Result<DashboardConfig> {
    if content.trim().is_empty() {
        return Ok(DashboardConfig::default());
    }
    serde_yaml::from_str(content).with_context(|| "Failed to parse dashboard config YAML")
}

/// Load configuration from an explicit path, or from the default location under `root`.
///
/// An explicit path must exist. A missing default file yields the defaults.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DashboardConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default_path = root.join(DEFAULT_CONFIG_PATH);
            if !default_path.exists() {
                return Ok(DashboardConfig::default());
            }
            default_path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    parse_config(&content).with_context(|| format!("Invalid config at {:?}", path))
}

/// Resolve a configured path against the root directory unless it is absolute
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Read a secret from the environment variable named in the config
pub fn secret_from_env(var_name: Option<&str>) -> Option<String> {
    var_name
        .and_then(|name| env::var(name).ok())
        .filter(|value| !value.trim().is_empty())
}
