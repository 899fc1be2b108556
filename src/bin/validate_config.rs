//! Config Validation Binary
//!
//! Checks config/dashboard.yml before the dashboard runs:
//! - Message template only uses known placeholders
//! - Sheet source has a spreadsheet id
//! - Every endpoint is an http(s) URL
//! - Token environment variables are set

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use social_seller::config::{
    load_config, resolve_path, secret_from_env, ChannelConfig, DashboardConfig, SentimentConfig,
    SourceConfig,
};
use social_seller::notify::{unknown_placeholders, KNOWN_PLACEHOLDERS};

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn check_url(&mut self, what: &str, url: &str) {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            self.errors
                .push(format!("{} is not an http/https URL: '{}'", what, url));
        }
    }

    fn check_token(&mut self, what: &str, token_env: Option<&str>) {
        if let Some(name) = token_env {
            if secret_from_env(Some(name)).is_none() {
                self.warnings.push(format!(
                    "{} token variable {} is not set; requests go out unauthenticated",
                    what, name
                ));
            }
        }
    }
}

fn validate(root: &Path, config: &DashboardConfig) -> Findings {
    let mut findings = Findings::default();

    match &config.source {
        SourceConfig::Sheet {
            spreadsheet_id,
            token_env,
            base_url,
            ..
        } => {
            if spreadsheet_id.trim().is_empty() {
                findings.errors.push("Sheet source has empty spreadsheet_id".to_string());
            }
            if let Some(url) = base_url {
                findings.check_url("Sheet base_url", url);
            }
            findings.check_token("Sheet", token_env.as_deref());
        }
        SourceConfig::Csv { path } => {
            let resolved = resolve_path(root, path);
            if !resolved.exists() {
                findings
                    .warnings
                    .push(format!("CSV source {:?} does not exist yet", resolved));
            }
        }
    }

    if let SentimentConfig::Remote { url, token_env } = &config.sentiment {
        findings.check_url("Sentiment url", url);
        findings.check_token("Sentiment", token_env.as_deref());
    }

    for key in unknown_placeholders(&config.notify.template) {
        findings.errors.push(format!(
            "Template placeholder {{{}}} is unknown. Supported: {:?}",
            key, KNOWN_PLACEHOLDERS
        ));
    }

    if let ChannelConfig::Webhook { url, token_env } = &config.notify.channel {
        findings.check_url("Webhook url", url);
        findings.check_token("Webhook", token_env.as_deref());
    }

    findings.check_url("Backup upload_url", &config.backup.upload_url);
    findings.check_token("Backup", config.backup.token_env.as_deref());

    findings
}

fn main() -> Result<()> {
    let root = PathBuf::from(std::env::var("ROOT").unwrap_or_else(|_| ".".to_string()));
    let explicit = std::env::args().nth(1).map(PathBuf::from);

    println!("=== Dashboard Configuration Validator ===");

    let config = load_config(&root, explicit.as_deref()).context("Failed to load dashboard config")?;
    let findings = validate(&root, &config);

    if findings.errors.is_empty() && findings.warnings.is_empty() {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    if !findings.errors.is_empty() {
        println!("\n❌ ERRORS (must fix):");
        for error in &findings.errors {
            println!("  - {}", error);
        }
    }

    if !findings.warnings.is_empty() {
        println!("\n⚠️  WARNINGS:");
        for warning in &findings.warnings {
            println!("  - {}", warning);
        }
    }

    if !findings.errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
