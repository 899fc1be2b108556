//! Error log setup
//!
//! Adapters report failures through the `log` facade. When an error log is
//! configured, records are appended to it as
//! `2024-05-01 10:00:00,123 - ERROR - message`; otherwise they go to stderr.
//! `RUST_LOG` overrides the default level.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use env_logger::{Builder, Env, Target};

use crate::config::{resolve_path, LoggingConfig};

pub fn init(root: &Path, config: &LoggingConfig) -> Result<()> {
    let (default_filter, target) = match &config.error_log {
        Some(path) => {
            let path = resolve_path(root, path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create log directory {:?}", parent))?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open error log {:?}", path))?;
            ("error", Target::Pipe(Box::new(file)))
        }
        None => ("warn", Target::Stderr),
    };

    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let line = format_line(&Local::now().naive_local(), record.level(), &record.args().to_string());
            writeln!(buf, "{}", line)
        })
        .target(target)
        .try_init()
        .context("Logger already initialised")?;

    Ok(())
}

pub fn format_line(timestamp: &NaiveDateTime, level: log::Level, message: &str) -> String {
    format!("{} - {} - {}", timestamp.format("%Y-%m-%d %H:%M:%S,%3f"), level, message)
}
