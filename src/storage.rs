use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::Lead;

const CSV_HEADER: [&str; 7] = ["Name", "Phone", "Platform", "Status", "Interaction", "Value", "Date"];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }
    Ok(())
}

/// Write leads as CSV with the same headers the data source reads
pub fn export_csv(leads: &[Lead], path: &Path) -> Result<()> {
    ensure_parent(path)?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for writing", path))?;

    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for lead in leads {
        let value = lead.value.map(|v| format!("{:.2}", v)).unwrap_or_default();
        let date = lead
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer
            .write_record([
                lead.name.as_str(),
                lead.phone.as_str(),
                lead.platform.as_str(),
                lead.status.as_str(),
                lead.interaction.as_str(),
                value.as_str(),
                date.as_str(),
            ])
            .with_context(|| format!("Failed to write lead {}", lead.name))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

/// Write a generated artifact (PDF, HTML), replacing any previous file
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for writing", path))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .with_context(|| format!("Failed to write {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}
