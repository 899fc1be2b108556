//! Lead data source
//!
//! Fetches the whole lead sheet as CSV, either from a Google Sheets export
//! URL or from a local file, and turns it into typed `Lead` rows. Loading
//! never fails the process: on any error the failure is logged and an empty
//! table comes back.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, info, warn};
use reqwest::blocking::Client;

use crate::config::{resolve_path, secret_from_env, SourceConfig, SHEETS_BASE_URL};
use crate::error::{AdapterResult, DashboardError};
use crate::types::{Lead, LeadTable};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %B %Y", "%B %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Anything that can hand back the lead sheet as CSV text
pub trait LeadSource {
    fn fetch_csv(&self) -> AdapterResult<String>;

    /// Human-readable origin used in log lines
    fn describe(&self) -> String;
}

/// CSV export of one worksheet of a Google spreadsheet
pub struct SheetSource {
    client: Client,
    spreadsheet_id: String,
    url: String,
    token: Option<String>,
}

impl SheetSource {
    pub fn new(
        spreadsheet_id: &str,
        gid: Option<&str>,
        token: Option<String>,
        base_url: Option<&str>,
    ) -> AdapterResult<Self> {
        let base = base_url.unwrap_or(SHEETS_BASE_URL).trim_end_matches('/');
        let mut url = format!("{}/{}/export?format=csv", base, spreadsheet_id);
        if let Some(gid) = gid {
            url.push_str(&format!("&gid={}", gid));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::Connectivity(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.trim().to_string(),
            url,
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LeadSource for SheetSource {
    fn fetch_csv(&self) -> AdapterResult<String> {
        if self.spreadsheet_id.is_empty() {
            return Err(DashboardError::Config("no spreadsheet_id configured".to_string()));
        }

        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| DashboardError::Connectivity(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Connectivity(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.url
            )));
        }

        // Private sheets answer 200 with a sign-in page instead of CSV
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if content_type.contains("text/html") {
            return Err(DashboardError::Connectivity(format!(
                "{} returned HTML; the sheet is not shared or the token lacks access",
                self.url
            )));
        }

        response
            .text()
            .map_err(|e| DashboardError::Connectivity(format!("failed to read body from {}: {}", self.url, e)))
    }

    fn describe(&self) -> String {
        format!("sheet {}", self.url)
    }
}

pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LeadSource for CsvFileSource {
    fn fetch_csv(&self) -> AdapterResult<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| DashboardError::Connectivity(format!("cannot read {:?}: {}", self.path, e)))
    }

    fn describe(&self) -> String {
        format!("file {:?}", self.path)
    }
}

/// Build the configured source
pub fn source_from_config(root: &Path, config: &SourceConfig) -> AdapterResult<Box<dyn LeadSource>> {
    Ok(match config {
        SourceConfig::Sheet {
            spreadsheet_id,
            gid,
            token_env,
            base_url,
        } => Box::new(SheetSource::new(
            spreadsheet_id,
            gid.as_deref(),
            secret_from_env(token_env.as_deref()),
            base_url.as_deref(),
        )?),
        SourceConfig::Csv { path } => Box::new(CsvFileSource::new(resolve_path(root, path))),
    })
}

/// Fetch and parse the whole sheet; empty table when anything goes wrong
pub fn load(source: &dyn LeadSource) -> LeadTable {
    let csv_text = match source.fetch_csv() {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to load leads from {}: {}", source.describe(), e);
            return LeadTable::empty();
        }
    };

    match parse_leads(&csv_text) {
        Ok(leads) => {
            info!("Loaded {} leads from {}", leads.len(), source.describe());
            LeadTable::new(leads)
        }
        Err(e) => {
            error!("Failed to parse leads from {}: {}", source.describe(), e);
            LeadTable::empty()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Name,
    Phone,
    Platform,
    Status,
    Interaction,
    Value,
    Date,
}

fn column_for_header(header: &str) -> Option<Column> {
    match header.trim().to_lowercase().as_str() {
        "name" | "nome" => Some(Column::Name),
        "phone" | "telefone" | "tel" => Some(Column::Phone),
        "platform" | "plataforma" => Some(Column::Platform),
        "status" => Some(Column::Status),
        "interaction" | "interação" | "interacao" => Some(Column::Interaction),
        "value" | "valor" => Some(Column::Value),
        "date" | "data" => Some(Column::Date),
        _ => None,
    }
}

/// Parse CSV text with a header row into leads.
///
/// Unknown columns are ignored and missing ones read as empty. Rows whose
/// date or value cannot be parsed keep `None` for that field.
pub fn parse_leads(csv_text: &str) -> AdapterResult<Vec<Lead>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DashboardError::Parse(format!("unreadable header row: {}", e)))?
        .clone();

    let mut columns: HashMap<Column, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(column) = column_for_header(header) {
            columns.entry(column).or_insert(idx);
        }
    }

    if !headers.is_empty() && columns.is_empty() {
        return Err(DashboardError::Parse(format!(
            "no recognised columns in header: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut leads = Vec::new();
    let mut coerced_dates = 0;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping unreadable row {}: {}", line + 2, e);
                continue;
            }
        };

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let field = |column: Column| -> String { cell(&record, columns.get(&column)) };

        let raw_date = field(Column::Date);
        let date = parse_date(&raw_date);
        if date.is_none() && !raw_date.is_empty() {
            coerced_dates += 1;
        }

        leads.push(Lead {
            name: field(Column::Name),
            phone: field(Column::Phone),
            platform: field(Column::Platform),
            status: field(Column::Status),
            interaction: field(Column::Interaction),
            value: parse_value(&field(Column::Value)),
            date,
        });
    }

    if coerced_dates > 0 {
        warn!("{} rows had an unparseable date and were kept without one", coerced_dates);
    }

    Ok(leads)
}

fn cell(record: &StringRecord, idx: Option<&usize>) -> String {
    idx.and_then(|i| record.get(*i)).unwrap_or("").to_string()
}

/// Parse the date formats seen in lead sheets; slashed dates are day-first
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// Parse a currency cell such as `R$ 1.500,00`, `$1,500.00` or `1500`
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 1.500,00
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // 1,500.00
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) => {
            let decimals = cleaned.len() - c - 1;
            if commas > 1 || decimals == 3 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, Some(d)) => {
            let decimals = cleaned.len() - d - 1;
            let whole = cleaned[..d].trim_start_matches('-');
            // R$ 1.500 / 12.000: one dot before exactly three digits groups thousands
            let grouped = decimals == 3 && !whole.is_empty() && whole != "0";
            if dots > 1 || grouped {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
