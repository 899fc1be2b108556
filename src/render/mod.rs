//! Dashboard presentation
//!
//! A [`DashboardView`] holds everything one screen shows; the text and HTML
//! renderers are pure functions of it.

mod html;
mod text;

pub use html::{render_html, Theme};
pub use text::render_text;

use chrono::{DateTime, NaiveDate, Utc};

use crate::filter::{date_bounds, distinct_platforms, distinct_statuses, effective_period, filter_leads};
use crate::metrics::summarize;
use crate::sentiment::{classify_all, SentimentClassifier};
use crate::types::{FilterCriteria, Lead, LeadTable, Period, SentimentResult, Summary};

pub const CURRENCY: &str = "R$";

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub title: String,
    pub loaded_at: Option<DateTime<Utc>>,
    /// Choices offered by the status and platform filters
    pub status_options: Vec<String>,
    pub platform_options: Vec<String>,
    pub data_bounds: Option<(NaiveDate, NaiveDate)>,
    pub criteria: FilterCriteria,
    pub period: Period,
    pub summary: Summary,
    pub rows: Vec<(Lead, SentimentResult)>,
}

impl DashboardView {
    /// Filter the table, classify each remaining row and compute the metrics
    pub fn build(
        title: &str,
        table: &LeadTable,
        criteria: &FilterCriteria,
        classifier: &dyn SentimentClassifier,
    ) -> Self {
        let subset = filter_leads(&table.leads, criteria);
        let sentiments = classify_all(classifier, &subset);
        let summary = summarize(&subset, &sentiments);

        Self {
            title: title.to_string(),
            loaded_at: table.loaded_at,
            status_options: distinct_statuses(&table.leads),
            platform_options: distinct_platforms(&table.leads),
            data_bounds: date_bounds(&table.leads),
            criteria: criteria.clone(),
            period: effective_period(&table.leads, criteria),
            summary,
            rows: subset.into_iter().zip(sentiments).collect(),
        }
    }

    /// The source produced nothing, so there is nothing to show
    pub fn is_unavailable(&self) -> bool {
        self.loaded_at.is_none()
    }
}

pub fn format_currency(value: f64) -> String {
    format!("{}{:.2}", CURRENCY, value)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Truncate to `max_chars` characters, marking the cut with `...`
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let keep = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(keep).collect::<String>())
    } else {
        s.to_string()
    }
}

fn describe_selection(selected: &[String]) -> String {
    if selected.is_empty() {
        "all".to_string()
    } else {
        selected.join(", ")
    }
}
