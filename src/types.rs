use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub platform: String,
    pub status: String,
    pub interaction: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// All leads from one fetch of the data source.
///
/// An empty table means the source was unavailable, not that there are zero leads.
#[derive(Debug, Clone, Default)]
pub struct LeadTable {
    pub leads: Vec<Lead>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl LeadTable {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self {
            leads,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map a model label such as `POSITIVE`, `NEG` or `LABEL_2` to a coarse label.
    ///
    /// Index labels follow the three-class convention: `LABEL_0` negative,
    /// `LABEL_1` neutral, `LABEL_2` positive.
    pub fn from_model_label(label: &str) -> Self {
        let upper = label.trim().to_uppercase();
        if upper.starts_with("POS") || upper == "LABEL_2" {
            SentimentLabel::Positive
        } else if upper.starts_with("NEG") || upper == "LABEL_0" {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Always within [0, 1]
    pub confidence: f64,
}

impl SentimentResult {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, confidence }
    }

    /// Result used for empty text and for every failure path.
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.label == SentimentLabel::Positive
    }
}

/// User-selected constraints; an empty dimension means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}

/// Reporting period shown on dashboards and PDF summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Period {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        write!(f, "{} to {}", show(self.from), show(self.to))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub positive: usize,
    /// 0 when the subset is empty
    pub positive_pct: f64,
    /// 0 when no row carries a value
    pub average_value: f64,
    pub by_platform: Vec<(String, usize)>,
    pub by_status: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SendStatus {
    Sent { message_id: String },
    Failed { details: String },
}

impl SendStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendStatus::Sent { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotifyOutcome {
    pub name: String,
    pub phone: String,
    pub status: SendStatus,
}

/// Per-row results of a notification batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotifyReport {
    pub outcomes: Vec<NotifyOutcome>,
}

impl NotifyReport {
    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }
}
