//! Summary metrics over a filtered lead subset
//!
//! Percentages and averages are 0 for an empty subset.

use std::collections::HashMap;

use crate::types::{Lead, SentimentResult, Summary};

const BLANK_LABEL: &str = "(blank)";

pub fn summarize(leads: &[Lead], sentiments: &[SentimentResult]) -> Summary {
    let total = leads.len();
    let positive = sentiments.iter().filter(|s| s.is_positive()).count();

    Summary {
        total,
        positive,
        positive_pct: percentage(positive, total),
        average_value: average_value(leads),
        by_platform: value_counts(leads.iter().map(|l| l.platform.as_str())),
        by_status: value_counts(leads.iter().map(|l| l.status.as_str())),
    }
}

pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Mean of the rows that carry a value
pub fn average_value(leads: &[Lead]) -> f64 {
    let values: Vec<f64> = leads.iter().filter_map(|l| l.value).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Count occurrences, most frequent first, ties by name
pub fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let key = if value.is_empty() { BLANK_LABEL } else { value };
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}
