use crate::types::{FilterCriteria, Lead, Period};
use chrono::NaiveDate;

/// True when the lead satisfies every non-empty dimension of the criteria.
///
/// The date range is inclusive on both ends. Once either bound is set, a lead
/// without a date no longer matches.
pub fn matches_criteria(lead: &Lead, criteria: &FilterCriteria) -> bool {
    if !criteria.statuses.is_empty() && !criteria.statuses.iter().any(|s| s == &lead.status) {
        return false;
    }

    if !criteria.platforms.is_empty() && !criteria.platforms.iter().any(|p| p == &lead.platform) {
        return false;
    }

    if criteria.has_date_range() {
        let Some(date) = lead.date else {
            return false;
        };
        if let Some(from) = criteria.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = criteria.date_to {
            if date > to {
                return false;
            }
        }
    }

    true
}

/// Rows matching the criteria, in their original order
pub fn filter_leads(leads: &[Lead], criteria: &FilterCriteria) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| matches_criteria(lead, criteria))
        .cloned()
        .collect()
}

/// Distinct non-empty statuses, in first-seen order
pub fn distinct_statuses(leads: &[Lead]) -> Vec<String> {
    distinct(leads.iter().map(|l| l.status.as_str()))
}

/// Distinct non-empty platforms, in first-seen order
pub fn distinct_platforms(leads: &[Lead]) -> Vec<String> {
    distinct(leads.iter().map(|l| l.platform.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Earliest and latest lead date, ignoring undated rows
pub fn date_bounds(leads: &[Lead]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = leads.iter().filter_map(|l| l.date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
}

/// Period to display: explicit criteria bounds, falling back to the data's own bounds
pub fn effective_period(leads: &[Lead], criteria: &FilterCriteria) -> Period {
    let bounds = date_bounds(leads);
    Period {
        from: criteria.date_from.or(bounds.map(|(min, _)| min)),
        to: criteria.date_to.or(bounds.map(|(_, max)| max)),
    }
}
