use super::{describe_selection, format_currency, format_date, truncate_str, DashboardView};

const BAR_WIDTH: usize = 30;

/// Plain-text dashboard for the terminal
pub fn render_text(view: &DashboardView) -> String {
    let mut out = format!("=== {} ===\n", view.title);

    if view.is_unavailable() {
        out.push_str("\n⚠️  Lead data is unavailable. Check the error log and the data source settings.\n");
        return out;
    }

    if let Some(loaded_at) = view.loaded_at {
        out.push_str(&format!("Loaded: {}\n", loaded_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    out.push_str(&format!("Period: {}\n", view.period));
    out.push_str(&format!(
        "Filters: status = {} | platform = {}\n",
        describe_selection(&view.criteria.statuses),
        describe_selection(&view.criteria.platforms)
    ));
    out.push_str(&format!(
        "Available: statuses [{}] platforms [{}]\n",
        view.status_options.join(", "),
        view.platform_options.join(", ")
    ));
    if let Some((min, max)) = view.data_bounds {
        out.push_str(&format!("Data spans {} to {}\n", min, max));
    }

    let summary = &view.summary;
    out.push_str("\n## Overview\n\n");
    out.push_str(&format!(
        "Total Leads: {}   Positive: {} ({:.1}%)   Average Value: {}\n",
        summary.total,
        summary.positive,
        summary.positive_pct,
        format_currency(summary.average_value)
    ));

    out.push_str("\n## Leads by Platform\n\n");
    out.push_str(&render_bars(&summary.by_platform));
    out.push_str("\n## Leads by Status\n\n");
    out.push_str(&render_bars(&summary.by_status));

    out.push_str("\n## Lead Details\n\n");
    if view.rows.is_empty() {
        out.push_str("No leads match the current filters.\n");
        return out;
    }

    out.push_str("| Name | Phone | Platform | Status | Value | Date | Sentiment | Interaction |\n");
    out.push_str("|------|-------|----------|--------|-------|------|-----------|-------------|\n");
    for (lead, sentiment) in &view.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} ({:.2}) | {} |\n",
            truncate_str(&lead.name, 25),
            lead.phone,
            lead.platform,
            lead.status,
            lead.value.map(format_currency).unwrap_or_else(|| "-".to_string()),
            format_date(lead.date),
            sentiment.label,
            sentiment.confidence,
            truncate_str(&lead.interaction, 40).replace('|', "/")
        ));
    }

    out
}

fn render_bars(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "(no data)\n".to_string();
    }

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    let label_width = counts.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    counts
        .iter()
        .map(|(label, count)| {
            let len = (count * BAR_WIDTH).div_ceil(max);
            format!("{:<width$}  {} {}\n", label, "#".repeat(len), count, width = label_width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_view;
    use crate::types::LeadTable;

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&sample_view());
        assert!(text.starts_with("=== Social Seller Dashboard ==="));
        assert!(text.contains("Period: 2024-03-01 to 2024-03-10"));
        assert!(text.contains("Total Leads: 2   Positive: 1 (50.0%)   Average Value: R$1000.00"));
        assert!(text.contains("## Leads by Platform"));
        assert!(text.contains("| Ana | 5511999990001 | Instagram | New | R$1500.00 | 2024-03-01 | POSITIVE"));
    }

    #[test]
    fn test_render_text_unavailable() {
        let mut view = sample_view();
        view.loaded_at = LeadTable::empty().loaded_at;
        let text = render_text(&view);
        assert!(text.contains("Lead data is unavailable"));
        assert!(!text.contains("## Overview"));
    }

    #[test]
    fn test_render_bars_scale() {
        let bars = render_bars(&[("A".to_string(), 2), ("B".to_string(), 1)]);
        let lines: Vec<&str> = bars.lines().collect();
        assert_eq!(lines[0], format!("A  {} 2", "#".repeat(30)));
        assert_eq!(lines[1], format!("B  {} 1", "#".repeat(15)));
    }
}
