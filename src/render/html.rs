//! Self-contained HTML dashboard with inline CSS and SVG charts.

use std::f64::consts::PI;

use base64::{engine::general_purpose, Engine};

use super::{describe_selection, format_currency, format_date, DashboardView};

/// Plotly's qualitative "Pastel" sequence
const PASTEL: &[&str] = &[
    "#66C5CC", "#F6CF71", "#F89C74", "#DCB0F2", "#87C55F", "#9EB9F3", "#FE88B1", "#C9DB74",
    "#8BE0A4", "#B497E7", "#D3B484", "#B3B3B3",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Render the dashboard as one HTML page.
///
/// When `pdf_report` is given, the page links to it as a base64 `data:` download.
pub fn render_html(view: &DashboardView, theme: Theme, pdf_report: Option<&[u8]>) -> String {
    let body = if view.is_unavailable() {
        r#"<div class="warning">Lead data is unavailable. Check the error log and the data source settings.</div>"#
            .to_string()
    } else {
        format!(
            "{filters}\n{metrics}\n{charts}\n{table}\n{download}",
            filters = render_filters(view),
            metrics = render_metrics(view),
            charts = render_charts(view),
            table = render_table(view),
            download = pdf_report.map(render_download).unwrap_or_default(),
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>📊 {title}</h1>
        {body}
    </div>
</body>
</html>
"#,
        title = escape_html(&view.title),
        css = inline_css(theme),
        body = body,
    )
}

fn render_filters(view: &DashboardView) -> String {
    let bounds = view
        .data_bounds
        .map(|(min, max)| format!("{} to {}", min, max))
        .unwrap_or_else(|| "-".to_string());
    format!(
        r#"<section class="filters">
    <h2>🔍 Filters</h2>
    <p><strong>Status:</strong> {statuses} <span class="muted">(options: {status_options})</span></p>
    <p><strong>Platform:</strong> {platforms} <span class="muted">(options: {platform_options})</span></p>
    <p><strong>Period:</strong> {period} <span class="muted">(data: {bounds})</span></p>
</section>"#,
        statuses = escape_html(&describe_selection(&view.criteria.statuses)),
        status_options = escape_html(&view.status_options.join(", ")),
        platforms = escape_html(&describe_selection(&view.criteria.platforms)),
        platform_options = escape_html(&view.platform_options.join(", ")),
        period = view.period,
        bounds = bounds,
    )
}

fn render_metrics(view: &DashboardView) -> String {
    let s = &view.summary;
    format!(
        r#"<section class="metrics">
    <h2>📈 Overview</h2>
    <div class="metric"><div class="label">Total Leads</div><div class="value">{total}</div></div>
    <div class="metric"><div class="label">Positive</div><div class="value">{positive} ({pct:.1}%)</div></div>
    <div class="metric"><div class="label">Average Value</div><div class="value">{avg}</div></div>
</section>"#,
        total = s.total,
        positive = s.positive,
        pct = s.positive_pct,
        avg = format_currency(s.average_value),
    )
}

fn render_charts(view: &DashboardView) -> String {
    format!(
        r#"<section class="charts">
    <div class="chart"><h3>Leads by Platform</h3>{pie}</div>
    <div class="chart"><h3>Leads by Status</h3>{bar}</div>
</section>"#,
        pie = pie_chart(&view.summary.by_platform),
        bar = bar_chart(&view.summary.by_status),
    )
}

fn render_table(view: &DashboardView) -> String {
    let mut rows = String::new();
    for (lead, sentiment) in &view.rows {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td>{}</td><td class=\"{}\">{} ({:.2})</td></tr>\n",
            escape_html(&lead.name),
            escape_html(&lead.phone),
            escape_html(&lead.platform),
            escape_html(&lead.status),
            escape_html(&lead.interaction),
            lead.value.map(format_currency).unwrap_or_else(|| "-".to_string()),
            format_date(lead.date),
            sentiment.label.as_str().to_lowercase(),
            sentiment.label,
            sentiment.confidence,
        ));
    }

    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"8\" class=\"muted\">No leads match the current filters.</td></tr>\n");
    }

    format!(
        r#"<section class="leads">
    <h2>💼 Lead Details</h2>
    <table>
        <thead><tr><th>Name</th><th>Phone</th><th>Platform</th><th>Status</th><th>Interaction</th><th>Value</th><th>Date</th><th>Sentiment</th></tr></thead>
        <tbody>
{rows}        </tbody>
    </table>
</section>"#,
        rows = rows
    )
}

fn render_download(pdf: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(pdf);
    format!(
        r#"<section class="actions"><a class="button" href="data:application/pdf;base64,{}" download="lead_report.pdf">💾 Download PDF report</a></section>"#,
        encoded
    )
}

fn pie_chart(counts: &[(String, usize)]) -> String {
    let total: usize = counts.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return r#"<p class="muted">No data</p>"#.to_string();
    }

    let (cx, cy, r) = (110.0, 110.0, 100.0);
    let mut slices = String::new();
    let mut legend = String::new();
    let mut angle = -PI / 2.0;

    for (idx, (label, count)) in counts.iter().enumerate() {
        let color = PASTEL[idx % PASTEL.len()];
        let fraction = *count as f64 / total as f64;

        if counts.len() == 1 {
            slices.push_str(&format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#
            ));
        } else {
            let sweep = fraction * 2.0 * PI;
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            slices.push_str(&format!(
                r#"<path d="M {cx} {cy} L {x1:.2} {y1:.2} A {r} {r} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
            ));
            angle = end;
        }

        legend.push_str(&format!(
            r#"<li><span class="swatch" style="background:{}"></span>{} ({}, {:.1}%)</li>"#,
            color,
            escape_html(label),
            count,
            fraction * 100.0
        ));
    }

    format!(
        r#"<svg viewBox="0 0 220 220" width="220" height="220" role="img">{}</svg><ul class="legend">{}</ul>"#,
        slices, legend
    )
}

fn bar_chart(counts: &[(String, usize)]) -> String {
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if max == 0 {
        return r#"<p class="muted">No data</p>"#.to_string();
    }

    let bar_width = 40.0;
    let gap = 20.0;
    let chart_height = 160.0;
    let width = counts.len() as f64 * (bar_width + gap) + gap;
    let mut bars = String::new();

    for (idx, (label, count)) in counts.iter().enumerate() {
        let height = *count as f64 / max as f64 * chart_height;
        let x = gap + idx as f64 * (bar_width + gap);
        let y = 20.0 + chart_height - height;
        bars.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width}" height="{height:.1}" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="middle">{count}</text><text x="{tx:.1}" y="200" text-anchor="middle" class="axis">{label}</text>"#,
            color = PASTEL[idx % PASTEL.len()],
            tx = x + bar_width / 2.0,
            ty = y - 4.0,
            label = escape_html(label),
        ));
    }

    format!(
        r#"<svg viewBox="0 0 {w:.0} 210" width="{w:.0}" height="210" role="img">{bars}</svg>"#,
        w = width,
        bars = bars
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css(theme: Theme) -> String {
    let (background, foreground, panel, border) = match theme {
        Theme::Light => ("#ffffff", "#222222", "#f5f6f8", "#dddddd"),
        Theme::Dark => ("#1e1e1e", "#ffffff", "#2d2d2d", "#444444"),
    };
    format!(
        "body {{ background-color: {background}; color: {foreground}; font-family: -apple-system, 'Segoe UI', sans-serif; margin: 0; }}
.container {{ max-width: 1200px; margin: 0 auto; padding: 24px; }}
section {{ background: {panel}; border: 1px solid {border}; border-radius: 8px; padding: 16px; margin-bottom: 16px; }}
.metric {{ display: inline-block; min-width: 200px; margin-right: 24px; }}
.metric .label {{ font-size: 0.9em; opacity: 0.7; }}
.metric .value {{ font-size: 1.6em; font-weight: 600; }}
.charts {{ display: flex; gap: 32px; flex-wrap: wrap; }}
.chart svg text {{ fill: {foreground}; font-size: 11px; }}
.legend {{ list-style: none; padding: 0; }}
.swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 2px; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ border-bottom: 1px solid {border}; padding: 6px 8px; text-align: left; }}
td.num {{ text-align: right; }}
td.positive {{ color: #2e9d5b; }}
td.negative {{ color: #d0453b; }}
.muted {{ opacity: 0.6; }}
.warning {{ background: #fff3cd; color: #664d03; padding: 16px; border-radius: 8px; }}
.button {{ display: inline-block; padding: 8px 16px; border-radius: 6px; background: #66C5CC; color: #1e1e1e; text-decoration: none; }}
"
    )
}
