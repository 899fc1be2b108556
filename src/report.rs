//! PDF summary export
//!
//! Writes a minimal PDF 1.4 document (Helvetica, WinAnsi encoding) with one
//! text line per summary item. Output carries no timestamps or generated ids,
//! so equal inputs give byte-identical files.

use crate::config::ReportConfig;
use crate::render::format_currency;
use crate::types::{Period, Summary};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const TITLE_SIZE: u32 = 16;
const BODY_SIZE: u32 = 12;
const LEADING: u32 = 16;
const LINES_PER_PAGE: usize = 45;

/// Summary lines in page order; the first is the title
pub fn report_lines(config: &ReportConfig, summary: &Summary, period: &Period) -> Vec<String> {
    let mut lines = vec![
        config.title.clone(),
        format!("Period: {}", period),
        format!("Total Leads: {}", summary.total),
    ];

    if config.include_metrics {
        lines.push(format!(
            "Positive Sentiment: {} ({:.1}%)",
            summary.positive, summary.positive_pct
        ));
        lines.push(format!("Average Value: {}", format_currency(summary.average_value)));
        if !summary.by_platform.is_empty() {
            lines.push("Leads by Platform:".to_string());
            for (platform, count) in &summary.by_platform {
                lines.push(format!("  {}: {}", platform, count));
            }
        }
        if !summary.by_status.is_empty() {
            lines.push("Leads by Status:".to_string());
            for (status, count) in &summary.by_status {
                lines.push(format!("  {}: {}", status, count));
            }
        }
    }

    lines
}

pub fn build_report(config: &ReportConfig, summary: &Summary, period: &Period) -> Vec<u8> {
    render_pdf(&report_lines(config, summary, period))
}

/// Lay out `lines` top to bottom, starting a new page every `LINES_PER_PAGE` lines
pub fn render_pdf(lines: &[String]) -> Vec<u8> {
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![lines]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    // 1 catalog, 2 page tree, 3 font, then a page and its content stream per page
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + i * 2).collect();
    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            page_ids
                .iter()
                .map(|id| format!("{} 0 R", id))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
    ];

    for (idx, page_lines) in pages.iter().enumerate() {
        let content_id = page_ids[idx] + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id
            )
            .into_bytes(),
        );

        let stream = content_stream(page_lines, idx == 0);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"\nendstream");
        objects.push(body);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", idx + 1).as_bytes());
        out.extend_from_slice(object);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn content_stream(lines: &[String], with_title: bool) -> Vec<u8> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut stream = format!("BT\n{} TL\n{} {} Td\n", LEADING, MARGIN, top).into_bytes();

    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            stream.extend_from_slice(b"T*\n");
        }
        let size = if with_title && idx == 0 { TITLE_SIZE } else { BODY_SIZE };
        stream.extend_from_slice(format!("/F1 {} Tf\n(", size).as_bytes());
        stream.extend_from_slice(&encode_text(line));
        stream.extend_from_slice(b") Tj\n");
        if with_title && idx == 0 {
            stream.extend_from_slice(b"T*\n");
        }
    }

    stream.extend_from_slice(b"ET");
    stream
}

/// WinAnsi bytes with PDF string escapes; characters WinAnsi lacks become `?`
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                bytes.push(b'\\');
                bytes.push(ch as u8);
            }
            '\n' | '\r' | '\t' => bytes.push(b' '),
            c if (c as u32) < 0x20 || ('\u{7f}'..='\u{9f}').contains(&c) => {}
            c if (c as u32) <= 0xFF => bytes.push(c as u32 as u8),
            c => bytes.push(win_ansi_byte(c).unwrap_or(b'?')),
        }
    }
    bytes
}

/// Code points WinAnsiEncoding places in 0x80..=0x9F
fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
