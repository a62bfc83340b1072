//! # Table Sizing
//!
//! Column widths come from the header text alone: free-text columns get
//! three shares of the width, long headers two, everything else one. Cell
//! text is then wrapped to its column and each row is as tall as its tallest
//! cell.

use crate::font::StandardFont;
use crate::markdown::Table;
use crate::style::{DocumentStyle, TableStyle};
use crate::text::wrap;

/// Header words that announce a column of prose.
const WIDE_KEYWORDS: &[&str] = &[
    "analysis",
    "description",
    "impact",
    "context",
    "driver",
    "risk",
    "catalyst",
    "thesis",
    "overview",
    "commentary",
    "details",
    "reason",
    "strategy",
    "business model",
    "product",
    "competitor",
    "peer",
    "implication",
    "outlook",
];

/// Header words that switch the whole table to the larger text style.
const TEXT_HEAVY_KEYWORDS: &[&str] = &[
    "event",
    "impact",
    "description",
    "risk",
    "catalyst",
    "thesis",
    "overview",
    "driver",
    "context",
];

/// First-cell words that mark a headline financial line.
const BOLD_ROW_KEYWORDS: &[&str] = &[
    "revenue",
    "net sales",
    "sales revenue",
    "total revenue",
    "profit",
    "net income",
    "net earnings",
    "gross profit",
    "operating income",
    "total assets",
    "total liabilities",
    "equity",
    "shareholders' equity",
    "total equity",
    "cfo",
    "cfi",
    "cff",
    "net cash",
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn column_weight(header: &str) -> f64 {
    if contains_any(header, WIDE_KEYWORDS) {
        3.0
    } else if header.chars().count() > 20 {
        2.0
    } else {
        1.0
    }
}

/// Split `total_width` across the columns. The widths always sum to
/// `total_width` exactly; the last column absorbs rounding.
pub fn column_widths(headers: &[String], total_width: f64) -> Vec<f64> {
    if headers.is_empty() {
        return Vec::new();
    }
    let weights: Vec<f64> = headers.iter().map(|h| column_weight(h)).collect();
    let sum: f64 = weights.iter().sum();
    let mut widths: Vec<f64> = weights.iter().map(|w| total_width * w / sum).collect();
    let others: f64 = widths[..widths.len() - 1].iter().sum();
    if let Some(last) = widths.last_mut() {
        *last = total_width - others;
    }
    widths
}

pub fn is_text_heavy(headers: &[String]) -> bool {
    headers.iter().any(|h| contains_any(h, TEXT_HEAVY_KEYWORDS))
}

pub fn is_bold_row(first_cell: &str) -> bool {
    contains_any(first_cell, BOLD_ROW_KEYWORDS)
}

/// Accounting notation: a negative figure is shown in parentheses.
/// Cells that aren't figures are left alone.
pub fn format_number_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        return trimmed.to_string();
    }
    match trimmed.strip_prefix('-') {
        Some(rest) if looks_numeric(rest.trim_start()) => format!("({})", rest.trim_start()),
        _ => trimmed.to_string(),
    }
}

fn looks_numeric(s: &str) -> bool {
    let starts_like_figure = s
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || matches!(c, '$' | '.' | '€' | '£' | '¥'))
        .unwrap_or(false);
    starts_like_figure && s.chars().any(|c| c.is_ascii_digit())
}

/// One table row, wrapped and sized.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    /// Wrapped lines per cell, one entry per column.
    pub cells: Vec<Vec<String>>,
    pub font: StandardFont,
    pub height: f64,
}

impl MeasuredRow {
    /// Lines in the tallest cell.
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredTable {
    pub col_widths: Vec<f64>,
    pub style: TableStyle,
    pub header: MeasuredRow,
    pub rows: Vec<MeasuredRow>,
    pub gap_after: f64,
    pub border: f64,
}

impl MeasuredTable {
    /// Height when the whole table sits on one page.
    pub fn height(&self) -> f64 {
        self.header.height + self.rows.iter().map(|r| r.height).sum::<f64>() + self.gap_after
    }

    /// Height of a row band holding `lines` lines of cell text.
    pub fn band_height(&self, lines: usize) -> f64 {
        lines as f64 * self.style.line_height + 2.0 * self.style.padding
    }
}

fn measure_row(cells: &[String], widths: &[f64], style: &TableStyle, font: StandardFont) -> MeasuredRow {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            wrap(text, font, style.size, width - 2.0 * style.padding)
        })
        .collect();
    let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
    MeasuredRow {
        cells: wrapped,
        font,
        height: max_lines as f64 * style.line_height + 2.0 * style.padding,
    }
}

/// Size a table to `width`. Rows with more cells than headers lose the
/// extras; rows with fewer get empty cells.
pub fn measure_table(table: &Table, style: &DocumentStyle, width: f64) -> MeasuredTable {
    let col_widths = column_widths(&table.headers, width);
    let table_style = if is_text_heavy(&table.headers) && !table.in_appendix {
        style.table_text_heavy
    } else {
        style.table_compact
    };

    let header = measure_row(
        &table.headers,
        &col_widths,
        &table_style,
        StandardFont::HelveticaBold,
    );
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let font = match row.first() {
                Some(first) if is_bold_row(first) => StandardFont::HelveticaBold,
                _ => StandardFont::Helvetica,
            };
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| if i > 0 { format_number_cell(cell) } else { cell.clone() })
                .collect();
            measure_row(&cells, &col_widths, &table_style, font)
        })
        .collect();

    MeasuredTable {
        col_widths,
        style: table_style,
        header,
        rows,
        gap_after: style.table_gap_after,
        border: style.table_border,
    }
}
