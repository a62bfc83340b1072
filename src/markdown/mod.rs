//! # Markdown Blocks
//!
//! The report dialect is line oriented: `##`/`###` headings, `* `/`- `
//! bullets, pipe tables and plain paragraphs with an optional leading
//! `**bold**` hook. Anything else is a paragraph. Lines are classified one at
//! a time and grouped into [`Block`]s; contiguous table rows become a single
//! table.
//!
//! The block list is built once per document and replayed to every pass.

use once_cell::sync::Lazy;
use regex::Regex;

static ENUMERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.?\d*\.?\s*").expect("valid regex"));
static BOLD_HOOK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*(.*?)\*\*").expect("valid regex"));

/// Separates an entry title from its page number in a table of contents.
pub const TOC_SEPARATOR: &str = "|||";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H2,
    H3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: HeadingLevel,
    /// Text as drawn: markup removed, numbering kept.
    pub text: String,
    /// Numbering removed; used to match sections.
    pub title: String,
    /// An appendix H2, which begins on a fresh page.
    pub starts_appendix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub in_appendix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Body,
    /// Directly under a table with no blank line between.
    Note,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Number of leading words set in bold.
    pub bold_words: usize,
    pub kind: ParagraphKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub page: String,
    pub nested: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Bullet(String),
    Table(Table),
    TocEntry(TocEntry),
}

/// What a single source line is, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Header { level: HeadingLevel, raw: &'a str },
    TableRow(&'a str),
    Bullet { raw: &'a str, indent: usize },
    Paragraph(&'a str),
    Blank,
}

pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('|') {
        return Line::TableRow(trimmed);
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return Line::Header {
            level: HeadingLevel::H2,
            raw: rest,
        };
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return Line::Header {
            level: HeadingLevel::H3,
            raw: rest,
        };
    }
    if let Some(rest) = trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix("- "))
    {
        let indent = line.len() - line.trim_start().len();
        return Line::Bullet { raw: rest, indent };
    }
    Line::Paragraph(trimmed)
}

/// Heading text as drawn: trimmed, `**` removed.
pub fn heading_text(raw: &str) -> String {
    raw.trim().replace("**", "")
}

/// Remove a leading enumeration such as `2.`, `3.1` or `4.1.` from a title.
pub fn clean_heading(text: &str) -> String {
    ENUMERATION.replace(text.trim(), "").trim().to_string()
}

/// Split a pipe-table row into trimmed cells without the outer pipes.
pub fn split_row(line: &str) -> Vec<String> {
    let t = line.trim();
    let t = t.strip_prefix('|').unwrap_or(t);
    let t = t.strip_suffix('|').unwrap_or(t);
    if t.trim().is_empty() {
        return Vec::new();
    }
    t.split('|')
        .map(|cell| cell.trim().replace("**", ""))
        .collect()
}

/// Drop a `## Table of Contents` section (heading and everything up to the
/// next heading) so a freshly numbered one can take its place.
pub fn strip_table_of_contents(markdown: &str) -> String {
    let mut kept = Vec::new();
    let mut skipping = false;
    for line in markdown.lines() {
        if let Line::Header { raw, .. } = classify(line) {
            if clean_heading(&heading_text(raw)).eq_ignore_ascii_case("table of contents") {
                skipping = true;
                continue;
            }
            skipping = false;
        }
        if !skipping {
            kept.push(line);
        }
    }
    kept.join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Body,
    /// Bullets of the form `Title ||| page` become [`TocEntry`] blocks.
    TableOfContents,
}

/// Streaming line-to-block assembler.
pub struct BlockParser {
    mode: ParseMode,
    blocks: Vec<Block>,
    table_rows: Vec<String>,
    in_appendix: bool,
}

impl BlockParser {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            blocks: Vec::new(),
            table_rows: Vec::new(),
            in_appendix: false,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        let line_kind = classify(line);
        if let Line::TableRow(row) = line_kind {
            self.table_rows.push(row.to_string());
            return;
        }

        let follows_table = self.flush_table();
        match line_kind {
            Line::Blank | Line::TableRow(_) => {}
            Line::Header { level, raw } => self.push_heading(level, raw),
            Line::Bullet { raw, indent } => self.push_bullet(raw, indent),
            Line::Paragraph(text) => self.push_paragraph(text, follows_table),
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        self.flush_table();
        self.blocks
    }

    fn push_heading(&mut self, level: HeadingLevel, raw: &str) {
        let text = heading_text(raw);
        let title = clean_heading(&text);
        let is_appendix = title.to_lowercase().contains("appendix");
        let starts_appendix = level == HeadingLevel::H2 && is_appendix;
        match level {
            HeadingLevel::H2 => self.in_appendix = is_appendix,
            HeadingLevel::H3 if is_appendix => self.in_appendix = true,
            HeadingLevel::H3 => {}
        }
        self.blocks.push(Block::Heading(Heading {
            level,
            text,
            title,
            starts_appendix,
        }));
    }

    fn push_bullet(&mut self, raw: &str, indent: usize) {
        let text = raw.trim().replace("**", "");
        if self.mode == ParseMode::TableOfContents {
            if let Some((title, page)) = text.split_once(TOC_SEPARATOR) {
                self.blocks.push(Block::TocEntry(TocEntry {
                    title: title.trim().to_string(),
                    page: page.trim().to_string(),
                    nested: indent > 1,
                }));
            }
            return;
        }
        self.blocks.push(Block::Bullet(text));
    }

    fn push_paragraph(&mut self, text: &str, follows_table: bool) {
        if follows_table {
            let text: String = text
                .chars()
                .filter(|c| !matches!(c, '*' | '#' | '_' | '`'))
                .collect();
            self.blocks.push(Block::Paragraph(Paragraph {
                text: text.trim().to_string(),
                bold_words: 0,
                kind: ParagraphKind::Note,
            }));
            return;
        }

        let bold_words = BOLD_HOOK
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().split_whitespace().count())
            .unwrap_or(0);
        self.blocks.push(Block::Paragraph(Paragraph {
            text: text.replace("**", ""),
            bold_words,
            kind: ParagraphKind::Body,
        }));
    }

    /// Emit the buffered table, if any. Returns whether the line being
    /// processed directly follows a table.
    fn flush_table(&mut self) -> bool {
        if self.table_rows.is_empty() {
            return false;
        }

        let rows = std::mem::take(&mut self.table_rows);
        if rows.len() < 2 {
            tracing::warn!(row = %rows[0], "dropping table without a separator row");
            return false;
        }
        let headers = split_row(&rows[0]);
        if headers.is_empty() {
            tracing::warn!("dropping table without header cells");
            return false;
        }
        let body = rows[2..].iter().map(|r| split_row(r)).collect();
        self.blocks.push(Block::Table(Table {
            headers,
            rows: body,
            in_appendix: self.in_appendix,
        }));
        true
    }
}

/// Parse a report body.
pub fn parse(markdown: &str) -> Vec<Block> {
    parse_with(markdown, ParseMode::Body)
}

/// Parse a generated table-of-contents fragment.
pub fn parse_toc(markdown: &str) -> Vec<Block> {
    parse_with(markdown, ParseMode::TableOfContents)
}

fn parse_with(markdown: &str, mode: ParseMode) -> Vec<Block> {
    let mut parser = BlockParser::new(mode);
    for line in markdown.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(block: &Block) -> &Heading {
        match block {
            Block::Heading(h) => h,
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn classifies_lines() {
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("| a | b |"), Line::TableRow("| a | b |"));
        assert_eq!(
            classify("## 1. Overview"),
            Line::Header {
                level: HeadingLevel::H2,
                raw: "1. Overview"
            }
        );
        assert_eq!(
            classify("### 1.1 Detail"),
            Line::Header {
                level: HeadingLevel::H3,
                raw: "1.1 Detail"
            }
        );
        assert_eq!(
            classify("  - item"),
            Line::Bullet {
                raw: "item",
                indent: 2
            }
        );
        assert_eq!(classify("# Title"), Line::Paragraph("# Title"));
        assert_eq!(classify("#### Deep"), Line::Paragraph("#### Deep"));
    }

    #[test]
    fn heading_keeps_numbering_for_display() {
        let blocks = parse("## 2. **Valuation**");
        let h = heading(&blocks[0]);
        assert_eq!(h.text, "2. Valuation");
        assert_eq!(h.title, "Valuation");
        assert_eq!(h.level, HeadingLevel::H2);
    }

    #[test]
    fn clean_heading_strips_enumerations() {
        assert_eq!(clean_heading("3.1 Revenue Mix"), "Revenue Mix");
        assert_eq!(clean_heading("4.1. Margins"), "Margins");
        assert_eq!(clean_heading("10 Risks"), "Risks");
        assert_eq!(clean_heading("Overview"), "Overview");
    }

    #[test]
    fn groups_table_rows() {
        let md = "| Metric | FY24 |\n|---|---|\n| Revenue | 10 |\n| Net income | -2 |";
        let blocks = parse(md);
        assert_eq!(
            blocks,
            vec![Block::Table(Table {
                headers: vec!["Metric".into(), "FY24".into()],
                rows: vec![
                    vec!["Revenue".into(), "10".into()],
                    vec!["Net income".into(), "-2".into()],
                ],
                in_appendix: false,
            })]
        );
    }

    #[test]
    fn row_without_trailing_pipe_keeps_last_cell() {
        assert_eq!(split_row("| a | b"), vec!["a", "b"]);
        assert_eq!(split_row("|**x**|y|"), vec!["x", "y"]);
        assert!(split_row("||").is_empty());
    }

    #[test]
    fn short_or_headerless_tables_are_dropped() {
        assert!(parse("| only |").is_empty());
        assert!(parse("||\n|---|\n| a |").is_empty());
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let blocks = parse("| A | B |\n|---|---|");
        assert!(matches!(&blocks[0], Block::Table(t) if t.rows.is_empty()));
    }

    #[test]
    fn paragraph_after_table_is_a_note() {
        let md = "| A |\n|---|\n| 1 |\n*Source: company **filings***\n\nBody text.";
        let blocks = parse(md);
        assert_eq!(
            blocks[1],
            Block::Paragraph(Paragraph {
                text: "Source: company filings".into(),
                bold_words: 0,
                kind: ParagraphKind::Note,
            })
        );
        assert!(matches!(&blocks[2], Block::Paragraph(p) if p.kind == ParagraphKind::Body));
    }

    #[test]
    fn bold_hook_counts_words() {
        let blocks = parse("**Key takeaway:** margins expanded.");
        assert_eq!(
            blocks[0],
            Block::Paragraph(Paragraph {
                text: "Key takeaway: margins expanded.".into(),
                bold_words: 2,
                kind: ParagraphKind::Body,
            })
        );
    }

    #[test]
    fn appendix_marks_tables_and_breaks_page() {
        let md = "## Overview\n| A |\n|---|\n| 1 |\n## Appendix A\n| B |\n|---|\n| 2 |\n## Disclaimer\n| C |\n|---|\n| 3 |";
        let blocks = parse(md);
        let flags: Vec<bool> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t.in_appendix),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(heading(&blocks[2]).starts_appendix);
        assert!(!heading(&blocks[0]).starts_appendix);
    }

    #[test]
    fn strips_existing_table_of_contents() {
        let md = "## Table of Contents\n* 1.0 Overview ||| 3\n* 2.0 Risks ||| 4\n## 1. Overview\nText";
        assert_eq!(strip_table_of_contents(md), "## 1. Overview\nText");
        assert_eq!(strip_table_of_contents("## A\nx"), "## A\nx");
    }

    #[test]
    fn toc_mode_reads_entries() {
        let md = "## Table of Contents\n\n* 1.0 Overview ||| 3\n  * 1.1 Detail ||| 4\n* stray bullet";
        let blocks = parse_toc(md);
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[2],
            Block::TocEntry(TocEntry {
                title: "1.1 Detail".into(),
                page: "4".into(),
                nested: true,
            })
        );
    }
}
