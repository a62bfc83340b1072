//! Block measurement.
//!
//! [`measure_block`] wraps and sizes a block once. The result carries the
//! wrapped text, so whoever draws the block draws exactly what was measured.

use crate::font::{FontContext, StandardFont};
use crate::markdown::{Block, HeadingLevel, ParagraphKind};
use crate::model::PageConfig;
use crate::style::{DocumentStyle, HeadingStyle};
use crate::text::{fit_font_size, wrap_runs, WrappedLine};

pub use super::table::{MeasuredRow, MeasuredTable};

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredHeading {
    pub level: HeadingLevel,
    pub text: String,
    pub title: String,
    /// Font size after shrinking to the content width.
    pub size: f64,
    pub style: HeadingStyle,
    pub break_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinesKind {
    Paragraph,
    Note,
    Bullet,
    TocEntry {
        page_label: String,
        page_label_width: f64,
    },
}

/// A block of wrapped lines with uniform leading.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLines {
    pub kind: LinesKind,
    pub lines: Vec<WrappedLine>,
    pub size: f64,
    pub line_height: f64,
    pub gap_after: f64,
    /// Left edge of the text, relative to the content box.
    pub indent: f64,
}

impl MeasuredLines {
    /// Per-line heights with the trailing gap folded into the last line.
    pub fn line_heights(&self) -> Vec<f64> {
        let mut heights = vec![self.line_height; self.lines.len()];
        if let Some(last) = heights.last_mut() {
            *last += self.gap_after;
        }
        heights
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeasuredBlock {
    Heading(MeasuredHeading),
    Lines(MeasuredLines),
    Table(MeasuredTable),
}

impl MeasuredBlock {
    /// Vertical space the block takes when it is not split.
    pub fn height(&self) -> f64 {
        match self {
            MeasuredBlock::Heading(h) => h.style.height(),
            MeasuredBlock::Lines(l) => l.line_heights().iter().sum(),
            MeasuredBlock::Table(t) => t.height(),
        }
    }
}

pub fn measure_block(block: &Block, style: &DocumentStyle, page: &PageConfig) -> MeasuredBlock {
    let width = page.content_width();
    match block {
        Block::Heading(h) => {
            let heading_style = match h.level {
                HeadingLevel::H2 => style.h2,
                HeadingLevel::H3 => style.h3,
            };
            let size = fit_font_size(
                &h.text,
                StandardFont::HelveticaBold,
                heading_style.size,
                heading_style.min_size,
                width,
            );
            MeasuredBlock::Heading(MeasuredHeading {
                level: h.level,
                text: h.text.clone(),
                title: h.title.clone(),
                size,
                style: heading_style,
                break_before: h.starts_appendix,
            })
        }

        Block::Paragraph(p) => {
            let (text_style, kind, bold_words) = match p.kind {
                ParagraphKind::Body => (style.paragraph, LinesKind::Paragraph, p.bold_words),
                ParagraphKind::Note => (style.note, LinesKind::Note, 0),
            };
            let words: Vec<(&str, StandardFont)> = p
                .text
                .split_whitespace()
                .enumerate()
                .map(|(i, w)| {
                    let font = if i < bold_words {
                        StandardFont::HelveticaBold
                    } else {
                        StandardFont::Helvetica
                    };
                    (w, font)
                })
                .collect();
            MeasuredBlock::Lines(MeasuredLines {
                kind,
                lines: wrap_runs(&words, text_style.size, width),
                size: text_style.size,
                line_height: text_style.line_height,
                gap_after: text_style.gap_after,
                indent: 0.0,
            })
        }

        Block::Bullet(text) => {
            let words: Vec<(&str, StandardFont)> = text
                .split_whitespace()
                .map(|w| (w, StandardFont::Helvetica))
                .collect();
            MeasuredBlock::Lines(MeasuredLines {
                kind: LinesKind::Bullet,
                lines: wrap_runs(&words, style.bullet.size, width - style.bullet_indent),
                size: style.bullet.size,
                line_height: style.bullet.line_height,
                gap_after: style.bullet.gap_after,
                indent: style.bullet_indent,
            })
        }

        Block::TocEntry(entry) => {
            let indent = if entry.nested {
                style.toc_nested_indent
            } else {
                0.0
            };
            let page_label_width =
                FontContext::shared().measure(&entry.page, StandardFont::Helvetica, style.toc.size);
            let available = width - indent - page_label_width - style.toc_number_gap;
            let words: Vec<(&str, StandardFont)> = entry
                .title
                .split_whitespace()
                .map(|w| (w, StandardFont::Helvetica))
                .collect();
            MeasuredBlock::Lines(MeasuredLines {
                kind: LinesKind::TocEntry {
                    page_label: entry.page.clone(),
                    page_label_width,
                },
                lines: wrap_runs(&words, style.toc.size, available),
                size: style.toc.size,
                line_height: style.toc.line_height,
                gap_after: style.toc.gap_after,
                indent,
            })
        }

        Block::Table(table) => MeasuredBlock::Table(super::table::measure_table(table, style, width)),
    }
}

/// Measure a whole block list.
pub fn measure_all(blocks: &[Block], style: &DocumentStyle, page: &PageConfig) -> Vec<MeasuredBlock> {
    blocks.iter().map(|b| measure_block(b, style, page)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    fn measure(md: &str) -> MeasuredBlock {
        let blocks = parse(md);
        measure_block(&blocks[0], &DocumentStyle::default(), &PageConfig::default())
    }

    #[test]
    fn heading_heights_are_fixed() {
        assert_eq!(measure("## Overview").height(), 50.0);
        assert!((measure("### Detail").height() - 39.6).abs() < 1e-9);
    }

    #[test]
    fn paragraph_height_is_lines_plus_gap() {
        let words = "margin ".repeat(120);
        let block = measure(&words);
        let MeasuredBlock::Lines(lines) = &block else {
            panic!("expected lines");
        };
        assert!(lines.lines.len() > 1);
        assert_eq!(block.height(), lines.lines.len() as f64 * 15.0 + 5.0);
    }

    #[test]
    fn bold_hook_words_are_bold() {
        let MeasuredBlock::Lines(lines) = measure("**Bottom line:** buy the dip") else {
            panic!("expected lines");
        };
        let fonts: Vec<StandardFont> = lines.lines[0].spans.iter().map(|s| s.font).collect();
        assert_eq!(
            fonts,
            vec![
                StandardFont::HelveticaBold,
                StandardFont::HelveticaBold,
                StandardFont::Helvetica,
                StandardFont::Helvetica,
                StandardFont::Helvetica,
            ]
        );
    }

    #[test]
    fn bullets_are_indented() {
        let MeasuredBlock::Lines(lines) = measure("* point") else {
            panic!("expected lines");
        };
        assert_eq!(lines.indent, 20.0);
        assert_eq!(lines.kind, LinesKind::Bullet);
    }

    #[test]
    fn long_headings_shrink() {
        let MeasuredBlock::Heading(h) = measure(&format!("## {}", "Very Long Heading ".repeat(6))) else {
            panic!("expected heading");
        };
        assert!(h.size < 18.0);
        assert_eq!(h.style.height(), 50.0);
    }
}
