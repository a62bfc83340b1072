//! # Table of Contents
//!
//! The contents are synthesized from the simulated header pages, written out
//! as a small markdown fragment and then parsed, measured and drawn like any
//! other content. Entries carry a dotted leader, a right-aligned page number
//! and a link over their text.
//!
//! The page numbers printed in the contents depend on how many pages the
//! contents themselves take, so [`plan_toc`] iterates until that count is
//! stable.

use super::{text_right, RenderContext};
use crate::error::ReportError;
use crate::layout::flow::{Piece, Placement};
use crate::layout::measure::{measure_all, MeasuredBlock, MeasuredLines};
use crate::layout::simulate::{simulate, HeaderPageMap};
use crate::layout::{Canvas, Stroke};
use crate::markdown::{parse_toc, HeadingLevel, TOC_SEPARATOR};
use crate::pdf::OutlineItem;

/// Upper bound on re-planning when the contents change length.
const MAX_PLAN_ROUNDS: usize = 8;

/// One numbered line of the contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TocItem {
    pub level: HeadingLevel,
    /// `"2.0"` for a section, `"2.1"` for its first subsection.
    pub number: String,
    pub title: String,
    /// 1-based document page, cover included.
    pub page: usize,
}

impl TocItem {
    pub fn label(&self) -> String {
        format!("{} {}", self.number, self.title)
    }
}

/// Number the body headings and resolve their document pages.
pub fn build_toc_entries(blocks: &[MeasuredBlock], header_pages: &HeaderPageMap, preamble: usize) -> Vec<TocItem> {
    let mut section = 0;
    let mut subsection = 0;
    let mut items = Vec::new();
    for block in blocks {
        let MeasuredBlock::Heading(h) = block else {
            continue;
        };
        let Some(&page) = header_pages.get(&h.text) else {
            continue;
        };
        let number = match h.level {
            HeadingLevel::H2 => {
                section += 1;
                subsection = 0;
                format!("{section}.0")
            }
            HeadingLevel::H3 => {
                subsection += 1;
                format!("{section}.{subsection}")
            }
        };
        items.push(TocItem {
            level: h.level,
            number,
            title: h.title.clone(),
            page: page + preamble,
        });
    }
    items
}

/// The contents as markdown: nested entries are indented two spaces.
pub fn toc_markdown(items: &[TocItem]) -> String {
    let mut md = String::from("## Table of Contents\n\n");
    for item in items {
        let indent = match item.level {
            HeadingLevel::H2 => "",
            HeadingLevel::H3 => "  ",
        };
        md.push_str(&format!("{indent}* {} {TOC_SEPARATOR} {}\n", item.label(), item.page));
    }
    md
}

/// Sections become top-level bookmarks with their subsections below.
pub fn toc_outline(items: &[TocItem]) -> Vec<OutlineItem> {
    let mut outline: Vec<OutlineItem> = Vec::new();
    for item in items {
        let entry = OutlineItem {
            title: item.label(),
            page_index: item.page.saturating_sub(1),
            children: Vec::new(),
        };
        match (item.level, outline.last_mut()) {
            (HeadingLevel::H3, Some(parent)) => parent.children.push(entry),
            _ => outline.push(entry),
        }
    }
    outline
}

/// A contents layout whose page numbers account for its own length.
#[derive(Debug, Clone)]
pub struct TocPlan {
    pub items: Vec<TocItem>,
    pub blocks: Vec<MeasuredBlock>,
    /// Pages the contents take.
    pub pages: usize,
    /// Cover plus contents pages.
    pub preamble: usize,
}

pub fn plan_toc(
    body: &[MeasuredBlock],
    header_pages: &HeaderPageMap,
    ctx: &RenderContext<'_>,
) -> Result<TocPlan, ReportError> {
    let mut preamble = 2;
    for round in 0..MAX_PLAN_ROUNDS {
        let items = build_toc_entries(body, header_pages, preamble);
        let blocks = measure_all(&parse_toc(&toc_markdown(&items)), ctx.style, ctx.page);
        let pages = simulate(&blocks, ctx.page).page_count;
        tracing::debug!(round, preamble, toc_pages = pages, "planned contents");
        if 1 + pages == preamble {
            return Ok(TocPlan {
                items,
                blocks,
                pages,
                preamble,
            });
        }
        preamble = 1 + pages;
    }
    Err(ReportError::Render(format!(
        "table of contents length did not settle after {MAX_PLAN_ROUNDS} rounds"
    )))
}

/// Leader, page number and link for one drawn entry.
pub(crate) fn decorate_entry(
    canvas: &mut Canvas,
    placement: &Placement,
    lines: &MeasuredLines,
    page_label: &str,
    page_label_width: f64,
    page_base: usize,
    ctx: &RenderContext<'_>,
) {
    let placed: Vec<(usize, usize, f64)> = placement
        .pieces
        .iter()
        .filter_map(|p| match p.piece {
            Piece::Line(i) => Some((i, page_base + p.page - 1, p.y)),
            _ => None,
        })
        .collect();
    let Some(&(last, last_page, last_y)) = placed.last() else {
        return;
    };

    let x = ctx.page.content_left() + lines.indent;
    let right = ctx.page.content_right();
    let ink = ctx.ink(lines.size);

    text_right(canvas, last_page, right, last_y, page_label, ink);
    let leader_start = x + lines.lines[last].width + 5.0;
    let leader_end = right - page_label_width - 5.0;
    if leader_start < leader_end {
        canvas.line(
            last_page,
            (leader_start, last_y + 3.0),
            (leader_end, last_y + 3.0),
            Stroke::dotted(ctx.palette.main_text, 1.0, 3.0),
            0.5,
        );
    }

    let Some(target) = page_label.trim().parse::<usize>().ok().filter(|p| *p > 0) else {
        return;
    };
    for group in placed.chunk_by(|a, b| a.1 == b.1) {
        let (_, page, first_y) = group[0];
        let (_, _, group_last_y) = group[group.len() - 1];
        canvas.link(page, [x, group_last_y - 2.0, right, first_y + lines.size], target - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flow::Placed;
    use crate::layout::measure::LinesKind;
    use crate::layout::{DrawCommand, LayoutPage};
    use crate::markdown::parse;
    use crate::model::PageConfig;
    use crate::render::body::draw_blocks;
    use crate::style::DocumentStyle;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;

    fn measured(md: &str) -> Vec<MeasuredBlock> {
        measure_all(&parse(md), &DocumentStyle::default(), &PageConfig::default())
    }

    fn pages_of(blocks: &[MeasuredBlock]) -> HeaderPageMap {
        simulate(blocks, &PageConfig::default()).header_pages
    }

    #[test]
    fn numbering_resets_per_section() {
        let blocks = measured("## 1. Overview\n### Detail A\n### Detail B\n## 2. Risks\n### Macro\n");
        let items = build_toc_entries(&blocks, &pages_of(&blocks), 2);
        let labels: Vec<String> = items.iter().map(TocItem::label).collect();
        assert_eq!(
            labels,
            vec!["1.0 Overview", "1.1 Detail A", "1.2 Detail B", "2.0 Risks", "2.1 Macro"]
        );
        assert!(items.iter().all(|i| i.page == 3));
    }

    #[test]
    fn markdown_fragment_round_trips_through_the_parser() {
        let items = vec![
            TocItem {
                level: HeadingLevel::H2,
                number: "1.0".into(),
                title: "Overview".into(),
                page: 3,
            },
            TocItem {
                level: HeadingLevel::H3,
                number: "1.1".into(),
                title: "Detail".into(),
                page: 4,
            },
        ];
        let md = toc_markdown(&items);
        assert_eq!(
            md,
            "## Table of Contents\n\n* 1.0 Overview ||| 3\n  * 1.1 Detail ||| 4\n"
        );
        let blocks = parse_toc(&md);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn outline_nests_subsections() {
        let blocks = measured("### Orphan\n## Overview\n### Detail\n## Risks\n");
        let outline = toc_outline(&build_toc_entries(&blocks, &pages_of(&blocks), 2));
        let titles: Vec<&str> = outline.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["0.1 Orphan", "1.0 Overview", "2.0 Risks"]);
        assert_eq!(outline[1].children[0].title, "1.1 Detail");
        assert_eq!(outline[1].page_index, 2);
    }

    #[test]
    fn short_contents_fit_on_one_page() {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let blocks = measured("## Overview\n## Risks\n");
        let plan = plan_toc(&blocks, &pages_of(&blocks), &ctx).unwrap();
        assert_eq!(plan.pages, 1);
        assert_eq!(plan.preamble, 2);
    }

    #[test]
    fn long_contents_push_page_numbers() {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let md: String = (0..80).map(|i| format!("## Section {i}\n")).collect();
        let blocks = measured(&md);
        let plan = plan_toc(&blocks, &pages_of(&blocks), &ctx).unwrap();
        assert!(plan.pages >= 2);
        assert_eq!(plan.preamble, plan.pages + 1);
        assert_eq!(plan.items[0].page, plan.preamble + 1);
    }

    fn draw_toc(items: &[TocItem]) -> Vec<LayoutPage> {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let blocks = measure_all(&parse_toc(&toc_markdown(items)), &style, &config);
        let mut canvas = Canvas::new(&config, None);
        canvas.add_page();
        draw_blocks(&mut canvas, &blocks, 1, &ctx, None).unwrap();
        canvas.ensure_page(4);
        canvas.into_pages()
    }

    #[test]
    fn entries_link_to_their_page() {
        let items = vec![TocItem {
            level: HeadingLevel::H2,
            number: "1.0".into(),
            title: "Overview".into(),
            page: 3,
        }];
        let pages = draw_toc(&items);
        let links = &pages[1].links;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_page, 2);
        assert_eq!(links[0].rect[0], 56.0);
        assert_eq!(links[0].rect[2], PageConfig::default().content_right());

        let texts: Vec<&str> = pages[1].texts().collect();
        assert!(texts.contains(&"1.0"));
        assert!(texts.contains(&"Overview"));
        assert!(texts.contains(&"3"));
        assert!(pages[1].commands.iter().any(|c| matches!(
            c,
            DrawCommand::Line { stroke, opacity, .. } if stroke.dash.is_some() && *opacity == 0.5
        )));
    }

    fn long_entry(page: usize) -> TocItem {
        TocItem {
            level: HeadingLevel::H2,
            number: "1.0".into(),
            title: "Revenue Drivers And Margin Outlook ".repeat(8).trim().to_string(),
            page,
        }
    }

    fn entry_lines(items: &[TocItem]) -> MeasuredLines {
        let blocks = measure_all(
            &parse_toc(&toc_markdown(items)),
            &DocumentStyle::default(),
            &PageConfig::default(),
        );
        blocks
            .into_iter()
            .find_map(|b| match b {
                MeasuredBlock::Lines(lines) => Some(lines),
                _ => None,
            })
            .expect("entry measured")
    }

    #[test]
    fn wrapped_entry_link_covers_every_line() {
        let items = vec![long_entry(3)];
        let line_count = entry_lines(&items).lines.len();
        assert!(line_count > 1);

        let pages = draw_toc(&items);
        let links = &pages[1].links;
        assert_eq!(links.len(), 1);
        let [_, bottom, _, top] = links[0].rect;
        // 12pt leading between lines, 9pt text, 2pt below the last baseline.
        let expected = (line_count - 1) as f64 * 12.0 + 9.0 + 2.0;
        assert!((top - bottom - expected).abs() < 1e-9);

        let number_y = pages[1]
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, y, .. } if text == "3" => Some(*y),
                _ => None,
            })
            .expect("page number drawn");
        assert!((number_y - (bottom + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn entry_split_across_pages_links_on_each_page() {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let lines = entry_lines(&[long_entry(7)]);
        assert!(lines.lines.len() >= 4);
        let LinesKind::TocEntry {
            page_label,
            page_label_width,
        } = &lines.kind
        else {
            panic!("expected a contents entry");
        };

        let top = config.content_top();
        let placement = Placement {
            pieces: vec![
                Placed { piece: Piece::Line(0), page: 1, y: 100.0 },
                Placed { piece: Piece::Line(1), page: 1, y: 88.0 },
                Placed { piece: Piece::Line(2), page: 2, y: top },
                Placed { piece: Piece::Line(3), page: 2, y: top - 12.0 },
            ],
        };
        let mut canvas = Canvas::new(&config, None);
        decorate_entry(&mut canvas, &placement, &lines, page_label, *page_label_width, 1, &ctx);
        let pages = canvas.into_pages();

        let right = config.content_right();
        assert_eq!(pages[1].links.len(), 1);
        assert_eq!(pages[1].links[0].rect, [56.0, 86.0, right, 109.0]);
        assert_eq!(pages[1].links[0].target_page, 6);
        assert_eq!(pages[2].links.len(), 1);
        assert_eq!(pages[2].links[0].rect, [56.0, top - 12.0 - 2.0, right, top + 9.0]);
        assert_eq!(pages[2].links[0].target_page, 6);

        assert!(!pages[1].texts().any(|t| t == "7"));
        assert!(pages[2].texts().any(|t| t == "7"));
    }

    #[test]
    fn multi_page_contents_link_from_every_page() {
        let items: Vec<TocItem> = (1..=80)
            .map(|i| TocItem {
                level: HeadingLevel::H2,
                number: format!("{i}.0"),
                title: format!("Section {i}"),
                page: 3 + i / 10,
            })
            .collect();
        let pages = draw_toc(&items);
        assert!(!pages[1].links.is_empty());
        assert!(!pages[2].links.is_empty());

        let targets: Vec<usize> = pages[1..]
            .iter()
            .flat_map(|p| &p.links)
            .map(|l| l.target_page)
            .collect();
        let expected: Vec<usize> = items.iter().map(|i| i.page - 1).collect();
        assert_eq!(targets, expected);
    }
}
