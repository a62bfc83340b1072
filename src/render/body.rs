//! The draw pass.
//!
//! Walks the measured blocks with a fresh [`Flow`] and draws each placed
//! piece. Flow page `n` lands on canvas page `page_base + n - 1`.

use std::collections::HashSet;
use std::ops::Range;

use super::{toc, RenderContext};
use crate::error::ReportError;
use crate::layout::flow::{Flow, Piece, Placed, Placement};
use crate::layout::measure::{LinesKind, MeasuredBlock, MeasuredHeading, MeasuredLines, MeasuredRow, MeasuredTable};
use crate::layout::simulate::HeaderPageMap;
use crate::layout::{Canvas, DrawCommand, Ink, Stroke};
use crate::text::WrappedLine;

/// Draw `blocks` starting at canvas page `page_base`. When `expected` is
/// given, every heading must land on the page recorded there.
///
/// Returns the number of flow pages used.
pub fn draw_blocks(
    canvas: &mut Canvas,
    blocks: &[MeasuredBlock],
    page_base: usize,
    ctx: &RenderContext<'_>,
    expected: Option<&HeaderPageMap>,
) -> Result<usize, ReportError> {
    let mut flow = Flow::new(ctx.page);
    let mut seen: HashSet<&str> = HashSet::new();
    canvas.ensure_page(page_base);

    for block in blocks {
        let placement = flow.place(block);
        match block {
            MeasuredBlock::Heading(heading) => {
                if let (Some(expected), Some(first)) = (expected, placement.first_page()) {
                    if seen.insert(heading.text.as_str()) {
                        verify_heading(expected, heading, first)?;
                    }
                }
                for placed in &placement.pieces {
                    draw_heading(canvas, page_base + placed.page - 1, placed.y, heading, ctx);
                }
            }
            MeasuredBlock::Lines(lines) => draw_lines(canvas, &placement, lines, page_base, ctx),
            MeasuredBlock::Table(table) => draw_table(canvas, &placement, table, page_base, ctx),
        }
    }

    canvas.ensure_page(page_base + flow.page() - 1);
    tracing::debug!(blocks = blocks.len(), pages = flow.page(), page_base, "drew blocks");
    Ok(flow.page())
}

fn verify_heading(expected: &HeaderPageMap, heading: &MeasuredHeading, drawn: usize) -> Result<(), ReportError> {
    match expected.get(&heading.text) {
        Some(&simulated) if simulated == drawn => Ok(()),
        Some(&simulated) => Err(ReportError::LayoutMismatch {
            what: format!("page of heading '{}'", heading.text),
            simulated,
            drawn,
        }),
        None => Err(ReportError::LayoutMismatch {
            what: format!("page of unsimulated heading '{}'", heading.text),
            simulated: 0,
            drawn,
        }),
    }
}

fn draw_heading(canvas: &mut Canvas, page: usize, top: f64, heading: &MeasuredHeading, ctx: &RenderContext<'_>) {
    let baseline = top - heading.style.space_before;
    let left = ctx.page.content_left();
    canvas.text(
        page,
        left,
        baseline,
        heading.text.as_str(),
        Ink::bold(heading.size, ctx.palette.main_text),
    );
    if heading.style.rule {
        let y = baseline - heading.style.rule_gap;
        canvas.line(
            page,
            (left, y),
            (ctx.page.content_right(), y),
            Stroke::solid(ctx.palette.h2_border, 1.0),
            1.0,
        );
    }
}

fn draw_spans(canvas: &mut Canvas, page: usize, x: f64, y: f64, line: &WrappedLine, ink: Ink) {
    for span in &line.spans {
        canvas.text(page, x + span.x, y, span.text.as_str(), ink.with_font(span.font));
    }
}

fn draw_lines(
    canvas: &mut Canvas,
    placement: &Placement,
    lines: &MeasuredLines,
    page_base: usize,
    ctx: &RenderContext<'_>,
) {
    let x = ctx.page.content_left() + lines.indent;
    let ink = match lines.kind {
        LinesKind::Note => ctx.ink(lines.size).with_opacity(ctx.style.note_opacity),
        _ => ctx.ink(lines.size),
    };

    for placed in &placement.pieces {
        let Piece::Line(i) = placed.piece else {
            continue;
        };
        let page = page_base + placed.page - 1;
        if i == 0 && lines.kind == LinesKind::Bullet {
            canvas.circle(
                page,
                (ctx.page.content_left() + 5.0, placed.y + 4.0),
                ctx.style.bullet_radius,
                Some(ctx.palette.main_text),
                None,
            );
        }
        draw_spans(canvas, page, x, placed.y, &lines.lines[i], ink);
    }

    if let LinesKind::TocEntry {
        page_label,
        page_label_width,
    } = &lines.kind
    {
        toc::decorate_entry(canvas, placement, lines, page_label, *page_label_width, page_base, ctx);
    }
}

fn draw_table(
    canvas: &mut Canvas,
    placement: &Placement,
    table: &MeasuredTable,
    page_base: usize,
    ctx: &RenderContext<'_>,
) {
    let left = ctx.page.content_left();
    let width: f64 = table.col_widths.iter().sum();
    for Placed { piece, page, y } in &placement.pieces {
        let page = page_base + page - 1;
        match *piece {
            Piece::HeaderRow { .. } => {
                let h = table.header.height;
                canvas.fill_rect(page, (left, y - h, width, h), ctx.palette.table_header_bg, 1.0);
                let lines = 0..table.header.line_count();
                draw_row_text(canvas, page, (left, *y), &table.header, lines, table, ctx);
            }
            Piece::Row(i) => {
                let row = &table.rows[i];
                draw_cell_borders(canvas, page, (left, *y), row.height, table, ctx);
                draw_row_text(canvas, page, (left, *y), row, 0..row.line_count(), table, ctx);
            }
            Piece::RowBand { row, first, count } => {
                let row = &table.rows[row];
                draw_cell_borders(canvas, page, (left, *y), table.band_height(count), table, ctx);
                draw_row_text(canvas, page, (left, *y), row, first..first + count, table, ctx);
            }
            Piece::Heading | Piece::Line(_) => {}
        }
    }
}

fn draw_cell_borders(
    canvas: &mut Canvas,
    page: usize,
    (left, top): (f64, f64),
    height: f64,
    table: &MeasuredTable,
    ctx: &RenderContext<'_>,
) {
    let border = Stroke::solid(ctx.palette.table_border, table.border);
    let mut cell_x = left;
    for col_width in &table.col_widths {
        canvas.push(
            page,
            DrawCommand::Rect {
                x: cell_x,
                y: top - height,
                width: *col_width,
                height,
                fill: None,
                stroke: Some(border),
                opacity: 1.0,
            },
        );
        cell_x += col_width;
    }
}

/// Draw cell lines `lines` of `row` in a band whose top edge is `top`.
fn draw_row_text(
    canvas: &mut Canvas,
    page: usize,
    (left, top): (f64, f64),
    row: &MeasuredRow,
    lines: Range<usize>,
    table: &MeasuredTable,
    ctx: &RenderContext<'_>,
) {
    let style = &table.style;
    let ink = ctx.ink(style.size).with_font(row.font);
    let mut cell_x = left;
    for (cell, col_width) in row.cells.iter().zip(&table.col_widths) {
        let band = cell.iter().skip(lines.start).take(lines.len());
        for (slot, line) in band.enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = top - style.padding - style.size - slot as f64 * style.line_height;
            canvas.text(page, cell_x + style.padding, baseline, line.as_str(), ink);
        }
        cell_x += col_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::measure_all;
    use crate::layout::simulate::simulate;
    use crate::markdown::parse;
    use crate::model::PageConfig;
    use crate::style::DocumentStyle;
    use crate::theme::Theme;

    fn draw(md: &str) -> (Canvas, Result<usize, ReportError>) {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let blocks = measure_all(&parse(md), &style, &config);
        let sim = simulate(&blocks, &config);
        let mut canvas = Canvas::new(&config, None);
        let result = draw_blocks(&mut canvas, &blocks, 0, &ctx, Some(&sim.header_pages));
        (canvas, result)
    }

    #[test]
    fn draws_headings_with_rule() {
        let (canvas, result) = draw("## 1. Overview\nSome text.");
        assert_eq!(result.unwrap(), 1);
        let page = &canvas.pages()[0];
        let texts: Vec<&str> = page.texts().collect();
        assert_eq!(texts, vec!["1. Overview", "Some", "text."]);
        assert!(page
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { stroke, .. } if stroke.width == 1.0)));
    }

    #[test]
    fn heading_baseline_sits_below_space_before() {
        let (canvas, _) = draw("## Overview");
        let top = PageConfig::default().content_top();
        match &canvas.pages()[0].commands[0] {
            DrawCommand::Text { y, .. } => assert_eq!(*y, top - 30.0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bullets_get_a_dot() {
        let (canvas, _) = draw("* first point");
        let page = &canvas.pages()[0];
        assert!(matches!(page.commands[0], DrawCommand::Circle { radius, .. } if radius == 2.0));
        match &page.commands[1] {
            DrawCommand::Text { x, .. } => assert_eq!(*x, 56.0 + 20.0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn notes_are_faint() {
        let (canvas, _) = draw("| A | B |\n|---|---|\n| 1 | 2 |\nSource: filings");
        let note = canvas.pages()[0]
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, ink, .. } if text == "Source:" => Some(*ink),
                _ => None,
            })
            .expect("note drawn");
        assert_eq!(note.opacity, 0.75);
        assert_eq!(note.size, 8.0);
    }

    #[test]
    fn tables_draw_header_background_and_cells() {
        let (canvas, _) = draw("| Metric | FY24 |\n|---|---|\n| Revenue | -12 |");
        let page = &canvas.pages()[0];
        let texts: Vec<&str> = page.texts().collect();
        assert_eq!(texts, vec!["Metric", "FY24", "Revenue", "(12)"]);
        let filled = page
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { fill: Some(_), .. }))
            .count();
        let bordered = page
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { stroke: Some(_), .. }))
            .count();
        assert_eq!(filled, 1);
        assert_eq!(bordered, 2);
    }

    #[test]
    fn header_only_table_draws_its_header() {
        let (canvas, _) = draw("| Metric | Value |\n|---|---|");
        let page = &canvas.pages()[0];
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["Metric", "Value"]);
        assert!(matches!(page.commands[0], DrawCommand::Rect { fill: Some(_), .. }));
    }

    #[test]
    fn tall_row_stays_inside_the_margins() {
        let md = format!("## A\n| Metric | Description |\n|---|---|\n| Revenue | {} |", "word ".repeat(3000));
        let (canvas, result) = draw(&md);
        let pages = result.unwrap();
        assert!(pages > 1);
        let bottom = PageConfig::default().content_bottom();
        let mut words = 0;
        for page in canvas.pages() {
            for command in &page.commands {
                if let DrawCommand::Text { y, text, .. } = command {
                    assert!(*y >= bottom, "{text} drawn at {y}");
                    words += text.split_whitespace().filter(|w| *w == "word").count();
                }
            }
        }
        assert_eq!(words, 3000);
        // Every continuation page starts with the header again.
        for page in &canvas.pages()[1..] {
            assert_eq!(page.texts().next(), Some("Metric"));
        }
    }

    #[test]
    fn mismatched_heading_page_is_an_error() {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let blocks = measure_all(&parse("## Overview"), &style, &config);
        let mut wrong = HeaderPageMap::new();
        wrong.insert("Overview".to_string(), 2);
        let mut canvas = Canvas::new(&config, None);
        let err = draw_blocks(&mut canvas, &blocks, 0, &ctx, Some(&wrong)).unwrap_err();
        assert!(matches!(
            err,
            ReportError::LayoutMismatch {
                simulated: 2,
                drawn: 1,
                ..
            }
        ));
    }

    #[test]
    fn page_base_offsets_every_page() {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        let blocks = measure_all(&parse(&"## H\n".repeat(14)), &style, &config);
        let mut canvas = Canvas::new(&config, None);
        let pages = draw_blocks(&mut canvas, &blocks, 2, &ctx, None).unwrap();
        assert_eq!(pages, 2);
        assert_eq!(canvas.page_count(), 4);
        assert_eq!(canvas.pages()[3].texts().count(), 1);
    }
}
