//! The page cursor.
//!
//! [`Flow::place`] is the only place where content is assigned to pages.
//! It returns where each piece of a block goes; it never draws.

use super::measure::{MeasuredBlock, MeasuredRow, MeasuredTable};
use super::page_break::{decide_break, fitting_lines, needs_break, BreakDecision, BreakRules};
use crate::model::PageConfig;

/// A drawable part of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    Heading,
    Line(usize),
    /// A table's header row; `repeated` on continuation pages.
    HeaderRow { repeated: bool },
    Row(usize),
    /// Lines `first..first + count` of a row too tall for one page.
    RowBand { row: usize, first: usize, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub piece: Piece,
    /// 1-based page within the flow.
    pub page: usize,
    /// Cursor position when the piece was placed: the top of a heading or
    /// table row, the baseline of a line of text.
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub pieces: Vec<Placed>,
}

impl Placement {
    pub fn first_page(&self) -> Option<usize> {
        self.pieces.first().map(|p| p.page)
    }
}

#[derive(Debug, Clone)]
pub struct Flow {
    page: usize,
    y: f64,
    top: f64,
    bottom: f64,
    rules: BreakRules,
}

impl Flow {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            page: 1,
            y: config.content_top(),
            top: config.content_top(),
            bottom: config.content_bottom(),
            rules: BreakRules::default(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn at_page_top(&self) -> bool {
        self.y >= self.top
    }

    fn break_page(&mut self) {
        tracing::trace!(page = self.page, y = self.y, "page break");
        self.page += 1;
        self.y = self.top;
    }

    /// Break unless already at the top of a page, where breaking again
    /// could not help.
    fn break_if_needed(&mut self, required: f64) {
        if needs_break(self.y, required, self.bottom) && !self.at_page_top() {
            self.break_page();
        }
    }

    fn put(&mut self, pieces: &mut Vec<Placed>, piece: Piece, height: f64) {
        pieces.push(Placed {
            piece,
            page: self.page,
            y: self.y,
        });
        self.y -= height;
    }

    pub fn place(&mut self, block: &MeasuredBlock) -> Placement {
        let mut pieces = Vec::new();
        match block {
            MeasuredBlock::Heading(h) => {
                if h.break_before && !self.at_page_top() {
                    self.break_page();
                }
                let height = h.style.height();
                self.break_if_needed(height);
                self.put(&mut pieces, Piece::Heading, height);
            }

            MeasuredBlock::Lines(lines) => {
                let heights = lines.line_heights();
                let splittable = heights.iter().sum::<f64>() > self.top - self.bottom;
                let mut next = 0;
                while next < heights.len() {
                    let rest = &heights[next..];
                    let take = match decide_break(self.y - self.bottom, rest, splittable, self.rules) {
                        BreakDecision::Place => rest.len(),
                        BreakDecision::Split {
                            lines_on_current_page,
                        } => lines_on_current_page,
                        BreakDecision::MoveToNextPage if !self.at_page_top() => {
                            self.break_page();
                            continue;
                        }
                        // A fresh page too short for the orphan rule.
                        BreakDecision::MoveToNextPage => fitting_lines(self.y - self.bottom, rest).max(1),
                    };
                    for i in next..next + take {
                        self.put(&mut pieces, Piece::Line(i), heights[i]);
                    }
                    next += take;
                    if next < heights.len() {
                        self.break_page();
                    }
                }
            }

            MeasuredBlock::Table(table) => {
                let header = table.header.height;
                let room = self.top - self.bottom - header;
                let first = match table.rows.first() {
                    Some(row) if row.height > room => table.band_height(1),
                    Some(row) => row.height,
                    None => 0.0,
                };
                self.break_if_needed(header + first);
                self.put(&mut pieces, Piece::HeaderRow { repeated: false }, header);
                for (i, row) in table.rows.iter().enumerate() {
                    if row.height > room {
                        self.place_tall_row(&mut pieces, table, i, row);
                        continue;
                    }
                    if i > 0 && needs_break(self.y, row.height, self.bottom) {
                        self.continue_table(&mut pieces, header);
                    }
                    self.put(&mut pieces, Piece::Row(i), row.height);
                }
                self.y -= table.gap_after;
            }
        }
        Placement { pieces }
    }

    fn continue_table(&mut self, pieces: &mut Vec<Placed>, header: f64) {
        self.break_page();
        self.put(pieces, Piece::HeaderRow { repeated: true }, header);
    }

    /// Split a row that cannot fit on any page into bands of whole lines,
    /// repeating the header above each continuation band.
    fn place_tall_row(&mut self, pieces: &mut Vec<Placed>, table: &MeasuredTable, index: usize, row: &MeasuredRow) {
        let header = table.header.height;
        let padding = table.band_height(0);
        let heights = vec![table.style.line_height; row.line_count()];
        let mut next = 0;
        while next < heights.len() {
            let fresh = self.y >= self.top - header;
            let mut count = fitting_lines(self.y - self.bottom - padding, &heights[next..]);
            if count == 0 && !fresh {
                self.continue_table(pieces, header);
                continue;
            }
            // A page too short for even one line.
            count = count.max(1);
            self.put(
                pieces,
                Piece::RowBand {
                    row: index,
                    first: next,
                    count,
                },
                table.band_height(count),
            );
            next += count;
            if next < heights.len() {
                self.continue_table(pieces, header);
            }
        }
    }

    /// Place every block in order.
    pub fn place_all(&mut self, blocks: &[MeasuredBlock]) -> Vec<Placement> {
        blocks.iter().map(|b| self.place(b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::measure_all;
    use crate::markdown::parse;
    use crate::style::DocumentStyle;

    fn place_markdown(md: &str) -> (Flow, Vec<Placement>) {
        let config = PageConfig::default();
        let measured = measure_all(&parse(md), &DocumentStyle::default(), &config);
        let mut flow = Flow::new(&config);
        let placements = flow.place_all(&measured);
        (flow, placements)
    }

    #[test]
    fn short_document_stays_on_one_page() {
        let (flow, placements) = place_markdown("## A\nText\n* bullet");
        assert_eq!(flow.page(), 1);
        assert_eq!(placements[0].pieces[0].y, PageConfig::default().content_top());
        // Heading 50, paragraph 15 + 5, bullet 15 + 5.
        assert!((flow.y() - (PageConfig::default().content_top() - 90.0)).abs() < 1e-9);
    }

    #[test]
    fn headings_move_whole() {
        // 13 headings of 50pt fill 650 of the 697.89pt content height.
        let md = "## H\n".repeat(14);
        let (flow, placements) = place_markdown(&md);
        assert_eq!(flow.page(), 2);
        assert_eq!(placements[13].first_page(), Some(2));
        assert_eq!(placements[13].pieces[0].y, PageConfig::default().content_top());
    }

    #[test]
    fn appendix_starts_a_page() {
        let (_, placements) = place_markdown("## Intro\n## Appendix\n");
        assert_eq!(placements[1].first_page(), Some(2));
        let (_, at_top) = place_markdown("## Appendix\n");
        assert_eq!(at_top[0].first_page(), Some(1));
    }

    #[test]
    fn long_tables_repeat_their_header() {
        let mut md = String::from("| Metric | Value |\n|---|---|\n");
        for i in 0..80 {
            md.push_str(&format!("| Row {i} | {i} |\n"));
        }
        let (flow, placements) = place_markdown(&md);
        assert_eq!(flow.page(), 2);
        let pieces = &placements[0].pieces;
        let repeat = pieces
            .iter()
            .position(|p| p.piece == Piece::HeaderRow { repeated: true })
            .expect("header repeated");
        assert_eq!(pieces[repeat].page, 2);
        assert!(matches!(pieces[repeat + 1].piece, Piece::Row(_)));
        assert_eq!(pieces[repeat + 1].page, 2);
    }

    #[test]
    fn header_only_table_places_its_header() {
        let (flow, placements) = place_markdown("| A | B |\n|---|---|");
        let pieces: Vec<Piece> = placements[0].pieces.iter().map(|p| p.piece).collect();
        assert_eq!(pieces, vec![Piece::HeaderRow { repeated: false }]);
        // 13pt compact header row plus the 15pt gap.
        assert_eq!(flow.y(), PageConfig::default().content_top() - 28.0);
    }

    #[test]
    fn single_row_without_separator_places_nothing() {
        let (flow, placements) = place_markdown("| A | B |");
        assert!(placements.is_empty());
        assert_eq!(flow.y(), PageConfig::default().content_top());
    }

    #[test]
    fn tall_row_splits_into_bands() {
        let md = format!("| Metric | Description |\n|---|---|\n| Revenue | {} |", "word ".repeat(3000));
        let (flow, placements) = place_markdown(&md);
        assert!(flow.page() > 1);
        let bottom = PageConfig::default().content_bottom();
        let mut next_line = 0;
        let mut last_page = 0;
        for placed in &placements[0].pieces {
            match placed.piece {
                Piece::HeaderRow { repeated } => {
                    assert_eq!(repeated, last_page != 0);
                    assert!(placed.page > last_page);
                    last_page = placed.page;
                }
                Piece::RowBand { row, first, count } => {
                    assert_eq!((row, first), (0, next_line));
                    assert_eq!(placed.page, last_page);
                    // 11pt lines plus 3pt padding top and bottom.
                    assert!(placed.y - (count as f64 * 11.0 + 6.0) >= bottom - 1e-9);
                    next_line += count;
                }
                other => panic!("unexpected piece {other:?}"),
            }
        }
        assert_eq!(last_page, flow.page());
        assert!(next_line > 100);
    }

    #[test]
    fn tall_paragraph_splits_across_pages() {
        let md = "word ".repeat(3000);
        let (flow, placements) = place_markdown(&md);
        assert!(flow.page() > 1);
        let pages: Vec<usize> = placements[0].pieces.iter().map(|p| p.page).collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
        for p in &placements[0].pieces {
            assert!(p.y - 15.0 >= PageConfig::default().content_bottom() - 5.0 - 1e-9);
        }
    }
}
