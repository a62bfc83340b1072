//! Page chrome added once every page exists: the footer line and page
//! number, and the dot rail in the right margin that jumps between
//! sections.

use super::{measure, text_right, RenderContext};
use crate::layout::{Canvas, Ink};
use crate::text::fit_font_size;

const DOT_RADIUS: f64 = 3.0;
const ACTIVE_DOT_RADIUS: f64 = 4.5;
const DOT_SPACING: f64 = 18.0;
/// Half the side of the clickable square around a dot.
const TOUCH_TARGET: f64 = 12.0;

/// Disclaimer on the left, `Page X of Y` on the right.
pub fn draw_footer(canvas: &mut Canvas, page: usize, total: usize, disclaimer: &str, ctx: &RenderContext<'_>) {
    let size = ctx.style.footer_size;
    let ink = Ink::regular(size, ctx.palette.main_text).with_opacity(0.6);
    let y = ctx.page.margin.bottom / 2.0;
    let left = ctx.page.content_left();
    let right = ctx.page.content_right();

    let label = format!("Page {} of {}", page + 1, total);
    text_right(canvas, page, right, y, &label, ink);

    if !disclaimer.trim().is_empty() {
        let room = right - left - measure(&label, ink.font, size) - 10.0;
        let fitted = fit_font_size(disclaimer.trim(), ink.font, size, 5.0, room);
        canvas.text(page, left, y, disclaimer.trim(), Ink { size: fitted, ..ink });
    }
}

/// Where the rail's dots jump to.
#[derive(Debug, Clone, PartialEq)]
pub struct NavDot {
    pub section: Option<String>,
    /// 0-based document page.
    pub target_page: usize,
}

/// The contents dot followed by one dot per section at its start page.
/// `section_page` gives 1-based body pages; `preamble` shifts them.
pub fn nav_dots(
    sections: &[String],
    section_page: impl Fn(&str) -> Option<usize>,
    preamble: usize,
) -> Vec<NavDot> {
    let mut dots = vec![NavDot {
        section: None,
        target_page: 1,
    }];
    for section in sections {
        if let Some(page) = section_page(section) {
            dots.push(NavDot {
                section: Some(section.clone()),
                target_page: page + preamble - 1,
            });
        }
    }
    dots
}

/// Draw the rail on `page`, highlighting `active`.
pub fn draw_dot_rail(canvas: &mut Canvas, page: usize, dots: &[NavDot], active: &str, ctx: &RenderContext<'_>) {
    if dots.is_empty() {
        return;
    }
    let x = ctx.page.width() - ctx.page.margin.right + 20.0;
    let span = (dots.len() - 1) as f64 * DOT_SPACING;
    let top = ctx.page.height() / 2.0 + span / 2.0;

    for (i, dot) in dots.iter().enumerate() {
        let y = top - i as f64 * DOT_SPACING;
        let is_active = dot.section.as_deref() == Some(active);
        let (radius, color) = if is_active {
            (ACTIVE_DOT_RADIUS, ctx.palette.accent)
        } else {
            (DOT_RADIUS, ctx.palette.table_border)
        };
        canvas.circle(page, (x, y), radius, Some(color), None);
        canvas.link(
            page,
            [x - TOUCH_TARGET, y - TOUCH_TARGET, x + TOUCH_TARGET, y + TOUCH_TARGET],
            dot.target_page,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DrawCommand;
    use crate::model::PageConfig;
    use crate::style::DocumentStyle;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn with_ctx<T>(f: impl FnOnce(&RenderContext<'_>) -> T) -> T {
        let config = PageConfig::default();
        let style = DocumentStyle::default();
        let ctx = RenderContext::new(Theme::Classic.palette(), &style, &config);
        f(&ctx)
    }

    #[test]
    fn footer_numbers_the_page() {
        with_ctx(|ctx| {
            let mut canvas = Canvas::new(ctx.page, None);
            canvas.ensure_page(2);
            draw_footer(&mut canvas, 2, 5, "Not advice.", ctx);
            let texts: Vec<&str> = canvas.pages()[2].texts().collect();
            assert_eq!(texts, vec!["Page 3 of 5", "Not advice."]);
            match &canvas.pages()[2].commands[1] {
                DrawCommand::Text { x, y, ink, .. } => {
                    assert_eq!(*x, 56.0);
                    assert_eq!(*y, 36.0);
                    assert_eq!(ink.opacity, 0.6);
                }
                other => panic!("unexpected command {other:?}"),
            }
        });
    }

    #[test]
    fn dots_target_section_starts() {
        let sections = vec!["Overview".to_string(), "Risks".to_string(), "Missing".to_string()];
        let starts: HashMap<&str, usize> = [("Overview", 1), ("Risks", 4)].into_iter().collect();
        let dots = nav_dots(&sections, |s| starts.get(s).copied(), 2);
        let targets: Vec<usize> = dots.iter().map(|d| d.target_page).collect();
        assert_eq!(targets, vec![1, 2, 5]);
        assert_eq!(dots[0].section, None);
    }

    #[test]
    fn rail_highlights_the_active_section() {
        with_ctx(|ctx| {
            let dots = vec![
                NavDot {
                    section: None,
                    target_page: 1,
                },
                NavDot {
                    section: Some("Overview".into()),
                    target_page: 2,
                },
                NavDot {
                    section: Some("Risks".into()),
                    target_page: 4,
                },
            ];
            let mut canvas = Canvas::new(ctx.page, None);
            canvas.ensure_page(3);
            draw_dot_rail(&mut canvas, 3, &dots, "Risks", ctx);
            let page = &canvas.pages()[3];
            let radii: Vec<f64> = page
                .commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Circle { radius, .. } => Some(*radius),
                    _ => None,
                })
                .collect();
            assert_eq!(radii, vec![3.0, 3.0, 4.5]);
            assert_eq!(page.links.len(), 3);
            let middle = &page.links[1];
            let center_y = (middle.rect[1] + middle.rect[3]) / 2.0;
            assert!((center_y - ctx.page.height() / 2.0).abs() < 1e-9);
            assert!((middle.rect[2] - middle.rect[0] - 24.0).abs() < 1e-9);
        });
    }
}
