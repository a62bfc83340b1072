//! The cover page: a colored sidebar and a main column with the title
//! block, key metrics and the price target visualizer.

use super::visualizer::draw_visualizer;
use super::{text_centered, RenderContext};
use crate::font::StandardFont;
use crate::layout::{Canvas, Ink, Stroke};
use crate::model::{format_market_cap, CoverPageData};
use crate::style::Color;
use crate::text::{fit_font_size, wrap};

const SIDEBAR_RATIO: f64 = 0.35;
const NAME_MAX_SIZE: f64 = 38.0;
const NAME_MIN_SIZE: f64 = 18.0;

/// Company name size: the largest at which the name wraps to two lines.
/// Names too long even at the minimum are drawn at the minimum.
pub fn company_name_layout(name: &str, max_width: f64) -> (f64, Vec<String>) {
    let mut size = NAME_MAX_SIZE;
    loop {
        let lines = wrap(name, StandardFont::HelveticaBold, size, max_width);
        if lines.len() <= 2 || size <= NAME_MIN_SIZE {
            return (size, lines);
        }
        size -= 1.0;
    }
}

/// Text color that reads on `background`.
pub fn contrast_color(background: &Color) -> Color {
    if background.luminance() < 0.5 {
        Color::WHITE
    } else {
        Color::rgb8(17, 24, 39)
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value.trim()
    }
}

pub fn draw_cover(canvas: &mut Canvas, page: usize, data: &CoverPageData, brand: &str, ctx: &RenderContext<'_>) {
    let width = ctx.page.width();
    let height = ctx.page.height();
    let palette = &ctx.palette;
    let text = palette.main_text;

    let sidebar = width * SIDEBAR_RATIO;
    canvas.fill_rect(page, (0.0, 0.0, sidebar, height), palette.sidebar_bg, 1.0);
    if let Some(category) = data.industry_category.as_deref().filter(|c| !c.trim().is_empty()) {
        let ink = Ink::bold(12.0, contrast_color(&palette.sidebar_bg));
        let lines = wrap(category.trim(), ink.font, ink.size, sidebar - 60.0);
        for (i, line) in lines.iter().enumerate() {
            let y = 60.0 + (lines.len() - 1 - i) as f64 * 15.0;
            canvas.text(page, 30.0, y, line.as_str(), ink);
        }
    }

    let x = sidebar + 50.0;
    let main_width = width - sidebar - 80.0;

    canvas.text(page, x, height - 50.0, brand, Ink::bold(10.0, text).with_opacity(0.7));

    let mut y = height - 140.0;
    canvas.text(page, x, y, data.report_title.as_str(), Ink::bold(14.0, palette.accent));
    y -= 50.0;

    let (size, lines) = company_name_layout(&data.company_name, main_width);
    let leading = size * 1.2;
    for (i, line) in lines.iter().enumerate() {
        canvas.text(page, x, y - i as f64 * leading, line.as_str(), Ink::bold(size, text));
    }
    y -= lines.len() as f64 * leading + 10.0;

    canvas.text(page, x, y, data.ticker.as_str(), Ink::regular(20.0, text).with_opacity(0.7));
    y -= 40.0;

    let half = main_width / 2.0;
    let metrics = [
        ("Current Price", or_na(&data.current_price).to_string()),
        ("Market Cap", format_market_cap(&data.market_cap)),
    ];
    for (i, (label, value)) in metrics.iter().enumerate() {
        let mx = x + i as f64 * half;
        canvas.text(page, mx, y, *label, Ink::regular(9.0, text).with_opacity(0.7));
        let size = fit_font_size(value, StandardFont::HelveticaBold, 14.0, 8.0, half - 10.0);
        canvas.text(page, mx, y - 20.0, value.as_str(), Ink::bold(size, text));
    }
    y -= 25.0;

    y = draw_visualizer(canvas, page, data, (x, main_width), y, palette);
    y -= 20.0;

    canvas.line(
        page,
        (x, y),
        (width - 50.0, y),
        Stroke::solid(palette.table_border, 0.5),
        0.5,
    );
    y -= 40.0;

    let center = x + main_width / 2.0;
    text_centered(
        canvas,
        page,
        center,
        y,
        "Potential Upside (Base)",
        Ink::regular(11.0, text).with_opacity(0.7),
    );
    text_centered(
        canvas,
        page,
        center,
        y - 28.0,
        or_na(&data.potential_upside),
        Ink::bold(22.0, palette.accent),
    );

    canvas.text(
        page,
        x,
        60.0,
        format!("Report Date: {}", or_na(&data.report_date)),
        Ink::regular(10.0, text).with_opacity(0.6),
    );
}
