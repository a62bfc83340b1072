//! # Price Target Visualizer
//!
//! A horizontal bar on the cover: the range from the worst-case to the
//! best-case target is shaded red to green, with ringed markers for the
//! three targets below the bar and the current price above it.
//!
//! The scale is computed by [`PriceScale`] without drawing anything so it
//! can be tested on its own.

use super::measure;
use crate::font::StandardFont;
use crate::layout::{Canvas, DrawCommand, Ink, Stroke};
use crate::model::{parse_price, CoverPageData};
use crate::style::Color;
use crate::theme::Palette;

const BAR_HEIGHT: f64 = 8.0;
const GRADIENT_STEPS: usize = 30;
const MARKER_RADIUS: f64 = 9.0;
const RING_RADIUS: f64 = 7.0;
/// Labels closer than this, in percent of the bar, share no lane.
const MIN_LABEL_DISTANCE: f64 = 18.0;
const LANE_HEIGHT: f64 = 14.0;
const LABEL_SIZE: f64 = 9.0;
const CURRENT_LABEL_SIZE: f64 = 10.0;

fn worst_color() -> Color {
    Color::rgb8(239, 68, 68)
}

fn base_color() -> Color {
    Color::rgb8(249, 115, 22)
}

fn best_color() -> Color {
    Color::rgb8(34, 197, 94)
}

fn current_color() -> Color {
    Color::rgb8(107, 114, 128)
}

/// Red through yellow to green, `t` in 0..=1.
fn gradient(t: f64) -> Color {
    let red = Color::rgb8(239, 68, 68);
    let yellow = Color::rgb8(252, 211, 77);
    let green = Color::rgb8(34, 197, 94);
    if t < 0.5 {
        red.mix(&yellow, t * 2.0)
    } else {
        yellow.mix(&green, (t - 0.5) * 2.0)
    }
}

/// The four prices the visualizer shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoints {
    pub worst: f64,
    pub base: f64,
    pub best: f64,
    pub current: f64,
}

impl PricePoints {
    /// `None` when the base target, best target or current price is
    /// missing or zero; the visualizer is then left out.
    pub fn from_cover(data: &CoverPageData) -> Option<Self> {
        let points = Self {
            worst: parse_price(&data.price_target.worst),
            base: parse_price(&data.price_target.base),
            best: parse_price(&data.price_target.best),
            current: parse_price(&data.current_price),
        };
        if points.base == 0.0 || points.best == 0.0 || points.current == 0.0 {
            return None;
        }
        Some(points)
    }
}

/// Maps prices onto the bar as a percentage of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub bar_start: f64,
    pub bar_end: f64,
}

impl PriceScale {
    pub fn new(points: &PricePoints) -> Self {
        let min = points.worst.min(points.current);
        let max = points.best.max(points.current);
        let span = max - min;
        let padding = if span == 0.0 { max * 0.1 } else { span * 0.15 };
        Self {
            bar_start: (min - padding).max(0.0),
            bar_end: max + padding,
        }
    }

    /// Position of `value` in percent, clamped to `0..=100`.
    pub fn position(&self, value: f64) -> f64 {
        let range = self.bar_end - self.bar_start;
        if range <= 0.0 {
            return 50.0;
        }
        ((value - self.bar_start) / range * 100.0).clamp(0.0, 100.0)
    }
}

/// A label below the bar, in bar percent and absolute extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub position: f64,
    pub left: f64,
    pub right: f64,
}

impl LabelBox {
    fn collides(&self, other: &LabelBox) -> bool {
        (self.position - other.position).abs() < MIN_LABEL_DISTANCE
            || (self.left < other.right && other.left < self.right)
    }
}

/// Put each label, in order, in the lowest lane where it collides with
/// nothing already placed. Returns the lane of every label.
pub fn assign_lanes(labels: &[LabelBox]) -> Vec<usize> {
    let mut lanes: Vec<Vec<LabelBox>> = Vec::new();
    labels
        .iter()
        .map(|label| {
            let lane = lanes
                .iter()
                .position(|lane| lane.iter().all(|other| !label.collides(other)))
                .unwrap_or(lanes.len());
            if lane == lanes.len() {
                lanes.push(Vec::new());
            }
            lanes[lane].push(*label);
            lane
        })
        .collect()
}

/// Draw the visualizer with its top at `y_start` across `x..x + width`.
/// Returns the cursor below it; when the prices are unusable nothing is
/// drawn and only a small gap is consumed.
pub fn draw_visualizer(
    canvas: &mut Canvas,
    page: usize,
    data: &CoverPageData,
    (x, width): (f64, f64),
    y_start: f64,
    palette: &Palette,
) -> f64 {
    let Some(points) = PricePoints::from_cover(data) else {
        tracing::warn!(
            base = %data.price_target.base,
            current = %data.current_price,
            "price targets unusable, leaving out the visualizer"
        );
        return y_start - 20.0;
    };
    let scale = PriceScale::new(&points);
    let bar_y = y_start - 40.0;
    let at = |value: f64| x + scale.position(value) / 100.0 * width;
    let paper = palette.paper();

    canvas.fill_rect(page, (x, bar_y, width, BAR_HEIGHT), palette.table_border, 0.5);

    let (from, to) = (at(points.worst), at(points.best));
    if to > from {
        let step = (to - from) / GRADIENT_STEPS as f64;
        for i in 0..GRADIENT_STEPS {
            let t = i as f64 / (GRADIENT_STEPS - 1) as f64;
            canvas.fill_rect(
                page,
                (from + i as f64 * step, bar_y, step + 0.5, BAR_HEIGHT),
                gradient(t),
                1.0,
            );
        }
    }

    let targets = [
        ("Worst", &data.price_target.worst, points.worst, worst_color()),
        ("Base", &data.price_target.base, points.base, base_color()),
        ("Best", &data.price_target.best, points.best, best_color()),
    ];
    let marker_y = bar_y + BAR_HEIGHT / 2.0;
    for (_, _, value, color) in &targets {
        draw_marker(canvas, page, (at(*value), marker_y), *color, paper);
    }
    draw_marker(canvas, page, (at(points.current), marker_y), current_color(), paper);

    let texts: Vec<String> = targets
        .iter()
        .map(|(name, raw, _, _)| format!("{name}: {}", raw.trim()))
        .collect();
    let boxes: Vec<LabelBox> = targets
        .iter()
        .zip(&texts)
        .map(|((_, _, value, _), text)| {
            let w = measure(text, StandardFont::Helvetica, LABEL_SIZE);
            let left = label_left(at(*value), w, x, width);
            LabelBox {
                position: scale.position(*value),
                left,
                right: left + w,
            }
        })
        .collect();
    let lanes = assign_lanes(&boxes);

    for (((_, _, _, color), text), (label, lane)) in targets.iter().zip(&texts).zip(boxes.iter().zip(&lanes)) {
        let y = bar_y - 35.0 - *lane as f64 * LANE_HEIGHT;
        draw_label(
            canvas,
            page,
            (label.left, y),
            text,
            Ink::regular(LABEL_SIZE, *color),
            (2.0, 0.9),
            paper,
        );
    }

    let current_text = format!("Current: {}", data.current_price.trim());
    let w = measure(&current_text, StandardFont::HelveticaBold, CURRENT_LABEL_SIZE);
    draw_label(
        canvas,
        page,
        (label_left(at(points.current), w, x, width), bar_y + 25.0),
        &current_text,
        Ink::bold(CURRENT_LABEL_SIZE, current_color()),
        (3.0, 0.95),
        paper,
    );

    let extra_lanes = lanes.iter().copied().max().unwrap_or(0);
    y_start - 90.0 - extra_lanes as f64 * LANE_HEIGHT
}

/// Center a label on `center` while keeping it over the bar.
fn label_left(center: f64, width: f64, x: f64, bar_width: f64) -> f64 {
    (center - width / 2.0).clamp(x, (x + bar_width - width).max(x))
}

fn draw_marker(canvas: &mut Canvas, page: usize, center: (f64, f64), color: Color, paper: Color) {
    canvas.circle(page, center, MARKER_RADIUS, Some(paper), None);
    canvas.circle(page, center, RING_RADIUS, None, Some(Stroke::solid(color, 2.0)));
}

fn draw_label(
    canvas: &mut Canvas,
    page: usize,
    (left, y): (f64, f64),
    text: &str,
    ink: Ink,
    (padding, opacity): (f64, f64),
    paper: Color,
) {
    let width = measure(text, ink.font, ink.size);
    canvas.push(
        page,
        DrawCommand::Rect {
            x: left - padding,
            y: y - padding - 1.0,
            width: width + 2.0 * padding,
            height: ink.size + 2.0 * padding,
            fill: Some(paper),
            stroke: None,
            opacity,
        },
    );
    canvas.text(page, left, y, text, ink);
}
