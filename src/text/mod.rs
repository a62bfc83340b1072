//! # Text Wrapping
//!
//! Greedy word wrap over whitespace-delimited words. Widths are summed in
//! integer font units and only converted to points for the comparison
//! against the available width, so measuring the same line twice always
//! gives the same answer.
//!
//! Words that are wider than the whole line on their own are split at
//! character boundaries. The first piece fills whatever is left on the
//! current line, the middle pieces each take a full line, and the last piece
//! stays open so following words can join it. This keeps wrapping
//! idempotent: re-wrapping the joined output reproduces the same lines.

use crate::font::{units_to_points, FontContext, StandardFont};

/// One word (or word fragment) on a wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: StandardFont,
    /// Offset from the line's left edge, in points.
    pub x: f64,
}

/// A line produced by [`wrap_runs`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrappedLine {
    pub spans: Vec<Span>,
    /// Measured width in points.
    pub width: f64,
}

impl WrappedLine {
    /// The line's text with single spaces between spans.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Wrap plain text set in one font. Always returns at least one line.
pub fn wrap(text: &str, font: StandardFont, size: f64, max_width: f64) -> Vec<String> {
    let words: Vec<(&str, StandardFont)> = text.split_whitespace().map(|w| (w, font)).collect();
    wrap_runs(&words, size, max_width)
        .iter()
        .map(WrappedLine::text)
        .collect()
}

/// Wrap a sequence of words that may each carry their own font.
pub fn wrap_runs(words: &[(&str, StandardFont)], size: f64, max_width: f64) -> Vec<WrappedLine> {
    let fonts = FontContext::shared();
    let fits = |units: u32| units_to_points(units, size) <= max_width;
    let space = fonts.char_units(' ', StandardFont::Helvetica);

    let mut lines: Vec<Vec<(String, StandardFont)>> = Vec::new();
    let mut current: Vec<(String, StandardFont)> = Vec::new();
    let mut current_units: u32 = 0;

    for &(word, font) in words {
        let word_units = fonts.units(word, font);
        let joined = if current.is_empty() {
            word_units
        } else {
            current_units + space + word_units
        };

        if fits(joined) {
            current.push((word.to_string(), font));
            current_units = joined;
            continue;
        }

        if fits(word_units) {
            lines.push(std::mem::take(&mut current));
            current.push((word.to_string(), font));
            current_units = word_units;
            continue;
        }

        // Over-wide word: break it at character boundaries.
        let chars: Vec<char> = word.chars().collect();
        let mut start = 0;

        if !current.is_empty() {
            let lead = current_units + space;
            let n = max_prefix(fonts, &chars, font, lead, &fits);
            if n > 0 {
                current.push((chars[..n].iter().collect(), font));
                start = n;
            }
            lines.push(std::mem::take(&mut current));
        }

        loop {
            let n = max_prefix(fonts, &chars[start..], font, 0, &fits).max(1);
            let chunk: String = chars[start..start + n].iter().collect();
            start += n;
            if start >= chars.len() {
                current_units = fonts.units(&chunk, font);
                current.push((chunk, font));
                break;
            }
            lines.push(vec![(chunk, font)]);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .map(|words| layout_line(fonts, words, size, space))
        .collect()
}

/// Number of leading characters that fit after `lead` units already used.
fn max_prefix(
    fonts: &FontContext,
    chars: &[char],
    font: StandardFont,
    lead: u32,
    fits: &impl Fn(u32) -> bool,
) -> usize {
    let mut used = lead;
    let mut count = 0;
    for &ch in chars {
        used += fonts.char_units(ch, font);
        if !fits(used) {
            break;
        }
        count += 1;
    }
    count
}

fn layout_line(
    fonts: &FontContext,
    words: Vec<(String, StandardFont)>,
    size: f64,
    space: u32,
) -> WrappedLine {
    let mut units: u32 = 0;
    let mut spans = Vec::with_capacity(words.len());
    for (i, (text, font)) in words.into_iter().enumerate() {
        if i > 0 {
            units += space;
        }
        let x = units_to_points(units, size);
        units += fonts.units(&text, font);
        spans.push(Span { text, font, x });
    }
    WrappedLine {
        spans,
        width: units_to_points(units, size),
    }
}

/// Largest whole-point size in `[min_size, max_size]` at which `text`
/// fits on one line; `min_size` when nothing fits.
pub fn fit_font_size(
    text: &str,
    font: StandardFont,
    max_size: f64,
    min_size: f64,
    max_width: f64,
) -> f64 {
    let fonts = FontContext::shared();
    let mut size = max_size;
    while size > min_size && fonts.measure(text, font, size) > max_width {
        size -= 1.0;
    }
    size.max(min_size)
}
