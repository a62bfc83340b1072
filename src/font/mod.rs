//! # Font Management
//!
//! Reports are set entirely in the standard Helvetica faces, which PDF
//! viewers provide without embedding. This module owns the mapping from
//! Unicode text to WinAnsiEncoding bytes and the width tables used to
//! measure those bytes. Measurement and serialization both go through
//! [`encode_char`], so a string is always measured exactly as it is drawn.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use once_cell::sync::Lazy;

/// The standard faces a report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Self::HelveticaBold)
    }
}

static SHARED: Lazy<FontContext> = Lazy::new(FontContext::new);

/// Width tables for every face, built once per process.
pub struct FontContext {
    regular: StandardFontMetrics,
    bold: StandardFontMetrics,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            regular: StandardFontMetrics::helvetica(),
            bold: StandardFontMetrics::helvetica_bold(),
        }
    }

    /// The process-wide context. Read-only after first use.
    pub fn shared() -> &'static FontContext {
        &SHARED
    }

    fn metrics(&self, font: StandardFont) -> &StandardFontMetrics {
        match font {
            StandardFont::Helvetica => &self.regular,
            StandardFont::HelveticaBold => &self.bold,
        }
    }

    /// Width of a string in 1/1000 em. Integer so that sums never drift.
    pub fn units(&self, text: &str, font: StandardFont) -> u32 {
        let metrics = self.metrics(font);
        text.chars().map(|ch| metrics.byte_units(encode_char(ch))).sum()
    }

    pub fn char_units(&self, ch: char, font: StandardFont) -> u32 {
        self.metrics(font).byte_units(encode_char(ch))
    }

    /// Width of a string in points.
    pub fn measure(&self, text: &str, font: StandardFont, size: f64) -> f64 {
        units_to_points(self.units(text, font), size)
    }
}

pub fn units_to_points(units: u32, size: f64) -> f64 {
    f64::from(units) * size / 1000.0
}

/// Map a character to the WinAnsi byte that will be drawn for it.
///
/// Look-alikes outside the code page are folded first; anything still
/// unencodable becomes `?`.
pub fn encode_char(ch: char) -> u8 {
    unicode_to_winansi(fold_lookalike(ch)).unwrap_or(b'?')
}

/// Encode a whole string for a PDF literal.
pub fn encode_str(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

fn fold_lookalike(ch: char) -> char {
    match ch {
        '\u{2212}' | '\u{2010}' | '\u{2011}' | '\u{2012}' => '-',
        '\u{2009}' | '\u{200A}' | '\u{202F}' | '\u{2007}' | '\u{2002}' | '\u{2003}' => ' ',
        '\u{2032}' => '\'',
        '\u{2033}' => '"',
        '\u{2264}' => '<',
        '\u{2265}' => '>',
        '\u{2248}' => '~',
        '\u{2192}' => '>',
        _ => ch,
    }
}

/// WinAnsiEncoding (CP1252) lookup.
pub fn unicode_to_winansi(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_at_twelve_points() {
        let ctx = FontContext::new();
        let w = ctx.measure(" ", StandardFont::Helvetica, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_is_wider() {
        let ctx = FontContext::shared();
        let regular = ctx.units("Revenue", StandardFont::Helvetica);
        let bold = ctx.units("Revenue", StandardFont::HelveticaBold);
        assert!(bold > regular);
    }

    #[test]
    fn unencodable_characters_measure_as_question_mark() {
        let ctx = FontContext::shared();
        assert_eq!(
            ctx.char_units('\u{4E2D}', StandardFont::Helvetica),
            ctx.char_units('?', StandardFont::Helvetica)
        );
        assert_eq!(encode_char('\u{4E2D}'), b'?');
    }

    #[test]
    fn typographic_characters_encode() {
        assert_eq!(encode_char('\u{2014}'), 0x97);
        assert_eq!(encode_char('\u{2212}'), b'-');
        assert_eq!(encode_char('\u{20AC}'), 0x80);
        assert_eq!(encode_str("café"), vec![b'c', b'a', b'f', 0xE9]);
    }
}
