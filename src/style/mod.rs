//! # Style
//!
//! Colors and the typographic scale of a report. Every size, leading, gap
//! and padding used by the measure and draw passes lives in
//! [`DocumentStyle`], so a single value flows to both.

use serde::{Deserialize, Serialize};

/// An RGBA color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Build from 0-255 channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Relative luminance (sRGB weights, no gamma), 0.0 dark to 1.0 light.
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Linear blend towards `other`; `t = 0` is `self`.
    pub fn mix(&self, other: &Color, t: f64) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Size and leading of a run of wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub size: f64,
    pub line_height: f64,
    /// Space left below the block.
    pub gap_after: f64,
}

/// Vertical rhythm of a heading. The block height is
/// `space_before + rule_gap + space_after`; the baseline sits
/// `space_before` below the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStyle {
    pub size: f64,
    pub min_size: f64,
    pub space_before: f64,
    pub rule_gap: f64,
    pub space_after: f64,
    /// Draw a rule under the heading.
    pub rule: bool,
}

impl HeadingStyle {
    pub fn height(&self) -> f64 {
        self.space_before + self.rule_gap + self.space_after
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    pub size: f64,
    pub line_height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentStyle {
    pub paragraph: TextStyle,
    /// Explanatory text directly under a table.
    pub note: TextStyle,
    pub note_opacity: f64,
    pub bullet: TextStyle,
    pub bullet_indent: f64,
    pub bullet_radius: f64,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    /// Tables whose headers suggest free text.
    pub table_text_heavy: TableStyle,
    pub table_compact: TableStyle,
    pub table_gap_after: f64,
    pub table_border: f64,
    pub toc: TextStyle,
    pub toc_nested_indent: f64,
    /// Minimum space between an entry title and its page number.
    pub toc_number_gap: f64,
    pub footer_size: f64,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            paragraph: TextStyle {
                size: 10.0,
                line_height: 15.0,
                gap_after: 5.0,
            },
            note: TextStyle {
                size: 8.0,
                line_height: 12.0,
                gap_after: 10.0,
            },
            note_opacity: 0.75,
            bullet: TextStyle {
                size: 10.0,
                line_height: 15.0,
                gap_after: 5.0,
            },
            bullet_indent: 20.0,
            bullet_radius: 2.0,
            h2: HeadingStyle {
                size: 18.0,
                min_size: 12.0,
                space_before: 30.0,
                rule_gap: 5.0,
                space_after: 15.0,
                rule: true,
            },
            h3: HeadingStyle {
                size: 14.0,
                min_size: 10.0,
                space_before: 20.0,
                rule_gap: 0.0,
                space_after: 14.0 * 1.4,
                rule: false,
            },
            table_text_heavy: TableStyle {
                size: 9.0,
                line_height: 11.0,
                padding: 3.0,
            },
            table_compact: TableStyle {
                size: 7.0,
                line_height: 9.0,
                padding: 2.0,
            },
            table_gap_after: 15.0,
            table_border: 0.5,
            toc: TextStyle {
                size: 9.0,
                line_height: 12.0,
                gap_after: 6.0,
            },
            toc_nested_indent: 20.0,
            toc_number_gap: 15.0,
            footer_size: 8.0,
        }
    }
}
