//! # Themes
//!
//! A theme is a name for a fixed palette. Palettes are static data; the
//! renderer never derives colors at runtime beyond opacity.

use crate::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    Default,
    #[default]
    Classic,
    Slate,
    Graphite,
    Crimson,
    Emerald,
    Ocean,
    Sunrise,
    Paper,
    Forest,
    Royal,
    Industrial,
    Quantum,
}

/// Colors used across cover, body and navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub sidebar_bg: Color,
    pub main_text: Color,
    pub accent: Color,
    pub table_header_bg: Color,
    pub table_border: Color,
    pub h2_border: Color,
    /// Full-page background; white paper when absent.
    pub page_bg: Option<Color>,
}

impl Palette {
    /// The page background, white when the theme leaves it unset.
    pub fn paper(&self) -> Color {
        self.page_bg.unwrap_or(Color::WHITE)
    }
}

impl Theme {
    pub const ALL: [Theme; 13] = [
        Theme::Default,
        Theme::Classic,
        Theme::Slate,
        Theme::Graphite,
        Theme::Crimson,
        Theme::Emerald,
        Theme::Ocean,
        Theme::Sunrise,
        Theme::Paper,
        Theme::Forest,
        Theme::Royal,
        Theme::Industrial,
        Theme::Quantum,
    ];

    /// Resolve a theme name. `midnight` is the old name of `graphite`;
    /// anything unrecognized falls back to `classic`.
    pub fn from_name(name: &str) -> Theme {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Theme::Default,
            "classic" => Theme::Classic,
            "slate" => Theme::Slate,
            "graphite" | "midnight" => Theme::Graphite,
            "crimson" => Theme::Crimson,
            "emerald" => Theme::Emerald,
            "ocean" => Theme::Ocean,
            "sunrise" => Theme::Sunrise,
            "paper" => Theme::Paper,
            "forest" => Theme::Forest,
            "royal" => Theme::Royal,
            "industrial" => Theme::Industrial,
            "quantum" => Theme::Quantum,
            other => {
                tracing::debug!(theme = other, "unknown theme, using classic");
                Theme::Classic
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Classic => "classic",
            Theme::Slate => "slate",
            Theme::Graphite => "graphite",
            Theme::Crimson => "crimson",
            Theme::Emerald => "emerald",
            Theme::Ocean => "ocean",
            Theme::Sunrise => "sunrise",
            Theme::Paper => "paper",
            Theme::Forest => "forest",
            Theme::Royal => "royal",
            Theme::Industrial => "industrial",
            Theme::Quantum => "quantum",
        }
    }

    pub fn palette(&self) -> Palette {
        let c = Color::rgb8;
        match self {
            Theme::Default => Palette {
                sidebar_bg: c(79, 70, 229),
                main_text: c(31, 41, 55),
                accent: c(99, 102, 241),
                table_header_bg: c(243, 244, 246),
                table_border: c(209, 213, 219),
                h2_border: c(99, 102, 241),
                page_bg: None,
            },
            Theme::Classic => Palette {
                sidebar_bg: c(0, 31, 63),
                main_text: c(51, 51, 51),
                accent: c(212, 175, 55),
                table_header_bg: c(230, 237, 243),
                table_border: c(209, 213, 219),
                h2_border: c(212, 175, 55),
                page_bg: None,
            },
            Theme::Slate => Palette {
                sidebar_bg: c(45, 55, 72),
                main_text: c(45, 55, 72),
                accent: c(79, 209, 197),
                table_header_bg: c(247, 250, 252),
                table_border: c(226, 232, 240),
                h2_border: c(79, 209, 197),
                page_bg: None,
            },
            Theme::Graphite => Palette {
                sidebar_bg: c(31, 41, 55),
                main_text: c(209, 213, 219),
                accent: c(56, 189, 248),
                table_header_bg: c(31, 41, 55),
                table_border: c(75, 85, 99),
                h2_border: c(56, 189, 248),
                page_bg: Some(c(17, 24, 39)),
            },
            Theme::Crimson => Palette {
                sidebar_bg: c(153, 27, 27),
                main_text: c(63, 37, 37),
                accent: c(185, 28, 28),
                table_header_bg: c(254, 226, 226),
                table_border: c(254, 202, 202),
                h2_border: c(185, 28, 28),
                page_bg: Some(c(254, 242, 242)),
            },
            Theme::Emerald => Palette {
                sidebar_bg: c(6, 95, 70),
                main_text: c(20, 83, 45),
                accent: c(202, 138, 4),
                table_header_bg: c(220, 252, 231),
                table_border: c(187, 247, 208),
                h2_border: c(21, 128, 61),
                page_bg: Some(c(240, 253, 244)),
            },
            Theme::Ocean => Palette {
                sidebar_bg: c(30, 58, 138),
                main_text: c(30, 58, 138),
                accent: c(37, 99, 235),
                table_header_bg: c(219, 234, 254),
                table_border: c(191, 219, 254),
                h2_border: c(37, 99, 235),
                page_bg: Some(c(239, 246, 255)),
            },
            Theme::Sunrise => Palette {
                sidebar_bg: c(154, 52, 18),
                main_text: c(124, 45, 18),
                accent: c(234, 88, 12),
                table_header_bg: c(255, 237, 213),
                table_border: c(254, 215, 170),
                h2_border: c(234, 88, 12),
                page_bg: Some(c(255, 247, 237)),
            },
            Theme::Paper => Palette {
                sidebar_bg: c(212, 200, 188),
                main_text: c(64, 56, 48),
                accent: c(140, 126, 112),
                table_header_bg: c(231, 226, 219),
                table_border: c(220, 213, 204),
                h2_border: c(166, 152, 136),
                page_bg: Some(c(253, 252, 249)),
            },
            Theme::Forest => Palette {
                sidebar_bg: c(54, 83, 20),
                main_text: c(54, 83, 20),
                accent: c(101, 163, 13),
                table_header_bg: c(236, 252, 203),
                table_border: c(217, 249, 157),
                h2_border: c(101, 163, 13),
                page_bg: Some(c(247, 254, 231)),
            },
            Theme::Royal => Palette {
                sidebar_bg: c(91, 33, 182),
                main_text: c(91, 33, 182),
                accent: c(124, 58, 237),
                table_header_bg: c(237, 233, 254),
                table_border: c(221, 214, 254),
                h2_border: c(124, 58, 237),
                page_bg: Some(c(245, 243, 255)),
            },
            Theme::Industrial => Palette {
                sidebar_bg: c(55, 65, 81),
                main_text: c(31, 41, 55),
                accent: c(245, 158, 11),
                table_header_bg: c(229, 231, 235),
                table_border: c(209, 213, 219),
                h2_border: c(245, 158, 11),
                page_bg: Some(c(243, 244, 246)),
            },
            Theme::Quantum => Palette {
                sidebar_bg: c(2, 6, 23),
                main_text: c(226, 232, 240),
                accent: c(34, 211, 238),
                table_header_bg: c(30, 41, 59),
                table_border: c(51, 65, 85),
                h2_border: c(34, 211, 238),
                page_bg: Some(c(12, 20, 39)),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Theme::from_name(s))
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Theme::from_name(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.name().to_string()
    }
}
