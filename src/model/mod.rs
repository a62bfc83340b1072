//! # Report Model
//!
//! The input contract (a [`Report`] as produced by the research pipeline)
//! and the render configuration. All JSON is camelCase.

use crate::error::ReportError;
use crate::style::DocumentStyle;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One research report: cover data plus the markdown body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub cover_page_data: CoverPageData,
    #[serde(default)]
    pub report_content: String,
}

impl Report {
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::parse("report", e))
    }
}

/// Everything shown on the cover. Numeric fields are free-form strings
/// ("$182.50", "2.3T", "N/A") and are parsed leniently where needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverPageData {
    pub company_name: String,
    pub ticker: String,
    pub report_title: String,
    pub report_date: String,
    pub price_target: PriceTarget,
    pub potential_upside: String,
    pub current_price: String,
    pub market_cap: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTarget {
    pub worst: String,
    pub base: String,
    pub best: String,
}

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex"));

fn leading_number(s: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(s)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parse a price such as `"$1,234.50"`. Everything but digits, `.` and
/// `-` is dropped and the leading number is read; failure gives 0.
pub fn parse_price(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned).unwrap_or(0.0)
}

/// Abbreviate a market capitalization: `"1500000000"` becomes `"1.50B"`.
///
/// Values that already carry a K/M/B/T suffix, that don't parse, or that
/// are below a thousand are returned as given. Empty input is `"N/A"`.
pub fn format_market_cap(value: &str) -> String {
    if value.is_empty() {
        return "N/A".to_string();
    }
    if value.chars().any(|c| "KkMmBbTt".contains(c)) {
        return value.to_string();
    }
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let Some(n) = leading_number(&cleaned) else {
        return value.to_string();
    };

    const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in SCALES {
        if n >= scale {
            return format!("{:.2}{}", n / scale, suffix);
        }
    }
    value.to_string()
}

/// Document metadata written to the PDF Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

/// Page size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default = "PageConfig::default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Self::default_margin(),
        }
    }
}

impl PageConfig {
    fn default_margin() -> Edges {
        Edges::symmetric(72.0, 56.0)
    }

    pub fn width(&self) -> f64 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.size.dimensions().1
    }

    /// Baseline of the first line on a fresh page.
    pub fn content_top(&self) -> f64 {
        self.height() - self.margin.top
    }

    pub fn content_bottom(&self) -> f64 {
        self.margin.bottom
    }

    pub fn content_left(&self) -> f64 {
        self.margin.left
    }

    pub fn content_right(&self) -> f64 {
        self.width() - self.margin.right
    }

    pub fn content_width(&self) -> f64 {
        self.width() - self.margin.left - self.margin.right
    }

    /// Usable height between the margins.
    pub fn content_height(&self) -> f64 {
        self.content_top() - self.content_bottom()
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

pub const DEFAULT_BRAND: &str = "Independent Equity Research";
pub const DEFAULT_DISCLAIMER: &str =
    "This report is strictly for educational and informational purposes, not financial advice.";

/// Everything about a render that is not part of the report itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub theme: Theme,
    pub page: PageConfig,
    pub style: DocumentStyle,
    /// Brand line on the cover; also the PDF author.
    pub brand: String,
    /// Footer line on every page after the cover.
    pub disclaimer: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            page: PageConfig::default(),
            style: DocumentStyle::default(),
            brand: DEFAULT_BRAND.to_string(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::parse("render options", e))
    }
}
