//! # Layout
//!
//! Pages are laid out top-down with a single cursor. Every block is first
//! measured ([`measure::measure_block`]) and then placed ([`flow::Flow`]);
//! the simulation pass and the draw pass share both steps, so they agree on
//! every page break.
//!
//! Coordinates here are PDF-native: points, origin at the bottom-left of the
//! page, y growing upwards. A text command's `y` is its baseline.

pub mod flow;
pub mod measure;
pub mod page_break;
pub mod simulate;
pub mod table;

use crate::font::StandardFont;
use crate::model::PageConfig;
use crate::style::Color;

/// A page ready for serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
    pub links: Vec<LinkAnnotation>,
}

impl LayoutPage {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// An internal jump: clicking `rect` goes to page `target_page` (0-based).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// `[x1, y1, x2, y2]`, lower-left then upper-right.
    pub rect: [f64; 4],
    pub target_page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `[on, off]` dash pattern.
    pub dash: Option<[f64; 2]>,
    pub round_cap: bool,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
            round_cap: false,
        }
    }

    /// Round dots spaced `gap` apart.
    pub fn dotted(color: Color, width: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some([0.0, gap]),
            round_cap: true,
        }
    }
}

/// Font, size, color and opacity of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
    pub opacity: f64,
}

impl Ink {
    pub fn regular(size: f64, color: Color) -> Self {
        Self {
            font: StandardFont::Helvetica,
            size,
            color,
            opacity: 1.0,
        }
    }

    pub fn bold(size: f64, color: Color) -> Self {
        Self {
            font: StandardFont::HelveticaBold,
            ..Self::regular(size, color)
        }
    }

    pub fn with_font(self, font: StandardFont) -> Self {
        Self { font, ..self }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        opacity: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
        opacity: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        opacity: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        ink: Ink,
    },
}

/// The growing list of pages of one document.
///
/// Only the document assembler creates pages; renderers draw onto page
/// indices they are given.
pub struct Canvas {
    pages: Vec<LayoutPage>,
    width: f64,
    height: f64,
    background: Option<Color>,
}

impl Canvas {
    pub fn new(config: &PageConfig, background: Option<Color>) -> Self {
        Self {
            pages: Vec::new(),
            width: config.width(),
            height: config.height(),
            background,
        }
    }

    /// Append a page, painted with the background if there is one.
    pub fn add_page(&mut self) -> usize {
        let mut page = LayoutPage {
            width: self.width,
            height: self.height,
            commands: Vec::new(),
            links: Vec::new(),
        };
        if let Some(bg) = self.background {
            page.commands.push(DrawCommand::Rect {
                x: 0.0,
                y: 0.0,
                width: self.width,
                height: self.height,
                fill: Some(bg),
                stroke: None,
                opacity: 1.0,
            });
        }
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Add pages until `index` exists.
    pub fn ensure_page(&mut self, index: usize) {
        while self.pages.len() <= index {
            self.add_page();
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[LayoutPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<LayoutPage> {
        self.pages
    }

    pub fn push(&mut self, page: usize, command: DrawCommand) {
        self.ensure_page(page);
        self.pages[page].commands.push(command);
    }

    pub fn link(&mut self, page: usize, rect: [f64; 4], target_page: usize) {
        self.ensure_page(page);
        self.pages[page].links.push(LinkAnnotation { rect, target_page });
    }

    pub fn text(&mut self, page: usize, x: f64, y: f64, text: impl Into<String>, ink: Ink) {
        self.push(
            page,
            DrawCommand::Text {
                x,
                y,
                text: text.into(),
                ink,
            },
        );
    }

    pub fn fill_rect(
        &mut self,
        page: usize,
        (x, y, width, height): (f64, f64, f64, f64),
        color: Color,
        opacity: f64,
    ) {
        self.push(
            page,
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                fill: Some(color),
                stroke: None,
                opacity,
            },
        );
    }

    pub fn line(&mut self, page: usize, from: (f64, f64), to: (f64, f64), stroke: Stroke, opacity: f64) {
        self.push(
            page,
            DrawCommand::Line {
                x1: from.0,
                y1: from.1,
                x2: to.0,
                y2: to.1,
                stroke,
                opacity,
            },
        );
    }

    pub fn circle(
        &mut self,
        page: usize,
        center: (f64, f64),
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.push(
            page,
            DrawCommand::Circle {
                cx: center.0,
                cy: center.1,
                radius,
                fill,
                stroke,
                opacity: 1.0,
            },
        );
    }
}
