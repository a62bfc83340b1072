//! # Rendering
//!
//! Turns measured, placed content into draw commands on a [`Canvas`]. The
//! renderers never decide where a page breaks; the body and TOC drawers ask
//! the same [`Flow`](crate::layout::flow::Flow) the simulation used, and
//! everything else draws at fixed positions on pages the assembler created.

pub mod body;
pub mod cover;
pub mod navigator;
pub mod toc;
pub mod visualizer;

use crate::font::{FontContext, StandardFont};
use crate::layout::{Canvas, Ink};
use crate::model::PageConfig;
use crate::style::DocumentStyle;
use crate::theme::Palette;

/// What every renderer needs to know about the document's look.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub palette: Palette,
    pub style: &'a DocumentStyle,
    pub page: &'a PageConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(palette: Palette, style: &'a DocumentStyle, page: &'a PageConfig) -> Self {
        Self {
            palette,
            style,
            page,
        }
    }

    /// Regular body ink in the theme's text color.
    pub fn ink(&self, size: f64) -> Ink {
        Ink::regular(size, self.palette.main_text)
    }
}

/// Draw `text` so that it ends at `right`.
pub(crate) fn text_right(canvas: &mut Canvas, page: usize, right: f64, y: f64, text: &str, ink: Ink) {
    let width = FontContext::shared().measure(text, ink.font, ink.size);
    canvas.text(page, right - width, y, text, ink);
}

/// Draw `text` centered on `center`.
pub(crate) fn text_centered(canvas: &mut Canvas, page: usize, center: f64, y: f64, text: &str, ink: Ink) {
    let width = FontContext::shared().measure(text, ink.font, ink.size);
    canvas.text(page, center - width / 2.0, y, text, ink);
}

pub(crate) fn measure(text: &str, font: StandardFont, size: f64) -> f64 {
    FontContext::shared().measure(text, font, size)
}
