//! # Folio
//!
//! Paginated, navigable PDF for markdown equity research reports.
//!
//! A report is a cover-page record plus a long markdown body. Folio draws a
//! cover with a price target visualizer, a numbered and hyperlinked table of
//! contents, the body itself, and on every body page a dot rail in the right
//! margin that jumps between sections.
//!
//! The contents need to know which page every heading lands on before the
//! body is drawn, so layout runs twice over the same measured blocks: once to
//! simulate, once to draw. Both passes place blocks with the same
//! [`layout::flow::Flow`], so the page numbers printed in the contents are the
//! pages the headings are drawn on. The draw pass checks this and fails
//! rather than produce a document whose links point at the wrong page.
//!
//! ## Architecture
//!
//! ```text
//! Report (JSON) + RenderOptions
//!       ↓
//!   [markdown]  Line classification, blocks
//!       ↓
//!   [layout]    Measure, place, simulate
//!       ↓
//!   [render]    Cover, contents, body, footers, section rail
//!       ↓
//!   [document]  Pass orchestration, outline, metadata
//!       ↓
//!   [pdf]       Serialize to PDF bytes
//! ```

pub mod document;
pub mod error;
pub mod font;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod render;
pub mod style;
pub mod text;
pub mod theme;

pub use document::{assemble, AssembledDocument};
pub use error::ReportError;
pub use model::{RenderOptions, Report};
pub use theme::Theme;

/// Render a report to PDF bytes.
///
/// This is the primary entry point. Nothing is returned unless every pass
/// succeeded.
pub fn render_report(report: &Report, options: &RenderOptions) -> Result<Vec<u8>, ReportError> {
    assemble(report, options)?.to_pdf()
}

/// Render a report given as JSON to PDF bytes.
pub fn render_report_json(json: &str, options: &RenderOptions) -> Result<Vec<u8>, ReportError> {
    let report = Report::from_json(json)?;
    render_report(&report, options)
}
