//! # Document Assembly
//!
//! Orchestrates one report from input to laid-out pages:
//!
//! 1. cover on page 0;
//! 2. body markdown parsed and measured once;
//! 3. simulation pass over the measured body;
//! 4. contents planned from the simulated header pages and drawn;
//! 5. body drawn with the same blocks, checked against the simulation;
//! 6. footers and the section rail on every page;
//! 7. outline and metadata.
//!
//! The assembler is the only place that decides which canvas page a pass
//! starts on.

use crate::error::ReportError;
use crate::layout::measure::{measure_all, MeasuredBlock};
use crate::layout::simulate::{simulate, Simulation};
use crate::layout::{Canvas, LayoutPage};
use crate::markdown::{parse, strip_table_of_contents};
use crate::model::{Metadata, RenderOptions, Report};
use crate::pdf::{OutlineItem, PdfWriter};
use crate::render::body::draw_blocks;
use crate::render::cover::draw_cover;
use crate::render::navigator::{draw_dot_rail, draw_footer, nav_dots};
use crate::render::toc::{plan_toc, toc_outline, TocItem};
use crate::render::RenderContext;

/// A fully laid-out report, before serialization.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub pages: Vec<LayoutPage>,
    pub simulation: Simulation,
    pub toc: Vec<TocItem>,
    /// Cover plus contents pages; the body starts at this page index.
    pub preamble_pages: usize,
    pub outline: Vec<OutlineItem>,
    pub metadata: Metadata,
}

impl AssembledDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize to PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        PdfWriter::new().write(&self.pages, &self.outline, &self.metadata)
    }
}

pub fn assemble(report: &Report, options: &RenderOptions) -> Result<AssembledDocument, ReportError> {
    let palette = options.theme.palette();
    let ctx = RenderContext::new(palette, &options.style, &options.page);
    let mut canvas = Canvas::new(&options.page, palette.page_bg);

    let cover = canvas.add_page();
    draw_cover(&mut canvas, cover, &report.cover_page_data, &options.brand, &ctx);

    let markdown = strip_table_of_contents(&report.report_content);
    let body: Vec<MeasuredBlock> = measure_all(&parse(markdown.trim()), &options.style, &options.page);
    let simulation = simulate(&body, &options.page);
    tracing::debug!(
        report = report.id,
        blocks = body.len(),
        pages = simulation.page_count,
        "simulated body"
    );

    let plan = plan_toc(&body, &simulation.header_pages, &ctx)?;
    let toc_pages = draw_blocks(&mut canvas, &plan.blocks, 1, &ctx, None)?;
    if toc_pages != plan.pages {
        return Err(ReportError::LayoutMismatch {
            what: "contents pages".to_string(),
            simulated: plan.pages,
            drawn: toc_pages,
        });
    }

    let preamble = plan.preamble;
    if !body.is_empty() {
        let body_pages = draw_blocks(&mut canvas, &body, preamble, &ctx, Some(&simulation.header_pages))?;
        if body_pages != simulation.page_count {
            return Err(ReportError::LayoutMismatch {
                what: "body pages".to_string(),
                simulated: simulation.page_count,
                drawn: body_pages,
            });
        }
    }

    let total = canvas.page_count();
    let dots = nav_dots(
        &simulation.sections,
        |s| simulation.section_pages.get(s).copied(),
        preamble,
    );
    for page in 1..total {
        draw_footer(&mut canvas, page, total, &options.disclaimer, &ctx);
        if page < preamble {
            continue;
        }
        if let Some(section) = simulation.page_sections.get(&(page - preamble + 1)) {
            draw_dot_rail(&mut canvas, page, &dots, section, &ctx);
        }
    }

    let data = &report.cover_page_data;
    let metadata = Metadata {
        title: Some(format!(
            "{} ({}) - {}",
            data.company_name, data.ticker, data.report_title
        )),
        author: Some(options.brand.clone()),
        subject: data.industry_category.clone(),
        creator: Some("folio".to_string()),
    };

    tracing::info!(
        report = report.id,
        ticker = %data.ticker,
        pages = total,
        sections = simulation.sections.len(),
        "assembled report"
    );

    Ok(AssembledDocument {
        outline: toc_outline(&plan.items),
        toc: plan.items,
        pages: canvas.into_pages(),
        simulation,
        preamble_pages: preamble,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoverPageData;

    fn report(content: &str) -> Report {
        Report {
            id: 7,
            cover_page_data: CoverPageData {
                company_name: "Acme".into(),
                ticker: "ACME".into(),
                report_title: "Initiation".into(),
                ..CoverPageData::default()
            },
            report_content: content.to_string(),
        }
    }

    #[test]
    fn empty_body_is_cover_and_contents() {
        let doc = assemble(&report(""), &RenderOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.preamble_pages, 2);
        assert!(doc.toc.is_empty());
        assert!(doc.outline.is_empty());
    }

    #[test]
    fn body_follows_the_preamble() {
        let doc = assemble(&report("## Overview\nText.\n## Risks\nMore."), &RenderOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 3);
        let body: Vec<&str> = doc.pages[2].texts().collect();
        assert!(body.contains(&"Overview"));
        assert!(body.contains(&"Page 3 of 3"));
        assert_eq!(doc.toc[0].page, 3);
    }

    #[test]
    fn existing_contents_are_replaced() {
        let md = "## Table of Contents\n* Old ||| 9\n## Overview\nText.";
        let doc = assemble(&report(md), &RenderOptions::default()).unwrap();
        assert_eq!(doc.toc.len(), 1);
        assert!(!doc.pages.iter().any(|p| p.texts().any(|t| t == "Old")));
    }

    #[test]
    fn cover_has_no_footer_and_body_has_a_rail() {
        let doc = assemble(&report("## Overview\nText."), &RenderOptions::default()).unwrap();
        assert!(!doc.pages[0].texts().any(|t| t.starts_with("Page ")));
        assert!(doc.pages[1].texts().any(|t| t == "Page 2 of 3"));
        // Contents dot and one section dot.
        assert_eq!(doc.pages[2].links.len(), 2);
        assert_eq!(doc.pages[2].links[1].target_page, 2);
    }

    #[test]
    fn metadata_describes_the_report() {
        let doc = assemble(&report("Text."), &RenderOptions::default()).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("Acme (ACME) - Initiation"));
        assert_eq!(doc.metadata.creator.as_deref(), Some("folio"));
    }
}
