//! The measurement pass.
//!
//! Runs the flow over the measured blocks without drawing and records where
//! headings land. The table of contents and the section navigator are built
//! from this record before anything is drawn.

use std::collections::{BTreeMap, HashMap};

use super::flow::Flow;
use super::measure::MeasuredBlock;
use crate::markdown::HeadingLevel;
use crate::model::PageConfig;

/// Heading display text to the 1-based body page it is first drawn on.
pub type HeaderPageMap = HashMap<String, usize>;

/// 1-based body page to the section active at the end of that page.
pub type PageSectionMap = BTreeMap<usize, String>;

#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub header_pages: HeaderPageMap,
    pub page_sections: PageSectionMap,
    /// Section title to the page its heading is on.
    pub section_pages: HashMap<String, usize>,
    /// Navigable sections in document order.
    pub sections: Vec<String>,
    pub page_count: usize,
}

/// H2 titles that get a navigator dot: everything except the appendix
/// and the table of contents themselves. Duplicates collapse.
pub fn navigable_sections(blocks: &[MeasuredBlock]) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    for block in blocks {
        if let MeasuredBlock::Heading(h) = block {
            let lower = h.title.to_lowercase();
            if h.level == HeadingLevel::H2
                && lower != "appendix"
                && lower != "table of contents"
                && !sections.contains(&h.title)
            {
                sections.push(h.title.clone());
            }
        }
    }
    sections
}

pub fn simulate(blocks: &[MeasuredBlock], config: &PageConfig) -> Simulation {
    let sections = navigable_sections(blocks);
    let mut sim = Simulation {
        sections,
        ..Simulation::default()
    };
    let mut current = sim.sections.first().cloned().unwrap_or_default();
    let mut flow = Flow::new(config);

    for block in blocks {
        let before = flow.page();
        let placement = flow.place(block);
        for page in before..flow.page() {
            record_section(&mut sim.page_sections, page, &current);
        }

        if let MeasuredBlock::Heading(h) = block {
            let page = placement.first_page().unwrap_or(before);
            sim.header_pages.entry(h.text.clone()).or_insert(page);
            if h.level == HeadingLevel::H2 && sim.sections.contains(&h.title) {
                current = h.title.clone();
                sim.section_pages.entry(h.title.clone()).or_insert(page);
            }
        }
    }

    record_section(&mut sim.page_sections, flow.page(), &current);
    sim.page_count = flow.page();

    tracing::debug!(
        pages = sim.page_count,
        headers = sim.header_pages.len(),
        sections = sim.sections.len(),
        "simulated layout"
    );
    sim
}

fn record_section(map: &mut PageSectionMap, page: usize, section: &str) {
    if !section.is_empty() {
        map.insert(page, section.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::measure_all;
    use crate::markdown::parse;
    use crate::style::DocumentStyle;
    use pretty_assertions::assert_eq;

    fn run(md: &str) -> Simulation {
        let config = PageConfig::default();
        simulate(&measure_all(&parse(md), &DocumentStyle::default(), &config), &config)
    }

    #[test]
    fn records_each_distinct_header_once() {
        let sim = run("## 1. Overview\nText\n### 1.1 Detail\n## 2. Risks\n## 2. Risks\n");
        assert_eq!(sim.header_pages.len(), 3);
        assert_eq!(sim.header_pages["1. Overview"], 1);
        assert_eq!(sim.sections, vec!["Overview", "Risks"]);
        assert_eq!(sim.page_count, 1);
    }

    #[test]
    fn sections_follow_page_breaks() {
        let mut md = String::from("## Overview\n");
        md.push_str(&"Paragraph line\n".repeat(40));
        md.push_str("## Risks\n");
        md.push_str(&"Paragraph line\n".repeat(40));
        let sim = run(&md);
        assert_eq!(sim.page_count, 3);
        assert_eq!(sim.page_sections[&1], "Overview");
        assert_eq!(sim.section_pages["Risks"], 2);
        assert_eq!(sim.page_sections[&2], "Risks");
        assert_eq!(sim.page_sections[&3], "Risks");
    }

    #[test]
    fn appendix_is_not_a_section() {
        let sim = run("## Overview\n## Appendix\n| A |\n|---|\n| 1 |\n");
        assert_eq!(sim.sections, vec!["Overview"]);
        assert_eq!(sim.header_pages["Appendix"], 2);
        assert_eq!(sim.page_sections[&2], "Overview");
    }

    #[test]
    fn content_before_the_first_section_belongs_to_it() {
        let sim = run("Intro text\n## Overview\n");
        assert_eq!(sim.page_sections[&1], "Overview");
    }

    #[test]
    fn no_headings_means_no_sections() {
        let sim = run("Just text.");
        assert!(sim.page_sections.is_empty());
        assert_eq!(sim.page_count, 1);
    }
}
