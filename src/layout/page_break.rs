//! # Page Break Decisions
//!
//! The rules for when content leaves the current page. Everything that
//! decides a break goes through this module, for both layout passes.

/// Minimum lines kept together at the foot and head of a split block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakRules {
    pub min_orphans: usize,
    pub min_widows: usize,
}

impl Default for BreakRules {
    fn default() -> Self {
        Self {
            min_orphans: 2,
            min_widows: 2,
        }
    }
}

/// What to do with a run of lines at the current cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// All lines fit here.
    Place,
    /// Start on the next page instead.
    MoveToNextPage,
    /// Put the first lines here and continue on the next page.
    Split { lines_on_current_page: usize },
}

/// The break predicate: content of height `required` placed at cursor `y`
/// would cross the bottom margin.
pub fn needs_break(y: f64, required: f64, bottom: f64) -> bool {
    y - required < bottom
}

/// Decide how a run of lines with the given heights is placed when
/// `remaining` points are left above the bottom margin.
///
/// Unsplittable runs either fit or move. Splittable runs are cut so that
/// neither page holds fewer lines than the rules allow.
pub fn decide_break(
    remaining: f64,
    line_heights: &[f64],
    splittable: bool,
    rules: BreakRules,
) -> BreakDecision {
    let total: f64 = line_heights.iter().sum();
    if total <= remaining {
        return BreakDecision::Place;
    }
    if !splittable {
        return BreakDecision::MoveToNextPage;
    }

    let fitting = fitting_lines(remaining, line_heights);
    let count = line_heights.len();

    if fitting < rules.min_orphans && fitting < count {
        return BreakDecision::MoveToNextPage;
    }

    let carried = count - fitting;
    let here = if carried > 0 && carried < rules.min_widows {
        fitting.saturating_sub(rules.min_widows - carried)
    } else {
        fitting
    };

    if here == 0 {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::Split {
            lines_on_current_page: here,
        }
    }
}

/// How many leading lines fit in `remaining`.
pub fn fitting_lines(remaining: f64, line_heights: &[f64]) -> usize {
    let mut used = 0.0;
    line_heights
        .iter()
        .take_while(|&&h| {
            used += h;
            used <= remaining
        })
        .count()
}
