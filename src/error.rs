//! Structured error types for the report renderer.
//!
//! Content problems (unparseable prices, malformed tables) never reach this
//! type; they degrade locally. What remains are input decoding failures and
//! failures to produce a consistent document.

use thiserror::Error;

/// The unified error type returned by all public folio API functions.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON input failed to parse as a report or as render options.
    #[error("failed to parse {context}: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Drawing or PDF generation failed.
    #[error("render error: {0}")]
    Render(String),

    /// The draw pass placed content somewhere the measurement pass did not.
    #[error("layout passes disagree on {what}: simulated {simulated}, drawn {drawn}")]
    LayoutMismatch {
        what: String,
        simulated: usize,
        drawn: usize,
    },
}

impl ReportError {
    /// Wrap a JSON error with the name of the thing being decoded.
    pub fn parse(context: &'static str, source: serde_json::Error) -> Self {
        let hint = match source.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => format!(
                "The JSON is valid but doesn't match the {context} schema. Check field names and types."
            ),
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse {
            context,
            source,
            hint,
        }
    }

    /// A human-readable suggestion for fixing the input, if there is one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ReportError::Parse { hint, .. } if !hint.is_empty() => Some(hint),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::parse("report", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: ReportError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        assert!(err.hint().unwrap().contains("trailing commas"));
        assert!(err.to_string().starts_with("failed to parse report"));
    }

    #[test]
    fn truncated_input_is_reported_as_eof() {
        let err = ReportError::parse(
            "render options",
            serde_json::from_str::<serde_json::Value>("{ \"theme\": ").unwrap_err(),
        );
        assert!(err.hint().unwrap().contains("truncated"));
        assert!(err.to_string().contains("render options"));
    }

    #[test]
    fn mismatch_message_names_both_sides() {
        let err = ReportError::LayoutMismatch {
            what: "body page count".to_string(),
            simulated: 4,
            drawn: 5,
        };
        assert_eq!(
            err.to_string(),
            "layout passes disagree on body page count: simulated 4, drawn 5"
        );
        assert!(err.hint().is_none());
    }
}
