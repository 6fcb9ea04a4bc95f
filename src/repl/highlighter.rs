//! Syntax highlighter for MWDB queries
//!
//! Every keystroke re-annotates the whole line and paints each annotation
//! with the style chosen by the decoration mapper.

use nu_ansi_term::Style;
use reedline::{Highlighter, StyledText};

use crate::formatter::decoration_for;
use crate::parser::Annotator;

/// Query highlighter for reedline
#[derive(Debug, Clone, Default)]
pub struct QueryHighlighter {
    annotator: Annotator,
    enabled: bool,
}

impl QueryHighlighter {
    /// Create a new query highlighter
    ///
    /// # Arguments
    /// * `enabled` - Whether to apply styles; when false the line is shown as typed
    pub fn new(enabled: bool) -> Self {
        Self {
            annotator: Annotator::default(),
            enabled,
        }
    }
}

impl Highlighter for QueryHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        for annotation in self.annotator.annotate(line).annotations {
            let style = decoration_for(&annotation).style();
            styled.push((style, annotation.token.value));
        }

        styled
    }
}
