//! Hinter for reedline - inline hints from field suggestions and history

use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History};

use super::completion::CompletionEngine;
use crate::vocabulary::FieldVocabulary;

/// Query hinter for reedline
///
/// While a field name is being typed the hint is the rest of the first
/// matching field; otherwise it falls back to the most recent history entry
/// sharing the typed prefix.
pub struct QueryHinter {
    /// Completion engine for field suggestions
    completion_engine: CompletionEngine,
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl QueryHinter {
    /// Create a new query hinter with default style
    ///
    /// # Arguments
    /// * `vocabulary` - Field vocabulary shared with the rest of the editor
    ///
    /// # Returns
    /// * `Self` - New hinter
    pub fn new(vocabulary: Arc<FieldVocabulary>) -> Self {
        Self {
            completion_engine: CompletionEngine::with_vocabulary(vocabulary),
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Remainder of the first field suggestion for a partially typed segment
    fn field_hint(&self, line: &str, pos: usize) -> Option<String> {
        let (start, candidates) = self.completion_engine.complete(line, pos);
        if start == pos {
            return None;
        }

        let typed = line.get(start..pos)?;
        candidates
            .into_iter()
            .find_map(|pair| pair.replacement.strip_prefix(typed).map(str::to_string))
    }

    /// Remainder of the latest history entry starting with `line`
    fn history_hint(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(reedline::SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()?
            .into_iter()
            .next()?;

        item.command_line
            .strip_prefix(line)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Hinter for QueryHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Query history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        // Only hint with the cursor at the end of a non-empty line
        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let Some(hint) = self
            .field_hint(line, pos)
            .or_else(|| Self::history_hint(line, history))
        else {
            return String::new();
        };

        self.current_hint = hint;
        if use_ansi_coloring {
            self.style.paint(&self.current_hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn next_hint_token(&self) -> String {
        self.current_hint
            .split_inclusive(['.', ':', ' '])
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::FileBackedHistory;

    fn create_test_hinter() -> QueryHinter {
        QueryHinter::new(Arc::new(FieldVocabulary::builtin()))
    }

    fn create_test_history() -> Box<dyn History> {
        Box::new(FileBackedHistory::new(100).expect("Failed to create history"))
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("", 0, history.as_ref(), true, "/tmp"), "");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("uploa", 2, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_field_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        let hint = hinter.handle("tag:x AND uploa", 15, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "der:");
        assert_eq!(hinter.complete_hint(), "der:");
        assert_eq!(hinter.next_hint_token(), "der:");
    }

    #[test]
    fn test_subfield_hint_token_stops_at_dot() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        let hint = hinter.handle("attri", 5, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "bute.");
        assert_eq!(hinter.next_hint_token(), "bute.");
    }

    #[test]
    fn test_colored_hint() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        let hint = hinter.handle("md", 2, history.as_ref(), true, "/tmp");
        assert!(hint.contains("5:"));
        assert!(hint.starts_with('\u{1b}'));
        assert_eq!(hinter.complete_hint(), "5:");
    }

    #[test]
    fn test_no_hint_inside_value() {
        let mut hinter = create_test_hinter();
        let history = create_test_history();
        assert_eq!(hinter.handle("tag:emo", 7, history.as_ref(), false, "/tmp"), "");
        assert_eq!(hinter.next_hint_token(), "");
    }
}
