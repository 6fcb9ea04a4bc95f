//! Human-readable rendering of annotated queries
//!
//! The query is printed painted with the same styles the editor uses,
//! followed by the field path and, for malformed queries, a caret line
//! pointing at the error.

use nu_ansi_term::{Color, Style};

use super::decoration::{StyleIntent, decoration_for};
use super::table::format_field_path;
use crate::parser::AnnotatedQuery;
use crate::repl::completion::FieldSuggestion;

/// Shell-style formatter
pub struct ShellFormatter {
    use_colors: bool,
}

impl ShellFormatter {
    /// Create a new shell formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Query text with highlight styles applied
    pub fn paint_query(&self, annotated: &AnnotatedQuery) -> String {
        annotated
            .annotations
            .iter()
            .map(|annotation| self.paint(decoration_for(annotation), annotation.value()))
            .collect()
    }

    /// Painted query, field path and error pointer
    pub fn format_annotated(&self, annotated: &AnnotatedQuery) -> String {
        let mut lines = vec![self.paint_query(annotated)];

        if let Some(error) = annotated.error() {
            let text = annotated.text();
            lines.push(self.caret_line(&text, error.offset()));
            lines.push(self.error_text(error.error_message.as_deref().unwrap_or_default()));
        }

        lines.push(format!(
            "{} {}",
            self.dim("field path:"),
            format_field_path(&annotated.current_field_path)
        ));
        lines.join("\n")
    }

    /// One field per line with its description
    pub fn format_suggestions(&self, suggestions: &[FieldSuggestion]) -> String {
        if suggestions.is_empty() {
            return self.dim("(no suggestions)");
        }

        let width = suggestions
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or_default();

        suggestions
            .iter()
            .map(|suggestion| {
                let padding = " ".repeat(width - suggestion.name.chars().count());
                format!(
                    "{}{padding}  {}",
                    self.paint(StyleIntent::Field, &suggestion.name),
                    self.dim(&format!(
                        "[{}] {}",
                        suggestion.object_type, suggestion.description
                    ))
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A `^` under the byte `offset` of `text`
    pub fn caret_line(&self, text: &str, offset: usize) -> String {
        let column = text
            .get(..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset);
        format!("{}{}", " ".repeat(column), self.paint(StyleIntent::Error, "^"))
    }

    /// Error message in red
    pub fn error_text(&self, message: &str) -> String {
        if self.use_colors {
            Color::Red.paint(format!("Error: {message}")).to_string()
        } else {
            format!("Error: {message}")
        }
    }

    fn paint(&self, intent: StyleIntent, text: &str) -> String {
        if self.use_colors && intent != StyleIntent::Plain {
            intent.style().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            Style::new().fg(Color::DarkGray).paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::annotate;
    use crate::repl::completion::suggest_fields;
    use crate::vocabulary::FieldVocabulary;

    #[test]
    fn test_plain_rendering() {
        let formatter = ShellFormatter::new(false);
        let output = formatter.format_annotated(&annotate("tag:x AND sha"));
        assert_eq!(output, "tag:x AND sha\nfield path: sha");
    }

    #[test]
    fn test_error_caret() {
        let formatter = ShellFormatter::new(false);
        let output = formatter.format_annotated(&annotate("tag:a )"));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "tag:a )");
        assert_eq!(lines[1], "      ^");
        assert!(lines[2].starts_with("Error: Unexpected expr-group-close"));
        assert_eq!(lines[3], "field path: ");
    }

    #[test]
    fn test_caret_counts_chars_not_bytes() {
        let formatter = ShellFormatter::new(false);
        let text = "name:\"zażółć\" )";
        let offset = text.find(')').unwrap();
        assert_eq!(formatter.caret_line(text, offset), format!("{}^", " ".repeat(14)));
    }

    #[test]
    fn test_colored_rendering_keeps_text() {
        let formatter = ShellFormatter::new(true);
        let painted = formatter.paint_query(&annotate("(tag:\"a\""));
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("tag"));
    }

    #[test]
    fn test_suggestions_aligned() {
        let formatter = ShellFormatter::new(false);
        let suggestions = suggest_fields(&["md".to_string()], &FieldVocabulary::builtin());
        assert_eq!(formatter.format_suggestions(&suggestions), "md5  [file] MD5 digest");
        assert_eq!(formatter.format_suggestions(&[]), "(no suggestions)");
    }
}
