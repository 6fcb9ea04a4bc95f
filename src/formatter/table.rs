//! Table formatting using tabled
//!
//! Renders annotation lists, field suggestions and the field vocabulary as
//! terminal tables built with the `Builder` API.

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use super::decoration::decoration_for;
use crate::parser::AnnotatedQuery;
use crate::repl::completion::FieldSuggestion;
use crate::vocabulary::{FieldVocabulary, ObjectType};

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 48;

/// Table formatter
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with box drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Rounded style
    Rounded,
    /// Markdown style
    Markdown,
    /// Psql style
    Psql,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self::with_colors(false)
    }

    /// Create a new table formatter with color support
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored header
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
            use_colors,
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// One row per annotation: offset, category, value, style, flags
    ///
    /// # Arguments
    /// * `annotated` - Annotation result to render
    ///
    /// # Returns
    /// * `String` - Rendered table; the field path follows on its own line
    pub fn format_annotations(&self, annotated: &AnnotatedQuery) -> String {
        let mut rows = Vec::with_capacity(annotated.annotations.len());
        for annotation in &annotated.annotations {
            let mut notes = Vec::new();
            if annotation.is_innermost_open_bracket {
                notes.push("innermost".to_string());
            }
            if let Some(message) = &annotation.error_message {
                notes.push(message.clone());
            }
            rows.push(vec![
                annotation.offset().to_string(),
                annotation.category().to_string(),
                format!("{:?}", annotation.value()),
                decoration_for(annotation).as_str().to_string(),
                notes.join("; "),
            ]);
        }

        let table = self.build(&["offset", "category", "value", "style", "notes"], rows);
        format!(
            "{table}\nfield path: {}",
            format_field_path(&annotated.current_field_path)
        )
    }

    /// One row per suggested field
    pub fn format_suggestions(&self, suggestions: &[FieldSuggestion]) -> String {
        if suggestions.is_empty() {
            return "(no suggestions)".to_string();
        }

        let rows = suggestions
            .iter()
            .map(|suggestion| {
                vec![
                    suggestion.name.clone(),
                    suggestion.object_type.to_string(),
                    flags(suggestion.has_subfields, suggestion.has_subquery),
                    suggestion.description.clone(),
                ]
            })
            .collect();

        self.build(&["field", "type", "flags", "description"], rows)
    }

    /// Vocabulary fields, optionally limited to one object type
    pub fn format_fields(
        &self,
        vocabulary: &FieldVocabulary,
        object_type: Option<ObjectType>,
    ) -> String {
        let rows: Vec<Vec<String>> = vocabulary
            .iter()
            .filter(|(ty, _)| object_type.is_none_or(|wanted| wanted == *ty))
            .map(|(ty, field)| {
                vec![
                    ty.to_string(),
                    field.name.clone(),
                    flags(field.has_subfields, field.has_subquery),
                    field.description.clone(),
                ]
            })
            .collect();

        if rows.is_empty() {
            return "(no fields)".to_string();
        }

        self.build(&["type", "field", "flags", "description"], rows)
    }

    /// Build and style a table from a header and rows
    fn build(&self, header: &[&str], rows: Vec<Vec<String>>) -> String {
        let mut builder = Builder::default();
        builder.push_record(header.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // Wrap long values instead of truncating them
        for i in 0..header.len() {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }

    /// Apply table style
    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Markdown => table.with(Style::markdown()),
            TableStyle::Psql => table.with(Style::psql()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Field path as `a.b.` style text, or `-` when empty
pub fn format_field_path(path: &[String]) -> String {
    if path.is_empty() {
        "-".to_string()
    } else {
        path.join(".")
    }
}

fn flags(has_subfields: bool, has_subquery: bool) -> String {
    match (has_subfields, has_subquery) {
        (true, true) => "subfields, subquery",
        (true, false) => "subfields",
        (false, true) => "subquery",
        (false, false) => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::annotate;
    use crate::repl::completion::suggest_fields;

    #[test]
    fn test_annotation_table() {
        let formatter = TableFormatter::new().with_style(TableStyle::Ascii);
        let output = formatter.format_annotations(&annotate("(tag:a )"));

        assert!(output.contains("expr-group-open"));
        assert!(output.contains("innermost"));
        assert!(output.contains("active-bracket"));
        assert!(output.contains("\"tag\""));
        assert!(output.ends_with("field path: -"));
        assert!(output.starts_with('+'));
    }

    #[test]
    fn test_annotation_table_shows_error() {
        let formatter = TableFormatter::new().with_style(TableStyle::Psql);
        let output = formatter.format_annotations(&annotate("tag:a )"));
        assert!(output.contains("error"));
        assert!(output.contains("Unexpected expr-group-close"));
        assert!(output.ends_with("field path: "));
    }

    #[test]
    fn test_suggestion_table() {
        let vocabulary = FieldVocabulary::builtin();
        let suggestions = suggest_fields(&["attr".to_string()], &vocabulary);
        let output = TableFormatter::new().format_suggestions(&suggestions);
        assert!(output.contains("attribute"));
        assert!(output.contains("subfields"));

        assert_eq!(TableFormatter::new().format_suggestions(&[]), "(no suggestions)");
    }

    #[test]
    fn test_fields_table_filter() {
        let vocabulary = FieldVocabulary::builtin();
        let output = TableFormatter::new()
            .with_style(TableStyle::Markdown)
            .format_fields(&vocabulary, Some(ObjectType::Config));
        assert!(output.contains("family"));
        assert!(!output.contains("sha256"));
    }

    #[test]
    fn test_field_path_text() {
        assert_eq!(format_field_path(&[]), "-");
        assert_eq!(
            format_field_path(&["cfg".to_string(), String::new()]),
            "cfg."
        );
    }
}
