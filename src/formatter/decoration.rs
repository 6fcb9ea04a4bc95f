//! Mapping from annotations to highlight styles
//!
//! [`decoration_for`] decides *what* an annotation looks like in the abstract;
//! [`StyleIntent::style`] decides how that is painted on a terminal. Both the
//! editor highlighter and the shell output formatter go through here, so a
//! query looks the same while typed and when printed.

use nu_ansi_term::{Color, Style};
use serde::Serialize;

use crate::parser::Annotation;

/// Abstract highlight class of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleIntent {
    /// The group-open bracket new input lands in
    ActiveBracket,
    Operator,
    Field,
    /// Quoted value
    Literal,
    /// Unparseable tail
    Error,
    Plain,
}

/// Style intent of one annotation; the first matching rule wins
pub fn decoration_for(annotation: &Annotation) -> StyleIntent {
    let category = annotation.category();

    if annotation.is_innermost_open_bracket {
        StyleIntent::ActiveBracket
    } else if category.is_operator() {
        StyleIntent::Operator
    } else if category.is_field_name() {
        StyleIntent::Field
    } else if category.is_literal_phrase() {
        StyleIntent::Literal
    } else if annotation.error_message.is_some() {
        StyleIntent::Error
    } else {
        StyleIntent::Plain
    }
}

impl StyleIntent {
    /// Terminal style for this intent
    pub fn style(self) -> Style {
        match self {
            StyleIntent::ActiveBracket => Style::new().bold().fg(Color::Cyan).on(Color::DarkGray),
            StyleIntent::Operator => Style::new().fg(Color::Magenta),
            StyleIntent::Field => Style::new().bold().fg(Color::Blue),
            StyleIntent::Literal => Style::new().fg(Color::Yellow),
            StyleIntent::Error => Style::new().underline().fg(Color::Red),
            StyleIntent::Plain => Style::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleIntent::ActiveBracket => "active-bracket",
            StyleIntent::Operator => "operator",
            StyleIntent::Field => "field",
            StyleIntent::Literal => "literal",
            StyleIntent::Error => "error",
            StyleIntent::Plain => "plain",
        }
    }
}
