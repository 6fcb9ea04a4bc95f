use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, History, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};

use std::sync::Arc;

use crate::config::{Config, HistoryConfig};
use crate::error::{MwqlError, Result};
use crate::parser::{AnnotatedQuery, Parser};
use crate::vocabulary::FieldVocabulary;

use super::completer::QueryCompleter;
use super::highlighter::QueryHighlighter;
use super::hinter::QueryHinter;
use super::prompt::QueryPrompt;

const COMPLETION_MENU: &str = "completion_menu";

/// Outcome of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// A line was entered
    Line(String),
    /// Ctrl-C; the current line was discarded
    Interrupted,
    /// Ctrl-D
    Exit,
}

/// REPL engine for interactive query editing
pub struct ReplEngine {
    /// Line editor with highlighting, completion and hints
    editor: Reedline,

    prompt: QueryPrompt,

    /// Parser gating submitted queries
    parser: Parser,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `config` - Effective configuration (display and history sections are used)
    /// * `vocabulary` - Field vocabulary for completion and hints
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(config: &Config, vocabulary: Arc<FieldVocabulary>) -> Result<Self> {
        let display_config = &config.display;

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let completion_menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

        let mut editor = Reedline::create()
            .with_history(Self::create_history(&config.history)?)
            .with_highlighter(Box::new(QueryHighlighter::new(
                display_config.syntax_highlighting,
            )))
            .with_completer(Box::new(QueryCompleter::new(vocabulary.clone())))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_ansi_colors(display_config.color_output);

        if display_config.hints {
            editor = editor.with_hinter(Box::new(QueryHinter::new(vocabulary)));
        }

        tracing::debug!(
            highlighting = display_config.syntax_highlighting,
            hints = display_config.hints,
            persist_history = config.history.persist,
            "query editor ready"
        );

        Ok(Self {
            editor,
            prompt: QueryPrompt::new(display_config.prompt.clone()),
            parser: Parser::new(),
        })
    }

    /// History backend, file-backed when persistence is enabled
    fn create_history(history_config: &HistoryConfig) -> Result<Box<dyn History>> {
        let history = if history_config.persist {
            FileBackedHistory::with_file(
                history_config.max_size,
                history_config.file_path.clone(),
            )
        } else {
            FileBackedHistory::new(history_config.max_size)
        };

        history
            .map(|history| Box::new(history) as Box<dyn History>)
            .map_err(|e| MwqlError::Generic(format!("Failed to open history: {e}")))
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<ReplInput>` - Entered line, interrupt or end of input
    pub fn read_line(&mut self) -> Result<ReplInput> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(ReplInput::Line(line)),
            Signal::CtrlC => Ok(ReplInput::Interrupted),
            Signal::CtrlD => Ok(ReplInput::Exit),
            #[allow(unreachable_patterns)]
            _ => Ok(ReplInput::Exit),
        }
    }

    /// Check a submitted line
    ///
    /// A line is accepted unless annotating it produces an error span.
    ///
    /// # Arguments
    /// * `input` - Submitted line
    ///
    /// # Returns
    /// * `Result<AnnotatedQuery>` - Annotations of the trimmed query, or the rejection
    pub fn process_input(&self, input: &str) -> Result<AnnotatedQuery> {
        let result = self.parser.parse(input);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "query rejected");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    fn create_test_engine() -> ReplEngine {
        let mut config = Config::default();
        config.history.persist = false;
        ReplEngine::new(&config, Arc::new(FieldVocabulary::builtin())).unwrap()
    }

    #[test]
    fn test_accepts_clean_query() {
        let engine = create_test_engine();
        let annotated = engine.process_input("  tag:emotet AND size:>100 ").unwrap();
        assert_eq!(annotated.text(), "tag:emotet AND size:>100");
    }

    #[test]
    fn test_accepts_unclosed_group() {
        let engine = create_test_engine();
        assert!(engine.process_input("(tag:a OR tag:b").is_ok());
    }

    #[test]
    fn test_rejects_malformed_query() {
        let engine = create_test_engine();
        match engine.process_input("tag:a )") {
            Err(MwqlError::Query(QueryError::Malformed { offset, .. })) => assert_eq!(offset, 6),
            other => panic!("expected malformed query, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_blank_line() {
        let engine = create_test_engine();
        assert!(matches!(
            engine.process_input("   "),
            Err(MwqlError::Query(QueryError::Empty))
        ));
    }

    #[test]
    fn test_engine_builds_with_display_features_off() {
        let mut config = Config::default();
        config.history.persist = false;
        config.display.hints = false;
        config.display.syntax_highlighting = false;
        config.display.color_output = false;
        config.display.prompt = "q> ".to_string();
        let engine = ReplEngine::new(&config, Arc::new(FieldVocabulary::builtin())).unwrap();
        assert!(engine.process_input("tag:x").is_ok());
    }

    #[test]
    fn test_history_in_memory_when_not_persisted() {
        let config = HistoryConfig {
            persist: false,
            ..HistoryConfig::default()
        };
        let history = ReplEngine::create_history(&config).unwrap();
        assert_eq!(history.count_all().unwrap(), 0);
    }
}
