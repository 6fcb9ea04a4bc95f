use super::*;

/// Tokenizer that replays a fixed script, for driving the annotator directly
struct ScriptedTokenizer {
    tokens: Vec<(TokenCategory, &'static str)>,
    fail: Option<&'static str>,
    last_valid_next: CategorySet,
}

impl ScriptedTokenizer {
    fn new(tokens: Vec<(TokenCategory, &'static str)>) -> Self {
        Self {
            tokens,
            fail: None,
            last_valid_next: CategorySet::new(),
        }
    }

    fn failing_with(mut self, message: &'static str) -> Self {
        self.fail = Some(message);
        self
    }

    fn predicting(mut self, valid_next: CategorySet) -> Self {
        self.last_valid_next = valid_next;
        self
    }
}

impl Tokenizer for ScriptedTokenizer {
    fn tokenize<'a>(&self, input: &'a str) -> Box<dyn Iterator<Item = LexResult<'a>> + 'a> {
        let mut items = Vec::new();
        let mut offset = 0;
        let count = self.tokens.len();
        for (idx, (category, value)) in self.tokens.iter().enumerate() {
            let token = Token::new(*category, *value, offset);
            offset = token.end();
            let valid_next = if idx + 1 == count {
                self.last_valid_next.clone()
            } else {
                CategorySet::new()
            };
            items.push(Ok(Lexeme {
                token,
                remainder: &input[offset.min(input.len())..],
                valid_next,
            }));
        }
        if let Some(message) = self.fail {
            items.push(Err(LexError::new(offset, message)));
        }
        Box::new(items.into_iter())
    }

    fn start_categories(&self) -> CategorySet {
        CategorySet::from([TokenCategory::FieldTerm])
    }
}

fn innermost_flags(query: &AnnotatedQuery) -> Vec<(usize, bool)> {
    query
        .annotations
        .iter()
        .filter(|a| a.category().role() == CategoryRole::GroupOpen)
        .map(|a| (a.offset(), a.is_innermost_open_bracket))
        .collect()
}

#[test]
fn test_empty_query_uses_start_categories() {
    let result = annotate("");
    assert!(result.annotations.is_empty());
    assert_eq!(result.current_field_path, vec![String::new()]);
}

#[test]
fn test_no_brackets_means_no_innermost_flag() {
    for query in ["tag:emotet", "size:>5 AND name:\"a b\"", "cfg.urls*:x", "tag:a )"] {
        let result = annotate(query);
        assert!(
            result.annotations.iter().all(|a| !a.is_innermost_open_bracket),
            "{query}"
        );
    }
}

#[test]
fn test_balanced_brackets_leave_no_error() {
    for query in [
        "(tag:a)",
        "((tag:a OR tag:b) AND size:[1 TO 2])",
        "tag:(a OR b) -(name:x)",
    ] {
        let result = annotate(query);
        assert!(!result.has_error(), "{query}");
        assert_eq!(result.text(), query);
    }
}

#[test]
fn test_unbalanced_open_keeps_last_open_active() {
    let result = annotate("(tag:a OR (size:1) OR (name:x");
    assert!(!result.has_error());
    let flags = innermost_flags(&result);
    let last_open = flags.last().unwrap();
    assert!(last_open.1);
    assert_eq!(last_open.0, "(tag:a OR (size:1) OR ".len());
    // first group lost focus when the third was opened
    assert!(!flags[0].1);
}

#[test]
fn test_nested_groups_mark_only_innermost() {
    let result = annotate("((");
    assert_eq!(innermost_flags(&result), vec![(0, false), (1, true)]);
}

#[test]
fn test_closing_returns_focus_to_enclosing_group() {
    let result = annotate("((tag:a) ");
    let flags = innermost_flags(&result);
    assert_eq!(flags, vec![(0, true), (1, true)]);
}

#[test]
fn test_subquery_parses_as_nested_group() {
    let query = "parent:(tag:x AND size:>5)";
    let result = annotate(query);
    assert!(!result.has_error());
    assert_eq!(result.text(), query);
    assert_eq!(result.annotations[2].category(), TokenCategory::ExprGroupOpen);
    assert!(Parser::new().parse(query).is_ok());

    let partial = annotate("parent:(tag:x AND si");
    assert!(!partial.has_error());
    assert_eq!(partial.current_field_path, vec!["si"]);
}

#[test]
fn test_field_path_after_error_is_empty_name() {
    let result = annotate("tag:a ) si");
    assert!(result.has_error());
    assert_eq!(result.current_field_path, vec![""]);
}

#[test]
fn test_scripted_pop_on_empty_stack_is_ignored() {
    let tokenizer = ScriptedTokenizer::new(vec![(TokenCategory::ExprGroupClose, ")")]);
    let result = Annotator::new(tokenizer).annotate(")");
    assert_eq!(result.annotations.len(), 1);
    assert!(!result.annotations[0].is_innermost_open_bracket);
}

#[test]
fn test_reconstruction_and_offsets() {
    let query = "NOT tag:\"zażółć\" AND (cfg.\"url s\"*:[* TO 5] OR size:<=10)";
    let result = annotate(query);
    assert!(!result.has_error());
    assert_eq!(result.text(), query);

    let mut sum = 0;
    for annotation in &result.annotations {
        assert_eq!(annotation.offset(), sum);
        sum += annotation.value().len();
    }
}

#[test]
fn test_error_covers_tail_from_cursor() {
    let query = "tag:a AND )";
    let result = annotate(query);
    let error = result.error().unwrap();
    assert_eq!(error.offset(), "tag:a AND ".len());
    assert_eq!(error.value(), ")");
    assert!(error.error_message.as_deref().unwrap().contains("expr-group-close"));
    assert_eq!(result.text(), query);
}

#[test]
fn test_prefix_preserved_under_error() {
    for query in ["(tag:a OR )", "size:[1 TO 5 )", "tag:\"open", "a.b:c d:e )x"] {
        let result = annotate(query);
        let error = result.error().unwrap();
        let prefix = annotate(&query[..error.offset()]);

        let before: Vec<_> = result.annotations[..result.annotations.len() - 1].to_vec();
        assert_eq!(before, prefix.annotations, "{query}");
        assert_eq!(error.value(), &query[error.offset()..]);
        assert_eq!(
            result.annotations.iter().filter(|a| a.is_error()).count(),
            1
        );
    }
}

#[test]
fn test_error_reported_past_cursor_still_starts_at_cursor() {
    let tokenizer = ScriptedTokenizer::new(vec![(TokenCategory::FieldTerm, "tag")])
        .failing_with("boom");
    let result = Annotator::new(tokenizer).annotate("tag  $$");
    let error = result.error().unwrap();
    assert_eq!(error.offset(), 3);
    assert_eq!(error.value(), "  $$");
    assert_eq!(error.error_message.as_deref(), Some("boom"));
}

#[test]
fn test_error_on_first_token() {
    let result = annotate("$");
    assert_eq!(result.annotations.len(), 1);
    assert!(result.has_error());
    assert!(result.current_field_path.is_empty());
}

#[test]
fn test_field_followed_by_operator_resets_path() {
    assert!(annotate("tag:emotet").current_field_path.is_empty());
    assert!(annotate("tag:").current_field_path.is_empty());
    assert!(annotate("size:>=").current_field_path.is_empty());
}

#[test]
fn test_simple_field_path() {
    assert_eq!(annotate("ta").current_field_path, vec!["ta"]);
    assert_eq!(
        annotate("tag:a AND sha").current_field_path,
        vec!["sha"]
    );
}

#[test]
fn test_field_path_crosses_separators_and_markers() {
    assert_eq!(
        annotate("cfg.urls*.ho").current_field_path,
        vec!["cfg", "urls", "ho"]
    );
    assert_eq!(
        annotate("attribute.\"my key\"").current_field_path,
        vec!["attribute", "my key"]
    );
}

#[test]
fn test_trailing_separator_adds_placeholder() {
    assert_eq!(
        annotate("attribute.").current_field_path,
        vec!["attribute", ""]
    );
}

#[test]
fn test_trailing_array_marker_clears_path() {
    // after `*` only `.` or `:` may follow, and the last token is not a name
    assert!(annotate("cfg.urls*").current_field_path.is_empty());
}

#[test]
fn test_whitespace_between_expressions_predicts_new_field() {
    assert_eq!(annotate("tag:a ").current_field_path, vec![""]);
    assert_eq!(annotate("(").current_field_path, vec![""]);
    assert!(annotate("tag:a AND").current_field_path.is_empty());
}

#[test]
fn test_scripted_field_only_so_far() {
    let tokenizer = ScriptedTokenizer::new(vec![(TokenCategory::FieldTerm, "fam")]);
    let result = Annotator::new(tokenizer).annotate("fam");
    assert_eq!(result.current_field_path, vec!["fam"]);
}

#[test]
fn test_scripted_trailing_separator() {
    let tokenizer = ScriptedTokenizer::new(vec![
        (TokenCategory::FieldTerm, "cfg"),
        (TokenCategory::FieldSeparator, "."),
    ])
    .predicting(CategorySet::from([TokenCategory::FieldTerm]));
    let result = Annotator::new(tokenizer).annotate("cfg.");
    assert_eq!(result.current_field_path, vec!["cfg", ""]);
}

#[test]
fn test_scripted_empty_query_probes_start() {
    let tokenizer = ScriptedTokenizer::new(Vec::new());
    let result = Annotator::new(tokenizer).annotate("");
    assert_eq!(result.current_field_path, vec![""]);
}

#[test]
fn test_serialized_shape() {
    let result = annotate("(ta");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["annotations"][0]["category"], "expr-group-open");
    assert_eq!(json["annotations"][0]["is_innermost_open_bracket"], true);
    assert!(json["annotations"][1].get("is_innermost_open_bracket").is_none());
    assert_eq!(json["current_field_path"][0], "ta");
}
