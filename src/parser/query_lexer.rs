//! Query lexer for the MWDB search language
//!
//! The lexer walks the input once, left to right, and classifies every byte of
//! it (whitespace included) so that the token values concatenate back to the
//! input. It tracks a small grammar state so it can report, after every token,
//! which categories are allowed next. That prediction is what drives field
//! completion in the editor.
//!
//! # Grammar
//!
//! ```text
//! query      := expr (ws (BOOL ws)? expr)*
//! expr       := ("NOT" ws | "-")? (group | field ":" value)
//! group      := "(" query ")"
//! field      := segment "*"? ("." segment "*"?)*
//! segment    := TERM | "\"json-escaped\""
//! value      := cmp? scalar | "(" scalar (ws (BOOL ws)? scalar)* ")"
//!             | ("[" | "{") scalar ws "TO" ws scalar ("]" | "}")
//!             | "(" query ")"
//! ```
//!
//! A `(` after `field:` opens a subquery (`parent:(tag:x)`) when the text
//! after it starts with a field reference followed by `:`; otherwise it opens
//! a group of values.
//!
//! Unlike the editor-oriented lexer in most shells, this one is strict: the
//! first token that does not fit the grammar stops the iteration with a
//! [`LexError`]. The annotator turns that into an error span.

use std::fmt;

use super::token::{CategorySet, Token, TokenCategory};

/// Input used to ask a tokenizer what may appear at the start of a query
pub const START_PROBE: &str = " ";

/// Lexing failure at a byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

impl LexError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LexError {}

/// One successfully recognized token
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    pub token: Token,
    /// Input left after this token
    pub remainder: &'a str,
    /// Categories that may follow this token
    pub valid_next: CategorySet,
}

pub type LexResult<'a> = Result<Lexeme<'a>, LexError>;

/// Contract between the annotator and a tokenizer
///
/// `tokenize` yields one item per recognized token. Iteration ends at the end
/// of input, or after yielding a single `Err`.
pub trait Tokenizer {
    fn tokenize<'a>(&self, input: &'a str) -> Box<dyn Iterator<Item = LexResult<'a>> + 'a>;

    /// Categories valid at the very start of a query
    fn start_categories(&self) -> CategorySet {
        self.tokenize(START_PROBE)
            .map_while(Result::ok)
            .last()
            .map(|lexeme| lexeme.valid_next)
            .unwrap_or_default()
    }
}

/// Tokenizer for the MWDB query language
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTokenizer;

impl Tokenizer for QueryTokenizer {
    fn tokenize<'a>(&self, input: &'a str) -> Box<dyn Iterator<Item = LexResult<'a>> + 'a> {
        Box::new(QueryLexer::new(input))
    }
}

/// Position in the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of an expression
    ExprStart,
    /// Right after a `-` prefix
    Negated,
    /// After `AND`, `OR` or `NOT`; whitespace must follow
    AfterOperator,
    FieldSegment,
    ArrayMarker,
    /// After a `.` inside a field reference
    FieldDot,
    /// After `field:`
    ValueStart,
    Comparison,
    /// A complete expression
    ExprEnd,
    ExprSpace,
    GroupValueStart,
    GroupValueEnd,
    GroupValueSpace,
    GroupOperator,
    RangeLow,
    RangeLowDone,
    RangeTo,
    RangeAfterTo,
    RangeHigh,
    RangeHighDone,
}

/// Open bracket construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Expr,
    ValueGroup,
    Range,
}

/// Strict, state-tracking lexer over a single query string
pub struct QueryLexer<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    frames: Vec<Frame>,
    finished: bool,
}

impl<'a> QueryLexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: State::ExprStart,
            frames: Vec::new(),
            finished: false,
        }
    }

    /// Tokenize the whole input, stopping at the first failure
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        QueryLexer::new(input)
            .map(|item| item.map(|lexeme| lexeme.token))
            .collect()
    }

    /// Categories allowed at the current position
    fn expected(&self) -> CategorySet {
        use TokenCategory::*;

        let mut set = match self.state {
            State::ExprStart => {
                CategorySet::from([Whitespace, Negation, ExprGroupOpen, FieldTerm, FieldPhrase])
            }
            State::Negated => CategorySet::from([ExprGroupOpen, FieldTerm, FieldPhrase]),
            State::AfterOperator
            | State::GroupOperator
            | State::RangeLowDone
            | State::RangeAfterTo
            | State::ExprEnd => CategorySet::from([Whitespace]),
            State::FieldSegment => {
                CategorySet::from([FieldSeparator, FieldArrayMarker, FieldValueSeparator])
            }
            State::ArrayMarker => CategorySet::from([FieldSeparator, FieldValueSeparator]),
            State::FieldDot => CategorySet::from([FieldTerm, FieldPhrase]),
            State::ValueStart => CategorySet::from([
                ValueTerm,
                ValuePhrase,
                ValueNumber,
                ComparisonOperator,
                ValueGroupOpen,
                ValueRangeOpen,
                ExprGroupOpen,
            ]),
            State::Comparison => CategorySet::from([ValueTerm, ValuePhrase, ValueNumber]),
            State::ExprSpace => CategorySet::from([
                Whitespace,
                BooleanOperator,
                Negation,
                ExprGroupOpen,
                FieldTerm,
                FieldPhrase,
            ]),
            State::GroupValueStart | State::RangeLow | State::RangeHigh => {
                CategorySet::from([Whitespace, ValueTerm, ValuePhrase, ValueNumber])
            }
            State::GroupValueEnd => CategorySet::from([Whitespace, ExprGroupClose]),
            State::GroupValueSpace => CategorySet::from([
                Whitespace,
                BooleanOperator,
                ValueTerm,
                ValuePhrase,
                ValueNumber,
                ExprGroupClose,
            ]),
            State::RangeTo => CategorySet::from([Whitespace, RangeOperator]),
            State::RangeHighDone => CategorySet::from([Whitespace, RangeClose]),
        };

        if matches!(self.state, State::ExprEnd | State::ExprSpace)
            && self.frames.last() == Some(&Frame::Expr)
        {
            set.insert(ExprGroupClose);
        }

        set
    }

    /// Recognize the token starting at the current position
    fn next_token(&mut self) -> Result<Token, LexError> {
        use TokenCategory::*;

        let input = self.input;
        let start = self.pos;
        let rest = &input[start..];
        let expected = self.expected();
        let Some(ch) = rest.chars().next() else {
            return Err(LexError::new(start, "Unexpected end of query"));
        };

        let (category, len) = if ch.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            (Whitespace, len)
        } else if ch == '.' && expected.contains(FieldSeparator) {
            (FieldSeparator, 1)
        } else if ch == '*' && expected.contains(FieldArrayMarker) {
            (FieldArrayMarker, 1)
        } else if ch == '-' && expected.contains(Negation) {
            (Negation, 1)
        } else {
            match ch {
                '(' if expected.contains(ValueGroupOpen) && !opens_subquery(&rest[1..]) => {
                    (ValueGroupOpen, 1)
                }
                '(' => (ExprGroupOpen, 1),
                ')' => (ExprGroupClose, 1),
                '[' | '{' => (ValueRangeOpen, 1),
                ']' | '}' => (RangeClose, 1),
                ':' => (FieldValueSeparator, 1),
                '<' | '>' if rest[1..].starts_with('=') => (ComparisonOperator, 2),
                '<' | '>' => (ComparisonOperator, 1),
                '"' => Self::scan_phrase(rest, start, &expected)?,
                _ => Self::scan_word(rest, start, ch, &expected)?,
            }
        };

        let value = &rest[..len];
        if !expected.contains(category) {
            return Err(LexError::new(
                start,
                format!(
                    "Unexpected {category} '{value}' at position {start}, expected one of: {expected}"
                ),
            ));
        }

        if category == FieldPhrase && serde_json::from_str::<String>(value).is_err() {
            return Err(LexError::new(
                start,
                format!("Invalid escape sequence in quoted field name at position {start}"),
            ));
        }

        self.pos = start + len;
        self.transition(category, value);

        Ok(Token::new(category, value, start))
    }

    /// Scan a double-quoted phrase, honouring backslash escapes
    fn scan_phrase(
        rest: &str,
        start: usize,
        expected: &CategorySet,
    ) -> Result<(TokenCategory, usize), LexError> {
        let category = if expected.contains(TokenCategory::FieldPhrase) {
            TokenCategory::FieldPhrase
        } else {
            TokenCategory::ValuePhrase
        };

        let mut escaped = false;
        for (idx, ch) in rest.char_indices().skip(1) {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => return Ok((category, idx + 1)),
                _ => {}
            }
        }

        Err(LexError::new(
            start,
            format!("Unterminated quoted phrase starting at position {start}"),
        ))
    }

    /// Scan a bare word and classify it as keyword, field term or value
    fn scan_word(
        rest: &str,
        start: usize,
        first: char,
        expected: &CategorySet,
    ) -> Result<(TokenCategory, usize), LexError> {
        use TokenCategory::*;

        let field_len = if expected.contains(FieldTerm) {
            rest.find(|c: char| !is_field_char(c)).unwrap_or(rest.len())
        } else {
            0
        };

        let (len, is_field) = if field_len > 0 {
            (field_len, true)
        } else {
            let len = rest.find(|c: char| !is_value_char(c)).unwrap_or(rest.len());
            (len, false)
        };

        if len == 0 {
            return Err(LexError::new(
                start,
                format!("Unexpected character '{first}' at position {start}"),
            ));
        }

        let word = &rest[..len];
        let category = match word {
            "AND" | "OR" if expected.contains(BooleanOperator) => BooleanOperator,
            "NOT" if expected.contains(Negation) => Negation,
            "TO" if expected.contains(RangeOperator) => RangeOperator,
            _ if is_field => FieldTerm,
            _ if is_number(word) => ValueNumber,
            _ => ValueTerm,
        };

        Ok((category, len))
    }

    /// Move to the grammar state that follows `category`
    fn transition(&mut self, category: TokenCategory, value: &str) {
        use State::*;
        use TokenCategory as C;

        self.state = match (category, self.state) {
            (C::Whitespace, ExprEnd | ExprSpace) => ExprSpace,
            (C::Whitespace, AfterOperator | ExprStart) => ExprStart,
            (C::Whitespace, GroupValueEnd | GroupValueSpace) => GroupValueSpace,
            (C::Whitespace, GroupOperator | GroupValueStart) => GroupValueStart,
            (C::Whitespace, RangeLowDone | RangeTo) => RangeTo,
            (C::Whitespace, RangeAfterTo | RangeHigh) => RangeHigh,
            (C::Whitespace, state) => state,
            (C::Negation, _) if value == "-" => Negated,
            (C::Negation, _) => AfterOperator,
            (C::BooleanOperator, GroupValueSpace) => GroupOperator,
            (C::BooleanOperator, _) => AfterOperator,
            (C::ExprGroupOpen, _) => {
                self.frames.push(Frame::Expr);
                ExprStart
            }
            (C::ValueGroupOpen, _) => {
                self.frames.push(Frame::ValueGroup);
                GroupValueStart
            }
            (C::ValueRangeOpen, _) => {
                self.frames.push(Frame::Range);
                RangeLow
            }
            (C::ExprGroupClose | C::RangeClose, _) => {
                self.frames.pop();
                ExprEnd
            }
            (C::FieldTerm | C::FieldPhrase, _) => FieldSegment,
            (C::FieldArrayMarker, _) => ArrayMarker,
            (C::FieldSeparator, _) => FieldDot,
            (C::FieldValueSeparator, _) => ValueStart,
            (C::ComparisonOperator, _) => Comparison,
            (C::RangeOperator, _) => RangeAfterTo,
            (C::ValuePhrase | C::ValueTerm | C::ValueNumber, GroupValueStart | GroupValueSpace) => {
                GroupValueEnd
            }
            (C::ValuePhrase | C::ValueTerm | C::ValueNumber, RangeLow) => RangeLowDone,
            (C::ValuePhrase | C::ValueTerm | C::ValueNumber, RangeHigh) => RangeHighDone,
            (C::ValuePhrase | C::ValueTerm | C::ValueNumber, _) => ExprEnd,
            (C::Error, state) => state,
        };
    }
}

impl<'a> Iterator for QueryLexer<'a> {
    type Item = LexResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.pos >= self.input.len() {
            return None;
        }

        let input = self.input;
        match self.next_token() {
            Ok(token) => Some(Ok(Lexeme {
                token,
                remainder: &input[self.pos..],
                valid_next: self.expected(),
            })),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_value_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | '<' | '>' | ':')
}

/// Whether the text after a value `(` begins with `field:`, possibly negated or grouped
fn opens_subquery(after_paren: &str) -> bool {
    let mut rest = after_paren.trim_start();
    while let Some(stripped) = rest
        .strip_prefix('(')
        .or_else(|| rest.strip_prefix('-'))
        .or_else(|| rest.strip_prefix("NOT "))
    {
        rest = stripped.trim_start();
    }

    let mut in_phrase = false;
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        if in_phrase {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_phrase = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_phrase = true,
            ':' => return idx > 0,
            '.' | '*' => {}
            c if is_field_char(c) => {}
            _ => return false,
        }
    }

    false
}

fn is_number(word: &str) -> bool {
    word.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        && word.chars().any(|c| c.is_ascii_digit())
        && word.parse::<f64>().is_ok()
}
