//! FILENAME: core/parser/src/token.rs
//! PURPOSE: Token definitions and character classes for the expression tokenizer.
//! CONTEXT: Tokens are the atomic units produced by the tokenizer and split
//! apart by the tree builder. Unlike a typed token enum, every token keeps its
//! source text so operators can be told apart by text within a kind.

/// Arithmetic operator characters.
pub const OPERATOR_CHARS: &str = "*/^%+-!~";
/// Relational operator characters. Two-character forms are merged by lookahead.
pub const RELATIONAL_CHARS: &str = "<>=";
/// Boolean operator characters: & (and), | (or), ? (xor).
pub const BOOLEAN_CHARS: &str = "&|?";
pub const BRACKET_OPEN_CHARS: &str = "{[(";
pub const BRACKET_CLOSE_CHARS: &str = "}])";
pub const PARAM_DELIMITER: char = ',';
/// Placeholder for the result of the previous statement.
pub const PREVIOUS_VALUE: char = '_';

/// The two-character relational operators the tokenizer will merge.
pub const RELATIONAL_PAIRS: [&str; 3] = ["<=", ">=", "<>"];

/// Classification of a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Number,
    Identifier,
    /// `* / ^ % + - ! ~`
    Operator,
    /// `< > <= >= <> =`
    Relational,
    /// `& | ?`
    Boolean,
    ParenOpen,
    ParenClose,
    ParamDelimiter,
    /// `_`
    PreviousValue,
    Invalid,
}

impl TokenKind {
    /// Classifies a single character.
    ///
    /// `first` is true when the character starts a token; identifiers may
    /// only start with a letter but continue with letters or digits.
    pub fn classify(ch: char, first: bool) -> TokenKind {
        if ch == PARAM_DELIMITER {
            TokenKind::ParamDelimiter
        } else if OPERATOR_CHARS.contains(ch) {
            TokenKind::Operator
        } else if BRACKET_OPEN_CHARS.contains(ch) {
            TokenKind::ParenOpen
        } else if BRACKET_CLOSE_CHARS.contains(ch) {
            TokenKind::ParenClose
        } else if RELATIONAL_CHARS.contains(ch) {
            TokenKind::Relational
        } else if BOOLEAN_CHARS.contains(ch) {
            TokenKind::Boolean
        } else if ch.is_ascii_digit() || ch == '.' {
            TokenKind::Number
        } else if ch == PREVIOUS_VALUE {
            TokenKind::PreviousValue
        } else if ch.is_ascii_alphabetic() || (!first && ch.is_ascii_digit()) {
            TokenKind::Identifier
        } else {
            TokenKind::Invalid
        }
    }

    /// True for the kinds the tree builder may split on.
    pub fn is_operation(self) -> bool {
        matches!(
            self,
            TokenKind::Operator | TokenKind::Relational | TokenKind::Boolean
        )
    }
}

/// A token: its source text plus its kind.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            kind,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::Relational => "relational operator",
            TokenKind::Boolean => "boolean operator",
            TokenKind::ParenOpen => "opening bracket",
            TokenKind::ParenClose => "closing bracket",
            TokenKind::ParamDelimiter => "parameter delimiter",
            TokenKind::PreviousValue => "previous value",
            TokenKind::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}
