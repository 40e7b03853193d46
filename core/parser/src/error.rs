//! FILENAME: core/parser/src/error.rs

use thiserror::Error;

/// Broad class of a parse failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorClass {
    /// The text could not be split into tokens.
    Lexical,
    /// The tokens do not form a valid expression.
    Syntax,
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ParseError {
    #[error("illegal character '{character}' in \"{expression}\"")]
    IllegalCharacter { character: char, expression: String },

    #[error("malformed number \"{text}\" in \"{expression}\"")]
    MalformedNumber { text: String, expression: String },

    #[error("unbalanced brackets in \"{expression}\"")]
    UnbalancedBrackets { expression: String },

    #[error("parenthesis mismatch in \"{expression}\"")]
    ParenthesisMismatch { expression: String },

    #[error("empty expression in \"{expression}\"")]
    EmptyExpression { expression: String },

    #[error("empty argument in call to \"{function}\" in \"{expression}\"")]
    EmptyArgument { function: String, expression: String },

    #[error("syntax fault in \"{expression}\"")]
    InvalidCall { expression: String },

    #[error("nesting deeper than {limit} levels in \"{expression}\"")]
    NestingTooDeep { limit: usize, expression: String },
}

impl ParseError {
    pub fn class(&self) -> ParseErrorClass {
        match self {
            ParseError::IllegalCharacter { .. } | ParseError::MalformedNumber { .. } => {
                ParseErrorClass::Lexical
            }
            _ => ParseErrorClass::Syntax,
        }
    }

    /// The expression text the error was raised for.
    pub fn expression(&self) -> &str {
        match self {
            ParseError::IllegalCharacter { expression, .. }
            | ParseError::MalformedNumber { expression, .. }
            | ParseError::UnbalancedBrackets { expression }
            | ParseError::ParenthesisMismatch { expression }
            | ParseError::EmptyExpression { expression }
            | ParseError::EmptyArgument { expression, .. }
            | ParseError::InvalidCall { expression }
            | ParseError::NestingTooDeep { expression, .. } => expression,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
