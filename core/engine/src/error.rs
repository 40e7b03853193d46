//! FILENAME: core/engine/src/error.rs

use calc_parser::{ParseError, ParseErrorClass};
use thiserror::Error;

/// The failure classes a host can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Illegal character or malformed number.
    Lexical,
    /// Bracket mismatch, unparseable token sequence, nesting bound exceeded.
    Syntax,
    /// Malformed `name(params)=body` declaration.
    FunctionDefinition,
    /// Wrong operand or argument count, or an operand outside an operator's domain.
    Arity,
    /// No stage of the resolution chain produced a value.
    UnresolvedIdentifier,
    /// Malformed bulk variable entry or engine configuration.
    Configuration,
}

/// Why a function declaration was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionFault {
    #[error("'=' followed by a body expected")]
    MissingBody,
    #[error("function name expected")]
    MissingName,
    #[error("'(' expected after the function name")]
    MissingOpenParen,
    #[error("delimiter ',' expected between parameters")]
    ExpectedDelimiter,
    #[error("parameter name expected")]
    ParameterNotIdentifier,
    #[error("')' expected")]
    MissingCloseParen,
    #[error("unexpected text after ')'")]
    TrailingTokens,
    #[error("parameter \"{0}\" declared twice")]
    DuplicateParameter(String),
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("function \"{definition}\" is not valid: {fault}")]
    FunctionDefinition {
        definition: String,
        fault: DefinitionFault,
    },

    #[error("invalid number of operands for \"{token}\": {detail}")]
    Arity { token: String, detail: String },

    #[error("invalid operand {value} for \"{token}\"")]
    InvalidOperand { token: String, value: f64 },

    #[error("undeclared identifier \"{name}\"")]
    UnresolvedIdentifier { name: String },

    #[error("token \"{token}\" can not be evaluated")]
    MisplacedToken { token: String },

    #[error("\"{statement}\" does not assign to a single identifier")]
    InvalidAssignmentTarget { statement: String },

    #[error("variable entry \"{entry}\" is not of the form name=number")]
    InvalidVariable { entry: String },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Parse(e) => match e.class() {
                ParseErrorClass::Lexical => ErrorKind::Lexical,
                ParseErrorClass::Syntax => ErrorKind::Syntax,
            },
            EvalError::FunctionDefinition { .. } => ErrorKind::FunctionDefinition,
            EvalError::Arity { .. } | EvalError::InvalidOperand { .. } => ErrorKind::Arity,
            EvalError::UnresolvedIdentifier { .. } => ErrorKind::UnresolvedIdentifier,
            EvalError::MisplacedToken { .. } | EvalError::InvalidAssignmentTarget { .. } => {
                ErrorKind::Syntax
            }
            EvalError::InvalidVariable { .. } | EvalError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
        }
    }

    pub(crate) fn arity(token: &str, expected: &str, got: usize) -> Self {
        EvalError::Arity {
            token: token.to_string(),
            detail: format!("expected {}, got {}", expected, got),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
