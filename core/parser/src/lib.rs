//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the calc expression parser.
//! CONTEXT: This crate exposes the tokenizer, tree builder, and tree types
//! needed to turn one statement's text into an evaluatable expression tree.
//!
//! PIPELINE: Expression String --> Tokenizer --> Tokens --> TreeBuilder --> Node --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /, ^ (power), % (modulo), ! (factorial)
//! - Unary: - (negation), ~ (logical not)
//! - Relational: =, <>, <, >, <=, >=
//! - Boolean: & (and), | (or), ? (xor)
//! - Brackets: {}, [], () used interchangeably for grouping
//! - Function calls: max(a, b, 3), f(g(1), 2)
//! - Previous statement value: _

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;


// Re-export commonly used types for convenience
pub use ast::Node;
pub use error::{ParseError, ParseErrorClass, ParseResult};
pub use lexer::{tokenize, Tokenizer};
pub use parser::{parse, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use token::{Token, TokenKind};
