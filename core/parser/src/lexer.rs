//! FILENAME: core/parser/src/lexer.rs
//! PURPOSE: Scans one statement's expression text and produces Tokens.
//! CONTEXT: This is the first stage of the pipeline. Each token starts with a
//! character whose class decides how the token is read:
//!
//! - Single char, emitted immediately: operators, brackets, boolean
//!   operators and the parameter delimiter
//! - Relational: one char of lookahead merges `<=`, `>=`, `<>`
//! - Everything else (numbers, identifiers, `_`): extends greedily while the
//!   next char has the same class; identifiers also take digits
//!
//! Bracket balance over `{}`, `[]` and `()` is checked separately by
//! `validate`, before any tree is built.

use crate::error::{ParseError, ParseResult};
use crate::token::{BRACKET_CLOSE_CHARS, BRACKET_OPEN_CHARS, RELATIONAL_PAIRS, Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;

pub struct Tokenizer<'a> {
    expression: &'a str,
    input: Peekable<Chars<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(expression: &'a str) -> Self {
        Tokenizer {
            expression,
            input: expression.chars().peekable(),
        }
    }

    /// Reads the whole expression from the start and returns every token.
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        self.input = self.expression.chars().peekable();

        let mut tokens = Vec::new();
        while let Some(token) = self.read_next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Advances the tokenizer and returns the next token, or None at the end.
    pub fn read_next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_whitespace();

        let Some(first) = self.input.next() else {
            return Ok(None);
        };

        let token = match TokenKind::classify(first, true) {
            TokenKind::Invalid => {
                return Err(ParseError::IllegalCharacter {
                    character: first,
                    expression: self.expression.to_string(),
                });
            }
            kind @ (TokenKind::Operator
            | TokenKind::ParenOpen
            | TokenKind::ParenClose
            | TokenKind::Boolean
            | TokenKind::ParamDelimiter) => Token::new(first.to_string(), kind),
            TokenKind::Relational => self.read_relational(first),
            TokenKind::Number => self.read_number(first)?,
            kind => self.read_run(first, kind),
        };

        Ok(Some(token))
    }

    /// Checks that `{}`, `[]` and `()` are balanced and properly nested.
    pub fn validate(&self) -> ParseResult<()> {
        let mut stack: Vec<char> = Vec::new();

        for ch in self.expression.chars() {
            if BRACKET_OPEN_CHARS.contains(ch) {
                stack.push(ch);
            } else if let Some(index) = BRACKET_CLOSE_CHARS.find(ch) {
                let expected = BRACKET_OPEN_CHARS[index..].chars().next();
                match stack.pop() {
                    Some(open) if Some(open) == expected => {}
                    Some(_) => {
                        return Err(ParseError::ParenthesisMismatch {
                            expression: self.expression.to_string(),
                        });
                    }
                    None => {
                        return Err(ParseError::UnbalancedBrackets {
                            expression: self.expression.to_string(),
                        });
                    }
                }
            }
        }

        if stack.is_empty() {
            Ok(())
        } else {
            Err(ParseError::UnbalancedBrackets {
                expression: self.expression.to_string(),
            })
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Handles `<`, `>`, `=` and the merged forms `<=`, `>=`, `<>`.
    fn read_relational(&mut self, first: char) -> Token {
        let mut text = String::from(first);

        if let Some(&next) = self.input.peek() {
            text.push(next);
            if RELATIONAL_PAIRS.contains(&text.as_str()) {
                self.input.next();
            } else {
                text.pop();
            }
        }

        Token::new(text, TokenKind::Relational)
    }

    /// Digits and decimal points; the result must parse as a float.
    fn read_number(&mut self, first: char) -> ParseResult<Token> {
        let token = self.read_run(first, TokenKind::Number);

        if token.text.parse::<f64>().is_err() {
            return Err(ParseError::MalformedNumber {
                text: token.text,
                expression: self.expression.to_string(),
            });
        }

        Ok(token)
    }

    fn read_run(&mut self, first: char, kind: TokenKind) -> Token {
        let mut text = String::from(first);

        while let Some(&ch) = self.input.peek() {
            let next_kind = TokenKind::classify(ch, false);
            let continues = next_kind == kind
                || (kind == TokenKind::Identifier && ch.is_ascii_digit());
            if !continues {
                break;
            }
            text.push(ch);
            self.input.next();
        }

        Token::new(text, kind)
    }
}

/// Convenience function to tokenize an expression directly.
pub fn tokenize(expression: &str) -> ParseResult<Vec<Token>> {
    Tokenizer::new(expression).tokenize()
}
