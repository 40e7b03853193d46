//! FILENAME: core/parser/src/parser.rs
//! PURPOSE: Builds an expression tree from a flat token sequence.
//! CONTEXT: This is the second stage of the pipeline. There is no grammar:
//! every level repeatedly splits the token sequence around its "least
//! significant operation token", so all precedence lives in the tables below.
//!
//! ALGORITHM (per level):
//!   1. strip brackets that enclose the whole sequence
//!   2. one token left        --> leaf
//!   3. operation at depth 0  --> split; the right side is built one level
//!                                deeper, the left side repeats from step 1
//!   4. otherwise             --> NAME "(" arg ("," arg)* ")" function call
//!
//! Only right sides, prefix operands and call arguments cost a level, so the
//! bound tracks bracket nesting rather than the length of a flat chain.
//!
//! SPLIT PRIORITY (first class present wins):
//!   boolean    & | ?         lowest table entry, rightmost on ties
//!   relational < > <= >= <> = rightmost
//!   arithmetic / , + - , * % ^ , ~ !   lowest tier, rightmost on ties
//!
//! Splitting on the lowest entry first means it ends up at the top of the
//! tree and is evaluated last, so `&` binds weakest and `!` tightest.

use crate::ast::Node;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Tokenizer;
use crate::token::{Token, TokenKind};

/// Default bound on nesting levels, shared with nested function-call bodies.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Boolean operators, in the order they are split off.
const BOOLEAN_PRIORITY: [&str; 3] = ["&", "|", "?"];

/// Arithmetic operator tiers, in the order they are split off.
const OPERATOR_TIERS: [&str; 4] = ["/", "+-", "*%^", "~!"];

pub struct TreeBuilder<'a> {
    /// Text of the owning expression, for error messages.
    expression: &'a str,
    max_depth: usize,
    base_level: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(expression: &'a str) -> Self {
        TreeBuilder {
            expression,
            max_depth: DEFAULT_MAX_DEPTH,
            base_level: 0,
        }
    }

    /// Sets the maximum number of nested levels, counted from level 0.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the level of the root node. Function bodies start below their
    /// caller so recursion through calls shares one bound.
    pub fn base_level(mut self, level: usize) -> Self {
        self.base_level = level;
        self
    }

    /// Validates, tokenizes and builds the builder's own expression text.
    pub fn parse(&self) -> ParseResult<Node> {
        let mut tokenizer = Tokenizer::new(self.expression);
        tokenizer.validate()?;
        let tokens = tokenizer.tokenize()?;
        self.build(&tokens)
    }

    /// Builds the tree for a whole token sequence.
    pub fn build(&self, tokens: &[Token]) -> ParseResult<Node> {
        self.build_level(tokens, self.base_level)
    }

    /// Builds one nesting level. Splits whose left side is non-empty are
    /// peeled off in a loop, so a flat chain like `1+2+...+n` costs one
    /// level no matter how long it is. Right sides and call arguments are
    /// built one level deeper.
    fn build_level(&self, tokens: &[Token], level: usize) -> ParseResult<Node> {
        if level >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                expression: self.expression.to_string(),
            });
        }

        // Split nodes of the left spine, outermost first
        let mut spine: Vec<Node> = Vec::new();
        let mut rest = tokens;

        let bottom = loop {
            let tokens = strip_enclosing_brackets(rest);

            match tokens {
                [] => {
                    return Err(ParseError::EmptyExpression {
                        expression: self.expression.to_string(),
                    })
                }
                [single] => break Node::leaf(single.clone()),
                _ => {}
            }

            let Some(index) = self.find_split_index(tokens)? else {
                break self.parse_function_call(tokens, level)?;
            };

            let (left, right) = (&tokens[..index], &tokens[index + 1..]);
            let mut node = Node::leaf(tokens[index].clone());
            if !right.is_empty() {
                node.right.push(self.build_level(right, level + 1)?);
            }

            if left.is_empty() {
                break node;
            }
            spine.push(node);
            rest = left;
        };

        Ok(spine.into_iter().rev().fold(bottom, |child, mut parent| {
            parent.left.push(child);
            parent
        }))
    }

    /// Finds the least significant operation token at bracket depth zero.
    fn find_split_index(&self, tokens: &[Token]) -> ParseResult<Option<usize>> {
        let mut depth: i32 = 0;
        let mut boolean: Option<(usize, usize)> = None;
        let mut relational: Option<usize> = None;
        let mut operation: Option<(usize, usize)> = None;

        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth -= 1,
                _ => {}
            }

            if depth < 0 {
                return Err(self.mismatch());
            }
            if depth > 0 {
                continue;
            }

            match token.kind {
                TokenKind::Boolean => {
                    keep_lowest(&mut boolean, priority(&BOOLEAN_PRIORITY, &token.text), index)
                }
                TokenKind::Relational => relational = Some(index),
                TokenKind::Operator => {
                    keep_lowest(&mut operation, priority(&OPERATOR_TIERS, &token.text), index)
                }
                _ => {}
            }
        }

        Ok(boolean
            .map(|(_, index)| index)
            .or(relational)
            .or(operation.map(|(_, index)| index)))
    }

    /// Parses `NAME ( arg, arg, ... )`. Every argument becomes a right child.
    fn parse_function_call(&self, tokens: &[Token], level: usize) -> ParseResult<Node> {
        let is_call = tokens.len() > 2
            && tokens[0].is(TokenKind::Identifier)
            && tokens[1].is(TokenKind::ParenOpen)
            && tokens[tokens.len() - 1].is(TokenKind::ParenClose);

        if !is_call {
            return Err(ParseError::InvalidCall {
                expression: self.expression.to_string(),
            });
        }

        let mut node = Node::leaf(tokens[0].clone());
        let interior = &tokens[2..tokens.len() - 1];

        // `name()` is a call without arguments
        if interior.is_empty() {
            return Ok(node);
        }

        let mut depth: i32 = 0;
        let mut start = 0;

        for (index, token) in interior.iter().enumerate() {
            match token.kind {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth -= 1,
                TokenKind::ParamDelimiter if depth == 0 => {
                    self.push_argument(&mut node, &interior[start..index], level)?;
                    start = index + 1;
                }
                _ => {}
            }

            if depth < 0 {
                return Err(self.mismatch());
            }
        }

        self.push_argument(&mut node, &interior[start..], level)?;
        Ok(node)
    }

    fn push_argument(&self, node: &mut Node, span: &[Token], level: usize) -> ParseResult<()> {
        if span.is_empty() {
            return Err(ParseError::EmptyArgument {
                function: node.token.text.clone(),
                expression: self.expression.to_string(),
            });
        }

        node.right.push(self.build_level(span, level + 1)?);
        Ok(())
    }

    fn mismatch(&self) -> ParseError {
        ParseError::ParenthesisMismatch {
            expression: self.expression.to_string(),
        }
    }
}

/// Removes bracket pairs that enclose the whole sequence, e.g. `((1+2))`,
/// but leaves `(1)+(2)` alone.
fn strip_enclosing_brackets(tokens: &[Token]) -> &[Token] {
    let encloses = |t: &[Token]| {
        t.len() >= 2 && t[0].is(TokenKind::ParenOpen) && t[t.len() - 1].is(TokenKind::ParenClose)
    };
    if !encloses(tokens) {
        return tokens;
    }

    // Closing index of every opening bracket, from one scan
    let mut closes: Vec<Option<usize>> = vec![None; tokens.len()];
    let mut open: Vec<usize> = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::ParenOpen => open.push(index),
            TokenKind::ParenClose => match open.pop() {
                Some(start) => closes[start] = Some(index),
                None => break,
            },
            _ => {}
        }
    }

    let last = tokens.len() - 1;
    let mut layers = 0;
    while layers * 2 < tokens.len() && closes[layers] == Some(last - layers) {
        layers += 1;
    }

    &tokens[layers..tokens.len() - layers]
}

fn priority(table: &[&str], text: &str) -> usize {
    table
        .iter()
        .position(|entry| entry.contains(text))
        .unwrap_or(table.len())
}

/// Keeps the candidate with the lowest priority; later candidates win ties.
fn keep_lowest(slot: &mut Option<(usize, usize)>, priority: usize, index: usize) {
    if slot.map_or(true, |(current, _)| priority <= current) {
        *slot = Some((priority, index));
    }
}

/// Convenience function: validates, tokenizes and builds an expression.
pub fn parse(expression: &str) -> ParseResult<Node> {
    TreeBuilder::new(expression).parse()
}
