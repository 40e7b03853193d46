//! FILENAME: core/engine/src/evaluator.rs
//! PURPOSE: Computes the value of an expression tree.
//! CONTEXT: After a statement is built into a tree, this module walks it
//! depth-first: children are computed before the operation of their parent.
//! Identifiers are handed to an `IdentifierResolver` together with their
//! already computed arguments.
//!
//! SUPPORTED FEATURES:
//! - Leaves: numbers, `_` (previous statement value), `true`, `false`
//! - Arithmetic: + - * / ^ %, prefix - and ~, postfix !
//! - Relational: < > <= >= <> =, result 1 or 0
//! - Boolean: & | ? on operands equal to 1
//! - Identifiers and calls: variables, user functions, host callbacks, built-ins

use crate::error::{EvalError, EvalResult};
use crate::resolver::IdentifierResolver;
use calc_parser::{Node, TokenKind};

/// Factorials above this overflow f64.
const FACTORIAL_LIMIT: f64 = 170.0;

pub struct Evaluator<'a> {
    resolver: &'a dyn IdentifierResolver,
    previous: f64,
    /// Tree level of the root node.
    level: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(resolver: &'a dyn IdentifierResolver, previous: f64, level: usize) -> Self {
        Evaluator {
            resolver,
            previous,
            level,
        }
    }

    /// Computes the value of a tree.
    pub fn calculate(&self, node: &Node) -> EvalResult<f64> {
        self.eval_node(node, self.level)
    }

    /// Walks down the left spine in a loop, then applies the spine's
    /// operations from the innermost outward. Right operands are one level
    /// deeper, matching how the tree builder counts levels.
    fn eval_node(&self, node: &Node, level: usize) -> EvalResult<f64> {
        let mut spine: Vec<&Node> = Vec::new();
        let mut current = node;

        while let [left] = current.left.as_slice() {
            if !current.token.kind.is_operation() {
                break;
            }
            spine.push(current);
            current = left;
        }

        let mut value = self.eval_head(current, level)?;
        for parent in spine.into_iter().rev() {
            value = self.apply_to_left(parent, value, level)?;
        }

        Ok(value)
    }

    /// Evaluates a node that has no left operand.
    fn eval_head(&self, node: &Node, level: usize) -> EvalResult<f64> {
        match node.token.kind {
            TokenKind::PreviousValue => Ok(self.previous),
            TokenKind::Number => node.token.text.parse().map_err(|_| self.misplaced(node)),
            TokenKind::Identifier => self.eval_identifier(node, level),
            TokenKind::Operator => self.eval_prefix(node, level),
            TokenKind::Relational | TokenKind::Boolean => Err(self.arity_error(node)),
            TokenKind::ParenOpen
            | TokenKind::ParenClose
            | TokenKind::ParamDelimiter
            | TokenKind::Invalid => Err(self.misplaced(node)),
        }
    }

    fn eval_identifier(&self, node: &Node, level: usize) -> EvalResult<f64> {
        let name = node.token.text.trim().to_lowercase();

        if node.is_leaf() {
            match name.as_str() {
                "true" => return Ok(1.0),
                "false" => return Ok(0.0),
                _ => {}
            }
        }

        let args = node
            .right
            .iter()
            .map(|arg| self.eval_node(arg, level + 1))
            .collect::<EvalResult<Vec<f64>>>()?;

        self.resolver
            .resolve(&name, &args, level)?
            .ok_or(EvalError::UnresolvedIdentifier { name })
    }

    /// `-x` and `~x`.
    fn eval_prefix(&self, node: &Node, level: usize) -> EvalResult<f64> {
        match (node.token.text.as_str(), node.left.as_slice(), node.right.as_slice()) {
            ("-", [], [operand]) => Ok(-self.eval_node(operand, level + 1)?),
            ("~", [], [operand]) => {
                let value = self.eval_node(operand, level + 1)?;
                Ok(if value.trunc() == 1.0 { 0.0 } else { 1.0 })
            }
            _ => Err(self.arity_error(node)),
        }
    }

    /// Applies a spine operation to its already computed left operand:
    /// postfix `x!` or any binary operation.
    fn apply_to_left(&self, node: &Node, left: f64, level: usize) -> EvalResult<f64> {
        let op = node.token.text.as_str();

        let right = match (op, node.right.as_slice()) {
            ("!", []) => return self.eval_factorial(left),
            ("!" | "~", _) => return Err(self.arity_error(node)),
            (_, [right]) => self.eval_node(right, level + 1)?,
            _ => return Err(self.arity_error(node)),
        };

        match node.token.kind {
            TokenKind::Relational => Ok(flag(eval_relational(op, left, right))),
            TokenKind::Boolean => Ok(flag(eval_boolean(op, left, right))),
            _ => eval_arithmetic(op, left, right).ok_or_else(|| self.misplaced(node)),
        }
    }

    fn eval_factorial(&self, value: f64) -> EvalResult<f64> {
        if value < 0.0 || value.fract() != 0.0 || value.is_nan() {
            return Err(EvalError::InvalidOperand {
                token: "!".to_string(),
                value,
            });
        }
        if value > FACTORIAL_LIMIT {
            return Ok(f64::INFINITY);
        }

        Ok((2..=value as u32).fold(1.0, |acc, n| acc * n as f64))
    }

    fn arity_error(&self, node: &Node) -> EvalError {
        let expected = match node.token.text.as_str() {
            "!" => "1 left operand",
            "~" => "1 right operand",
            "-" => "1 right operand or 2 operands",
            _ => "2 operands",
        };
        EvalError::arity(
            &node.token.text,
            expected,
            node.left.len() + node.right.len(),
        )
    }

    fn misplaced(&self, node: &Node) -> EvalError {
        EvalError::MisplacedToken {
            token: node.token.text.clone(),
        }
    }
}

fn eval_arithmetic(op: &str, l: f64, r: f64) -> Option<f64> {
    let value = match op {
        "+" => l + r,
        "-" => l - r,
        "*" => l * r,
        "/" => l / r,
        "^" => l.powf(r),
        "%" => l.trunc() % r.trunc(),
        _ => return None,
    };
    Some(value)
}

fn eval_relational(op: &str, l: f64, r: f64) -> bool {
    match op {
        "<" => l < r,
        ">" => l > r,
        "<=" => l <= r,
        ">=" => l >= r,
        "<>" => l != r,
        _ => l == r,
    }
}

fn eval_boolean(op: &str, l: f64, r: f64) -> bool {
    let (l, r) = (l == 1.0, r == 1.0);
    match op {
        "&" => l && r,
        "|" => l || r,
        _ => l != r,
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
