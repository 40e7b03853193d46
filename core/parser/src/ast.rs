//! FILENAME: core/parser/src/ast.rs
//! PURPOSE: Defines the expression tree produced by the tree builder.
//! CONTEXT: The tree builder splits a token sequence around its least
//! significant operation token. Each split leaves one residual token in the
//! node and moves the tokens on either side into child nodes. The evaluator
//! then walks this tree bottom-up.
//!
//! NODE SHAPES:
//! - Leaf: number, identifier or `_`, no children
//! - Unary: `-x`, `~x` (one right child) or `x!` (one left child)
//! - Binary: one left child and one right child
//! - Function call: identifier token, no left child, one right child per argument

use crate::token::{Token, TokenKind};

/// A node of the expression tree. Each node owns its children.
#[derive(Debug, PartialEq, Clone)]
pub struct Node {
    pub token: Token,
    pub left: Vec<Node>,
    pub right: Vec<Node>,
}

impl Node {
    pub fn leaf(token: Token) -> Self {
        Node {
            token,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// True when this node is an identifier applied to arguments.
    pub fn is_call(&self) -> bool {
        self.token.is(TokenKind::Identifier) && self.left.is_empty() && !self.right.is_empty()
    }
}

impl std::fmt::Display for Node {
    /// Renders the tree fully parenthesised, e.g. `(1 + (2 * 3))`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.token);
        }

        if self.is_call() {
            write!(f, "{}(", self.token)?;
            for (i, arg) in self.right.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            return write!(f, ")");
        }

        match (self.left.first(), self.right.first()) {
            (Some(left), Some(right)) => write!(f, "({} {} {})", left, self.token, right),
            (Some(left), None) => write!(f, "({}{})", left, self.token),
            (None, Some(right)) => write!(f, "({}{})", self.token, right),
            (None, None) => write!(f, "{}", self.token),
        }
    }
}
