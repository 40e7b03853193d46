//! FILENAME: core/engine/src/function.rs
//! PURPOSE: User-defined functions: declaration parsing, storage and calls.
//! CONTEXT: A declaration has the form `name(p1, p2, ...)=body`. The header
//! is tokenized with the expression tokenizer and checked with a small state
//! machine. Bodies are kept as text and built into a tree on every call,
//! `CALL_LEVEL_COST` levels below the calling node, so recursion is bounded
//! by the same nesting limit as ordinary expressions.
//!
//! HEADER STATES:
//!   Name --> OpenParen --> FirstParameter --> DelimiterOrClose --> Done
//!                              |   ^               |
//!                              |   +-- Parameter <-+ (on ',')
//!                              +--> Done (on ')')

use crate::error::{DefinitionFault, EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::resolver::IdentifierResolver;
use calc_parser::{TokenKind, Tokenizer, TreeBuilder};

/// Tree levels a call adds between the calling node and the body root.
/// A call nests far more stack frames than one tree level does.
pub const CALL_LEVEL_COST: usize = 4;

/// A parsed `name(params)=body` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    name: String,
    parameters: Vec<String>,
    body: String,
    source: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HeaderState {
    Name,
    OpenParen,
    FirstParameter,
    Parameter,
    DelimiterOrClose,
    Done,
}

impl FunctionDefinition {
    /// Parses a declaration. Names and parameters are lower-cased.
    pub fn parse(source: &str) -> EvalResult<Self> {
        let source = source.trim();
        let fail = |fault: DefinitionFault| EvalError::FunctionDefinition {
            definition: source.to_string(),
            fault,
        };

        let (header, body) = source
            .split_once('=')
            .ok_or_else(|| fail(DefinitionFault::MissingBody))?;
        let body = body.trim();
        if body.is_empty() {
            return Err(fail(DefinitionFault::MissingBody));
        }

        let tokens = Tokenizer::new(header).tokenize()?;

        let mut state = HeaderState::Name;
        let mut name = String::new();
        let mut parameters: Vec<String> = Vec::new();

        for token in &tokens {
            state = match (state, token.kind) {
                (HeaderState::Name, TokenKind::Identifier) => {
                    name = token.text.to_lowercase();
                    HeaderState::OpenParen
                }
                (HeaderState::Name, _) => return Err(fail(DefinitionFault::MissingName)),

                (HeaderState::OpenParen, TokenKind::ParenOpen) => HeaderState::FirstParameter,
                (HeaderState::OpenParen, _) => return Err(fail(DefinitionFault::MissingOpenParen)),

                (HeaderState::FirstParameter, TokenKind::ParenClose) => HeaderState::Done,
                (HeaderState::FirstParameter | HeaderState::Parameter, TokenKind::Identifier) => {
                    let parameter = token.text.to_lowercase();
                    if parameters.contains(&parameter) {
                        return Err(fail(DefinitionFault::DuplicateParameter(parameter)));
                    }
                    parameters.push(parameter);
                    HeaderState::DelimiterOrClose
                }
                (HeaderState::FirstParameter | HeaderState::Parameter, _) => {
                    return Err(fail(DefinitionFault::ParameterNotIdentifier))
                }

                (HeaderState::DelimiterOrClose, TokenKind::ParamDelimiter) => HeaderState::Parameter,
                (HeaderState::DelimiterOrClose, TokenKind::ParenClose) => HeaderState::Done,
                (HeaderState::DelimiterOrClose, _) => {
                    return Err(fail(DefinitionFault::ExpectedDelimiter))
                }

                (HeaderState::Done, _) => return Err(fail(DefinitionFault::TrailingTokens)),
            };
        }

        match state {
            HeaderState::Done => Ok(FunctionDefinition {
                name,
                parameters,
                body: body.to_string(),
                source: source.to_string(),
            }),
            HeaderState::Name => Err(fail(DefinitionFault::MissingName)),
            HeaderState::OpenParen => Err(fail(DefinitionFault::MissingOpenParen)),
            HeaderState::Parameter => Err(fail(DefinitionFault::ParameterNotIdentifier)),
            HeaderState::FirstParameter | HeaderState::DelimiterOrClose => {
                Err(fail(DefinitionFault::MissingCloseParen))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the body with `args` bound to the parameters. Identifiers
    /// that are not parameters go to `parent`.
    pub fn call(
        &self,
        args: &[f64],
        parent: &dyn IdentifierResolver,
        site: CallSite,
    ) -> EvalResult<f64> {
        if args.len() != self.parameters.len() {
            let expected = format!("{} arguments", self.parameters.len());
            return Err(EvalError::arity(&self.name, &expected, args.len()));
        }

        log::trace!("calling {}{:?} at level {}", self.name, args, site.level);

        let level = site.level + CALL_LEVEL_COST;
        let tree = TreeBuilder::new(&self.body)
            .max_depth(site.max_depth)
            .base_level(level)
            .parse()?;

        let frame = CallFrame {
            definition: self,
            values: args,
            parent,
        };

        Evaluator::new(&frame, site.previous, level).calculate(&tree)
    }
}

/// Where a user function is called from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallSite {
    /// Value of `_` in the current pass.
    pub previous: f64,
    pub max_depth: usize,
    /// Tree level of the calling node.
    pub level: usize,
}

/// Parameter scope of one running call.
struct CallFrame<'a> {
    definition: &'a FunctionDefinition,
    values: &'a [f64],
    parent: &'a dyn IdentifierResolver,
}

impl IdentifierResolver for CallFrame<'_> {
    fn resolve(&self, name: &str, args: &[f64], level: usize) -> EvalResult<Option<f64>> {
        let bound = self
            .definition
            .parameters
            .iter()
            .position(|p| p == name)
            .map(|index| self.values[index]);
        if bound.is_some() {
            return Ok(bound);
        }

        self.parent.resolve(name, args, level)
    }
}

/// Declared functions, kept as source text until they are called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionTable {
    sources: Vec<String>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends declarations. Blank entries are skipped.
    pub fn add(&mut self, source: FunctionSource) {
        let entries = match source {
            FunctionSource::Text(text) => text.split(';').map(str::to_string).collect(),
            FunctionSource::List(list) => list,
        };

        self.sources.extend(
            entries
                .into_iter()
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty()),
        );
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Finds the first declaration named `name` and parses it.
    /// A malformed declaration only fails when its name is looked up.
    pub fn find(&self, name: &str) -> EvalResult<Option<FunctionDefinition>> {
        let name = name.trim().to_lowercase();

        for source in &self.sources {
            if declared_name(source) == name {
                return FunctionDefinition::parse(source).map(Some);
            }
        }

        Ok(None)
    }
}

/// The text in front of the parameter list (or of the `=`).
fn declared_name(source: &str) -> String {
    let header = source.split('=').next().unwrap_or_default();
    let name = header.split(['(', '[', '{']).next().unwrap_or_default();
    name.trim().to_lowercase()
}

/// The shapes a host may hand declarations over in.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionSource {
    /// `f(a)=a*2;g(x,y)=x+y`
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FunctionSource {
    fn from(text: &str) -> Self {
        FunctionSource::Text(text.to_string())
    }
}

impl From<String> for FunctionSource {
    fn from(text: String) -> Self {
        FunctionSource::Text(text)
    }
}

impl From<Vec<String>> for FunctionSource {
    fn from(list: Vec<String>) -> Self {
        FunctionSource::List(list)
    }
}

impl From<&[&str]> for FunctionSource {
    fn from(list: &[&str]) -> Self {
        FunctionSource::List(list.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FunctionSource {
    fn from(list: [&str; N]) -> Self {
        FunctionSource::List(list.iter().map(|s| s.to_string()).collect())
    }
}
