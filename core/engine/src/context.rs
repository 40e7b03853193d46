//! FILENAME: core/engine/src/context.rs
//! PURPOSE: Runs statement lists and holds everything a pass needs.
//! CONTEXT: This is the host-facing entry point. A host fills in variables,
//! function declarations and callbacks, sets the statement text and asks for
//! the value. Each call to `value` is one pass over all statements.
//!
//! PASS LIFECYCLE:
//!   1. previous value = 0, pass variables = copy of the host bindings
//!   2. per statement: validate --> tokenize --> build --> evaluate,
//!      store `name:` results, remember the value for `_`
//!   3. pass variables are cleared, whether the pass failed or not
//!
//! The pass result is the value of the last statement, 0 when there is none.

use crate::config::EngineConfig;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::function::{FunctionSource, FunctionTable};
use crate::resolver::{CallbackChain, PassScope, ResolveOrder};
use crate::variables::{VariableSource, VariableTable};
use calc_parser::{tokenize, TokenKind, TreeBuilder, DEFAULT_MAX_DEPTH};

/// Separates statements in a single text.
pub const STATEMENT_DELIMITER: char = ';';
/// Separates an assignment target from its expression.
pub const ASSIGNMENT_DELIMITER: char = ':';

#[derive(Debug)]
pub struct EvaluationContext {
    statements: Vec<String>,
    /// Host bindings, copied into every pass.
    bindings: VariableTable,
    /// Variables of the running pass.
    variables: VariableTable,
    functions: FunctionTable,
    callbacks: CallbackChain,
    order: ResolveOrder,
    max_depth: usize,
    /// Result of the last successful pass.
    value: f64,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        EvaluationContext {
            statements: Vec::new(),
            bindings: VariableTable::new(),
            variables: VariableTable::new(),
            functions: FunctionTable::new(),
            callbacks: CallbackChain::new(),
            order: ResolveOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            value: 0.0,
        }
    }
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from stored settings.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut context = Self::new();
        for (name, value) in &config.variables {
            context.bindings.set(name, *value);
        }
        context.functions.add(FunctionSource::List(config.functions));
        context.order = config.order;
        context.max_depth = config.max_depth;
        context
    }

    // ========================================
    // Variables
    // ========================================

    /// Adds host bindings. On a malformed entry the entries before it are kept.
    pub fn add_variables(&mut self, source: impl Into<VariableSource>) -> EvalResult<()> {
        self.bindings.load(source.into())
    }

    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.bindings.set(name, value);
    }

    pub fn clear_variables(&mut self) {
        self.bindings.clear();
    }

    pub fn variables(&self) -> &VariableTable {
        &self.bindings
    }

    // ========================================
    // Functions and callbacks
    // ========================================

    pub fn add_functions(&mut self, source: impl Into<FunctionSource>) {
        self.functions.add(source.into());
    }

    pub fn clear_functions(&mut self) {
        self.functions.clear();
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Appends a host resolver. It receives lower-cased identifiers and
    /// returns `None` to let the next stage try.
    pub fn add_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str, &[f64]) -> Option<f64> + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn clear_callbacks(&mut self) {
        self.callbacks.clear();
    }

    pub fn set_order(&mut self, order: ResolveOrder) {
        self.order = order;
    }

    pub fn order(&self) -> ResolveOrder {
        self.order
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // ========================================
    // Statements and results
    // ========================================

    pub fn set_text(&mut self, source: impl Into<StatementSource>) {
        self.statements = match source.into() {
            StatementSource::Text(text) => text
                .split(STATEMENT_DELIMITER)
                .map(str::to_string)
                .collect(),
            StatementSource::List(list) => list,
        };
    }

    /// The statements joined by `;`.
    pub fn text(&self) -> String {
        self.statements.join(&*STATEMENT_DELIMITER.to_string())
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Runs one pass over the statements and returns the last value.
    pub fn value(&mut self) -> EvalResult<f64> {
        log::debug!("pass start: {} statement(s)", self.statements.len());

        self.variables = self.bindings.clone();
        let result = self.run_statements();
        self.variables.clear();

        let value = result?;
        self.value = value;
        log::debug!("pass end: {}", value);
        Ok(value)
    }

    /// Sets the statement text and runs a pass.
    pub fn evaluate(&mut self, text: &str) -> EvalResult<f64> {
        self.set_text(text);
        self.value()
    }

    /// Nonzero pass result.
    pub fn as_bool(&mut self) -> EvalResult<bool> {
        Ok(self.value()? != 0.0)
    }

    /// Pass result truncated toward zero.
    pub fn as_int(&mut self) -> EvalResult<i64> {
        Ok(self.value()?.trunc() as i64)
    }

    /// Pass result as text, without a fraction for whole numbers.
    pub fn as_text(&mut self) -> EvalResult<String> {
        Ok(format_number(self.value()?))
    }

    /// Result of the last successful pass, 0 before the first one.
    pub fn last_value(&self) -> f64 {
        self.value
    }

    fn run_statements(&mut self) -> EvalResult<f64> {
        let mut previous = 0.0;

        for statement in &self.statements {
            if statement.trim().is_empty() {
                continue;
            }

            let (target, expression) = split_assignment(statement)?;

            let scope = PassScope {
                variables: &self.variables,
                functions: &self.functions,
                callbacks: &self.callbacks,
                order: self.order,
                previous,
                max_depth: self.max_depth,
            };

            let tree = TreeBuilder::new(expression)
                .max_depth(self.max_depth)
                .parse()?;
            let value = Evaluator::new(&scope, previous, 0).calculate(&tree)?;

            log::debug!("{} = {}", statement.trim(), value);

            if let Some(name) = target {
                self.variables.set(&name, value);
            }
            previous = value;
        }

        Ok(previous)
    }
}

/// Splits `name: expression`. The target must be exactly one identifier.
fn split_assignment(statement: &str) -> EvalResult<(Option<String>, &str)> {
    let Some((target, expression)) = statement.split_once(ASSIGNMENT_DELIMITER) else {
        return Ok((None, statement));
    };

    let tokens = tokenize(target)?;
    match tokens.as_slice() {
        [token] if token.is(TokenKind::Identifier) => {
            Ok((Some(token.text.to_lowercase()), expression))
        }
        _ => Err(EvalError::InvalidAssignmentTarget {
            statement: statement.trim().to_string(),
        }),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// The shapes a host may hand statements over in.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementSource {
    /// `a:2;a*3`
    Text(String),
    List(Vec<String>),
}

impl From<&str> for StatementSource {
    fn from(text: &str) -> Self {
        StatementSource::Text(text.to_string())
    }
}

impl From<String> for StatementSource {
    fn from(text: String) -> Self {
        StatementSource::Text(text)
    }
}

impl From<Vec<String>> for StatementSource {
    fn from(list: Vec<String>) -> Self {
        StatementSource::List(list)
    }
}

impl From<&[&str]> for StatementSource {
    fn from(list: &[&str]) -> Self {
        StatementSource::List(list.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StatementSource {
    fn from(list: [&str; N]) -> Self {
        StatementSource::List(list.iter().map(|s| s.to_string()).collect())
    }
}
