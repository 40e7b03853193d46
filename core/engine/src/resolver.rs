//! FILENAME: core/engine/src/resolver.rs
//! PURPOSE: Gives bare identifiers a value.
//! CONTEXT: The evaluator hands every identifier it can not read itself
//! (anything but `true`/`false`) to an `IdentifierResolver`, together with
//! its already evaluated arguments. Two scopes implement the trait:
//!
//! - `PassScope`: the top-level chain of one evaluation pass
//! - `CallFrame` (see function.rs): the parameters of a user function call,
//!   falling back to the scope that called it
//!
//! CHAIN ORDER:
//!   InternalFirst: variables --> user functions --> host callbacks --> built-ins
//!   HostFirst:     host callbacks --> variables --> user functions --> built-ins

use crate::builtins;
use crate::error::EvalResult;
use crate::function::{CallSite, FunctionTable};
use crate::variables::VariableTable;
use serde::{Deserialize, Serialize};

/// A scope that can give an identifier a value.
pub trait IdentifierResolver {
    /// Resolves `name` (already lower-cased) applied to `args`.
    ///
    /// Returns `Ok(None)` when no stage knows the name. `level` is the tree
    /// level of the identifier node; user function bodies are built below it.
    fn resolve(&self, name: &str, args: &[f64], level: usize) -> EvalResult<Option<f64>>;
}

/// Whether host callbacks are consulted before or after the internal tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOrder {
    #[default]
    InternalFirst,
    HostFirst,
}

/// A host-supplied resolver: `(identifier, arguments) -> value`.
/// Returning `None` passes the identifier on to the next stage.
pub type HostCallback = Box<dyn Fn(&str, &[f64]) -> Option<f64>>;

/// Ordered list of host callbacks. The first callback to answer wins.
#[derive(Default)]
pub struct CallbackChain {
    callbacks: Vec<HostCallback>,
}

impl CallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, callback: HostCallback) {
        self.callbacks.push(callback);
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn resolve(&self, name: &str, args: &[f64]) -> Option<f64> {
        self.callbacks.iter().find_map(|callback| callback(name, args))
    }
}

impl std::fmt::Debug for CallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackChain")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// The resolution chain of one evaluation pass.
pub(crate) struct PassScope<'a> {
    pub variables: &'a VariableTable,
    pub functions: &'a FunctionTable,
    pub callbacks: &'a CallbackChain,
    pub order: ResolveOrder,
    pub previous: f64,
    pub max_depth: usize,
}

impl PassScope<'_> {
    fn resolve_host(&self, name: &str, args: &[f64]) -> Option<f64> {
        let value = self.callbacks.resolve(name, args);
        if let Some(v) = value {
            log::trace!("host callback resolved {} = {}", name, v);
        }
        value
    }

    fn resolve_internal(&self, name: &str, args: &[f64], level: usize) -> EvalResult<Option<f64>> {
        if let Some(v) = self.variables.get(name) {
            log::trace!("variable {} = {}", name, v);
            return Ok(Some(v));
        }

        if let Some(definition) = self.functions.find(name)? {
            let site = CallSite {
                previous: self.previous,
                max_depth: self.max_depth,
                level,
            };
            return definition.call(args, self, site).map(Some);
        }

        Ok(None)
    }
}

impl IdentifierResolver for PassScope<'_> {
    fn resolve(&self, name: &str, args: &[f64], level: usize) -> EvalResult<Option<f64>> {
        if self.order == ResolveOrder::HostFirst {
            if let Some(v) = self.resolve_host(name, args) {
                return Ok(Some(v));
            }
        }

        if let Some(v) = self.resolve_internal(name, args, level)? {
            return Ok(Some(v));
        }

        if self.order == ResolveOrder::InternalFirst {
            if let Some(v) = self.resolve_host(name, args) {
                return Ok(Some(v));
            }
        }

        // Built-ins are always the last stage
        builtins::call(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with(values: &[(&'static str, f64)]) -> CallbackChain {
        let mut chain = CallbackChain::new();
        for &(name, value) in values {
            chain.push(Box::new(move |n: &str, _: &[f64]| (n == name).then_some(value)));
        }
        chain
    }

    #[test]
    fn first_answering_callback_wins() {
        let chain = chain_with(&[("a", 1.0), ("a", 2.0), ("b", 3.0)]);
        assert_eq!(chain.resolve("a", &[]), Some(1.0));
        assert_eq!(chain.resolve("b", &[]), Some(3.0));
        assert_eq!(chain.resolve("c", &[]), None);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn order_decides_between_variable_and_callback() {
        let mut variables = VariableTable::new();
        variables.set("y", 10.0);
        let functions = FunctionTable::new();
        let callbacks = chain_with(&[("y", 20.0)]);

        let mut scope = PassScope {
            variables: &variables,
            functions: &functions,
            callbacks: &callbacks,
            order: ResolveOrder::InternalFirst,
            previous: 0.0,
            max_depth: 16,
        };
        assert_eq!(scope.resolve("y", &[], 0).unwrap(), Some(10.0));

        scope.order = ResolveOrder::HostFirst;
        assert_eq!(scope.resolve("y", &[], 0).unwrap(), Some(20.0));
    }

    #[test]
    fn builtins_come_after_callbacks_in_both_orders() {
        let variables = VariableTable::new();
        let functions = FunctionTable::new();
        let callbacks = chain_with(&[("abs", 99.0)]);

        for order in [ResolveOrder::InternalFirst, ResolveOrder::HostFirst] {
            let scope = PassScope {
                variables: &variables,
                functions: &functions,
                callbacks: &callbacks,
                order,
                previous: 0.0,
                max_depth: 16,
            };
            assert_eq!(scope.resolve("abs", &[-1.0], 0).unwrap(), Some(99.0));
            assert_eq!(scope.resolve("sqrt", &[4.0], 0).unwrap(), Some(2.0));
            assert_eq!(scope.resolve("nothing", &[], 0).unwrap(), None);
        }
    }

    #[test]
    fn order_deserializes_from_snake_case() {
        let order: ResolveOrder = serde_json::from_str("\"host_first\"").unwrap();
        assert_eq!(order, ResolveOrder::HostFirst);
        assert_eq!(ResolveOrder::default(), ResolveOrder::InternalFirst);
    }
}
