//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the expression engine.
//! CONTEXT: Re-exports public types and modules for use by host crates.
//! Tokenizing and tree building live in `calc-parser`; this crate evaluates
//! trees, resolves identifiers and runs statement lists.

pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod function;
pub mod resolver;
pub mod variables;

// Re-export commonly used types at the crate root
pub use config::EngineConfig;
pub use context::{EvaluationContext, StatementSource};
pub use error::{DefinitionFault, ErrorKind, EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use function::{CallSite, FunctionDefinition, FunctionSource, FunctionTable};
pub use resolver::{CallbackChain, HostCallback, IdentifierResolver, ResolveOrder};
pub use variables::{VariableSource, VariableTable};

pub use calc_parser::{parse, Node, ParseError, DEFAULT_MAX_DEPTH};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_evaluates_an_expression() {
        let mut ctx = EvaluationContext::new();
        assert_eq!(ctx.evaluate("4*(2+(10/5)+(5^2))").unwrap(), 116.0);
    }

    #[test]
    fn it_evaluates_a_standalone_tree() {
        let tree = parse("sqrt(16)+1").unwrap();
        let variables = VariableTable::new();
        let functions = FunctionTable::new();
        let callbacks = CallbackChain::new();
        let scope = resolver::PassScope {
            variables: &variables,
            functions: &functions,
            callbacks: &callbacks,
            order: ResolveOrder::default(),
            previous: 0.0,
            max_depth: DEFAULT_MAX_DEPTH,
        };

        assert_eq!(Evaluator::new(&scope, 0.0, 0).calculate(&tree).unwrap(), 5.0);
    }

    #[test]
    fn integration_test_functions_callbacks_and_variables() {
        let mut ctx = EvaluationContext::new();
        ctx.add_variables("rate=0.5").unwrap();
        ctx.add_functions("half(v)=v*rate");
        ctx.add_callback(|name, _| (name == "base").then_some(40.0));

        // half() reads the binding, base comes from the host
        assert_eq!(ctx.evaluate("total:half(base);total+1").unwrap(), 21.0);
    }
}
