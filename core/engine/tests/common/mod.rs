//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for expression engine integration tests.

use calc_engine::{ErrorKind, EvalError, EvaluationContext};

/// Test harness wrapping one evaluation context.
pub struct TestHarness {
    pub ctx: EvaluationContext,
}

impl TestHarness {
    /// Create a new test harness with an empty context.
    pub fn new() -> Self {
        TestHarness {
            ctx: EvaluationContext::new(),
        }
    }

    /// Create a harness with the standard fixture:
    /// host callback `b` = 23, variables `c` = 30 and `d` = 20,
    /// functions `x(a,b)=a*b` and `x2(a)=a`.
    pub fn with_fixture() -> Self {
        let mut harness = Self::new();
        harness
            .ctx
            .add_callback(|name, _| if name == "b" { Some(23.0) } else { None });
        harness
            .ctx
            .add_variables("c=30;d=20")
            .expect("fixture variables are valid");
        harness.ctx.add_functions(["x(a,b)=a*b", "x2(a)=a"]);
        harness
    }

    /// Evaluate and unwrap.
    pub fn eval(&mut self, text: &str) -> f64 {
        match self.ctx.evaluate(text) {
            Ok(value) => value,
            Err(e) => panic!("\"{}\" failed: {}", text, e),
        }
    }

    /// Evaluate and expect a failure.
    pub fn eval_err(&mut self, text: &str) -> EvalError {
        match self.ctx.evaluate(text) {
            Ok(value) => panic!("\"{}\" should fail, got {}", text, value),
            Err(e) => e,
        }
    }

    /// Evaluate and return only the failure kind.
    pub fn eval_kind(&mut self, text: &str) -> ErrorKind {
        self.eval_err(text).kind()
    }

    /// Assert a value with a small tolerance.
    pub fn assert_close(&mut self, text: &str, expected: f64) {
        let actual = self.eval(text);
        assert!(
            (actual - expected).abs() < 1e-9,
            "\"{}\": expected {}, got {}",
            text,
            expected,
            actual
        );
    }
}
