//! FILENAME: tests/test_functions.rs
//! Integration tests for user-defined functions.

mod common;

use calc_engine::{DefinitionFault, ErrorKind, EvalError, ParseError};
use common::TestHarness;

// ============================================================================
// CALLS
// ============================================================================

#[test]
fn test_nested_user_function_calls() {
    let mut harness = TestHarness::with_fixture();
    assert_eq!(harness.eval("x(x(c,x2(4)),x2(3))"), 360.0);
}

#[test]
fn test_function_names_are_case_insensitive() {
    let mut harness = TestHarness::with_fixture();
    assert_eq!(harness.eval("X(2,3)+X2(1)"), 7.0);
}

#[test]
fn test_function_calls_other_functions_and_builtins() {
    let mut harness = TestHarness::new();
    harness
        .ctx
        .add_functions("sq(v)=v*v;hyp(a,b)=sqrt(sq(a)+sq(b))");
    assert_eq!(harness.eval("hyp(3,4)"), 5.0);
}

#[test]
fn test_parameters_shadow_variables() {
    let mut harness = TestHarness::with_fixture();
    harness.ctx.add_functions("shadow(c)=c+d");
    assert_eq!(harness.eval("shadow(1)"), 21.0);
    assert_eq!(harness.eval("c"), 30.0);
}

#[test]
fn test_parameter_used_with_call_syntax() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("f(p)=p(1)");
    assert_eq!(harness.eval("f(9)"), 9.0);
}

#[test]
fn test_function_body_sees_pass_variables_and_previous_value() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("addk(v)=v+k+_");
    assert_eq!(harness.eval("k:10;addk(1)"), 21.0);
}

#[test]
fn test_zero_parameter_function() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("answer()=6*7");
    assert_eq!(harness.eval("answer()"), 42.0);
    assert_eq!(harness.eval("answer+1"), 43.0);
}

#[test]
fn test_bounded_recursion_terminates() {
    let mut harness = TestHarness::new();
    harness
        .ctx
        .add_functions("fact(n)=if(n<2,1,n*fact(n-if(n<2,0,1)))");
    // `if` evaluates both branches, so this recursion never ends by itself
    let err = harness.eval_err("fact(3)");
    assert!(matches!(err, EvalError::Parse(ParseError::NestingTooDeep { .. })));
}

#[test]
fn test_unbounded_recursion_fails_with_nesting_error() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("f(a)=f(a)");
    let err = harness.eval_err("f(1)");
    assert!(matches!(
        err,
        EvalError::Parse(ParseError::NestingTooDeep { limit: 256, .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_smaller_depth_limits_recursion_sooner() {
    let mut harness = TestHarness::new();
    harness.ctx.set_max_depth(8);
    harness.ctx.add_functions("f(a)=f(a)");
    let err = harness.eval_err("f(1)");
    assert!(matches!(
        err,
        EvalError::Parse(ParseError::NestingTooDeep { limit: 8, .. })
    ));
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_wrong_argument_count() {
    let mut harness = TestHarness::with_fixture();
    assert_eq!(harness.eval_kind("x(1)"), ErrorKind::Arity);
    assert_eq!(harness.eval_kind("x2(1,2)"), ErrorKind::Arity);
}

#[test]
fn test_malformed_declaration_fails_when_called() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("f=5");
    assert_eq!(harness.eval("1+1"), 2.0);

    match harness.eval_err("f(1)") {
        EvalError::FunctionDefinition { definition, fault } => {
            assert_eq!(definition, "f=5");
            assert_eq!(fault, DefinitionFault::MissingOpenParen);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_error_inside_body_propagates() {
    let mut harness = TestHarness::new();
    harness.ctx.add_functions("g(a)=a+missing");
    assert_eq!(harness.eval_kind("g(1)"), ErrorKind::UnresolvedIdentifier);
}

#[test]
fn test_clear_functions() {
    let mut harness = TestHarness::with_fixture();
    harness.ctx.clear_functions();
    assert_eq!(harness.eval_kind("x(1,2)"), ErrorKind::UnresolvedIdentifier);
}
