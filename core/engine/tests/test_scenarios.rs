//! FILENAME: tests/test_scenarios.rs
//! Integration tests for complete statement evaluation.

mod common;

use common::TestHarness;

// ============================================================================
// ARITHMETIC AND BRACKETS
// ============================================================================

#[test]
fn test_mixed_bracket_kinds() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("{2*3+[(10+2)/(5+1)]+2}"), 10.0);
}

#[test]
fn test_nested_brackets() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("4*(2+(10/5)+(5^2))"), 116.0);
}

#[test]
fn test_division_result() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("6/2.5"), 2.4);
}

#[test]
fn test_division_by_zero_is_infinite() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("1/0"), f64::INFINITY);
    assert_eq!(harness.eval("0-1/0"), f64::NEG_INFINITY);
}

#[test]
fn test_factorial() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("3!"), 6.0);
    assert_eq!(harness.eval("3!*2"), 12.0);
    assert_eq!(harness.eval("(1+2)!"), 6.0);
}

#[test]
fn test_whitespace_is_ignored() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("  1 +\t2 * 3 "), 7.0);
}

// ============================================================================
// RELATIONAL AND BOOLEAN
// ============================================================================

#[test]
fn test_not_of_comparison() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("~(3<2)"), 1.0);
    assert_eq!(harness.eval("~(3>2)"), 0.0);
}

#[test]
fn test_boolean_binds_weaker_than_relational() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("3<2&1"), 0.0);
    assert_eq!(harness.eval("3>2&1"), 1.0);
    assert_eq!(harness.eval("1+1=2|0"), 1.0);
}

#[test]
fn test_or_and_xor() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("1|1"), 1.0);
    assert_eq!(harness.eval("1?1"), 0.0);
    assert_eq!(harness.eval("1?0"), 1.0);
    assert_eq!(harness.eval("0|0"), 0.0);
}

#[test]
fn test_less_equal_is_conventional() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("2<=3"), 1.0);
    assert_eq!(harness.eval("3<=3"), 1.0);
    assert_eq!(harness.eval("4<=3"), 0.0);
}

#[test]
fn test_greater_equal_is_conventional() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("4>=3"), 1.0);
    assert_eq!(harness.eval("3>=3"), 1.0);
    assert_eq!(harness.eval("2>=3"), 0.0);
}

#[test]
fn test_not_equal() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("2<>3"), 1.0);
    assert_eq!(harness.eval("3<>3"), 0.0);
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[test]
fn test_assignment_then_use() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("x:2;(-x)*3"), -6.0);
}

#[test]
fn test_previous_value_chain() {
    let mut harness = TestHarness::with_fixture();
    assert_eq!(harness.eval("a:2;_+a+B+c;_+a"), 59.0);
}

#[test]
fn test_statement_list() {
    let mut harness = TestHarness::new();
    harness.ctx.set_text(["r:2", "pi:3.14159", "round(pi*(r^2))"]);
    assert_eq!(harness.ctx.value().unwrap(), 12.57);
}

#[test]
fn test_repeated_passes_are_deterministic() {
    let mut harness = TestHarness::with_fixture();
    harness.ctx.set_text("a:2;_+a+b+c;x(_,d)");
    let first = harness.ctx.value().unwrap();
    for _ in 0..5 {
        assert_eq!(harness.ctx.value().unwrap(), first);
    }
    assert_eq!(first, 57.0 * 20.0);
}

// ============================================================================
// BUILT-INS
// ============================================================================

#[test]
fn test_if_and_log() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("if(1,2,3)+if(0,2,3)"), 5.0);
    assert_eq!(harness.eval("log(1)"), 0.0);
}

#[test]
fn test_builtins_inside_expressions() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("max(1,sum(2,3),min(9,4))*2"), 10.0);
    assert_eq!(harness.eval("abs(0-3)+sign(0-3)"), 2.0);
    assert_eq!(harness.eval("mod(17,5)+trunc(2.9)"), 4.0);
    harness.assert_close("sin(0)+cos(0)+exp(0)", 2.0);
}

#[test]
fn test_max_min_of_infinite_arguments() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("max(0-1/0)"), f64::NEG_INFINITY);
    assert_eq!(harness.eval("min(1/0)"), f64::INFINITY);
    assert_eq!(harness.eval("max(0-1/0,0-1/0)"), f64::NEG_INFINITY);
}

#[test]
fn test_random_without_arguments() {
    let mut harness = TestHarness::new();
    let value = harness.eval("random()");
    assert!((0.0..1.0).contains(&value));
}

#[test]
fn test_true_false_and_logic_functions() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.eval("and(true,1,5)"), 1.0);
    assert_eq!(harness.eval("or(false,0)"), 0.0);
}

// ============================================================================
// RESULT VIEWS
// ============================================================================

#[test]
fn test_result_views() {
    let mut harness = TestHarness::new();
    harness.ctx.set_text("10/4");
    assert_eq!(harness.ctx.as_int().unwrap(), 2);
    assert_eq!(harness.ctx.as_text().unwrap(), "2.5");
    assert!(harness.ctx.as_bool().unwrap());
    assert_eq!(harness.ctx.last_value(), 2.5);
}
