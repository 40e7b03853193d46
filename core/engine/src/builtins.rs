//! FILENAME: core/engine/src/builtins.rs
//! PURPOSE: Built-in math and logic functions.
//! CONTEXT: The last stage of every resolution chain. Arguments arrive
//! already evaluated, so `if` evaluates both branches.
//!
//! FUNCTIONS:
//! - One argument: abs, frac, sqrt, sin, cos, tan, atan, log (natural),
//!   exp, trunc, sign
//! - Fixed: mod(a, b), if(cond, then, else), random()
//! - One or more: max, min, sum, and, or
//! - round(x) to 2 decimals, round(x, digits)

use crate::error::{EvalError, EvalResult};

/// Evaluates a built-in. Returns `Ok(None)` when `name` is not a built-in.
pub fn call(name: &str, args: &[f64]) -> EvalResult<Option<f64>> {
    let value = match name {
        "abs" => unary(name, args, f64::abs)?,
        "frac" => unary(name, args, |x| x - x.trunc())?,
        "sqrt" => unary(name, args, f64::sqrt)?,
        "sin" => unary(name, args, f64::sin)?,
        "cos" => unary(name, args, f64::cos)?,
        "tan" => unary(name, args, f64::tan)?,
        "atan" => unary(name, args, f64::atan)?,
        "log" => unary(name, args, f64::ln)?,
        "exp" => unary(name, args, f64::exp)?,
        "trunc" => unary(name, args, f64::trunc)?,
        "sign" => unary(name, args, sign)?,

        "mod" => match args {
            [a, b] => a.trunc() % b.trunc(),
            _ => return Err(EvalError::arity(name, "2 arguments", args.len())),
        },
        "if" => match args {
            [condition, then, otherwise] => {
                if *condition != 0.0 {
                    *then
                } else {
                    *otherwise
                }
            }
            _ => return Err(EvalError::arity(name, "3 arguments", args.len())),
        },
        "random" => match args {
            [] => rand::random::<f64>(),
            _ => return Err(EvalError::arity(name, "no arguments", args.len())),
        },
        "round" => match args {
            [x] => round_to(*x, 2.0),
            [x, digits] => round_to(*x, *digits),
            _ => return Err(EvalError::arity(name, "1 or 2 arguments", args.len())),
        },

        "max" => fold(name, args, f64::max)?,
        "min" => fold(name, args, f64::min)?,
        "sum" => non_empty(name, args)?.iter().sum(),
        "and" => flag(non_empty(name, args)?.iter().all(|v| *v != 0.0)),
        "or" => flag(non_empty(name, args)?.iter().any(|v| *v != 0.0)),

        _ => return Ok(None),
    };

    Ok(Some(value))
}

fn unary(name: &str, args: &[f64], f: impl Fn(f64) -> f64) -> EvalResult<f64> {
    match args {
        [x] => Ok(f(*x)),
        _ => Err(EvalError::arity(name, "1 argument", args.len())),
    }
}

fn non_empty<'a>(name: &str, args: &'a [f64]) -> EvalResult<&'a [f64]> {
    if args.is_empty() {
        Err(EvalError::arity(name, "at least 1 argument", 0))
    } else {
        Ok(args)
    }
}

fn fold(name: &str, args: &[f64], f: fn(f64, f64) -> f64) -> EvalResult<f64> {
    args.iter()
        .copied()
        .reduce(f)
        .ok_or_else(|| EvalError::arity(name, "at least 1 argument", 0))
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// Rounds half away from zero to `digits` decimals (negative digits round to tens, hundreds...).
fn round_to(x: f64, digits: f64) -> f64 {
    let factor = 10f64.powi(digits.trunc() as i32);
    (x * factor).round() / factor
}
