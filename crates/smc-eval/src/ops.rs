//! Pointwise semantics of operators and functions on scalar values.
//!
//! These are applied state by state by [`crate::StateValues`]. Integer
//! arithmetic is checked; division always produces a double.

use crate::error::{EvalError, EvalResult};
use smc_expr::{BinOp, FuncName, Type, UnaryOp, Value};

#[inline(always)]
pub fn expect_bool(val: &Value) -> EvalResult<bool> {
    val.as_bool()
        .ok_or_else(|| EvalError::type_mismatch(Type::Bool, val.ty()))
}

#[inline(always)]
pub fn expect_int(val: &Value) -> EvalResult<i64> {
    val.as_int()
        .ok_or_else(|| EvalError::type_mismatch(Type::Int, val.ty()))
}

#[inline(always)]
pub fn expect_f64(val: &Value) -> EvalResult<f64> {
    val.as_f64()
        .ok_or_else(|| EvalError::type_mismatch("numeric", val.ty()))
}

/// Apply a binary operator to two values.
pub fn apply_binary(op: BinOp, a: Value, b: Value) -> EvalResult<Value> {
    match op {
        BinOp::Implies => Ok(Value::Bool(!expect_bool(&a)? || expect_bool(&b)?)),
        BinOp::Iff => Ok(Value::Bool(expect_bool(&a)? == expect_bool(&b)?)),
        BinOp::Or => Ok(Value::Bool(expect_bool(&a)? || expect_bool(&b)?)),
        BinOp::And => Ok(Value::Bool(expect_bool(&a)? && expect_bool(&b)?)),

        BinOp::Eq | BinOp::Ne => {
            let equal = match (a, b) {
                (Value::Bool(x), Value::Bool(y)) => x == y,
                (Value::Int(x), Value::Int(y)) => x == y,
                _ => expect_f64(&a)? == expect_f64(&b)?,
            };
            Ok(Value::Bool(if op == BinOp::Eq { equal } else { !equal }))
        }
        BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le => {
            let holds = match (a, b) {
                (Value::Int(x), Value::Int(y)) => compare(op, x, y),
                _ => compare(op, expect_f64(&a)?, expect_f64(&b)?),
            };
            Ok(Value::Bool(holds))
        }

        BinOp::Plus | BinOp::Minus | BinOp::Times => match (a, b) {
            (Value::Int(x), Value::Int(y)) => {
                let r = match op {
                    BinOp::Plus => x.checked_add(y),
                    BinOp::Minus => x.checked_sub(y),
                    _ => x.checked_mul(y),
                };
                r.map(Value::Int)
                    .ok_or(EvalError::Overflow { op: op.symbol() })
            }
            _ => {
                let (x, y) = (expect_f64(&a)?, expect_f64(&b)?);
                Ok(Value::Double(match op {
                    BinOp::Plus => x + y,
                    BinOp::Minus => x - y,
                    _ => x * y,
                }))
            }
        },
        BinOp::Divide => Ok(Value::Double(expect_f64(&a)? / expect_f64(&b)?)),
    }
}

fn compare<T: PartialOrd>(op: BinOp, x: T, y: T) -> bool {
    match op {
        BinOp::Gt => x > y,
        BinOp::Ge => x >= y,
        BinOp::Lt => x < y,
        _ => x <= y,
    }
}

/// Apply a unary operator to a value.
pub fn apply_unary(op: UnaryOp, a: Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!expect_bool(&a)?)),
        UnaryOp::Minus => match a {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or(EvalError::Overflow { op: "-" }),
            _ => Ok(Value::Double(-expect_f64(&a)?)),
        },
        UnaryOp::Parenth => Ok(a),
    }
}

/// Apply a one-argument function (floor, ceil, round).
pub fn apply_func_unary(func: FuncName, a: Value) -> EvalResult<Value> {
    if let Value::Int(n) = a {
        return Ok(Value::Int(n));
    }
    let d = expect_f64(&a)?;
    if !d.is_finite() {
        return Err(EvalError::NonFinite { value: d });
    }
    let r = match func {
        FuncName::Floor => d.floor(),
        FuncName::Ceil => d.ceil(),
        // Round half up
        _ => (d + 0.5).floor(),
    };
    Ok(Value::Int(r as i64))
}

/// Apply a two-argument function (min, max, pow, mod, log).
pub fn apply_func_binary(func: FuncName, a: Value, b: Value) -> EvalResult<Value> {
    match func {
        FuncName::Min | FuncName::Max => match (a, b) {
            (Value::Int(x), Value::Int(y)) => Ok(Value::Int(if func == FuncName::Min {
                x.min(y)
            } else {
                x.max(y)
            })),
            _ => {
                let (x, y) = (expect_f64(&a)?, expect_f64(&b)?);
                Ok(Value::Double(if func == FuncName::Min {
                    x.min(y)
                } else {
                    x.max(y)
                }))
            }
        },
        FuncName::Pow => match (a, b) {
            (Value::Int(base), Value::Int(exp)) => {
                if exp < 0 {
                    return Err(EvalError::NegativeExponent { exponent: exp });
                }
                let exp = u32::try_from(exp).map_err(|_| EvalError::Overflow { op: "pow" })?;
                base.checked_pow(exp)
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow { op: "pow" })
            }
            _ => Ok(Value::Double(expect_f64(&a)?.powf(expect_f64(&b)?))),
        },
        FuncName::Mod => {
            let (x, y) = (expect_int(&a)?, expect_int(&b)?);
            match y {
                0 => Err(EvalError::ModuloZero),
                y if y < 0 => Err(EvalError::NegativeModulus { divisor: y }),
                y => Ok(Value::Int(x.rem_euclid(y))),
            }
        }
        FuncName::Log => Ok(Value::Double(
            expect_f64(&a)?.ln() / expect_f64(&b)?.ln(),
        )),
        FuncName::Floor | FuncName::Ceil | FuncName::Round | FuncName::Multi => {
            Err(EvalError::TypeMismatch {
                expected: "binary function".to_string(),
                found: func.name().to_string(),
            })
        }
    }
}

/// Conditional: pick `then` or `els` by the boolean `cond`.
pub fn apply_ite(cond: Value, then: Value, els: Value) -> EvalResult<Value> {
    Ok(if expect_bool(&cond)? { then } else { els })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical() {
        let t = Value::Bool(true);
        let f = Value::Bool(false);
        assert_eq!(apply_binary(BinOp::Implies, f, f), Ok(t));
        assert_eq!(apply_binary(BinOp::Implies, t, f), Ok(f));
        assert_eq!(apply_binary(BinOp::Iff, f, f), Ok(t));
        assert!(apply_binary(BinOp::And, t, Value::Int(1)).is_err());
    }

    #[test]
    fn test_mixed_arithmetic() {
        assert_eq!(
            apply_binary(BinOp::Plus, Value::Int(1), Value::Double(0.5)),
            Ok(Value::Double(1.5))
        );
        assert_eq!(
            apply_binary(BinOp::Divide, Value::Int(1), Value::Int(4)),
            Ok(Value::Double(0.25))
        );
        assert_eq!(
            apply_binary(BinOp::Lt, Value::Int(1), Value::Double(1.5)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            apply_binary(BinOp::Eq, Value::Int(2), Value::Double(2.0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            apply_binary(BinOp::Times, Value::Int(i64::MAX), Value::Int(2)),
            Err(EvalError::Overflow { op: "*" })
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            apply_func_binary(FuncName::Mod, Value::Int(-7), Value::Int(3)),
            Ok(Value::Int(2))
        );
        assert_eq!(
            apply_func_binary(FuncName::Mod, Value::Int(7), Value::Int(0)),
            Err(EvalError::ModuloZero)
        );
        assert_eq!(
            apply_func_binary(FuncName::Mod, Value::Int(-7), Value::Int(-3)),
            Err(EvalError::NegativeModulus { divisor: -3 })
        );
        assert_eq!(
            apply_func_binary(FuncName::Mod, Value::Int(i64::MIN), Value::Int(-1)),
            Err(EvalError::NegativeModulus { divisor: -1 })
        );
        assert_eq!(
            apply_func_binary(FuncName::Mod, Value::Int(i64::MIN), Value::Int(i64::MAX)),
            Ok(Value::Int(i64::MAX - 1))
        );
        assert_eq!(
            apply_func_binary(FuncName::Pow, Value::Int(2), Value::Int(10)),
            Ok(Value::Int(1024))
        );
        assert!(apply_func_binary(FuncName::Pow, Value::Int(2), Value::Int(-1)).is_err());
        assert_eq!(
            apply_func_binary(FuncName::Log, Value::Int(8), Value::Int(2)),
            Ok(Value::Double(3.0))
        );
        assert_eq!(
            apply_func_unary(FuncName::Round, Value::Double(2.5)),
            Ok(Value::Int(3))
        );
        assert_eq!(
            apply_func_unary(FuncName::Round, Value::Double(-2.5)),
            Ok(Value::Int(-2))
        );
        assert_eq!(
            apply_func_unary(FuncName::Floor, Value::Double(-0.5)),
            Ok(Value::Int(-1))
        );
        assert!(apply_func_unary(FuncName::Ceil, Value::Double(f64::NAN)).is_err());
    }
}
