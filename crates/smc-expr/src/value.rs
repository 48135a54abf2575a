//! Scalar runtime values.

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar value: the per-state entry of a value vector, or the
/// reduced answer of a filter.
///
/// Serialized untagged so that JSON `true`, `3` and `0.5` map to the
/// obvious variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
}

impl Value {
    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Double(_) => Type::Double,
        }
    }

    /// The default ("zero") value of a type.
    pub fn default_for(ty: Type) -> Self {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            Type::Double => Value::Double(0.0),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            Value::Bool(_) => None,
        }
    }

    /// Whether this value is zero/false (used by non-zero-only listings).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Double(d) => *d == 0.0,
        }
    }

    /// Convert to the given type, widening Int to Double where needed.
    pub fn coerce(self, ty: Type) -> Option<Value> {
        match (self, ty) {
            (Value::Bool(b), Type::Bool) => Some(Value::Bool(b)),
            (Value::Int(n), Type::Int) => Some(Value::Int(n)),
            (Value::Int(n), Type::Double) => Some(Value::Double(n as f64)),
            (Value::Double(d), Type::Double) => Some(Value::Double(d)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(d) => {
                if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e15 {
                    write!(f, "{:.1}", d)
                } else if d.is_infinite() {
                    write!(f, "{}", if *d > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    write!(f, "{}", d)
                }
            }
        }
    }
}
