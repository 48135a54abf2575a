//! Evaluation error types.

use smc_expr::Type;
use thiserror::Error;

/// Error raised while computing per-state values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("attempt to compute modulo zero")]
    ModuloZero,

    #[error("negative modulus {divisor} not allowed")]
    NegativeModulus { divisor: i64 },

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    #[error("negative exponent {exponent} not allowed for integer power")]
    NegativeExponent { exponent: i64 },

    #[error("cannot convert non-finite value {value} to an integer")]
    NonFinite { value: f64 },

    #[error("vector has no per-state values (multi-objective frontier)")]
    NoPerStateValues,

    #[error("reduction over an empty set of states")]
    EmptyReduction,

    #[error("vector length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

impl EvalError {
    pub fn type_mismatch(expected: impl ToString, found: Type) -> Self {
        EvalError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
