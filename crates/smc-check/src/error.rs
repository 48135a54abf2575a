//! Errors raised while checking an expression.

use smc_eval::EvalError;
use smc_model::{ModelError, ModelType};
use thiserror::Error;

/// Model checking error. Every error is fatal to the current call.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unknown identifier \"{name}\"")]
    UnresolvedIdentifier { name: String },

    #[error("unexpanded formula \"{name}\"")]
    UnexpandedFormula { name: String },

    #[error("couldn't check {0}")]
    UnsupportedExpression(String),

    #[error("unknown label \"{name}\"")]
    UnknownLabel { name: String },

    #[error("unknown property reference \"{name}\"")]
    UnknownProperty { name: String },

    #[error("undefined constant \"{name}\"")]
    UnknownConstant { name: String },

    #[error("{kind} \"{name}\" refers to itself")]
    CyclicReference { kind: &'static str, name: String },

    #[error("unknown observable \"{name}\"")]
    UnknownObservable { name: String },

    #[error("no value for \"{name}\" in state {state}")]
    MissingValue { name: String, state: usize },

    #[error("filter satisfies no states")]
    EmptyFilter,

    #[error("filter should be satisfied in exactly 1 state (but {filter} is true in {count} states)")]
    FilterCardinality { filter: String, count: usize },

    #[error("{operation} not supported for {model_type} models")]
    UnsupportedForModelKind {
        operation: String,
        model_type: ModelType,
    },

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("solver error: {0}")]
    Solver(String),

    #[error("minimisation failed: {0}")]
    Minimisation(String),
}

impl CheckError {
    pub fn unsupported_for(operation: impl Into<String>, model_type: ModelType) -> Self {
        CheckError::UnsupportedForModelKind {
            operation: operation.into(),
            model_type,
        }
    }
}

pub type CheckResult<T> = Result<T, CheckError>;
