//! Per-state value vectors and pointwise operator semantics for smc.

pub mod accuracy;
pub mod error;
pub mod ops;
pub mod values;

pub use accuracy::{Accuracy, AccuracyLevel};
pub use error::{EvalError, EvalResult};
pub use values::{StateValues, Tolerance};
