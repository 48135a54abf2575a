//! The result record produced by one `check` call.

use smc_eval::{Accuracy, AccuracyLevel, StateValues};
use smc_expr::{FilterOp, Value};
use std::fmt;

/// Records that the answer of a check concretized to a single state.
///
/// Set by `state` filters, and by `forall`/`first` filters over `init` when
/// the model has exactly one initial state. Solvers receive it so they can
/// restrict work to that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterHint {
    pub op: FilterOp,
    pub state: usize,
}

/// The reportable answer of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Value(Value),
    /// `range` filters report the interval of values.
    Range { min: Value, max: Value },
    /// Multi-objective results carry a frontier of points.
    Frontier(Vec<Vec<f64>>),
}

impl ResultValue {
    pub fn as_value(&self) -> Option<Value> {
        match self {
            ResultValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Value(v) => write!(f, "{}", v),
            ResultValue::Range { min, max } => write!(f, "[{},{}]", min, max),
            ResultValue::Frontier(points) => {
                write!(f, "[")?;
                for (i, point) in points.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let coords: Vec<String> = point.iter().map(|x| x.to_string()).collect();
                    write!(f, "({})", coords.join(","))?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Result of checking one property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCheckResult {
    pub value: Option<ResultValue>,
    pub accuracy: Option<Accuracy>,
    /// Lower-cased description of how the value was obtained.
    pub explanation: Option<String>,
    /// Full vector, retained only by `store` filters.
    pub vector: Option<StateValues>,
    /// Parameter values the model was built with, if any.
    pub parameters: Option<String>,
}

impl ModelCheckResult {
    /// `value` or `value (accuracy)`; exact results omit the accuracy.
    pub fn value_string(&self) -> Option<String> {
        let value = self.value.as_ref()?;
        Some(match self.accuracy {
            Some(acc) if acc.level != AccuracyLevel::Exact => format!("{} ({})", value, acc),
            _ => value.to_string(),
        })
    }
}

/// Everything one `check` call produces.
#[derive(Debug)]
pub struct CheckOutcome {
    pub values: StateValues,
    pub result: ModelCheckResult,
    pub hint: Option<FilterHint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_string() {
        let mut result = ModelCheckResult {
            value: Some(ResultValue::Value(Value::Double(0.5))),
            ..Default::default()
        };
        assert_eq!(result.value_string().as_deref(), Some("0.5"));
        result.accuracy = Some(Accuracy::bounded(AccuracyLevel::Bounded, 1e-6, true));
        assert_eq!(result.value_string().as_deref(), Some("0.5 (+/- 1e-6)"));
        result.value = None;
        assert_eq!(result.value_string(), None);
    }

    #[test]
    fn test_range_display() {
        let r = ResultValue::Range {
            min: Value::Int(1),
            max: Value::Int(4),
        };
        assert_eq!(r.to_string(), "[1,4]");
    }
}
