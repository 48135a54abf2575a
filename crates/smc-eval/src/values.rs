//! State-indexed value vectors.

use crate::accuracy::Accuracy;
use crate::error::{EvalError, EvalResult};
use crate::ops::{expect_bool, expect_f64};
use smc_expr::{Type, Value};
use smc_model::StateSet;
use tracing::trace;

/// Tolerance used when asking which states hold a value "close" to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
    /// Absolute difference if true, relative difference otherwise.
    pub absolute: bool,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            absolute: false,
        }
    }
}

impl Tolerance {
    pub fn absolute(epsilon: f64) -> Self {
        Self {
            epsilon,
            absolute: true,
        }
    }

    pub fn relative(epsilon: f64) -> Self {
        Self {
            epsilon,
            absolute: false,
        }
    }

    /// Whether `a` and `b` are within tolerance of each other.
    pub fn close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        if !a.is_finite() || !b.is_finite() {
            return false;
        }
        let diff = (a - b).abs();
        if self.absolute {
            diff < self.epsilon
        } else if a == 0.0 {
            diff < self.epsilon
        } else {
            diff / a.abs() < self.epsilon
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    Bool(StateSet),
    Int(Vec<i64>),
    Double(Vec<f64>),
    /// Opaque multi-objective result with no per-state entries.
    Frontier(Vec<Vec<f64>>),
}

/// One value per state of a model.
///
/// The length always equals the model's state count. Entries for states
/// outside the domain a vector was computed over hold the type's default
/// value and must not be relied upon. Boolean vectors are stored as their
/// satisfaction set.
///
/// Operations that combine vectors take their operands by value, so every
/// intermediate is released exactly once regardless of which path returns.
#[derive(Debug, Clone, PartialEq)]
pub struct StateValues {
    storage: Storage,
    num_states: usize,
    accuracy: Option<Accuracy>,
}

impl StateValues {
    /// A vector holding `value` in every state.
    pub fn constant(value: Value, num_states: usize) -> Self {
        let storage = match value {
            Value::Bool(true) => Storage::Bool(StateSet::full(num_states)),
            Value::Bool(false) => Storage::Bool(StateSet::new()),
            Value::Int(n) => Storage::Int(vec![n; num_states]),
            Value::Double(d) => Storage::Double(vec![d; num_states]),
        };
        Self {
            storage,
            num_states,
            accuracy: None,
        }
    }

    /// The all-default vector of a type (false, 0 or 0.0 everywhere).
    pub fn default_for(ty: Type, num_states: usize) -> Self {
        Self::constant(Value::default_for(ty), num_states)
    }

    /// A boolean vector that is true exactly on `set`.
    pub fn from_state_set(set: StateSet, num_states: usize) -> Self {
        Self {
            storage: Storage::Bool(set),
            num_states,
            accuracy: None,
        }
    }

    pub fn from_ints(values: Vec<i64>) -> Self {
        Self {
            num_states: values.len(),
            storage: Storage::Int(values),
            accuracy: None,
        }
    }

    pub fn from_doubles(values: Vec<f64>) -> Self {
        Self {
            num_states: values.len(),
            storage: Storage::Double(values),
            accuracy: None,
        }
    }

    /// A multi-objective frontier result.
    pub fn frontier(points: Vec<Vec<f64>>, num_states: usize) -> Self {
        Self {
            storage: Storage::Frontier(points),
            num_states,
            accuracy: None,
        }
    }

    /// Build a vector of type `ty` by calling `f` for every state in
    /// `domain` (all states if `None`). Values are widened to `ty` where
    /// possible; anything else is a type mismatch.
    pub fn from_fn<E: From<EvalError>>(
        ty: Type,
        num_states: usize,
        domain: Option<&StateSet>,
        mut f: impl FnMut(usize) -> Result<Value, E>,
    ) -> Result<Self, E> {
        let mut out = Self::default_for(ty, num_states);
        match domain {
            Some(dom) => {
                for s in dom.iter() {
                    let value = f(s)?;
                    out.set(s, value)?;
                }
            }
            None => {
                for s in 0..num_states {
                    let value = f(s)?;
                    out.set(s, value)?;
                }
            }
        }
        Ok(out)
    }

    fn set(&mut self, s: usize, value: Value) -> EvalResult<()> {
        if s >= self.num_states {
            return Err(EvalError::LengthMismatch {
                expected: self.num_states,
                found: s + 1,
            });
        }
        match &mut self.storage {
            Storage::Bool(set) => {
                if expect_bool(&value)? {
                    set.insert(s);
                } else {
                    set.remove(s);
                }
            }
            Storage::Int(v) => {
                v[s] = value
                    .as_int()
                    .ok_or_else(|| EvalError::type_mismatch(Type::Int, value.ty()))?;
            }
            Storage::Double(v) => v[s] = expect_f64(&value)?,
            Storage::Frontier(_) => return Err(EvalError::NoPerStateValues),
        }
        Ok(())
    }

    /// Static type of the entries. Frontiers report `Double`.
    pub fn ty(&self) -> Type {
        match self.storage {
            Storage::Bool(_) => Type::Bool,
            Storage::Int(_) => Type::Int,
            Storage::Double(_) | Storage::Frontier(_) => Type::Double,
        }
    }

    pub fn len(&self) -> usize {
        self.num_states
    }

    pub fn is_empty(&self) -> bool {
        self.num_states == 0
    }

    pub fn is_frontier(&self) -> bool {
        matches!(self.storage, Storage::Frontier(_))
    }

    pub fn frontier_points(&self) -> Option<&[Vec<f64>]> {
        match &self.storage {
            Storage::Frontier(points) => Some(points),
            _ => None,
        }
    }

    /// The value at state `s`.
    pub fn value_at(&self, s: usize) -> EvalResult<Value> {
        if s >= self.num_states {
            return Err(EvalError::LengthMismatch {
                expected: self.num_states,
                found: s + 1,
            });
        }
        match &self.storage {
            Storage::Bool(set) => Ok(Value::Bool(set.contains(s))),
            Storage::Int(v) => Ok(Value::Int(v[s])),
            Storage::Double(v) => Ok(Value::Double(v[s])),
            Storage::Frontier(_) => Err(EvalError::NoPerStateValues),
        }
    }

    /// All entries in state order.
    pub fn values(&self) -> EvalResult<Vec<Value>> {
        (0..self.num_states).map(|s| self.value_at(s)).collect()
    }

    /// Membership view of a boolean vector.
    pub fn state_set(&self) -> Option<&StateSet> {
        match &self.storage {
            Storage::Bool(set) => Some(set),
            _ => None,
        }
    }

    pub fn into_state_set(self) -> EvalResult<StateSet> {
        let ty = self.ty();
        match self.storage {
            Storage::Bool(set) => Ok(set),
            Storage::Frontier(_) => Err(EvalError::NoPerStateValues),
            _ => Err(EvalError::type_mismatch(Type::Bool, ty)),
        }
    }

    pub fn accuracy(&self) -> Option<Accuracy> {
        self.accuracy
    }

    pub fn set_accuracy(&mut self, accuracy: Option<Accuracy>) {
        self.accuracy = accuracy;
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Release the vector. Dropping it has the same effect; this exists so
    /// that call sites which hand a vector back can say so.
    pub fn release(self) {
        trace!(ty = %self.ty(), states = self.num_states, "release vector");
    }

    fn check_len(&self, other: &StateValues) -> EvalResult<()> {
        if self.num_states != other.num_states {
            return Err(EvalError::LengthMismatch {
                expected: self.num_states,
                found: other.num_states,
            });
        }
        Ok(())
    }

    /// Apply `f` pointwise over `domain`, producing a vector of `ty`.
    pub fn apply_unary(
        self,
        ty: Type,
        domain: Option<&StateSet>,
        f: impl Fn(Value) -> EvalResult<Value>,
    ) -> EvalResult<Self> {
        let accuracy = self.accuracy;
        let mut out = Self::from_fn(ty, self.num_states, domain, |s| f(self.value_at(s)?))?;
        out.accuracy = accuracy;
        Ok(out)
    }

    /// Combine two vectors pointwise over `domain`.
    pub fn apply_binary(
        self,
        other: StateValues,
        ty: Type,
        domain: Option<&StateSet>,
        f: impl Fn(Value, Value) -> EvalResult<Value>,
    ) -> EvalResult<Self> {
        self.check_len(&other)?;
        Self::from_fn(ty, self.num_states, domain, |s| {
            f(self.value_at(s)?, other.value_at(s)?)
        })
    }

    /// Combine three vectors pointwise over `domain`.
    pub fn apply_ternary(
        self,
        second: StateValues,
        third: StateValues,
        ty: Type,
        domain: Option<&StateSet>,
        f: impl Fn(Value, Value, Value) -> EvalResult<Value>,
    ) -> EvalResult<Self> {
        self.check_len(&second)?;
        self.check_len(&third)?;
        Self::from_fn(ty, self.num_states, domain, |s| {
            f(self.value_at(s)?, second.value_at(s)?, third.value_at(s)?)
        })
    }

    fn values_in<'a>(
        &'a self,
        filter: &'a StateSet,
    ) -> impl Iterator<Item = EvalResult<Value>> + 'a {
        filter.iter().map(move |s| self.value_at(s))
    }

    /// Minimum over the states in `filter`. Boolean minimum is conjunction.
    pub fn min_over(&self, filter: &StateSet) -> EvalResult<Value> {
        self.fold_extreme(filter, true)
    }

    /// Maximum over the states in `filter`. Boolean maximum is disjunction.
    pub fn max_over(&self, filter: &StateSet) -> EvalResult<Value> {
        self.fold_extreme(filter, false)
    }

    fn fold_extreme(&self, filter: &StateSet, min: bool) -> EvalResult<Value> {
        if filter.is_empty() {
            return Err(EvalError::EmptyReduction);
        }
        let mut acc: Option<Value> = None;
        for v in self.values_in(filter) {
            let v = v?;
            acc = Some(match (acc, v) {
                (None, v) => v,
                (Some(Value::Bool(a)), Value::Bool(b)) => {
                    Value::Bool(if min { a && b } else { a || b })
                }
                (Some(Value::Int(a)), Value::Int(b)) => {
                    Value::Int(if min { a.min(b) } else { a.max(b) })
                }
                (Some(a), b) => {
                    let (a, b) = (expect_f64(&a)?, expect_f64(&b)?);
                    Value::Double(if min { a.min(b) } else { a.max(b) })
                }
            });
        }
        acc.ok_or(EvalError::EmptyReduction)
    }

    /// Sum over the states in `filter`.
    pub fn sum_over(&self, filter: &StateSet) -> EvalResult<Value> {
        match &self.storage {
            Storage::Int(v) => filter
                .iter()
                .try_fold(0i64, |acc, s| acc.checked_add(v[s]))
                .map(Value::Int)
                .ok_or(EvalError::Overflow { op: "sum" }),
            Storage::Double(v) => Ok(Value::Double(filter.iter().map(|s| v[s]).sum())),
            Storage::Bool(_) => Err(EvalError::type_mismatch("numeric", Type::Bool)),
            Storage::Frontier(_) => Err(EvalError::NoPerStateValues),
        }
    }

    /// Mean over the states in `filter`; always a double.
    pub fn avg_over(&self, filter: &StateSet) -> EvalResult<Value> {
        if filter.is_empty() {
            return Err(EvalError::EmptyReduction);
        }
        let sum = match &self.storage {
            Storage::Int(v) => filter.iter().map(|s| v[s] as f64).sum::<f64>(),
            Storage::Double(v) => filter.iter().map(|s| v[s]).sum::<f64>(),
            Storage::Bool(_) => return Err(EvalError::type_mismatch("numeric", Type::Bool)),
            Storage::Frontier(_) => return Err(EvalError::NoPerStateValues),
        };
        Ok(Value::Double(sum / filter.len() as f64))
    }

    /// Number of states in `filter` where the boolean vector holds.
    pub fn count_over(&self, filter: &StateSet) -> EvalResult<i64> {
        let set = self.bool_view()?;
        Ok(filter.iter().filter(|&s| set.contains(s)).count() as i64)
    }

    /// Whether the boolean vector holds in every state of `filter`.
    pub fn forall_over(&self, filter: &StateSet) -> EvalResult<bool> {
        Ok(filter.is_subset(self.bool_view()?))
    }

    /// Whether the boolean vector holds in some state of `filter`.
    pub fn exists_over(&self, filter: &StateSet) -> EvalResult<bool> {
        let set = self.bool_view()?;
        Ok(filter.iter().any(|s| set.contains(s)))
    }

    /// Value at the lowest-index state of `filter`.
    pub fn first_in(&self, filter: &StateSet) -> EvalResult<Value> {
        let s = filter.first().ok_or(EvalError::EmptyReduction)?;
        self.value_at(s)
    }

    /// `(min, max)` over the states in `filter`.
    pub fn range_over(&self, filter: &StateSet) -> EvalResult<(Value, Value)> {
        Ok((self.min_over(filter)?, self.max_over(filter)?))
    }

    fn bool_view(&self) -> EvalResult<&StateSet> {
        match &self.storage {
            Storage::Bool(set) => Ok(set),
            Storage::Frontier(_) => Err(EvalError::NoPerStateValues),
            _ => Err(EvalError::type_mismatch(Type::Bool, self.ty())),
        }
    }

    /// States whose value is within `tolerance` of `value`, optionally
    /// restricted to `within`. Boolean vectors compare exactly.
    pub fn close_value_states(
        &self,
        value: Value,
        tolerance: Tolerance,
        within: Option<&StateSet>,
    ) -> EvalResult<StateSet> {
        let matches = |s: usize| -> EvalResult<bool> {
            let v = self.value_at(s)?;
            Ok(match (v, value) {
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Int(a), Value::Int(b)) => a == b,
                _ => tolerance.close(expect_f64(&value)?, expect_f64(&v)?),
            })
        };
        let mut out = StateSet::new();
        match within {
            Some(set) => {
                for s in set.iter() {
                    if matches(s)? {
                        out.insert(s);
                    }
                }
            }
            None => {
                for s in 0..self.num_states {
                    if matches(s)? {
                        out.insert(s);
                    }
                }
            }
        }
        Ok(out)
    }

    /// One line `state:value` per state of `filter`. Zero (or false)
    /// entries are skipped unless `include_zeros` is set. `describe`
    /// renders a state index.
    pub fn format_filtered(
        &self,
        filter: &StateSet,
        include_zeros: bool,
        describe: impl Fn(usize) -> String,
    ) -> EvalResult<Vec<String>> {
        let mut lines = Vec::new();
        for s in filter.iter() {
            let v = self.value_at(s)?;
            if include_zeros || !v.is_zero() {
                lines.push(format!("{}:{}", describe(s), v));
            }
        }
        Ok(lines)
    }
}
