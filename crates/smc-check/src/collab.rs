//! Interfaces to the numeric engines the checker delegates to.

use crate::error::{CheckError, CheckResult};
use crate::result::FilterHint;
use smc_eval::StateValues;
use smc_expr::{Expr, QuantExpr};
use smc_model::{Model, StateSet};

/// Input to a quantitative solver.
///
/// `quant.operand` has had its maximal state formulas replaced by labels
/// named in `labels`; those labels are not registered on the model.
pub struct SolverRequest<'a> {
    pub model: &'a dyn Model,
    pub quant: &'a QuantExpr,
    pub labels: &'a [(String, StateSet)],
    pub rewards: Option<&'a Rewards>,
    pub domain: Option<&'a StateSet>,
    pub hint: Option<FilterHint>,
}

impl SolverRequest<'_> {
    /// Satisfaction set of a label in the rewritten path formula: extracted
    /// labels first, then labels attached to the model.
    pub fn label_states(&self, name: &str) -> Option<&StateSet> {
        self.labels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, set)| set)
            .or_else(|| self.model.label_states(name))
    }
}

/// Computes `P`, `R` and `S` operators.
pub trait QuantSolver: Send + Sync {
    fn check_quant(&self, request: &SolverRequest<'_>) -> CheckResult<StateValues>;

    /// Multi-objective queries (`multi(...)`).
    fn check_multi(
        &self,
        model: &dyn Model,
        _args: &[Expr],
        _domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        Err(CheckError::unsupported_for(
            "multi-objective model checking",
            model.model_type(),
        ))
    }
}

/// A reward structure built for one `R` operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewards {
    pub index: usize,
    pub state_rewards: Vec<f64>,
    pub has_transition_rewards: bool,
}

/// Builds reward structures by index.
pub trait RewardConstructor: Send + Sync {
    /// `allow_negative` is set for concurrent stochastic games; `expected`
    /// for expected-value (rather than path) rewards.
    fn construct(
        &self,
        model: &dyn Model,
        index: usize,
        allow_negative: bool,
        expected: bool,
    ) -> CheckResult<Rewards>;
}

/// Produces a smaller model preserving the given labelled state sets.
pub trait Minimiser: Send + Sync {
    /// The returned model must carry a label `names[i]` for every `sets[i]`.
    fn minimise(
        &self,
        model: &dyn Model,
        names: &[String],
        sets: &[StateSet],
    ) -> CheckResult<Box<dyn Model>>;
}
