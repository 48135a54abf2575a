//! Filter reduction: `filter(op, operand, selector)`.

use crate::checker::{all_states, Checker, Context};
use crate::error::{CheckError, CheckResult};
use crate::result::{FilterHint, ResultValue};
use smallvec::SmallVec;
use smc_eval::{Accuracy, StateValues};
use smc_expr::{FilterExpr, FilterOp, Type, Value};
use smc_model::StateSet;
use tracing::{debug, info};

/// What a reduction produced, before it is written into the result.
struct Reduced {
    vector: StateValues,
    value: Option<ResultValue>,
    accuracy: Option<Accuracy>,
    explanation: Option<String>,
}

impl Checker {
    /// Evaluate a filter. The selector is always evaluated over all states;
    /// the outer domain plays no part.
    pub(crate) fn check_filter(
        &self,
        cx: &mut Context<'_>,
        filter: &FilterExpr,
        _domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let n = cx.num_states();
        let op = filter.op;

        let selector = match &filter.selector {
            Some(sel) => self.eval(cx, sel, None)?,
            None => all_states(n),
        };
        let mut states = selector.into_state_set()?;
        if states.is_empty() {
            return Err(CheckError::EmptyFilter);
        }

        let filter_true = states.is_full(n);
        let filter_init = filter.selector_is_init();
        let filter_init_single = filter_init && cx.model.num_initial_states() == 1;
        if !filter.invisible && !filter_init {
            info!(
                "States satisfying filter {}: {}",
                selector_text(filter),
                states.len()
            );
        }

        if op == FilterOp::First {
            states.retain_first();
        }
        if op == FilterOp::State && states.len() != 1 {
            return Err(CheckError::FilterCardinality {
                filter: selector_text(filter),
                count: states.len(),
            });
        }

        cx.hint = match op {
            FilterOp::State => states.first().map(|state| FilterHint { op, state }),
            FilterOp::Forall | FilterOp::First if filter_init_single => {
                states.first().map(|state| FilterHint { op, state })
            }
            _ => None,
        };

        let vals = self.eval(cx, &filter.operand, Some(&states))?;
        let over = if filter_true {
            "all states"
        } else {
            "states satisfying filter"
        };
        let reduced = match op {
            FilterOp::Print | FilterOp::PrintAll => {
                let include_zeros = op == FilterOp::PrintAll;
                let which = if include_zeros {
                    "including zeros"
                } else {
                    "non-zero only"
                };
                let model = cx.model;
                let lines =
                    vals.format_filtered(&states, include_zeros, |s| model.describe_state(s))?;
                if vals.ty() == Type::Bool {
                    if filter_true {
                        info!("Satisfying states:");
                    } else {
                        info!(
                            "Satisfying states that are also in filter {}:",
                            selector_text(filter)
                        );
                    }
                } else {
                    info!("Results ({}) for filter {}:", which, selector_text(filter));
                }
                for line in &lines {
                    info!("{}", line);
                }
                Reduced::vector_only(vals)
            }
            FilterOp::Store => {
                debug!(states = states.len(), "storing result vector");
                cx.result.vector = Some(vals.clone());
                Reduced::vector_only(vals)
            }
            FilterOp::Min | FilterOp::Max => {
                let is_min = op == FilterOp::Min;
                let value = if is_min {
                    vals.min_over(&states)?
                } else {
                    vals.max_over(&states)?
                };
                let kind = if is_min { "Minimum" } else { "Maximum" };
                let explanation = format!("{} value over {}", kind, over);
                info!("{}: {}", explanation, value);
                let matching = vals.close_value_states(
                    value,
                    self.config.close_tolerance,
                    Some(&states),
                )?;
                self.log_matching_states(cx, &matching, value);
                Reduced::single(n, value, None, explanation)
            }
            FilterOp::ArgMin | FilterOp::ArgMax => {
                let is_min = op == FilterOp::ArgMin;
                let value = if is_min {
                    vals.min_over(&states)?
                } else {
                    vals.max_over(&states)?
                };
                let kind = if is_min { "minimum" } else { "maximum" };
                info!("{} value over {}: {}", capitalize(kind), over, value);
                let matching = vals.close_value_states(
                    value,
                    self.config.close_tolerance,
                    Some(&states),
                )?;
                info!("Number of states with {} value: {}", kind, matching.len());
                Reduced::vector_only(StateValues::from_state_set(matching, n))
            }
            FilterOp::Count => {
                let count = vals.count_over(&states)?;
                let explanation = if filter_true {
                    "Count of satisfying states".to_string()
                } else {
                    "Count of satisfying states also in filter".to_string()
                };
                info!("{}: {}", explanation, count);
                Reduced::single(n, Value::Int(count), None, explanation)
            }
            FilterOp::Sum => {
                let value = vals.sum_over(&states)?;
                let explanation = format!("Sum over {}", over);
                info!("{}: {}", explanation, value);
                Reduced::single(n, value, None, explanation)
            }
            FilterOp::Avg => {
                let value = vals.avg_over(&states)?;
                let explanation = format!("Average over {}", over);
                info!("{}: {}", explanation, value);
                Reduced::single(n, value, None, explanation)
            }
            FilterOp::First => {
                let value = vals.first_in(&states)?;
                let explanation = if filter_init_single {
                    "Value in the initial state"
                } else if filter_init {
                    "Value in first initial state"
                } else if filter_true {
                    "Value in the first state"
                } else {
                    "Value in first state satisfying filter"
                };
                info!("{}: {}", explanation, value);
                Reduced::single(n, value, None, explanation.to_string())
            }
            FilterOp::Range => {
                let (min, max) = vals.range_over(&states)?;
                let over = if filter_init { "initial states" } else { over };
                let explanation = format!("Range of values over {}", over);
                let value = ResultValue::Range { min, max };
                info!("{}: {}", explanation, value);
                Reduced {
                    vector: vals,
                    value: Some(value),
                    accuracy: None,
                    explanation: Some(explanation),
                }
            }
            FilterOp::Forall => {
                if let Some(points) = vals.frontier_points() {
                    info!("Pareto set computation result evaluated");
                    Reduced {
                        vector: all_states(n),
                        value: Some(ResultValue::Frontier(points.to_vec())),
                        accuracy: None,
                        explanation: None,
                    }
                } else {
                    let holds = vals.forall_over(&states)?;
                    let satisfied = vals.count_over(&states)?;
                    let (whom, of) = if filter_init_single {
                        ("the initial state", "initial states")
                    } else if filter_init {
                        ("all initial states", "initial states")
                    } else if filter_true {
                        ("all states", "states")
                    } else {
                        ("all filter states", "filter states")
                    };
                    info!(
                        "Property satisfied in {} of {} {}",
                        satisfied,
                        states.len(),
                        of
                    );
                    let explanation = format!("Property {}satisfied in {}", not(holds), whom);
                    Reduced::single(n, Value::Bool(holds), None, explanation)
                }
            }
            FilterOp::Exists => {
                let holds = vals.exists_over(&states)?;
                let whom = match (filter_true, holds) {
                    (true, true) => "at least one state",
                    (true, false) => "no states",
                    (false, true) => "at least one filter state",
                    (false, false) => "no filter states",
                };
                let explanation = format!("Property satisfied in {}", whom);
                info!("{}", explanation);
                Reduced::single(n, Value::Bool(holds), None, explanation)
            }
            FilterOp::State => {
                let value = vals.first_in(&states)?;
                let explanation = if filter_init {
                    "Value in the initial state"
                } else {
                    "Value in the filter state"
                };
                info!("{}: {}", explanation, value);
                Reduced::single(n, value, vals.accuracy(), explanation.to_string())
            }
        };

        cx.result.value = reduced.value;
        cx.result.accuracy = reduced.accuracy;
        cx.result.explanation = if self.config.explanations && filter.explanation_enabled {
            reduced.explanation.map(|e| e.to_lowercase())
        } else {
            None
        };
        cx.result.parameters = self.info.parameters.clone();
        Ok(reduced.vector)
    }

    fn log_matching_states(&self, cx: &Context<'_>, matching: &StateSet, value: Value) {
        let approx = if matches!(value, Value::Double(_)) {
            "(approximately) "
        } else {
            ""
        };
        info!(
            "There are {} states with {}this value",
            matching.len(),
            approx
        );
        let limit = if self.config.verbose {
            usize::MAX
        } else {
            self.config.max_matching_states_shown
        };
        if matching.len() > limit {
            info!(
                "The first {} states are displayed below. To view them all, enable verbose mode or use a print filter.",
                limit
            );
        }
        let shown: SmallVec<[usize; 10]> = matching.iter().take(limit).collect();
        for s in shown {
            info!("{}", cx.model.describe_state(s));
        }
    }
}

impl Reduced {
    fn vector_only(vector: StateValues) -> Self {
        Self {
            vector,
            value: None,
            accuracy: None,
            explanation: None,
        }
    }

    /// A scalar answer, returned as a constant vector so the filter can
    /// be nested inside other operators.
    fn single(
        n: usize,
        value: Value,
        accuracy: Option<Accuracy>,
        explanation: String,
    ) -> Self {
        let mut vector = StateValues::constant(value, n);
        vector.set_accuracy(accuracy);
        Self {
            vector,
            value: Some(ResultValue::Value(value)),
            accuracy,
            explanation: Some(explanation),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn not(holds: bool) -> &'static str {
    if holds {
        ""
    } else {
        "not "
    }
}

fn selector_text(filter: &FilterExpr) -> String {
    filter
        .selector
        .as_ref()
        .map_or_else(|| "true".to_string(), ToString::to_string)
}
