//! Recursive evaluation of expressions into per-state value vectors.

use crate::collab::{Minimiser, QuantSolver, RewardConstructor, Rewards, SolverRequest};
use crate::config::CheckerConfig;
use crate::error::{CheckError, CheckResult};
use crate::info::ModelCheckingInfo;
use crate::result::{CheckOutcome, FilterHint, ModelCheckResult};
use smc_eval::{ops, EvalError, StateValues};
use smc_expr::{
    Expr, FilterOp, FuncName, QuantExpr, QuantKind, Type, UnaryOp, Value, DEADLOCK_LABEL,
    INIT_LABEL,
};
use smc_model::{Model, ModelType, StateSet};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Per-call state: the model being checked, the current filter hint and
/// the result record that filters write into.
pub(crate) struct Context<'m> {
    pub model: &'m dyn Model,
    pub hint: Option<FilterHint>,
    pub result: ModelCheckResult,
    /// Property and label definitions currently being expanded.
    pub properties: Vec<String>,
    pub labels: Vec<String>,
}

impl<'m> Context<'m> {
    pub fn new(model: &'m dyn Model, parameters: Option<String>) -> Self {
        Self {
            model,
            hint: None,
            result: ModelCheckResult {
                parameters,
                ..Default::default()
            },
            properties: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn num_states(&self) -> usize {
        self.model.num_states()
    }

    /// Mark property `name` as being expanded. Fails if it already is.
    pub fn enter_property(&mut self, name: &str) -> CheckResult<()> {
        enter(&mut self.properties, "property", name)
    }

    pub fn enter_label(&mut self, name: &str) -> CheckResult<()> {
        enter(&mut self.labels, "label", name)
    }
}

/// `Result: v`, or `Result (name): v` with the name lower-cased when it
/// says more than "Result".
fn result_line(name: &str, result: &ModelCheckResult) -> String {
    let value = result
        .value_string()
        .unwrap_or_else(|| "none".to_string());
    if name == "Result" {
        format!("Result: {}", value)
    } else {
        format!("Result ({}): {}", name.to_lowercase(), value)
    }
}

fn enter(stack: &mut Vec<String>, kind: &'static str, name: &str) -> CheckResult<()> {
    if stack.iter().any(|n| n == name) {
        return Err(CheckError::CyclicReference {
            kind,
            name: name.to_string(),
        });
    }
    stack.push(name.to_string());
    Ok(())
}

/// State-expression model checker.
///
/// Holds the definitions references resolve against and the engines that
/// quantitative operators are delegated to. Checking never mutates the
/// checker, so one instance can check several models concurrently.
pub struct Checker {
    pub(crate) config: CheckerConfig,
    pub(crate) info: ModelCheckingInfo,
    solver: Option<Box<dyn QuantSolver>>,
    rewards: Option<Box<dyn RewardConstructor>>,
    minimiser: Option<Box<dyn Minimiser>>,
}

impl Checker {
    pub fn new(info: ModelCheckingInfo, config: CheckerConfig) -> Self {
        Self {
            config,
            info,
            solver: None,
            rewards: None,
            minimiser: None,
        }
    }

    pub fn with_solver(mut self, solver: impl QuantSolver + 'static) -> Self {
        self.solver = Some(Box::new(solver));
        self
    }

    pub fn with_reward_constructor(mut self, rewards: impl RewardConstructor + 'static) -> Self {
        self.rewards = Some(Box::new(rewards));
        self
    }

    pub fn with_minimiser(mut self, minimiser: impl Minimiser + 'static) -> Self {
        self.minimiser = Some(Box::new(minimiser));
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn info(&self) -> &ModelCheckingInfo {
        &self.info
    }

    /// Check a property on a model: add default filters, optionally
    /// minimise, evaluate over all states, and report the result.
    pub fn check(&self, model: &dyn Model, expr: &Expr) -> CheckResult<CheckOutcome> {
        let start = Instant::now();

        let mut expr = expr.clone();
        if self.config.store_vector {
            expr = Expr::invisible_filter(FilterOp::Store, expr, None);
        }
        expr = self.add_default_filter_if_needed(model, expr);

        let minimised;
        let model: &dyn Model = if self.config.do_bisim {
            match &self.minimiser {
                Some(minimiser) => {
                    let extracted = {
                        let mut cx = Context::new(model, None);
                        self.extract(&mut cx, expr)?
                    };
                    let (names, sets): (Vec<String>, Vec<StateSet>) =
                        extracted.labels.into_iter().unzip();
                    minimised = minimiser.minimise(model, &names, &sets)?;
                    info!(
                        states = minimised.num_states(),
                        "Modified property: {}", extracted.expr
                    );
                    expr = extracted.expr;
                    &*minimised
                }
                None => {
                    warn!("no minimiser configured, checking the unminimised model");
                    model
                }
            }
        } else {
            model
        };

        let mut cx = Context::new(model, self.info.parameters.clone());
        let values = self.eval(&mut cx, &expr, None)?;

        info!(
            "Time for model checking: {:.3} seconds",
            start.elapsed().as_secs_f64()
        );
        info!("{}", result_line(&expr.result_name(), &cx.result));

        Ok(CheckOutcome {
            values,
            result: cx.result,
            hint: cx.hint,
        })
    }

    /// Wrap `expr` in an invisible filter when it does not already yield
    /// a single value: `forall` over `init` for booleans, `state` over
    /// `init` with one initial state, otherwise `range` over `init`.
    pub fn add_default_filter_if_needed(&self, model: &dyn Model, expr: Expr) -> Expr {
        if expr.returns_single_value() {
            return expr;
        }
        let op = if expr.ty() == Type::Bool {
            FilterOp::Forall
        } else if model.num_initial_states() == 1 {
            FilterOp::State
        } else {
            FilterOp::Range
        };
        debug!(filter = %op, "adding default filter");
        Expr::invisible_filter(op, expr, Some(Expr::init_label()))
    }

    /// Evaluate `expr` in every state of `domain` (all states if `None`).
    pub fn check_expression(
        &self,
        model: &dyn Model,
        expr: &Expr,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let mut cx = Context::new(model, self.info.parameters.clone());
        self.eval(&mut cx, expr, domain)
    }

    /// Satisfaction sets for a list of label names.
    pub fn check_labels(&self, model: &dyn Model, names: &[String]) -> CheckResult<Vec<StateSet>> {
        let mut cx = Context::new(model, None);
        names
            .iter()
            .map(|name| {
                let vals = self.check_label(&mut cx, name, None)?;
                Ok(vals.into_state_set()?)
            })
            .collect()
    }

    /// Names of all labels defined outside the model's own registry.
    pub fn defined_label_names(&self) -> BTreeSet<String> {
        self.info
            .labels
            .iter()
            .map(|l| l.name.clone())
            .chain(self.info.model_label_names.iter().cloned())
            .collect()
    }

    /// Replace every maximal state formula of `expr` by a label registered
    /// on `model` (prefix `phi`), so later passes see only label references.
    pub fn handle_maximal_state_formulas(
        &self,
        model: &mut dyn Model,
        expr: &Expr,
    ) -> CheckResult<Expr> {
        let extracted = {
            let mut cx = Context::new(&*model, None);
            self.extract(&mut cx, expr.clone())?
        };
        let defined = self.defined_label_names();
        let mut renames = HashMap::new();
        for (placeholder, set) in extracted.labels {
            let name = model.add_unique_label("phi", set, &defined)?;
            debug!(placeholder = %placeholder, label = %name, "registered state formula label");
            renames.insert(placeholder, name);
        }
        let mut out = extracted.expr;
        out.rename_labels(&renames);
        Ok(out)
    }

    pub(crate) fn eval(
        &self,
        cx: &mut Context<'_>,
        expr: &Expr,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        trace!(kind = expr.kind_name(), "check");
        let n = cx.num_states();
        match expr {
            Expr::Ite { cond, then, els } => {
                self.check_ite(cx, cond, then, els, expr.ty(), domain)
            }
            Expr::Binary { op, left, right } => {
                if matches!(
                    op,
                    smc_expr::BinOp::And | smc_expr::BinOp::Or | smc_expr::BinOp::Implies
                ) {
                    return self.check_logical(cx, *op, left, right, domain);
                }
                let l = self.eval(cx, left, domain)?;
                let r = self.eval(cx, right, domain)?;
                let op = *op;
                Ok(l.apply_binary(r, expr.ty(), domain, |a, b| ops::apply_binary(op, a, b))?)
            }
            Expr::Unary { op, operand } => {
                let v = self.eval(cx, operand, domain)?;
                if *op == UnaryOp::Parenth {
                    return Ok(v);
                }
                let op = *op;
                Ok(v.apply_unary(expr.ty(), domain, |a| ops::apply_unary(op, a))?)
            }
            Expr::Func { func, args } => self.check_func(cx, *func, args, expr.ty(), domain),
            Expr::Literal { value } => Ok(StateValues::constant(*value, n)),
            Expr::Constant { name, ty } => {
                let value = self
                    .info
                    .constant(name)
                    .ok_or_else(|| CheckError::UnknownConstant { name: name.clone() })?;
                let value = value
                    .coerce(*ty)
                    .ok_or_else(|| EvalError::type_mismatch(ty, value.ty()))?;
                Ok(StateValues::constant(value, n))
            }
            Expr::Ident { name, .. } => Err(CheckError::UnresolvedIdentifier { name: name.clone() }),
            Expr::Formula {
                name, definition, ..
            } => match definition {
                Some(def) => self.eval(cx, def, domain),
                None => Err(CheckError::UnexpandedFormula { name: name.clone() }),
            },
            Expr::Var { name, index, ty } => {
                let model = cx.model;
                StateValues::from_fn(*ty, n, domain, |s| {
                    model
                        .var_value(s, *index)
                        .ok_or_else(|| CheckError::MissingValue {
                            name: name.clone(),
                            state: s,
                        })
                })
            }
            Expr::Obs { name, ty } => {
                let index = self
                    .info
                    .observable_index(name)
                    .ok_or_else(|| CheckError::UnknownObservable { name: name.clone() })?;
                let model = cx.model;
                if !model.model_type().is_partially_observable() {
                    return Err(CheckError::unsupported_for(
                        "observables",
                        model.model_type(),
                    ));
                }
                StateValues::from_fn(*ty, n, domain, |s| {
                    model
                        .observation_value(s, index)
                        .ok_or_else(|| CheckError::MissingValue {
                            name: name.clone(),
                            state: s,
                        })
                })
            }
            Expr::Label { name } => self.check_label(cx, name, domain),
            Expr::Prop { name, .. } => {
                let prop = self
                    .info
                    .property(name)
                    .ok_or_else(|| CheckError::UnknownProperty { name: name.clone() })?;
                cx.enter_property(name)?;
                info!("Model checking : {}", prop);
                let values = self.eval(cx, prop, domain);
                cx.properties.pop();
                values
            }
            Expr::Filter(filter) => self.check_filter(cx, filter, domain),
            Expr::Quant(quant) => self.check_quant(cx, quant, domain),
            Expr::Temporal { op, .. } => Err(CheckError::UnsupportedExpression(format!(
                "path operator {} outside a P, R or S operator",
                op.symbol()
            ))),
        }
    }

    fn check_label(
        &self,
        cx: &mut Context<'_>,
        name: &str,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let n = cx.num_states();
        if let Some(states) = cx.model.label_states(name) {
            return Ok(StateValues::from_state_set(states.clone(), n));
        }
        if let Some(def) = self.info.label(name) {
            cx.enter_label(name)?;
            let values = self.eval(cx, def, domain);
            cx.labels.pop();
            return values;
        }
        let model = cx.model;
        let states: StateSet = match name {
            DEADLOCK_LABEL => (0..n).filter(|&s| model.is_deadlock_state(s)).collect(),
            INIT_LABEL => (0..n).filter(|&s| model.is_initial_state(s)).collect(),
            _ => {
                return Err(CheckError::UnknownLabel {
                    name: name.to_string(),
                })
            }
        };
        Ok(StateValues::from_state_set(states, n))
    }

    fn check_func(
        &self,
        cx: &mut Context<'_>,
        func: FuncName,
        args: &[Expr],
        ty: Type,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        match (func, args) {
            (FuncName::Multi, _) => match &self.solver {
                Some(solver) => solver.check_multi(cx.model, args, domain),
                None => Err(CheckError::unsupported_for(
                    "multi-objective model checking",
                    cx.model.model_type(),
                )),
            },
            (FuncName::Min | FuncName::Max, [first, rest @ ..]) if !rest.is_empty() => {
                let mut acc = self.eval(cx, first, domain)?;
                for arg in rest {
                    let next = self.eval(cx, arg, domain)?;
                    acc = acc.apply_binary(next, ty, domain, |a, b| {
                        ops::apply_func_binary(func, a, b)
                    })?;
                }
                Ok(acc)
            }
            (FuncName::Floor | FuncName::Ceil | FuncName::Round, [arg]) => {
                let v = self.eval(cx, arg, domain)?;
                Ok(v.apply_unary(ty, domain, |a| ops::apply_func_unary(func, a))?)
            }
            (FuncName::Pow | FuncName::Mod | FuncName::Log, [a, b]) => {
                let l = self.eval(cx, a, domain)?;
                let r = self.eval(cx, b, domain)?;
                Ok(l.apply_binary(r, ty, domain, |x, y| ops::apply_func_binary(func, x, y))?)
            }
            _ => Err(CheckError::UnsupportedExpression(format!(
                "function \"{}\" with {} argument(s)",
                func.name(),
                args.len()
            ))),
        }
    }

    fn check_quant(
        &self,
        cx: &mut Context<'_>,
        quant: &QuantExpr,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let model_type = cx.model.model_type();
        let solver = self
            .solver
            .as_ref()
            .ok_or_else(|| CheckError::unsupported_for("quantitative operators", model_type))?;

        let rewards = match quant.kind {
            QuantKind::Reward { index } => Some(self.build_rewards(cx.model, index)?),
            QuantKind::Prob | QuantKind::SteadyState => None,
        };

        let extracted = self.extract(cx, quant.operand.clone())?;
        let rewritten = QuantExpr {
            kind: quant.kind,
            query: quant.query,
            operand: extracted.expr,
        };
        debug!(
            labels = extracted.labels.len(),
            path = %rewritten.operand,
            "delegating quantitative operator to solver"
        );

        let request = SolverRequest {
            model: cx.model,
            quant: &rewritten,
            labels: &extracted.labels,
            rewards: rewards.as_ref(),
            domain,
            hint: cx.hint,
        };
        let values = solver.check_quant(&request)?;
        if values.len() != cx.num_states() {
            return Err(EvalError::LengthMismatch {
                expected: cx.num_states(),
                found: values.len(),
            }
            .into());
        }
        Ok(values)
    }

    fn build_rewards(&self, model: &dyn Model, index: usize) -> CheckResult<Rewards> {
        let model_type = model.model_type();
        let constructor = self
            .rewards
            .as_ref()
            .ok_or_else(|| CheckError::unsupported_for("reward structures", model_type))?;
        let allow_negative = model_type == ModelType::Csg;
        let rewards = constructor.construct(model, index, allow_negative, true)?;
        if model_type == ModelType::Idtmc && rewards.has_transition_rewards {
            return Err(CheckError::unsupported_for(
                "expected transition rewards",
                model_type,
            ));
        }
        Ok(rewards)
    }
}

/// Literal `true` vector, used when a selector is absent.
pub(crate) fn all_states(n: usize) -> StateValues {
    StateValues::constant(Value::Bool(true), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultValue;
    use smc_expr::BinOp;
    use smc_model::ExplicitModel;

    fn model_with_x(xs: &[i64], initial: &[usize]) -> ExplicitModel {
        let mut m = ExplicitModel::new(ModelType::Dtmc, vec!["x".to_string()]);
        for &x in xs {
            m.add_state(vec![Value::Int(x)]).unwrap();
        }
        for &s in initial {
            m.add_initial_state(s).unwrap();
        }
        m
    }

    fn x() -> Expr {
        Expr::var("x", 0, Type::Int)
    }

    fn x_pos() -> Expr {
        Expr::binary(BinOp::Gt, x(), Expr::int(0))
    }

    #[test]
    fn test_ite_scenario() {
        let m = model_with_x(&[-1, 0, 2], &[0]);
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let e = Expr::ite(
            Expr::binary(BinOp::Gt, x(), Expr::int(0)),
            Expr::int(1),
            Expr::int(0),
        );
        let v = checker.check_expression(&m, &e, None).unwrap();
        assert_eq!(
            v.values().unwrap(),
            vec![Value::Int(0), Value::Int(0), Value::Int(1)]
        );
    }

    #[test]
    fn test_identifier_and_formula_errors() {
        let m = model_with_x(&[0], &[0]);
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let err = checker
            .check_expression(&m, &Expr::ident("y", Type::Int), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::UnresolvedIdentifier { name } if name == "y"));
        let err = checker
            .check_expression(&m, &Expr::formula("f", None, Type::Bool), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::UnexpandedFormula { .. }));
        let v = checker
            .check_expression(
                &m,
                &Expr::formula("f", Some(Expr::binary(BinOp::Plus, x(), Expr::int(3))), Type::Int),
                None,
            )
            .unwrap();
        assert_eq!(v.value_at(0), Ok(Value::Int(3)));
    }

    #[test]
    fn test_label_resolution_order() {
        let mut m = model_with_x(&[0, 1, 2], &[0]);
        m.add_transition(0, 1).unwrap();
        m.add_transition(1, 2).unwrap();
        let mut info = ModelCheckingInfo::default();
        info.add_label("big", Expr::binary(BinOp::Ge, x(), Expr::int(1)));
        let checker = Checker::new(info, CheckerConfig::default());

        let sets = checker
            .check_labels(&m, &["big".to_string(), "deadlock".to_string(), "init".to_string()])
            .unwrap();
        assert_eq!(sets[0], [1usize, 2].into_iter().collect::<StateSet>());
        assert_eq!(sets[1], StateSet::singleton(2));
        assert_eq!(sets[2], StateSet::singleton(0));

        m.add_label("big", StateSet::singleton(0)).unwrap();
        let sets = checker.check_labels(&m, &["big".to_string()]).unwrap();
        assert_eq!(sets[0], StateSet::singleton(0));

        let err = checker.check_labels(&m, &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, CheckError::UnknownLabel { .. }));
    }

    #[test]
    fn test_constants_and_properties() {
        let m = model_with_x(&[1, 2], &[0]);
        let mut info = ModelCheckingInfo::default();
        info.constants.insert("K".to_string(), Value::Int(2));
        info.add_property("p", Expr::binary(BinOp::Eq, x(), Expr::constant("K", Type::Int)));
        let checker = Checker::new(info, CheckerConfig::default());

        let v = checker
            .check_expression(&m, &Expr::prop("p", Type::Bool), None)
            .unwrap();
        assert_eq!(v.state_set(), Some(&StateSet::singleton(1)));

        let err = checker
            .check_expression(&m, &Expr::constant("M", Type::Int), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::UnknownConstant { .. }));
        let err = checker
            .check_expression(&m, &Expr::prop("q", Type::Bool), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::UnknownProperty { .. }));
    }

    #[test]
    fn test_functions() {
        let m = model_with_x(&[3, -4], &[0]);
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let e = Expr::func(FuncName::Max, vec![x(), Expr::int(0), Expr::int(1)]);
        let v = checker.check_expression(&m, &e, None).unwrap();
        assert_eq!(v.values().unwrap(), vec![Value::Int(3), Value::Int(1)]);

        let e = Expr::func(FuncName::Mod, vec![x(), Expr::int(3)]);
        let v = checker.check_expression(&m, &e, None).unwrap();
        assert_eq!(v.values().unwrap(), vec![Value::Int(0), Value::Int(2)]);

        let e = Expr::func(FuncName::Floor, vec![x(), x()]);
        let err = checker.check_expression(&m, &e, None).unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedExpression(_)));

        let e = Expr::func(FuncName::Multi, vec![]);
        let err = checker.check_expression(&m, &e, None).unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedForModelKind { .. }));
    }

    #[test]
    fn test_observables_need_partial_observability() {
        let mut info = ModelCheckingInfo::default();
        info.observables.push("o".to_string());
        let checker = Checker::new(info, CheckerConfig::default());
        let m = model_with_x(&[0], &[0]);
        let err = checker
            .check_expression(&m, &Expr::obs("o", Type::Int), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedForModelKind { .. }));

        let mut po = ExplicitModel::new(ModelType::Pomdp, vec!["x".to_string()]);
        po.add_state(vec![Value::Int(5)]).unwrap();
        po.set_observation(0, vec![Value::Int(7)]).unwrap();
        let v = checker
            .check_expression(&po, &Expr::obs("o", Type::Int), None)
            .unwrap();
        assert_eq!(v.value_at(0), Ok(Value::Int(7)));
    }

    #[test]
    fn test_default_filter_insertion() {
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let one = model_with_x(&[0, 1], &[0]);
        let two = model_with_x(&[0, 1], &[0, 1]);

        let e = checker.add_default_filter_if_needed(&one, Expr::int(3));
        assert_eq!(e, Expr::int(3));
        let e = checker.add_default_filter_if_needed(&one, Expr::label("a"));
        assert!(e.is_filter(FilterOp::Forall));
        let e = checker.add_default_filter_if_needed(&one, x());
        assert!(e.is_filter(FilterOp::State));
        let e = checker.add_default_filter_if_needed(&two, x());
        assert!(e.is_filter(FilterOp::Range));
    }

    #[test]
    fn test_cyclic_references() {
        let m = model_with_x(&[0, 1], &[0]);
        let mut info = ModelCheckingInfo::default();
        info.add_property("p", Expr::prop("p", Type::Bool));
        info.add_property("a", Expr::and(x_pos(), Expr::prop("b", Type::Bool)));
        info.add_property("b", Expr::not(Expr::prop("a", Type::Bool)));
        info.add_label("loop", Expr::or(x_pos(), Expr::label("loop")));
        info.add_label("twice", Expr::and(Expr::label("pos"), Expr::label("pos")));
        info.add_label("pos", x_pos());
        let checker = Checker::new(info, CheckerConfig::default());

        for name in ["p", "a"] {
            let err = checker
                .check_expression(&m, &Expr::prop(name, Type::Bool), None)
                .unwrap_err();
            assert!(matches!(err, CheckError::CyclicReference { kind: "property", .. }));
        }
        let err = checker
            .check_expression(&m, &Expr::label("loop"), None)
            .unwrap_err();
        assert!(matches!(err, CheckError::CyclicReference { kind: "label", .. }));
        assert!(checker.check(&m, &Expr::label("loop")).is_err());

        // Referring to the same definition twice side by side is fine.
        let v = checker
            .check_expression(&m, &Expr::label("twice"), None)
            .unwrap();
        assert_eq!(v.state_set(), Some(&StateSet::singleton(1)));
    }

    #[test]
    fn test_result_line() {
        let mut result = ModelCheckResult::default();
        assert_eq!(result_line("Result", &result), "Result: none");
        result.value = Some(ResultValue::Value(Value::Bool(true)));
        assert_eq!(result_line("Result", &result), "Result: true");
        assert_eq!(
            result_line("Minimum probability", &result),
            "Result (minimum probability): true"
        );
    }

    #[test]
    fn test_temporal_outside_quant() {
        let m = model_with_x(&[0], &[0]);
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let e = Expr::temporal(smc_expr::TemporalOp::Next, vec![Expr::bool(true)], None);
        let err = checker.check_expression(&m, &e, None).unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedExpression(_)));
    }
}
