//! Extraction of maximal state formulas.
//!
//! Boolean subtrees that only depend on the current state are evaluated
//! once and replaced by a label. Subtrees with equal satisfaction sets
//! share one label.

use crate::checker::{Checker, Context};
use crate::error::{CheckError, CheckResult};
use smc_expr::{Expr, Type};
use smc_model::StateSet;
use std::collections::HashMap;
use tracing::debug;

/// Output of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// The rewritten expression, referring to the generated labels.
    pub expr: Expr,
    /// Generated labels `L0`, `L1`, ... with their satisfaction sets.
    pub labels: Vec<(String, StateSet)>,
}

#[derive(Default)]
struct Pass {
    labels: Vec<(String, StateSet)>,
    index: HashMap<StateSet, usize>,
}

impl Pass {
    fn label_for(&mut self, set: StateSet) -> String {
        if let Some(&i) = self.index.get(&set) {
            return self.labels[i].0.clone();
        }
        let name = format!("L{}", self.labels.len());
        self.index.insert(set.clone(), self.labels.len());
        self.labels.push((name.clone(), set));
        name
    }
}

impl Checker {
    /// Replace every maximal state formula in `expr` by `true`, `false` or
    /// a generated label. Property references are inlined first.
    pub(crate) fn extract(&self, cx: &mut Context<'_>, expr: Expr) -> CheckResult<Extracted> {
        let mut pass = Pass::default();
        let mut expr = expr;
        self.rewrite(cx, &mut expr, &mut pass)?;
        debug!(labels = pass.labels.len(), "extracted state formulas");
        Ok(Extracted {
            expr,
            labels: pass.labels,
        })
    }

    /// Extraction pass over `expr` against `model`, without registering
    /// anything on the model.
    pub fn extract_state_formulas(
        &self,
        model: &dyn smc_model::Model,
        expr: &Expr,
    ) -> CheckResult<Extracted> {
        let mut cx = Context::new(model, None);
        self.extract(&mut cx, expr.clone())
    }

    fn rewrite(&self, cx: &mut Context<'_>, expr: &mut Expr, pass: &mut Pass) -> CheckResult<()> {
        // Inlined names stay entered while their body is rewritten.
        let depth = cx.properties.len();
        let result = self.inline_and_rewrite(cx, expr, pass);
        cx.properties.truncate(depth);
        result
    }

    fn inline_and_rewrite(
        &self,
        cx: &mut Context<'_>,
        expr: &mut Expr,
        pass: &mut Pass,
    ) -> CheckResult<()> {
        while let Expr::Prop { name, .. } = expr {
            let prop = self
                .info
                .property(name)
                .ok_or_else(|| CheckError::UnknownProperty { name: name.clone() })?;
            cx.enter_property(name)?;
            *expr = prop.clone();
        }

        if expr.ty() == Type::Bool && expr.is_proposition() {
            let n = cx.num_states();
            let set = self.eval(cx, expr, None)?.into_state_set()?;
            *expr = if set.is_empty() {
                Expr::bool(false)
            } else if set.is_full(n) {
                Expr::bool(true)
            } else {
                Expr::label(pass.label_for(set))
            };
            return Ok(());
        }

        let mut result = Ok(());
        expr.for_each_child_mut(&mut |child| {
            if result.is_ok() {
                result = self.rewrite(cx, child, pass);
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{CheckError, Checker, CheckerConfig, ModelCheckingInfo};
    use smc_expr::{BinOp, Expr, FilterOp, QuantKind, QuantQuery, TemporalOp, Type, Value};
    use smc_model::{ExplicitModel, Model, ModelType, StateSet};

    fn model() -> ExplicitModel {
        let mut m = ExplicitModel::new(ModelType::Dtmc, vec!["x".to_string()]);
        for x in 0..4 {
            m.add_state(vec![Value::Int(x)]).unwrap();
        }
        m.add_initial_state(0).unwrap();
        m
    }

    fn x_eq(k: i64) -> Expr {
        Expr::binary(BinOp::Eq, Expr::var("x", 0, Type::Int), Expr::int(k))
    }

    fn until(a: Expr, b: Expr) -> Expr {
        Expr::quant(
            QuantKind::Prob,
            QuantQuery::Value,
            Expr::temporal(TemporalOp::Until, vec![a, b], None),
        )
    }

    #[test]
    fn test_dedup_by_satisfaction_set() {
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        // x = 1 and 1 = x have the same satisfaction set.
        let same = Expr::binary(BinOp::Eq, Expr::int(1), Expr::var("x", 0, Type::Int));
        let e = Expr::and(until(x_eq(1), x_eq(2)), until(same, x_eq(3)));
        let out = checker.extract_state_formulas(&model(), &e).unwrap();
        assert_eq!(out.labels.len(), 3);
        assert_eq!(out.labels[0], ("L0".to_string(), StateSet::singleton(1)));
        let expected = Expr::and(
            until(Expr::label("L0"), Expr::label("L1")),
            until(Expr::label("L0"), Expr::label("L2")),
        );
        assert_eq!(out.expr, expected);
    }

    #[test]
    fn test_trivial_sets_become_literals() {
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let all = Expr::binary(BinOp::Ge, Expr::var("x", 0, Type::Int), Expr::int(0));
        let none = x_eq(9);
        let out = checker
            .extract_state_formulas(&model(), &until(all, none))
            .unwrap();
        assert!(out.labels.is_empty());
        assert_eq!(out.expr, until(Expr::bool(true), Expr::bool(false)));
    }

    #[test]
    fn test_properties_inlined() {
        let mut info = ModelCheckingInfo::default();
        info.add_property("goal", x_eq(3));
        let checker = Checker::new(info, CheckerConfig::default());
        let e = until(Expr::bool(true), Expr::prop("goal", Type::Bool));
        let out = checker.extract_state_formulas(&model(), &e).unwrap();
        assert_eq!(out.labels, vec![("L0".to_string(), StateSet::singleton(3))]);

        let bad = until(Expr::bool(true), Expr::prop("missing", Type::Bool));
        assert!(checker.extract_state_formulas(&model(), &bad).is_err());
    }

    #[test]
    fn test_self_referencing_property_rejected() {
        let mut info = ModelCheckingInfo::default();
        info.add_property("p", Expr::prop("p", Type::Bool));
        info.add_property("a", until(Expr::bool(true), Expr::prop("b", Type::Bool)));
        info.add_property("b", until(x_eq(1), Expr::prop("a", Type::Bool)));
        let checker = Checker::new(info, CheckerConfig::default());

        let err = checker
            .extract_state_formulas(&model(), &Expr::prop("p", Type::Bool))
            .unwrap_err();
        assert!(matches!(err, CheckError::CyclicReference { name, .. } if name == "p"));
        let err = checker
            .extract_state_formulas(&model(), &Expr::prop("a", Type::Bool))
            .unwrap_err();
        assert!(matches!(err, CheckError::CyclicReference { name, .. } if name == "a"));
    }

    #[test]
    fn test_repeated_property_is_not_a_cycle() {
        let mut info = ModelCheckingInfo::default();
        info.add_property("goal", x_eq(3));
        let checker = Checker::new(info, CheckerConfig::default());
        let goal = || Expr::prop("goal", Type::Bool);
        let e = Expr::and(until(goal(), goal()), until(Expr::bool(true), goal()));
        let out = checker.extract_state_formulas(&model(), &e).unwrap();
        assert_eq!(out.labels, vec![("L0".to_string(), StateSet::singleton(3))]);
    }

    #[test]
    fn test_filters_are_not_propositions() {
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        let e = Expr::filter(FilterOp::Forall, x_eq(2), Some(Expr::init_label()));
        let out = checker.extract_state_formulas(&model(), &e).unwrap();
        let expected = Expr::filter(FilterOp::Forall, Expr::label("L0"), Some(Expr::label("L1")));
        assert_eq!(out.expr, expected);
        assert_eq!(out.labels[1].1, StateSet::singleton(0));
    }

    #[test]
    fn test_handle_maximal_state_formulas_registers_labels() {
        let mut info = ModelCheckingInfo::default();
        info.add_label("phi", Expr::bool(true));
        let checker = Checker::new(info, CheckerConfig::default());
        let mut m = model();
        let e = until(x_eq(1), x_eq(2));
        let out = checker.handle_maximal_state_formulas(&mut m, &e).unwrap();
        // "phi" is defined in the label list, so generated names skip it.
        assert_eq!(
            out,
            until(Expr::label("phi_0"), Expr::label("phi_1"))
        );
        assert_eq!(m.label_states("phi_0"), Some(&StateSet::singleton(1)));
        assert_eq!(m.label_states("phi_1"), Some(&StateSet::singleton(2)));
    }
}
