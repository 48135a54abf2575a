//! Filter reductions agree with the per-state values they reduce.

use proptest::prelude::*;
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo, ResultValue};
use smc_expr::{Expr, FilterOp, Type, Value};
use smc_model::{ExplicitModel, Model, StateSet};
use smc_soundness::{b, expr_strategy, model_strategy, x};

fn checker() -> Checker {
    Checker::new(ModelCheckingInfo::default(), CheckerConfig::default())
}

fn ints(m: &ExplicitModel, e: &Expr) -> Option<Vec<i64>> {
    let vals = checker().check_expression(m, e, None).ok()?;
    vals.values()
        .ok()?
        .into_iter()
        .map(|v| v.as_int())
        .collect()
}

fn satisfying(m: &ExplicitModel, e: &Expr) -> Option<StateSet> {
    checker()
        .check_expression(m, e, None)
        .ok()?
        .into_state_set()
        .ok()
}

fn single(m: &ExplicitModel, op: FilterOp, operand: Expr, selector: Expr) -> Option<ResultValue> {
    let out = checker()
        .check(m, &Expr::filter(op, operand, Some(selector)))
        .ok()?;
    out.result.value
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn boolean_reductions(m in model_strategy(), phi in expr_strategy(Type::Bool, 2), sel in expr_strategy(Type::Bool, 1)) {
        let (Some(sat), Some(filter)) = (satisfying(&m, &phi), satisfying(&m, &sel)) else {
            return Ok(());
        };
        if filter.is_empty() {
            let err = checker().check(&m, &Expr::filter(FilterOp::Forall, phi, Some(sel)));
            prop_assert!(err.is_err());
            return Ok(());
        }

        let mut both = filter.clone();
        both.intersect_with(&sat);
        let forall = single(&m, FilterOp::Forall, phi.clone(), sel.clone());
        prop_assert_eq!(forall, Some(ResultValue::Value(Value::Bool(filter.is_subset(&sat)))));
        let exists = single(&m, FilterOp::Exists, phi.clone(), sel.clone());
        prop_assert_eq!(exists, Some(ResultValue::Value(Value::Bool(!both.is_empty()))));
        let count = single(&m, FilterOp::Count, phi.clone(), sel.clone());
        prop_assert_eq!(count, Some(ResultValue::Value(Value::Int(both.len() as i64))));
        // Minimum of a boolean is conjunction, maximum disjunction.
        let min = single(&m, FilterOp::Min, phi.clone(), sel.clone());
        prop_assert_eq!(min, Some(ResultValue::Value(Value::Bool(filter.is_subset(&sat)))));
        let max = single(&m, FilterOp::Max, phi, sel);
        prop_assert_eq!(max, Some(ResultValue::Value(Value::Bool(!both.is_empty()))));
    }

    #[test]
    fn numeric_reductions(m in model_strategy(), e in expr_strategy(Type::Int, 2), sel in expr_strategy(Type::Bool, 1)) {
        let (Some(vals), Some(filter)) = (ints(&m, &e), satisfying(&m, &sel)) else {
            return Ok(());
        };
        if filter.is_empty() {
            return Ok(());
        }
        let picked: Vec<i64> = filter.iter().map(|s| vals[s]).collect();
        let lo = *picked.iter().min().unwrap();
        let hi = *picked.iter().max().unwrap();

        prop_assert_eq!(
            single(&m, FilterOp::Min, e.clone(), sel.clone()),
            Some(ResultValue::Value(Value::Int(lo)))
        );
        prop_assert_eq!(
            single(&m, FilterOp::Max, e.clone(), sel.clone()),
            Some(ResultValue::Value(Value::Int(hi)))
        );
        prop_assert_eq!(
            single(&m, FilterOp::Range, e.clone(), sel.clone()),
            Some(ResultValue::Range { min: Value::Int(lo), max: Value::Int(hi) })
        );
        let first = filter.first().unwrap();
        prop_assert_eq!(
            single(&m, FilterOp::First, e.clone(), sel.clone()),
            Some(ResultValue::Value(Value::Int(vals[first])))
        );
        if let Some(sum) = picked.iter().try_fold(0i64, |acc, &v| acc.checked_add(v)) {
            prop_assert_eq!(
                single(&m, FilterOp::Sum, e.clone(), sel.clone()),
                Some(ResultValue::Value(Value::Int(sum)))
            );
        }

        let argmin = checker()
            .check_expression(&m, &Expr::filter(FilterOp::ArgMin, e, Some(sel)), None)
            .unwrap();
        let expected: StateSet = filter.iter().filter(|&s| vals[s] == lo).collect();
        prop_assert_eq!(argmin.state_set(), Some(&expected));
    }

    #[test]
    fn default_filter_yields_one_value(m in model_strategy(), e in expr_strategy(Type::Int, 2)) {
        let Ok(out) = checker().check(&m, &e) else {
            return Ok(());
        };
        prop_assert_eq!(out.values.len(), m.num_states());
        let single_valued = e.returns_single_value();
        match out.result.value {
            Some(ResultValue::Value(_)) => {
                prop_assert!(m.num_initial_states() == 1 || single_valued)
            }
            Some(ResultValue::Range { .. }) => {
                prop_assert!(m.num_initial_states() > 1 && !single_valued)
            }
            // Constant expressions outside any filter are returned as is.
            None => prop_assert!(single_valued),
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn count_matches_satisfying_states(m in model_strategy()) {
        let sat = satisfying(&m, &b()).unwrap();
        let count = single(&m, FilterOp::Count, b(), Expr::bool(true));
        prop_assert_eq!(count, Some(ResultValue::Value(Value::Int(sat.len() as i64))));
        let total: i64 = (0..m.num_states())
            .map(|s| m.var_value(s, 0).and_then(|v| v.as_int()).unwrap())
            .sum();
        prop_assert_eq!(
            single(&m, FilterOp::Sum, x(), Expr::bool(true)),
            Some(ResultValue::Value(Value::Int(total)))
        );
    }
}
