//! Replacing maximal state formulas by labels does not change what a
//! property evaluates to.

use proptest::prelude::*;
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo};
use smc_expr::{Expr, FilterOp, Type};
use smc_model::{ExplicitModel, Model};
use smc_soundness::{b, expr_strategy, model_strategy, same_value};

fn checker() -> Checker {
    Checker::new(ModelCheckingInfo::default(), CheckerConfig::default())
}

/// Evaluate in every state, or `None` if evaluation fails.
fn eval_all(m: &dyn Model, e: &Expr) -> Option<Vec<smc_expr::Value>> {
    let vals = checker().check_expression(m, e, None).ok()?;
    vals.values().ok()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn extracted_property_agrees(
        m in model_strategy(),
        phi in expr_strategy(Type::Bool, 3),
        psi in expr_strategy(Type::Bool, 2),
    ) {
        // The filter keeps the top level from collapsing into a single label.
        let e = Expr::filter(FilterOp::Count, phi, Some(psi));
        let Some(expected) = eval_all(&m, &e) else {
            return Ok(());
        };

        // Subformulas below a filter are extracted over all states, which
        // can fail where the narrowed evaluation did not.
        let Ok(extracted) = checker().extract_state_formulas(&m, &e) else {
            return Ok(());
        };
        let mut labelled: ExplicitModel = m.clone();
        for (name, set) in &extracted.labels {
            labelled.add_label(name, set.clone()).unwrap();
        }
        let got = eval_all(&labelled, &extracted.expr).expect("extracted property evaluates");
        prop_assert_eq!(got.len(), expected.len());
        for (g, w) in got.into_iter().zip(expected) {
            prop_assert!(same_value(g, w));
        }
    }

    #[test]
    fn generated_labels_are_distinct_and_nontrivial(
        m in model_strategy(),
        phi in expr_strategy(Type::Bool, 3),
    ) {
        let e = Expr::filter(FilterOp::Forall, Expr::and(phi, b()), Some(Expr::init_label()));
        let Ok(extracted) = checker().extract_state_formulas(&m, &e) else {
            return Ok(());
        };
        let n = m.num_states();
        for (i, (name, set)) in extracted.labels.iter().enumerate() {
            prop_assert_eq!(name, &format!("L{}", i));
            prop_assert!(!set.is_empty() && !set.is_full(n));
            for (_, other) in &extracted.labels[i + 1..] {
                prop_assert_ne!(set, other);
            }
        }
    }

    #[test]
    fn handled_formulas_register_on_model(
        m in model_strategy(),
        phi in expr_strategy(Type::Bool, 3),
    ) {
        let e = Expr::filter(FilterOp::Exists, phi, None);
        let Some(expected) = eval_all(&m, &e) else {
            return Ok(());
        };
        let mut target = m.clone();
        let Ok(rewritten) = checker().handle_maximal_state_formulas(&mut target, &e) else {
            return Ok(());
        };
        let got = eval_all(&target, &rewritten).expect("rewritten property evaluates");
        prop_assert_eq!(got, expected);
    }
}
