//! The vectorised checker, with its short-circuit domains, agrees with a
//! per-state interpreter on every state it is asked about.

use proptest::prelude::*;
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo};
use smc_expr::Expr;
use smc_model::{ExplicitModel, Model, StateSet};
use smc_soundness::{
    any_expr_strategy, model_strategy, reference_value, same_value, state_set_strategy,
};

fn checker() -> Checker {
    Checker::new(ModelCheckingInfo::default(), CheckerConfig::default())
}

fn model_and_domain() -> impl Strategy<Value = (ExplicitModel, StateSet)> {
    model_strategy().prop_flat_map(|m| {
        let n = m.num_states();
        (Just(m), state_set_strategy(n))
    })
}

fn agree_on(m: &ExplicitModel, e: &Expr, domain: Option<&StateSet>) -> Result<(), TestCaseError> {
    let states: Vec<usize> = match domain {
        Some(dom) => dom.iter().collect(),
        None => (0..m.num_states()).collect(),
    };
    let expected: Vec<_> = states.iter().map(|&s| reference_value(m, e, s)).collect();
    let any_error = expected.iter().any(Result::is_err);

    match checker().check_expression(m, e, domain) {
        Ok(vals) => {
            prop_assert!(!any_error, "checker succeeded where reference failed: {}", e);
            prop_assert_eq!(vals.len(), m.num_states());
            prop_assert_eq!(vals.ty(), e.ty());
            for (&s, want) in states.iter().zip(expected) {
                let got = vals.value_at(s).map_err(|err| TestCaseError::fail(err.to_string()))?;
                let want = want.map_err(TestCaseError::fail)?;
                prop_assert!(
                    same_value(got, want),
                    "state {}: checker {} vs reference {} for {}",
                    s,
                    got,
                    want,
                    e
                );
            }
        }
        Err(err) => {
            prop_assert!(any_error, "checker failed with \"{}\" on {}", err, e);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn unrestricted_domain_agrees(m in model_strategy(), e in any_expr_strategy(3)) {
        agree_on(&m, &e, None)?;
    }

    #[test]
    fn restricted_domain_agrees((m, dom) in model_and_domain(), e in any_expr_strategy(3)) {
        agree_on(&m, &e, Some(&dom))?;
    }

    #[test]
    fn evaluation_is_deterministic(m in model_strategy(), e in any_expr_strategy(3)) {
        let first = checker().check_expression(&m, &e, None);
        let second = checker().check_expression(&m, &e, None);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                for s in 0..m.num_states() {
                    let (x, y) = (a.value_at(s).unwrap(), b.value_at(s).unwrap());
                    prop_assert!(same_value(x, y));
                }
            }
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "one run failed and the other did not: {}", e),
        }
    }
}
