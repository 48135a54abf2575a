#![no_main]
use libfuzzer_sys::fuzz_target;
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo};
use smc_expr::{Expr, Value};
use smc_model::{ExplicitModel, Model, ModelType, StateSet};

fn model() -> ExplicitModel {
    let mut m = ExplicitModel::new(ModelType::Dtmc, vec!["x".to_string(), "b".to_string()]);
    for (x, b) in [(0, true), (3, false), (-2, true), (7, false)] {
        let _ = m.add_state(vec![Value::Int(x), Value::Bool(b)]);
    }
    let _ = m.add_initial_state(0);
    let _ = m.add_initial_state(2);
    let _ = m.add_transition(0, 1);
    let _ = m.add_transition(1, 2);
    let _ = m.add_label("goal", [3usize].into_iter().collect::<StateSet>());
    m
}

fuzz_target!(|data: &[u8]| {
    if let Ok(expr) = serde_json::from_slice::<Expr>(data) {
        let m = model();
        let config = CheckerConfig {
            store_vector: data.len() % 2 == 0,
            ..CheckerConfig::default()
        };
        let checker = Checker::new(ModelCheckingInfo::default(), config);
        if let Ok(out) = checker.check(&m, &expr) {
            assert_eq!(out.values.len(), m.num_states());
        }
        let _ = checker.check_expression(&m, &expr, Some(&StateSet::singleton(1)));
    }
});
