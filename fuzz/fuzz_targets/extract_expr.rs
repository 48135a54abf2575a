#![no_main]
use libfuzzer_sys::fuzz_target;
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo};
use smc_expr::{Expr, Value};
use smc_model::{ExplicitModel, Model, ModelType};

fuzz_target!(|data: &[u8]| {
    if let Ok(expr) = serde_json::from_slice::<Expr>(data) {
        let mut m = ExplicitModel::new(ModelType::Mdp, vec!["x".to_string()]);
        for x in 0..5 {
            let _ = m.add_state(vec![Value::Int(x)]);
        }
        let _ = m.add_initial_state(0);
        let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
        if let Ok(extracted) = checker.extract_state_formulas(&m, &expr) {
            for (_, set) in &extracted.labels {
                assert!(!set.is_empty() && !set.is_full(m.num_states()));
            }
        }
    }
});
