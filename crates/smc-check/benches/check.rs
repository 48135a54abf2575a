//! Criterion benchmarks for expression evaluation and filters.
//!
//! Run with: cargo bench -p smc-check

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smc_check::{Checker, CheckerConfig, ModelCheckingInfo};
use smc_expr::{BinOp, Expr, FilterOp, FuncName, Type, Value};
use smc_model::{ExplicitModel, ModelType};

fn random_model(states: usize, seed: u64) -> ExplicitModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = ExplicitModel::new(ModelType::Dtmc, vec!["x".to_string(), "y".to_string()]);
    for _ in 0..states {
        let x = rng.gen_range(-50..50);
        let y = rng.gen_range(0.0..1.0);
        m.add_state(vec![Value::Int(x), Value::Double(y)]).unwrap();
    }
    m.add_initial_state(0).unwrap();
    m
}

fn x() -> Expr {
    Expr::var("x", 0, Type::Int)
}

fn y() -> Expr {
    Expr::var("y", 1, Type::Double)
}

/// `x > 0 & mod(100, x) = 0 | y < 0.1`
fn guarded() -> Expr {
    Expr::or(
        Expr::and(
            Expr::binary(BinOp::Gt, x(), Expr::int(0)),
            Expr::binary(
                BinOp::Eq,
                Expr::func(FuncName::Mod, vec![Expr::int(100), x()]),
                Expr::int(0),
            ),
        ),
        Expr::binary(BinOp::Lt, y(), Expr::double(0.1)),
    )
}

fn bench_expressions(c: &mut Criterion) {
    let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
    let mut group = c.benchmark_group("evaluate");
    for states in [1_000, 100_000] {
        let m = random_model(states, 7);
        group.bench_with_input(BenchmarkId::new("guarded", states), &m, |b, m| {
            b.iter(|| checker.check_expression(m, &guarded(), None).unwrap())
        });
        let ite = Expr::ite(guarded(), y(), Expr::binary(BinOp::Times, y(), Expr::int(2)));
        group.bench_with_input(BenchmarkId::new("ite", states), &m, |b, m| {
            b.iter(|| checker.check_expression(m, &ite, None).unwrap())
        });
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
    let m = random_model(100_000, 11);
    let mut group = c.benchmark_group("filter");
    for op in [FilterOp::Min, FilterOp::Avg, FilterOp::ArgMax] {
        let e = Expr::filter(op, y(), Some(guarded()));
        group.bench_function(op.keyword(), |b| {
            b.iter(|| checker.check_expression(&m, &e, None).unwrap())
        });
    }
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let checker = Checker::new(ModelCheckingInfo::default(), CheckerConfig::default());
    let m = random_model(100_000, 13);
    let e = Expr::filter(
        FilterOp::Count,
        Expr::and(guarded(), Expr::binary(BinOp::Ge, x(), Expr::int(-10))),
        Some(Expr::init_label()),
    );
    c.bench_function("extract_state_formulas", |b| {
        b.iter(|| checker.extract_state_formulas(&m, &e).unwrap())
    });
}

criterion_group!(benches, bench_expressions, bench_filters, bench_extraction);
criterion_main!(benches);
