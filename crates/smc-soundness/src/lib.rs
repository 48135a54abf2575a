//! Random models, random typed expressions and a naive per-state
//! interpreter used to cross-check the vectorised checker.

use proptest::collection::vec;
use proptest::prelude::*;
use smc_eval::ops;
use smc_expr::{BinOp, Expr, FilterOp, FuncName, Type, UnaryOp, Value, DEADLOCK_LABEL, INIT_LABEL};
use smc_model::{ExplicitModel, Model, ModelResult, ModelType, StateSet};

/// Label every generated model carries.
pub const EVEN_LABEL: &str = "even";

pub fn x() -> Expr {
    Expr::var("x", 0, Type::Int)
}

pub fn b() -> Expr {
    Expr::var("b", 1, Type::Bool)
}

pub fn d() -> Expr {
    Expr::var("d", 2, Type::Double)
}

fn build_model(
    states: Vec<(i64, bool, f64)>,
    initial: Vec<bool>,
    transitions: Vec<(usize, usize)>,
    even: Vec<bool>,
) -> ModelResult<ExplicitModel> {
    let vars = vec!["x".to_string(), "b".to_string(), "d".to_string()];
    let mut m = ExplicitModel::new(ModelType::Dtmc, vars);
    for (x, b, d) in states {
        m.add_state(vec![Value::Int(x), Value::Bool(b), Value::Double(d)])?;
    }
    for (s, _) in initial.iter().enumerate().filter(|(_, &i)| i) {
        m.add_initial_state(s)?;
    }
    if m.num_initial_states() == 0 {
        m.add_initial_state(0)?;
    }
    for (from, to) in transitions {
        m.add_transition(from, to)?;
    }
    let set: StateSet = even
        .iter()
        .enumerate()
        .filter(|(_, &e)| e)
        .map(|(s, _)| s)
        .collect();
    m.add_label(EVEN_LABEL, set)?;
    Ok(m)
}

/// Explicit DTMCs with 1..10 states over `x: int`, `b: bool`, `d: double`.
pub fn model_strategy() -> impl Strategy<Value = ExplicitModel> {
    (1usize..10).prop_flat_map(|n| {
        let state = (-4i64..5, any::<bool>(), (-20i32..20).prop_map(|k| k as f64 / 4.0));
        (
            vec(state, n),
            vec(any::<bool>(), n),
            vec((0..n, 0..n), 0..2 * n),
            vec(any::<bool>(), n),
        )
            .prop_filter_map("well-formed model", |(states, initial, transitions, even)| {
                build_model(states, initial, transitions, even).ok()
            })
    })
}

/// A subset of `0..n`, possibly empty.
pub fn state_set_strategy(n: usize) -> impl Strategy<Value = StateSet> {
    vec(any::<bool>(), n).prop_map(|bits| {
        bits.iter()
            .enumerate()
            .filter(|(_, &bit)| bit)
            .map(|(s, _)| s)
            .collect()
    })
}

fn relational_op() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Eq),
        Just(BinOp::Ne),
        Just(BinOp::Lt),
        Just(BinOp::Le),
        Just(BinOp::Gt),
        Just(BinOp::Ge),
    ]
}

fn connective() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::And),
        Just(BinOp::Or),
        Just(BinOp::Implies),
        Just(BinOp::Iff),
    ]
}

fn arith_op() -> impl Strategy<Value = BinOp> {
    prop_oneof![Just(BinOp::Plus), Just(BinOp::Minus), Just(BinOp::Times)]
}

fn leaf(ty: Type) -> BoxedStrategy<Expr> {
    match ty {
        Type::Bool => prop_oneof![
            Just(b()),
            any::<bool>().prop_map(Expr::bool),
            Just(Expr::label(INIT_LABEL)),
            Just(Expr::label(DEADLOCK_LABEL)),
            Just(Expr::label(EVEN_LABEL)),
            Just(Expr::filter(FilterOp::Forall, b(), None)),
            Just(Expr::filter(FilterOp::Exists, b(), None)),
        ]
        .boxed(),
        Type::Int => prop_oneof![
            3 => Just(x()),
            3 => (-3i64..4).prop_map(Expr::int),
            1 => Just(Expr::filter(FilterOp::Count, b(), None)),
            1 => Just(Expr::filter(FilterOp::Sum, x(), None)),
            1 => Just(Expr::filter(FilterOp::Min, x(), None)),
            1 => Just(Expr::filter(FilterOp::Max, x(), None)),
        ]
        .boxed(),
        Type::Double => prop_oneof![
            Just(d()),
            (-8i32..8).prop_map(|k| Expr::double(k as f64 / 2.0)),
        ]
        .boxed(),
    }
}

/// Well-typed expressions of type `ty` with nesting depth at most `depth`.
///
/// Integer arithmetic is checked and `mod`, `pow` and `floor` can fail, so
/// generated expressions may error in some states.
pub fn expr_strategy(ty: Type, depth: u32) -> BoxedStrategy<Expr> {
    if depth == 0 {
        return leaf(ty);
    }
    let sub = |t| expr_strategy(t, depth - 1);
    match ty {
        Type::Bool => prop_oneof![
            3 => leaf(ty),
            2 => (connective(), sub(Type::Bool), sub(Type::Bool))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => sub(Type::Bool).prop_map(Expr::not),
            2 => (relational_op(), sub(Type::Int), sub(Type::Int))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => (relational_op(), sub(Type::Double), sub(Type::Int))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => (sub(Type::Bool), sub(Type::Bool), sub(Type::Bool))
                .prop_map(|(c, t, e)| Expr::ite(c, t, e)),
        ]
        .boxed(),
        Type::Int => prop_oneof![
            3 => leaf(ty),
            2 => (arith_op(), sub(Type::Int), sub(Type::Int))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => sub(Type::Int).prop_map(|e| Expr::unary(UnaryOp::Minus, e)),
            1 => (prop_oneof![Just(FuncName::Min), Just(FuncName::Max)], vec(sub(Type::Int), 2..4))
                .prop_map(|(f, args)| Expr::func(f, args)),
            1 => (sub(Type::Int), sub(Type::Int))
                .prop_map(|(a, m)| Expr::func(FuncName::Mod, vec![a, m])),
            1 => (sub(Type::Int), -1i64..4)
                .prop_map(|(a, k)| Expr::func(FuncName::Pow, vec![a, Expr::int(k)])),
            1 => sub(Type::Double).prop_map(|e| Expr::func(FuncName::Floor, vec![e])),
            2 => (sub(Type::Bool), sub(Type::Int), sub(Type::Int))
                .prop_map(|(c, t, e)| Expr::ite(c, t, e)),
        ]
        .boxed(),
        Type::Double => prop_oneof![
            3 => leaf(ty),
            1 => (sub(Type::Int), sub(Type::Int))
                .prop_map(|(l, r)| Expr::binary(BinOp::Divide, l, r)),
            1 => (arith_op(), sub(Type::Double), sub(Type::Double))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => (arith_op(), sub(Type::Double), sub(Type::Int))
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            1 => (sub(Type::Bool), sub(Type::Double), sub(Type::Double))
                .prop_map(|(c, t, e)| Expr::ite(c, t, e)),
        ]
        .boxed(),
    }
}

/// An expression of any of the three types.
pub fn any_expr_strategy(depth: u32) -> BoxedStrategy<Expr> {
    prop_oneof![
        expr_strategy(Type::Bool, depth),
        expr_strategy(Type::Int, depth),
        expr_strategy(Type::Double, depth),
    ]
    .boxed()
}

/// Value of `expr` in state `s`, one state at a time. Connectives and
/// conditionals only look at the operand that decides the result.
pub fn reference_value(model: &dyn Model, expr: &Expr, s: usize) -> Result<Value, String> {
    let value = match expr {
        Expr::Literal { value } => *value,
        Expr::Var { name, index, .. } => model
            .var_value(s, *index)
            .ok_or_else(|| format!("no value for {} in state {}", name, s))?,
        Expr::Label { name } => Value::Bool(if name == INIT_LABEL && !model.has_label(name) {
            model.is_initial_state(s)
        } else if name == DEADLOCK_LABEL && !model.has_label(name) {
            model.is_deadlock_state(s)
        } else {
            model
                .label_states(name)
                .ok_or_else(|| format!("unknown label {}", name))?
                .contains(s)
        }),
        Expr::Ite { cond, then, els } => {
            let c = reference_value(model, cond, s)?;
            let taken = if ops::expect_bool(&c).map_err(|e| e.to_string())? {
                then
            } else {
                els
            };
            reference_value(model, taken, s)?
        }
        Expr::Binary { op, left, right } => {
            let l = reference_value(model, left, s)?;
            let decided = match op {
                BinOp::And | BinOp::Or | BinOp::Implies => {
                    let lb = ops::expect_bool(&l).map_err(|e| e.to_string())?;
                    match (op, lb) {
                        (BinOp::And, false) => Some(false),
                        (BinOp::Or, true) => Some(true),
                        (BinOp::Implies, false) => Some(true),
                        _ => None,
                    }
                }
                _ => None,
            };
            match (decided, op) {
                (Some(v), _) => Value::Bool(v),
                (None, BinOp::And | BinOp::Or | BinOp::Implies) => {
                    let r = reference_value(model, right, s)?;
                    Value::Bool(ops::expect_bool(&r).map_err(|e| e.to_string())?)
                }
                (None, _) => {
                    let r = reference_value(model, right, s)?;
                    ops::apply_binary(*op, l, r).map_err(|e| e.to_string())?
                }
            }
        }
        Expr::Unary { op, operand } => {
            let v = reference_value(model, operand, s)?;
            match op {
                UnaryOp::Parenth => v,
                _ => ops::apply_unary(*op, v).map_err(|e| e.to_string())?,
            }
        }
        Expr::Func { func, args } => {
            let vals = args
                .iter()
                .map(|a| reference_value(model, a, s))
                .collect::<Result<Vec<_>, _>>()?;
            match (func, vals.as_slice()) {
                (FuncName::Floor | FuncName::Ceil | FuncName::Round, [a]) => {
                    ops::apply_func_unary(*func, *a).map_err(|e| e.to_string())?
                }
                (_, [first, rest @ ..]) => {
                    let mut acc = *first;
                    for v in rest {
                        acc = ops::apply_func_binary(*func, acc, *v).map_err(|e| e.to_string())?;
                    }
                    acc
                }
                _ => return Err(format!("{} needs arguments", func.name())),
            }
        }
        Expr::Filter(f) if f.selector.is_none() => reference_filter(model, f.op, &f.operand)?,
        other => return Err(format!("no reference semantics for {}", other.kind_name())),
    };
    value
        .coerce(expr.ty())
        .ok_or_else(|| format!("{} is not a {}", value, expr.ty()))
}

fn reference_filter(model: &dyn Model, op: FilterOp, operand: &Expr) -> Result<Value, String> {
    let vals = (0..model.num_states())
        .map(|s| reference_value(model, operand, s))
        .collect::<Result<Vec<_>, _>>()?;
    let bools = || vals.iter().map(|v| ops::expect_bool(v).map_err(|e| e.to_string()));
    let ints = || vals.iter().map(|v| ops::expect_int(v).map_err(|e| e.to_string()));
    Ok(match op {
        FilterOp::Forall => Value::Bool(bools().collect::<Result<Vec<_>, _>>()?.iter().all(|&b| b)),
        FilterOp::Exists => Value::Bool(bools().collect::<Result<Vec<_>, _>>()?.iter().any(|&b| b)),
        FilterOp::Count => {
            Value::Int(bools().collect::<Result<Vec<_>, _>>()?.iter().filter(|&&b| b).count() as i64)
        }
        FilterOp::Sum => Value::Int(ints().sum::<Result<i64, _>>()?),
        FilterOp::Min => Value::Int(
            ints()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .min()
                .ok_or("empty model")?,
        ),
        FilterOp::Max => Value::Int(
            ints()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .max()
                .ok_or("empty model")?,
        ),
        other => return Err(format!("no reference semantics for {} filter", other)),
    })
}

/// Equality that treats two NaNs as the same value.
pub fn same_value(a: Value, b: Value) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}
