//! Property expression AST for the smc state model checker.

pub mod expr;
pub mod pretty;
pub mod types;
pub mod value;

pub use expr::{
    BinOp, Expr, FilterExpr, FilterOp, FuncName, QuantExpr, QuantKind, QuantQuery, RelOp,
    TemporalOp, UnaryOp, DEADLOCK_LABEL, INIT_LABEL,
};
pub use pretty::pretty_print_expr;
pub use types::Type;
pub use value::Value;
