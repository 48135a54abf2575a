//! Expression tree for state properties.
//!
//! `Expr` is a closed tagged tree. Every node has a static [`Type`] that is
//! derived from its operands (operators) or recorded on the node (references
//! resolved by an earlier compilation stage). Deep copy is `Clone`.

use crate::types::Type;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name of the built-in label satisfied by initial states.
pub const INIT_LABEL: &str = "init";
/// Name of the built-in label satisfied by deadlock states.
pub const DEADLOCK_LABEL: &str = "deadlock";

/// A property expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Conditional `cond ? then : els`.
    Ite {
        cond: Box<Expr>,
        then: Box<Expr>,
        els: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Built-in function call (unary, binary or n-ary).
    Func { func: FuncName, args: Vec<Expr> },
    /// Literal value.
    Literal { value: Value },
    /// Named constant, value supplied at check time.
    Constant { name: String, ty: Type },
    /// Unresolved identifier. Reaching one during evaluation is an error.
    Ident { name: String, ty: Type },
    /// Formula reference; must carry its expanded definition to be evaluated.
    Formula {
        name: String,
        #[serde(default)]
        definition: Option<Box<Expr>>,
        ty: Type,
    },
    /// State variable, by index into the model's variable valuation.
    Var { name: String, index: usize, ty: Type },
    /// Observable of a partially observable model.
    Obs { name: String, ty: Type },
    /// Label reference (`"name"`).
    Label { name: String },
    /// Reference to another named property.
    Prop { name: String, ty: Type },
    /// Filter: reduction of a per-state operand over selected states.
    Filter(Box<FilterExpr>),
    /// Quantitative operator (P, R, S), computed by an external solver.
    Quant(Box<QuantExpr>),
    /// Path (temporal) operator; only meaningful under a quantitative operator.
    Temporal {
        op: TemporalOp,
        operands: Vec<Expr>,
        #[serde(default)]
        bound: Option<u64>,
    },
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    // Logical
    Implies,
    Iff,
    Or,
    And,
    // Comparison
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
}

impl BinOp {
    /// Check if this is a boolean connective.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::Implies | BinOp::Iff | BinOp::Or | BinOp::And)
    }

    /// Check if this is a comparison.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le
        )
    }

    /// Result type given the operand types. Division always yields a double.
    pub fn result_type(&self, left: Type, right: Type) -> Type {
        if self.is_logical() || self.is_relational() {
            Type::Bool
        } else if *self == BinOp::Divide {
            Type::Double
        } else {
            left.join_numeric(right)
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Implies => "=>",
            BinOp::Iff => "<=>",
            BinOp::Or => "|",
            BinOp::And => "&",
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Times => "*",
            BinOp::Divide => "/",
        }
    }

    /// Binding strength, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Implies => 1,
            BinOp::Iff => 2,
            BinOp::Or => 3,
            BinOp::And => 4,
            BinOp::Eq | BinOp::Ne => 6,
            BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le => 7,
            BinOp::Plus | BinOp::Minus => 8,
            BinOp::Times | BinOp::Divide => 9,
        }
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Minus,
    /// Explicit parentheses; evaluation is the identity.
    Parenth,
}

/// Built-in function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuncName {
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    Pow,
    Mod,
    Log,
    /// Multi-objective query, delegated to an external solver.
    Multi,
}

impl FuncName {
    pub fn name(&self) -> &'static str {
        match self {
            FuncName::Min => "min",
            FuncName::Max => "max",
            FuncName::Floor => "floor",
            FuncName::Ceil => "ceil",
            FuncName::Round => "round",
            FuncName::Pow => "pow",
            FuncName::Mod => "mod",
            FuncName::Log => "log",
            FuncName::Multi => "multi",
        }
    }

    /// Result type given the argument types.
    pub fn result_type(&self, args: &[Expr]) -> Type {
        match self {
            FuncName::Min | FuncName::Max | FuncName::Pow => args
                .iter()
                .map(Expr::ty)
                .reduce(Type::join_numeric)
                .unwrap_or(Type::Int),
            FuncName::Floor | FuncName::Ceil | FuncName::Round | FuncName::Mod => Type::Int,
            FuncName::Log | FuncName::Multi => Type::Double,
        }
    }
}

/// Filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Min,
    Max,
    ArgMin,
    ArgMax,
    Count,
    Sum,
    Avg,
    First,
    Range,
    Forall,
    Exists,
    Print,
    PrintAll,
    Store,
    State,
}

impl FilterOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            FilterOp::Min => "min",
            FilterOp::Max => "max",
            FilterOp::ArgMin => "argmin",
            FilterOp::ArgMax => "argmax",
            FilterOp::Count => "count",
            FilterOp::Sum => "sum",
            FilterOp::Avg => "avg",
            FilterOp::First => "first",
            FilterOp::Range => "range",
            FilterOp::Forall => "forall",
            FilterOp::Exists => "exists",
            FilterOp::Print => "print",
            FilterOp::PrintAll => "printall",
            FilterOp::Store => "store",
            FilterOp::State => "state",
        }
    }

    /// Whether the filter reduces its operand to one value. Print, store and
    /// argmin/argmax keep a per-state vector.
    pub fn returns_single_value(&self) -> bool {
        !matches!(
            self,
            FilterOp::Print
                | FilterOp::PrintAll
                | FilterOp::ArgMin
                | FilterOp::ArgMax
                | FilterOp::Store
        )
    }

    /// Result type given the operand type.
    pub fn result_type(&self, operand: Type) -> Type {
        match self {
            FilterOp::ArgMin | FilterOp::ArgMax | FilterOp::Forall | FilterOp::Exists => {
                Type::Bool
            }
            FilterOp::Count => Type::Int,
            FilterOp::Avg => Type::Double,
            _ => operand,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "min" => FilterOp::Min,
            "max" => FilterOp::Max,
            "argmin" => FilterOp::ArgMin,
            "argmax" => FilterOp::ArgMax,
            "count" => FilterOp::Count,
            "sum" | "+" => FilterOp::Sum,
            "avg" => FilterOp::Avg,
            "first" => FilterOp::First,
            "range" => FilterOp::Range,
            "forall" | "&" => FilterOp::Forall,
            "exists" | "|" => FilterOp::Exists,
            "print" => FilterOp::Print,
            "printall" => FilterOp::PrintAll,
            "store" => FilterOp::Store,
            "state" => FilterOp::State,
            other => return Err(format!("unknown filter operator \"{}\"", other)),
        })
    }
}

/// A filter node: `filter(op, operand, selector)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    pub op: FilterOp,
    pub operand: Expr,
    /// States to reduce over. `None` means all states.
    #[serde(default)]
    pub selector: Option<Expr>,
    /// Invisible filters are inserted automatically and log less.
    #[serde(default)]
    pub invisible: bool,
    #[serde(default = "default_true")]
    pub explanation_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl FilterExpr {
    pub fn ty(&self) -> Type {
        self.op.result_type(self.operand.ty())
    }

    /// Whether the selector is literally `true` (or absent).
    pub fn selector_is_true(&self) -> bool {
        self.selector.as_ref().is_none_or(Expr::is_true)
    }

    /// Whether the selector is the built-in `init` label.
    pub fn selector_is_init(&self) -> bool {
        self.selector.as_ref().is_some_and(Expr::is_init_label)
    }
}

/// Kind of quantitative operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuantKind {
    /// `P`: probability of a path formula.
    Prob,
    /// `R{index}`: expected reward for a reward structure.
    Reward { index: usize },
    /// `S`: long-run (steady-state) probability.
    SteadyState,
}

/// Comparison against a probability/reward bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }

    pub fn holds(&self, value: f64, bound: f64) -> bool {
        match self {
            RelOp::Lt => value < bound,
            RelOp::Le => value <= bound,
            RelOp::Gt => value > bound,
            RelOp::Ge => value >= bound,
        }
    }
}

/// What a quantitative operator asks for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum QuantQuery {
    /// `=?`
    Value,
    /// `min=?`
    Min,
    /// `max=?`
    Max,
    /// `~bound`: boolean result.
    Bound { relop: RelOp, bound: f64 },
}

/// A quantitative operator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantExpr {
    #[serde(rename = "operator")]
    pub kind: QuantKind,
    pub query: QuantQuery,
    /// Path formula (P, R) or state formula (S).
    pub operand: Expr,
}

impl QuantExpr {
    pub fn ty(&self) -> Type {
        match self.query {
            QuantQuery::Bound { .. } => Type::Bool,
            _ => Type::Double,
        }
    }
}

/// Temporal operator of a path formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalOp {
    Next,
    Until,
    Finally,
    Globally,
}

impl TemporalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemporalOp::Next => "X",
            TemporalOp::Until => "U",
            TemporalOp::Finally => "F",
            TemporalOp::Globally => "G",
        }
    }
}

// === Constructors ===

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal {
            value: value.into(),
        }
    }

    pub fn bool(b: bool) -> Self {
        Expr::literal(b)
    }

    pub fn int(n: i64) -> Self {
        Expr::literal(n)
    }

    pub fn double(d: f64) -> Self {
        Expr::literal(d)
    }

    pub fn constant(name: impl Into<String>, ty: Type) -> Self {
        Expr::Constant {
            name: name.into(),
            ty,
        }
    }

    pub fn ident(name: impl Into<String>, ty: Type) -> Self {
        Expr::Ident {
            name: name.into(),
            ty,
        }
    }

    pub fn var(name: impl Into<String>, index: usize, ty: Type) -> Self {
        Expr::Var {
            name: name.into(),
            index,
            ty,
        }
    }

    pub fn obs(name: impl Into<String>, ty: Type) -> Self {
        Expr::Obs {
            name: name.into(),
            ty,
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Expr::Label { name: name.into() }
    }

    pub fn init_label() -> Self {
        Expr::label(INIT_LABEL)
    }

    pub fn deadlock_label() -> Self {
        Expr::label(DEADLOCK_LABEL)
    }

    pub fn prop(name: impl Into<String>, ty: Type) -> Self {
        Expr::Prop {
            name: name.into(),
            ty,
        }
    }

    pub fn formula(name: impl Into<String>, definition: Option<Expr>, ty: Type) -> Self {
        Expr::Formula {
            name: name.into(),
            definition: definition.map(Box::new),
            ty,
        }
    }

    pub fn ite(cond: Expr, then: Expr, els: Expr) -> Self {
        Expr::Ite {
            cond: Box::new(cond),
            then: Box::new(then),
            els: Box::new(els),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::binary(BinOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::binary(BinOp::Or, left, right)
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::binary(BinOp::Implies, left, right)
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Not, operand)
    }

    pub fn func(func: FuncName, args: Vec<Expr>) -> Self {
        Expr::Func { func, args }
    }

    pub fn filter(op: FilterOp, operand: Expr, selector: Option<Expr>) -> Self {
        Expr::Filter(Box::new(FilterExpr {
            op,
            operand,
            selector,
            invisible: false,
            explanation_enabled: true,
        }))
    }

    /// A filter inserted by the checker rather than written by the user.
    pub fn invisible_filter(op: FilterOp, operand: Expr, selector: Option<Expr>) -> Self {
        Expr::Filter(Box::new(FilterExpr {
            op,
            operand,
            selector,
            invisible: true,
            explanation_enabled: true,
        }))
    }

    pub fn quant(kind: QuantKind, query: QuantQuery, operand: Expr) -> Self {
        Expr::Quant(Box::new(QuantExpr {
            kind,
            query,
            operand,
        }))
    }

    pub fn temporal(op: TemporalOp, operands: Vec<Expr>, bound: Option<u64>) -> Self {
        Expr::Temporal {
            op,
            operands,
            bound,
        }
    }
}

// === Structural queries ===

impl Expr {
    /// Static result type of this node.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Ite { then, els, .. } => {
                let (a, b) = (then.ty(), els.ty());
                if a == b || !a.is_numeric() || !b.is_numeric() {
                    a
                } else {
                    Type::Double
                }
            }
            Expr::Binary { op, left, right } => op.result_type(left.ty(), right.ty()),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => Type::Bool,
                UnaryOp::Minus | UnaryOp::Parenth => operand.ty(),
            },
            Expr::Func { func, args } => func.result_type(args),
            Expr::Literal { value } => value.ty(),
            Expr::Constant { ty, .. }
            | Expr::Ident { ty, .. }
            | Expr::Var { ty, .. }
            | Expr::Obs { ty, .. }
            | Expr::Prop { ty, .. } => *ty,
            Expr::Formula { definition, ty, .. } => definition.as_ref().map_or(*ty, |d| d.ty()),
            Expr::Label { .. } | Expr::Temporal { .. } => Type::Bool,
            Expr::Filter(f) => f.ty(),
            Expr::Quant(q) => q.ty(),
        }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Ite { .. } => "conditional",
            Expr::Binary { .. } => "binary operator",
            Expr::Unary { .. } => "unary operator",
            Expr::Func { .. } => "function",
            Expr::Literal { .. } => "literal",
            Expr::Constant { .. } => "constant",
            Expr::Ident { .. } => "identifier",
            Expr::Formula { .. } => "formula",
            Expr::Var { .. } => "variable",
            Expr::Obs { .. } => "observable",
            Expr::Label { .. } => "label",
            Expr::Prop { .. } => "property reference",
            Expr::Filter(_) => "filter",
            Expr::Quant(_) => "quantitative operator",
            Expr::Temporal { .. } => "path formula",
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(
            self,
            Expr::Literal {
                value: Value::Bool(true)
            }
        )
    }

    pub fn is_false(&self) -> bool {
        matches!(
            self,
            Expr::Literal {
                value: Value::Bool(false)
            }
        )
    }

    pub fn is_init_label(&self) -> bool {
        matches!(self, Expr::Label { name } if name == INIT_LABEL)
    }

    pub fn is_deadlock_label(&self) -> bool {
        matches!(self, Expr::Label { name } if name == DEADLOCK_LABEL)
    }

    /// Check if this is a filter with the given operator.
    pub fn is_filter(&self, op: FilterOp) -> bool {
        matches!(self, Expr::Filter(f) if f.op == op)
    }

    /// Visit each direct child.
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        match self {
            Expr::Ite { cond, then, els } => {
                f(cond);
                f(then);
                f(els);
            }
            Expr::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            Expr::Unary { operand, .. } => f(operand),
            Expr::Func { args, .. } | Expr::Temporal { operands: args, .. } => {
                args.iter().for_each(f)
            }
            Expr::Formula {
                definition: Some(d),
                ..
            } => f(d),
            Expr::Filter(filter) => {
                f(&filter.operand);
                if let Some(sel) = &filter.selector {
                    f(sel);
                }
            }
            Expr::Quant(q) => f(&q.operand),
            Expr::Literal { .. }
            | Expr::Constant { .. }
            | Expr::Ident { .. }
            | Expr::Formula {
                definition: None, ..
            }
            | Expr::Var { .. }
            | Expr::Obs { .. }
            | Expr::Label { .. }
            | Expr::Prop { .. } => {}
        }
    }

    /// Visit each direct child mutably.
    pub fn for_each_child_mut(&mut self, f: &mut impl FnMut(&mut Expr)) {
        match self {
            Expr::Ite { cond, then, els } => {
                f(cond);
                f(then);
                f(els);
            }
            Expr::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            Expr::Unary { operand, .. } => f(operand),
            Expr::Func { args, .. } | Expr::Temporal { operands: args, .. } => {
                args.iter_mut().for_each(f)
            }
            Expr::Formula {
                definition: Some(d),
                ..
            } => f(d),
            Expr::Filter(filter) => {
                f(&mut filter.operand);
                if let Some(sel) = &mut filter.selector {
                    f(sel);
                }
            }
            Expr::Quant(q) => f(&mut q.operand),
            Expr::Literal { .. }
            | Expr::Constant { .. }
            | Expr::Ident { .. }
            | Expr::Formula {
                definition: None, ..
            }
            | Expr::Var { .. }
            | Expr::Obs { .. }
            | Expr::Label { .. }
            | Expr::Prop { .. } => {}
        }
    }

    /// A proposition is a state formula with no quantitative, temporal or
    /// filter node anywhere below it. Property references are opaque here
    /// and never count as propositions.
    pub fn is_proposition(&self) -> bool {
        match self {
            Expr::Quant(_)
            | Expr::Temporal { .. }
            | Expr::Filter(_)
            | Expr::Prop { .. }
            | Expr::Func {
                func: FuncName::Multi,
                ..
            } => false,
            _ => {
                let mut all = true;
                self.for_each_child(&mut |c| all = all && c.is_proposition());
                all
            }
        }
    }

    /// Whether evaluation yields the same value in every state, so no
    /// default filter is needed to extract a single answer.
    pub fn returns_single_value(&self) -> bool {
        match self {
            Expr::Literal { .. } | Expr::Constant { .. } => true,
            Expr::Filter(f) => f.op.returns_single_value(),
            Expr::Ite { .. } | Expr::Binary { .. } | Expr::Unary { .. } => {
                let mut all = true;
                self.for_each_child(&mut |c| all = all && c.returns_single_value());
                all
            }
            Expr::Func { func, args } => {
                *func != FuncName::Multi && args.iter().all(Expr::returns_single_value)
            }
            Expr::Formula {
                definition: Some(d),
                ..
            } => d.returns_single_value(),
            _ => false,
        }
    }

    /// Human-readable name of what this expression computes, used when
    /// printing results ("Result (probability): ...").
    pub fn result_name(&self) -> String {
        match self {
            Expr::Quant(q) => {
                let base = match q.kind {
                    QuantKind::Prob | QuantKind::SteadyState => "probability",
                    QuantKind::Reward { .. } => "expected reward",
                };
                match q.query {
                    QuantQuery::Value => capitalize(base),
                    QuantQuery::Min => format!("Minimum {}", base),
                    QuantQuery::Max => format!("Maximum {}", base),
                    QuantQuery::Bound { .. } => "Result".to_string(),
                }
            }
            Expr::Filter(f) => {
                if f.invisible {
                    return f.operand.result_name();
                }
                match f.op {
                    FilterOp::Count => "Count".to_string(),
                    FilterOp::Sum => "Sum".to_string(),
                    FilterOp::Avg => "Average".to_string(),
                    FilterOp::Min => "Minimum value".to_string(),
                    FilterOp::Max => "Maximum value".to_string(),
                    FilterOp::Forall | FilterOp::Exists => "Result".to_string(),
                    _ => f.operand.result_name(),
                }
            }
            Expr::Unary {
                op: UnaryOp::Parenth,
                operand,
            } => operand.result_name(),
            _ => "Result".to_string(),
        }
    }

    /// Rename label references in place according to `renames`.
    pub fn rename_labels(&mut self, renames: &HashMap<String, String>) {
        if let Expr::Label { name } = self {
            if let Some(new_name) = renames.get(name) {
                *name = new_name.clone();
            }
            return;
        }
        self.for_each_child_mut(&mut |c| c.rename_labels(renames));
    }

    /// Count nodes in the tree.
    pub fn size(&self) -> usize {
        let mut n = 1;
        self.for_each_child(&mut |c| n += c.size());
        n
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
