//! Pretty printer for property expressions, in the usual concrete syntax
//! (`filter(min, x, "init")`, `P=? [ F "goal" ]`, `x > 0 ? 1 : 0`).

use crate::expr::*;
use std::fmt;

/// Pretty print an expression to a string.
pub fn pretty_print_expr(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::new();
    printer.print_expr(expr);
    printer.output
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print_expr(self))
    }
}

struct PrettyPrinter {
    output: String,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ite { cond, then, els } => {
                self.print_operand(cond, 0);
                self.write(" ? ");
                self.print_operand(then, 0);
                self.write(" : ");
                self.print_operand(els, 0);
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                self.print_operand(left, prec);
                self.write(" ");
                self.write(op.symbol());
                self.write(" ");
                // Right operand of an equal-precedence op gets parentheses
                self.print_operand(right, prec + 1);
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    self.write("!");
                    self.print_operand(operand, u8::MAX);
                }
                UnaryOp::Minus => {
                    self.write("-");
                    self.print_operand(operand, u8::MAX);
                }
                UnaryOp::Parenth => {
                    self.write("(");
                    self.print_expr(operand);
                    self.write(")");
                }
            },
            Expr::Func { func, args } => {
                self.write(func.name());
                self.write("(");
                self.print_list(args);
                self.write(")");
            }
            Expr::Literal { value } => self.write(&value.to_string()),
            Expr::Constant { name, .. }
            | Expr::Ident { name, .. }
            | Expr::Formula { name, .. }
            | Expr::Var { name, .. }
            | Expr::Obs { name, .. } => self.write(name),
            Expr::Label { name } => {
                self.write("\"");
                self.write(name);
                self.write("\"");
            }
            Expr::Prop { name, .. } => {
                self.write("\"");
                self.write(name);
                self.write("\"");
            }
            Expr::Filter(f) => {
                self.write("filter(");
                self.write(f.op.keyword());
                self.write(", ");
                self.print_expr(&f.operand);
                if let Some(sel) = &f.selector {
                    self.write(", ");
                    self.print_expr(sel);
                }
                self.write(")");
            }
            Expr::Quant(q) => self.print_quant(q),
            Expr::Temporal {
                op,
                operands,
                bound,
            } => self.print_temporal(*op, operands, *bound),
        }
    }

    fn print_quant(&mut self, q: &QuantExpr) {
        match q.kind {
            QuantKind::Prob => self.write("P"),
            QuantKind::SteadyState => self.write("S"),
            QuantKind::Reward { index } => {
                self.write("R{");
                self.write(&index.to_string());
                self.write("}");
            }
        }
        match q.query {
            QuantQuery::Value => self.write("=?"),
            QuantQuery::Min => self.write("min=?"),
            QuantQuery::Max => self.write("max=?"),
            QuantQuery::Bound { relop, bound } => {
                self.write(relop.symbol());
                self.write(&bound.to_string());
            }
        }
        self.write(" [ ");
        self.print_expr(&q.operand);
        self.write(" ]");
    }

    fn print_temporal(&mut self, op: TemporalOp, operands: &[Expr], bound: Option<u64>) {
        let bound_str = bound.map(|k| format!("<={}", k)).unwrap_or_default();
        match (op, operands) {
            (TemporalOp::Until, [lhs, rhs]) => {
                self.print_operand(lhs, u8::MAX);
                self.write(" U");
                self.write(&bound_str);
                self.write(" ");
                self.print_operand(rhs, u8::MAX);
            }
            _ => {
                self.write(op.symbol());
                self.write(&bound_str);
                for operand in operands {
                    self.write(" ");
                    self.print_operand(operand, u8::MAX);
                }
            }
        }
    }

    fn print_list(&mut self, exprs: &[Expr]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expr(e);
        }
    }

    /// Print a sub-expression, parenthesizing it if it binds looser than
    /// `min_prec`.
    fn print_operand(&mut self, expr: &Expr, min_prec: u8) {
        let prec = match expr {
            Expr::Ite { .. } => 0,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Temporal { .. } => 0,
            _ => u8::MAX,
        };
        if prec < min_prec {
            self.write("(");
            self.print_expr(expr);
            self.write(")");
        } else {
            self.print_expr(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn test_print_filter() {
        let e = Expr::filter(
            FilterOp::Min,
            Expr::var("x", 0, Type::Int),
            Some(Expr::init_label()),
        );
        assert_eq!(pretty_print_expr(&e), "filter(min, x, \"init\")");
    }

    #[test]
    fn test_print_precedence() {
        let x = Expr::var("x", 0, Type::Int);
        let sum = Expr::binary(BinOp::Plus, x.clone(), Expr::int(1));
        let prod = Expr::binary(BinOp::Times, sum.clone(), Expr::int(2));
        assert_eq!(prod.to_string(), "(x + 1) * 2");
        let nested = Expr::binary(BinOp::Minus, x.clone(), sum);
        assert_eq!(nested.to_string(), "x - (x + 1)");
        let ite = Expr::ite(
            Expr::binary(BinOp::Gt, x, Expr::int(0)),
            Expr::int(1),
            Expr::int(0),
        );
        assert_eq!(ite.to_string(), "x > 0 ? 1 : 0");
    }

    #[test]
    fn test_print_quant() {
        let path = Expr::temporal(
            TemporalOp::Until,
            vec![Expr::not(Expr::label("fail")), Expr::label("goal")],
            Some(10),
        );
        let p = Expr::quant(
            QuantKind::Prob,
            QuantQuery::Bound {
                relop: RelOp::Ge,
                bound: 0.5,
            },
            path,
        );
        assert_eq!(p.to_string(), "P>=0.5 [ !\"fail\" U<=10 \"goal\" ]");
        let r = Expr::quant(
            QuantKind::Reward { index: 1 },
            QuantQuery::Min,
            Expr::temporal(TemporalOp::Finally, vec![Expr::label("done")], None),
        );
        assert_eq!(r.to_string(), "R{1}min=? [ F \"done\" ]");
    }
}
