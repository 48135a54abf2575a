//! Short-circuit domain propagation for conditionals and connectives.
//!
//! An operand is only evaluated over the states where its value can still
//! affect the result. Entries outside the narrowed domain are never read
//! back, so the combined vector agrees with unrestricted evaluation on the
//! incoming domain.

use crate::checker::{Checker, Context};
use crate::error::CheckResult;
use smc_eval::{ops, StateValues};
use smc_expr::{BinOp, Expr, Type};
use smc_model::StateSet;
use tracing::trace;

/// `base ∩ domain`, or `base` when the domain is unrestricted.
fn narrow(mut base: StateSet, domain: Option<&StateSet>) -> StateSet {
    if let Some(dom) = domain {
        base.intersect_with(dom);
    }
    base
}

impl Checker {
    pub(crate) fn check_ite(
        &self,
        cx: &mut Context<'_>,
        cond: &Expr,
        then: &Expr,
        els: &Expr,
        ty: Type,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let n = cx.num_states();
        let cond_set = self.eval(cx, cond, domain)?.into_state_set()?;

        let then_domain = narrow(cond_set.clone(), domain);
        let else_domain = narrow(cond_set.complement(n), domain);

        let then_vals = self.eval_or_default(cx, then, then_domain, ty)?;
        let else_vals = self.eval_or_default(cx, els, else_domain, ty)?;

        StateValues::from_state_set(cond_set, n)
            .apply_ternary(then_vals, else_vals, ty, domain, ops::apply_ite)
            .map_err(Into::into)
    }

    /// `a && b`, `a || b` and `a => b`, evaluating `b` only where `a` does
    /// not already decide the result.
    pub(crate) fn check_logical(
        &self,
        cx: &mut Context<'_>,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        domain: Option<&StateSet>,
    ) -> CheckResult<StateValues> {
        let n = cx.num_states();
        let left_set = self.eval(cx, left, domain)?.into_state_set()?;

        let undecided = match op {
            BinOp::Or => left_set.complement(n),
            _ => left_set.clone(),
        };
        let right_domain = narrow(undecided, domain);
        let right_set = self
            .eval_or_default(cx, right, right_domain, Type::Bool)?
            .into_state_set()?;

        let mut out = match op {
            BinOp::Implies => left_set.complement(n),
            _ => left_set,
        };
        match op {
            BinOp::And => out.intersect_with(&right_set),
            _ => out.union_with(&right_set),
        }
        Ok(StateValues::from_state_set(out, n))
    }

    /// Evaluate over `domain`, or produce the default vector without
    /// touching `expr` when the domain is empty.
    fn eval_or_default(
        &self,
        cx: &mut Context<'_>,
        expr: &Expr,
        domain: StateSet,
        ty: Type,
    ) -> CheckResult<StateValues> {
        if domain.is_empty() {
            trace!(kind = expr.kind_name(), "operand skipped, empty domain");
            return Ok(StateValues::default_for(ty, cx.num_states()));
        }
        self.eval(cx, expr, Some(&domain))
    }
}
