//! Expression Evaluator (C3).
//!
//! Recursive evaluation over the expression AST. A call inside an expression
//! can *suspend* evaluation: rather than mutating the AST in place to carry a
//! "pending return destination" (the source's approach), the frame that is
//! evaluating keeps an explicit `call_cache` addressed by the ordinal
//! position of `Call` nodes encountered in a left-to-right walk, per the
//! redesign note this crate follows (`ExprState = Ready | Pending`).

use std::collections::HashSet;

use crate::ast::{BinOpKind, Expr};
use crate::error::{StepError, StepResult};
use crate::optimizer::{Optimizer, Rhs};
use crate::value::{Value, VarStore, VarType};

/// Result of attempting to fully evaluate an expression this step.
pub enum EvalOutcome {
    Ready(Value),
    /// A function call needs to run to completion before this expression can
    /// finish; `slot` is its ordinal position among the `Call` nodes in this
    /// expression, matching the index `call_cache` will be written to.
    Suspend { callee: String, args: Vec<Value>, slot: usize },
}

/// Walks `expr` left to right. `cache` holds already-resolved call results
/// from a previous suspension of the *same* statement; `cursor` counts how
/// many `Call` nodes have been visited so far in this walk.
pub fn eval(
    expr: &Expr,
    vars: &VarStore,
    opt: &mut Optimizer,
    cache: &[Option<Value>],
    cursor: &mut usize,
) -> StepResult<EvalOutcome> {
    match expr {
        Expr::Number(n, _) => Ok(EvalOutcome::Ready(Value::Float(*n))),
        Expr::StringLit(_, lineno) => Err(StepError::InvalidCast {
            line: lineno.start(),
            ty: "string used as a value".to_string(),
        }),
        Expr::Id { name, lineno } => {
            let line = lineno.start();
            let binding = vars.get(name, line)?;
            let value = binding.scalar_value().ok_or(StepError::UnassignedRead {
                line,
                name: name.clone(),
            })?;
            opt.observe_cp(name, name, line);
            Ok(EvalOutcome::Ready(value))
        }
        Expr::Array { name, index, lineno } => {
            let line = lineno.start();
            let idx_outcome = eval(index, vars, opt, cache, cursor)?;
            let idx_val = match idx_outcome {
                EvalOutcome::Ready(v) => v,
                suspend => return Ok(suspend),
            };
            let idx = value_as_index(idx_val, line)?;
            let binding = vars.get(name, line)?;
            let value = binding.array_get(idx, line, name)?;
            let key = format!("{}[{}]", name, idx);
            opt.observe_cp(&key, name, line);
            Ok(EvalOutcome::Ready(value))
        }
        Expr::Casting { ty, inner, .. } => {
            let outcome = eval(inner, vars, opt, cache, cursor)?;
            match outcome {
                EvalOutcome::Ready(v) => Ok(EvalOutcome::Ready(v.coerce(*ty))),
                suspend => Ok(suspend),
            }
        }
        Expr::BinOp { op, lhs, rhs, text, lineno } => {
            let line = lineno.start();
            let mut free_vars = HashSet::new();
            collect_vars(lhs, &mut free_vars);
            collect_vars(rhs, &mut free_vars);
            if !free_vars.is_empty() {
                let vtype = free_vars
                    .iter()
                    .filter_map(|v| vars.get(v, line).ok())
                    .map(|b| b.ty)
                    .next()
                    .unwrap_or(VarType::Int);
                opt.observe_cs(text, &free_vars, vtype, line);
            }
            let lhs_outcome = eval(lhs, vars, opt, cache, cursor)?;
            let lhs_val = match lhs_outcome {
                EvalOutcome::Ready(v) => v,
                suspend => return Ok(suspend),
            };
            let rhs_outcome = eval(rhs, vars, opt, cache, cursor)?;
            let rhs_val = match rhs_outcome {
                EvalOutcome::Ready(v) => v,
                suspend => return Ok(suspend),
            };
            let result = match op {
                BinOpKind::Add => lhs_val.add(rhs_val, line)?,
                BinOpKind::Sub => lhs_val.sub(rhs_val),
                BinOpKind::Mul => lhs_val.mul(rhs_val),
                BinOpKind::Div => lhs_val.div(rhs_val, line)?,
            };
            Ok(EvalOutcome::Ready(result))
        }
        Expr::Call { callee, args, .. } => {
            let my_slot = *cursor;
            *cursor += 1;
            if let Some(Some(value)) = cache.get(my_slot) {
                return Ok(EvalOutcome::Ready(*value));
            }
            let mut resolved = Vec::with_capacity(args.len());
            for arg in args {
                match eval(arg, vars, opt, cache, cursor)? {
                    EvalOutcome::Ready(v) => resolved.push(v),
                    suspend => return Ok(suspend),
                }
            }
            Ok(EvalOutcome::Suspend { callee: callee.clone(), args: resolved, slot: my_slot })
        }
    }
}

/// What, if anything, to record in the CP table for an assignment's RHS: a
/// plain number, a plain identifier, or neither.
pub fn cp_rhs_of(expr: &Expr) -> Option<Rhs> {
    match expr {
        Expr::Number(n, _) => Some(Rhs::Number(*n)),
        Expr::Id { name, .. } => Some(Rhs::Var(name.clone())),
        _ => None,
    }
}

fn collect_vars(expr: &Expr, out: &mut HashSet<String>) {
    match expr {
        Expr::Number(..) | Expr::StringLit(..) => {}
        Expr::Id { name, .. } => {
            out.insert(name.clone());
        }
        Expr::Array { name, index, .. } => {
            out.insert(name.clone());
            collect_vars(index, out);
        }
        Expr::Casting { inner, .. } => collect_vars(inner, out),
        Expr::BinOp { lhs, rhs, .. } => {
            collect_vars(lhs, out);
            collect_vars(rhs, out);
        }
        Expr::Call { args, .. } => {
            for a in args {
                collect_vars(a, out);
            }
        }
    }
}

fn value_as_index(v: Value, line: u32) -> StepResult<usize> {
    match v {
        Value::Int(i) if i >= 0 => Ok(i as usize),
        Value::Float(f) if f >= 0.0 => Ok(f as usize),
        _ => Err(StepError::ArrayIndexUnresolved { line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Lineno;
    use crate::value::VarStore;

    #[test]
    fn number_literal_evaluates_to_itself() {
        let vars = VarStore::new();
        let mut opt = Optimizer::new();
        let expr = Expr::Number(5.0, Lineno::Single(1));
        match eval(&expr, &vars, &mut opt, &[], &mut 0).unwrap() {
            EvalOutcome::Ready(Value::Float(f)) => assert_eq!(f, 5.0),
            _ => panic!("expected ready float"),
        }
    }

    #[test]
    fn id_lookup_fails_on_unknown_variable() {
        let vars = VarStore::new();
        let mut opt = Optimizer::new();
        let expr = Expr::Id { name: "x".into(), lineno: Lineno::Single(2) };
        let err = eval(&expr, &vars, &mut opt, &[], &mut 0).unwrap_err();
        assert_eq!(err, StepError::UnknownVariable { line: 2, name: "x".into() });
    }

    #[test]
    fn call_node_suspends_with_resolved_args() {
        let mut vars = VarStore::new();
        vars.declare_scalar("x", VarType::Int, 1, Some(Value::Int(2)));
        let mut opt = Optimizer::new();
        let expr = Expr::Call {
            callee: "f".into(),
            args: vec![Expr::Id { name: "x".into(), lineno: Lineno::Single(3) }],
            lineno: Lineno::Single(3),
        };
        match eval(&expr, &vars, &mut opt, &[], &mut 0).unwrap() {
            EvalOutcome::Suspend { callee, args, slot } => {
                assert_eq!(callee, "f");
                assert_eq!(args, vec![Value::Int(2)]);
                assert_eq!(slot, 0);
            }
            _ => panic!("expected suspend"),
        }
    }

    #[test]
    fn cached_call_result_completes_on_retry() {
        let vars = VarStore::new();
        let mut opt = Optimizer::new();
        let expr = Expr::Call { callee: "f".into(), args: vec![], lineno: Lineno::Single(1) };
        let cache = vec![Some(Value::Int(7))];
        match eval(&expr, &vars, &mut opt, &cache, &mut 0).unwrap() {
            EvalOutcome::Ready(Value::Int(7)) => {}
            _ => panic!("expected cached ready value"),
        }
    }
}
