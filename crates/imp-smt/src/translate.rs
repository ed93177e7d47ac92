//! Symbolic-term construction for imp expressions
//!
//! Pure translation `(expr, env) -> term`; nothing here mutates the
//! environment or the solver. The entry points are sort-directed:
//! `eval_int` and `eval_bool` insist on a sort and report a contract
//! violation otherwise, `eval` accepts either sort (used for assignment
//! right-hand sides).

use crate::error::{SmtError, SmtResult};
use imp_core::ast::{ArithOp, BoolOp, Expr, RelOp};
use z3::ast::{Ast, Bool, Dynamic, Int};
use z3::Context;

/// Environment mapping variable names to their current symbolic terms
///
/// Persistent and structurally shared: cloning is cheap, and two clones are
/// fully independent afterwards. Iteration order is the variable-name order,
/// which keeps every downstream traversal deterministic.
pub type Env<'ctx> = im::OrdMap<String, Dynamic<'ctx>>;

/// Sort of a symbolic term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Int,
    Bool,
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sort::Int => write!(f, "Int"),
            Sort::Bool => write!(f, "Bool"),
        }
    }
}

/// Sort of an existing term, if it is one this language knows about
pub fn sort_of(term: &Dynamic<'_>) -> Option<Sort> {
    if term.as_bool().is_some() {
        Some(Sort::Bool)
    } else if term.as_int().is_some() {
        Some(Sort::Int)
    } else {
        None
    }
}

/// Declare a fresh integer symbol, distinct from all prior symbols
pub fn fresh_int<'ctx>(ctx: &'ctx Context, prefix: &str) -> Dynamic<'ctx> {
    Dynamic::from_ast(&Int::fresh_const(ctx, prefix))
}

/// Declare a fresh boolean symbol, distinct from all prior symbols
pub fn fresh_bool<'ctx>(ctx: &'ctx Context, prefix: &str) -> Dynamic<'ctx> {
    Dynamic::from_ast(&Bool::fresh_const(ctx, prefix))
}

/// Declare a fresh symbol of the same sort as an existing term
pub fn fresh_like<'ctx>(ctx: &'ctx Context, prefix: &str, term: &Dynamic<'ctx>) -> Dynamic<'ctx> {
    match sort_of(term) {
        Some(Sort::Bool) => fresh_bool(ctx, prefix),
        _ => fresh_int(ctx, prefix),
    }
}

fn lookup<'e, 'ctx>(env: &'e Env<'ctx>, name: &str) -> SmtResult<&'e Dynamic<'ctx>> {
    env.get(name)
        .ok_or_else(|| SmtError::UnknownVariable(name.to_string()))
}

/// Translate an expression of either sort
pub fn eval<'ctx>(ctx: &'ctx Context, env: &Env<'ctx>, expr: &Expr) -> SmtResult<Dynamic<'ctx>> {
    match expr {
        Expr::Var(name) => lookup(env, name).cloned(),
        Expr::IntConst(_) | Expr::Arith { .. } => {
            Ok(Dynamic::from_ast(&eval_int(ctx, env, expr)?))
        }
        Expr::BoolConst(_) | Expr::Rel { .. } | Expr::Bool { .. } => {
            Ok(Dynamic::from_ast(&eval_bool(ctx, env, expr)?))
        }
    }
}

/// Translate an integer-sorted expression
pub fn eval_int<'ctx>(ctx: &'ctx Context, env: &Env<'ctx>, expr: &Expr) -> SmtResult<Int<'ctx>> {
    match expr {
        Expr::IntConst(n) => Ok(Int::from_i64(ctx, *n)),

        Expr::Var(name) => lookup(env, name)?.as_int().ok_or_else(|| {
            SmtError::SortMismatch {
                expr: name.clone(),
                expected: Sort::Int,
                actual: Sort::Bool,
            }
        }),

        Expr::Arith { op, args } => {
            let mut operands = args.iter();
            let first = operands
                .next()
                .ok_or_else(|| SmtError::EmptyOperands(op.symbol().to_string()))?;
            let mut acc = eval_int(ctx, env, first)?;
            for arg in operands {
                let rhs = eval_int(ctx, env, arg)?;
                acc = match op {
                    ArithOp::Add => &acc + &rhs,
                    ArithOp::Sub => &acc - &rhs,
                    ArithOp::Mul => &acc * &rhs,
                    // solver-native integer division: SMT-LIB `div`
                    // (Euclidean, so e.g. -7 / 2 = -4)
                    ArithOp::Div => &acc / &rhs,
                };
            }
            Ok(acc)
        }

        Expr::BoolConst(_) | Expr::Rel { .. } | Expr::Bool { .. } => Err(SmtError::SortMismatch {
            expr: expr.to_string(),
            expected: Sort::Int,
            actual: Sort::Bool,
        }),
    }
}

/// Translate a boolean-sorted expression
pub fn eval_bool<'ctx>(ctx: &'ctx Context, env: &Env<'ctx>, expr: &Expr) -> SmtResult<Bool<'ctx>> {
    match expr {
        Expr::BoolConst(b) => Ok(Bool::from_bool(ctx, *b)),

        Expr::Var(name) => lookup(env, name)?.as_bool().ok_or_else(|| {
            SmtError::SortMismatch {
                expr: name.clone(),
                expected: Sort::Bool,
                actual: Sort::Int,
            }
        }),

        Expr::Rel { op, lhs, rhs } => {
            let l = eval_int(ctx, env, lhs)?;
            let r = eval_int(ctx, env, rhs)?;
            Ok(match op {
                RelOp::Lt => l.lt(&r),
                RelOp::Le => l.le(&r),
                RelOp::Eq => l._eq(&r),
                RelOp::Ge => l.ge(&r),
                RelOp::Gt => l.gt(&r),
            })
        }

        Expr::Bool { op, args } => match op {
            BoolOp::Not => {
                if args.len() != 1 {
                    return Err(SmtError::NotArity(args.len()));
                }
                Ok(eval_bool(ctx, env, &args[0])?.not())
            }
            BoolOp::And | BoolOp::Or => {
                if args.is_empty() {
                    let word = if *op == BoolOp::And { "and" } else { "or" };
                    return Err(SmtError::EmptyOperands(word.to_string()));
                }
                let terms = args
                    .iter()
                    .map(|arg| eval_bool(ctx, env, arg))
                    .collect::<SmtResult<Vec<_>>>()?;
                let refs: Vec<&Bool<'ctx>> = terms.iter().collect();
                Ok(if *op == BoolOp::And {
                    Bool::and(ctx, &refs)
                } else {
                    Bool::or(ctx, &refs)
                })
            }
        },

        Expr::IntConst(_) | Expr::Arith { .. } => Err(SmtError::SortMismatch {
            expr: expr.to_string(),
            expected: Sort::Bool,
            actual: Sort::Int,
        }),
    }
}
