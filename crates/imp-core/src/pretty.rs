//! Rendering AST nodes back to imp source
//!
//! Used for diagnostics (an offending assertion or invariant is reported as
//! source text) and for round-trip testing. Expression printing is
//! precedence-aware: parentheses appear only where reparsing would otherwise
//! change the tree.

use crate::ast::{ArithOp, BoolOp, Expr, Stmt};
use std::fmt;

// Binding strength, loosest to tightest. Operands after the first in an
// n-ary chain print at one level tighter to keep the left fold on reparse.
const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_NOT: u8 = 3;
const PREC_REL: u8 = 4;
const PREC_ADD: u8 = 5;
const PREC_MUL: u8 = 6;
const PREC_ATOM: u8 = 7;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::IntConst(_) | Expr::BoolConst(_) | Expr::Var(_) => PREC_ATOM,
        Expr::Rel { .. } => PREC_REL,
        Expr::Bool { op: BoolOp::Not, .. } => PREC_NOT,
        Expr::Bool { op: BoolOp::And, .. } => PREC_AND,
        Expr::Bool { op: BoolOp::Or, .. } => PREC_OR,
        Expr::Arith {
            op: ArithOp::Add | ArithOp::Sub,
            ..
        } => PREC_ADD,
        Expr::Arith {
            op: ArithOp::Mul | ArithOp::Div,
            ..
        } => PREC_MUL,
    }
}

fn fmt_expr(expr: &Expr, min_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let prec = precedence(expr);
    let parens = prec < min_prec;
    if parens {
        write!(f, "(")?;
    }
    match expr {
        Expr::IntConst(n) => write!(f, "{}", n)?,
        Expr::BoolConst(b) => write!(f, "{}", b)?,
        Expr::Var(name) => write!(f, "{}", name)?,
        Expr::Rel { op, lhs, rhs } => {
            fmt_expr(lhs, PREC_ADD, f)?;
            write!(f, " {} ", op.symbol())?;
            fmt_expr(rhs, PREC_ADD, f)?;
        }
        Expr::Bool {
            op: BoolOp::Not,
            args,
        } => {
            write!(f, "not ")?;
            if let Some(arg) = args.first() {
                fmt_expr(arg, PREC_NOT, f)?;
            }
        }
        Expr::Bool { op, args } => {
            let word = if *op == BoolOp::And { "and" } else { "or" };
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", word)?;
                }
                fmt_expr(arg, if i == 0 { prec } else { prec + 1 }, f)?;
            }
        }
        Expr::Arith { op, args } => {
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op.symbol())?;
                }
                fmt_expr(arg, if i == 0 { prec } else { prec + 1 }, f)?;
            }
        }
    }
    if parens {
        write!(f, ")")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_expr(self, 0, f)
    }
}

fn fmt_stmt(stmt: &Stmt, indent: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match stmt {
        Stmt::Skip => write!(f, "{}skip", pad),
        Stmt::PrintState => write!(f, "{}print_state", pad),
        Stmt::Assign { var, rhs } => write!(f, "{}{} := {}", pad, var, rhs),
        Stmt::Havoc { vars } => write!(f, "{}havoc {}", pad, vars.join(", ")),
        Stmt::Assert(cond) => write!(f, "{}assert {}", pad, cond),
        Stmt::Assume(cond) => write!(f, "{}assume {}", pad, cond),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            write!(f, "{}if {} then\n", pad, cond)?;
            fmt_stmt(then_branch, indent + 1, f)?;
            if let Some(else_branch) = else_branch {
                write!(f, "\n{}else\n", pad)?;
                fmt_stmt(else_branch, indent + 1, f)?;
            }
            Ok(())
        }
        Stmt::While { cond, inv, body } => {
            match inv {
                Some(inv) => write!(f, "{}while {} inv {} do\n", pad, cond, inv)?,
                None => write!(f, "{}while {} do\n", pad, cond)?,
            }
            fmt_stmt(body, indent + 1, f)
        }
        Stmt::Block(stmts) => {
            write!(f, "{}{{\n", pad)?;
            for (i, s) in stmts.iter().enumerate() {
                if i > 0 {
                    write!(f, ";\n")?;
                }
                fmt_stmt(s, indent + 1, f)?;
            }
            write!(f, "\n{}}}", pad)
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_stmt(self, 0, f)
    }
}
