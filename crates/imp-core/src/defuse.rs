//! Def collector: which variables does a subtree assign?
//!
//! The loop-invariant protocol abstracts a loop by forgetting every variable
//! the body can write. Targets of both `:=` and `havoc` count. The result is
//! ordered so downstream rebinding is deterministic.

use crate::ast::Stmt;
use std::collections::BTreeSet;

/// The set of variable names targeted by any assignment or havoc within
/// the given subtree
pub fn assigned_vars(stmt: &Stmt) -> BTreeSet<String> {
    let mut defs = BTreeSet::new();
    collect(stmt, &mut defs);
    defs
}

fn collect(stmt: &Stmt, defs: &mut BTreeSet<String>) {
    match stmt {
        Stmt::Skip | Stmt::PrintState | Stmt::Assert(_) | Stmt::Assume(_) => {}
        Stmt::Assign { var, .. } => {
            defs.insert(var.clone());
        }
        Stmt::Havoc { vars } => {
            defs.extend(vars.iter().cloned());
        }
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect(then_branch, defs);
            if let Some(else_branch) = else_branch {
                collect(else_branch, defs);
            }
        }
        Stmt::While { body, .. } => collect(body, defs),
        Stmt::Block(stmts) => {
            for s in stmts {
                collect(s, defs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn defs_of(src: &str) -> Vec<String> {
        assigned_vars(&parse(src).unwrap()).into_iter().collect()
    }

    #[test]
    fn test_assignment_and_havoc_targets() {
        assert_eq!(defs_of("x := 1; havoc y, z"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_nested_statements() {
        let src = "if a > 0 then { b := 1; while b < 9 do havoc c } else d := 2";
        assert_eq!(defs_of(src), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_reads_do_not_count() {
        // a appears only on right-hand sides and in conditions
        assert_eq!(defs_of("b := a + 1; assert a > 0"), vec!["b"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(defs_of("x := 1; x := 2; havoc x"), vec!["x"]);
    }
}
