//! Concrete values extracted from solver models
//!
//! A satisfiable path condition has at least one concrete witness; these
//! types carry one such witness in a printable, deterministic form.

use crate::translate::Env;
use num_bigint::BigInt;
use std::collections::BTreeMap;
use std::fmt;
use z3::Model;

/// Value extracted from a solver model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(BigInt),
    /// Value the native extraction path could not decode, kept textually
    Opaque(String),
}

impl fmt::Display for SmtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmtValue::Bool(b) => write!(f, "{}", b),
            SmtValue::Int(i) => write!(f, "{}", i),
            SmtValue::Opaque(s) => write!(f, "{}", s),
        }
    }
}

/// One concrete program state consistent with a symbolic state
#[derive(Debug, Clone, Default)]
pub struct ConcreteState {
    /// Variable assignments, in variable-name order
    pub assignments: BTreeMap<String, SmtValue>,
}

impl ConcreteState {
    /// Value of a variable, if the model assigned one
    pub fn get(&self, name: &str) -> Option<&SmtValue> {
        self.assignments.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }
}

impl fmt::Display for ConcreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.assignments {
            writeln!(f, "{} = {}", name, value)?;
        }
        Ok(())
    }
}

/// Evaluate every environment binding under a model
///
/// Integer values outside `i64` fall back to their textual rendering rather
/// than being dropped.
pub fn extract_state<'ctx>(model: &Model<'ctx>, env: &Env<'ctx>) -> ConcreteState {
    let mut assignments = BTreeMap::new();

    for (name, term) in env {
        if let Some(b) = term.as_bool() {
            if let Some(val) = model.eval(&b, true) {
                let value = match val.as_bool() {
                    Some(v) => SmtValue::Bool(v),
                    None => SmtValue::Opaque(val.to_string()),
                };
                assignments.insert(name.clone(), value);
            }
        } else if let Some(i) = term.as_int() {
            if let Some(val) = model.eval(&i, true) {
                let value = match val.as_i64() {
                    Some(v) => SmtValue::Int(BigInt::from(v)),
                    None => SmtValue::Opaque(val.to_string()),
                };
                assignments.insert(name.clone(), value);
            }
        }
    }

    ConcreteState { assignments }
}
