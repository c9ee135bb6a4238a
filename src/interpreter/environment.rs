//! Variable resolution for conditions.
//!
//! Loop variables shadow the read-only built-ins (`x`, `y`, `health`), which are
//! read from the live world on every lookup.

use std::collections::HashMap;

use super::ast::Condition;
use crate::runtime::host::{Builtin, WorldState};

/// Loop-variable bindings for one top-level parse call.
#[derive(Debug, Default, Clone)]
pub struct VariableEnvironment {
    bindings: HashMap<String, i64>,
}

impl VariableEnvironment {
    /// Empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning any binding it shadowed.
    pub fn bind(&mut self, name: &str, value: i64) -> Option<i64> {
        self.bindings.insert(name.to_string(), value)
    }

    /// Undo a [`bind`](Self::bind), restoring the shadowed value if there was one.
    pub fn restore(&mut self, name: &str, previous: Option<i64>) {
        match previous {
            Some(value) => {
                self.bindings.insert(name.to_string(), value);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }

    /// Current loop binding for `name`.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.bindings.get(name).copied()
    }

    /// Resolve `name` against loop variables, then built-ins. Unknown names read as 0.
    pub fn resolve<W: WorldState + ?Sized>(&self, name: &str, world: &W) -> i64 {
        if let Some(value) = self.get(name) {
            return value;
        }
        Builtin::from_name(name)
            .map(|builtin| world.read(builtin))
            .unwrap_or(0)
    }

    /// Evaluate a condition against this environment and the live world.
    pub fn evaluate<W: WorldState + ?Sized>(&self, condition: &Condition, world: &W) -> bool {
        let lhs = self.resolve(&condition.ident, world);
        condition.op.apply(lhs, condition.value)
    }
}
