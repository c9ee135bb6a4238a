use serde::{Deserialize, Serialize};

use crate::runtime::action::Direction;

/// One parsed statement of the command language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Statement {
    /// Leaf command.
    Command(Command),
    /// `for <var> in range(<count>): <body>`
    For {
        /// Loop variable name.
        var: String,
        /// Number of iterations; the variable takes `0..count`.
        count: u32,
        /// Single statement executed once per iteration.
        body: Box<Statement>,
    },
    /// `if <condition>: <body>` with no `else`.
    If {
        /// Guard evaluated at parse time.
        condition: Condition,
        /// Single statement executed when the guard holds.
        body: Box<Statement>,
    },
}

/// Leaf commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Command {
    /// `move <dir>` or `player.move<dir>()`.
    Move(Direction),
    /// `walk <count> <dir>`.
    Walk(Direction, u32),
    /// `turn <dir>`.
    Turn(Direction),
    /// `wait` or `wait <ms>`; `None` selects the configured default.
    Wait(Option<u64>),
    /// `print <text>` with quotes/parens stripped.
    Print(String),
    /// `clear` / `stop`; runs immediately instead of being queued.
    Clear,
}

/// `<ident> <op> <uint>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Loop variable or built-in name.
    pub ident: String,
    /// Comparison operator.
    pub op: Comparison,
    /// Right-hand literal.
    pub value: i64,
}

/// Comparison operators accepted in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl Comparison {
    /// Parse an operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Comparison::Lt),
            ">" => Some(Comparison::Gt),
            "==" => Some(Comparison::Eq),
            "!=" => Some(Comparison::Ne),
            "<=" => Some(Comparison::Le),
            ">=" => Some(Comparison::Ge),
            _ => None,
        }
    }

    /// Apply the operator.
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}
