//! Command-language interpreter.
//!
//! A submitted line is split into statements, each statement is parsed by a
//! small recursive-descent parser, and the resulting commands are staged on the
//! [`Scheduler`](crate::runtime::scheduler::Scheduler). Loops are unrolled and
//! conditions evaluated during the same synchronous call.

/// Abstract syntax tree definitions for the command language.
pub mod ast;
/// Loop variables and built-in lookup.
pub mod environment;
/// Parser for the command language.
pub mod parser;
/// Statement execution and the syntax-error penalty.
pub mod runtime;

pub use ast::{Command, Comparison, Condition, Statement};
pub use environment::VariableEnvironment;
pub use parser::{
    DEFAULT_MAX_REPEAT, parse_line, parse_line_with_limit, parse_statement,
    parse_statement_with_limit,
};
pub use runtime::{Interpreter, ParseReport};

use thiserror::Error;

/// Reasons a statement is rejected. All collapse to `false` at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No command form matched.
    #[error("unrecognized statement: {0}")]
    UnrecognizedStatement(String),

    /// `for` header did not match `for <ident> in range(<uint>): <body>`.
    #[error("malformed loop header: {0}")]
    MalformedLoopHeader(String),

    /// `if` header did not match `if <ident> <op> <uint>: <body>`.
    #[error("malformed condition: {0}")]
    MalformedCondition(String),

    /// A numeric field did not fit or was not a number.
    #[error("invalid number: {0}")]
    NumericParseError(String),
}
