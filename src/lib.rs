//! CodeQuest core – command interpreter and tick-driven action scheduler
//!
//! Players steer their character by typing small Python-flavoured programs:
//! - `move`, `walk`, `turn`, `wait`, `print`, `clear` commands
//! - bounded `for i in range(n):` loops and single-comparison `if` guards
//! - `;`/newline separated sequences
//!
//! Each submitted line is parsed in one synchronous pass into primitive
//! actions. The scheduler then drains them one per frame under a delay gate,
//! animating each one-tile move and aborting it on collision. Syntax errors
//! cost the player one heart per submitted line.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Command-language parser and evaluator
pub mod interpreter;
/// Scheduler, collaborator traits and session orchestration
pub mod runtime;
/// Reference world: tiles, objects, NPCs, health and messages
pub mod world;

// Re-export key types for convenience
pub use interpreter::{Interpreter, ParseError, ParseReport};
pub use runtime::action::{Direction, PrimitiveAction};
pub use runtime::scheduler::{Scheduler, TickOutcome};
pub use runtime::{Session, SessionConfig};
pub use world::World;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
