//! Primitive actions staged by the interpreter and drained by the scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinal direction the agent can move or face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards decreasing `y`.
    Up,
    /// Towards increasing `y`.
    Down,
    /// Towards decreasing `x`.
    Left,
    /// Towards increasing `x`.
    Right,
}

impl Direction {
    /// Resolve a direction word or alias, ignoring ASCII case.
    ///
    /// Accepts `up`/`down`/`left`/`right`, the compass names
    /// `north`/`south`/`west`/`east` and the keyboard keys `w`/`s`/`a`/`d`.
    pub fn from_alias(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "up" | "north" | "w" => Some(Direction::Up),
            "down" | "south" | "s" => Some(Direction::Down),
            "left" | "west" | "a" => Some(Direction::Left),
            "right" | "east" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector for this direction in world coordinates.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic unit of scheduled behaviour.
///
/// Variants carry plain data only; the scheduler consumes each value once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PrimitiveAction {
    /// Move one tile in the given direction.
    MoveStep(Direction),
    /// Move `count` tiles, one [`PrimitiveAction::MoveStep`] per dequeue.
    WalkN(Direction, u32),
    /// Face a direction without moving.
    Turn(Direction),
    /// Hold the queue for the given number of milliseconds.
    Wait(u64),
    /// Forward a message to the message sink.
    Print(String),
}

impl PrimitiveAction {
    /// Number of queue slots this action stands for. `WalkN` counts each step.
    pub fn step_count(&self) -> usize {
        match self {
            PrimitiveAction::WalkN(_, count) => *count as usize,
            _ => 1,
        }
    }

    /// The single-step actions this action unrolls into, in execution order.
    pub fn steps(&self) -> std::iter::RepeatN<PrimitiveAction> {
        let step = match self {
            PrimitiveAction::WalkN(direction, _) => PrimitiveAction::MoveStep(*direction),
            other => other.clone(),
        };
        std::iter::repeat_n(step, self.step_count())
    }
}
