//! Collaborator interfaces consumed by the interpreter and scheduler
//!
//! The game world (tiles, objects, NPCs, health bar, message bar) lives outside
//! the core. The core only reaches it through these traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer world position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate (grows downwards).
    pub y: i32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Same rectangle moved by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether the two rectangles share any interior area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlapping region, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Read-only built-in variables resolvable from conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    /// Agent world x.
    X,
    /// Agent world y.
    Y,
    /// Current health.
    Health,
}

impl Builtin {
    /// Look up a built-in by its script name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Builtin::X),
            "y" => Some(Builtin::Y),
            "health" => Some(Builtin::Health),
            _ => None,
        }
    }
}

/// Answers whether a candidate rectangle is blocked.
pub trait CollisionOracle {
    /// `true` when `candidate` overlaps a blocking tile, object or entity.
    fn check(&self, candidate: Rect) -> bool;
}

/// Live world values backing the built-in variables.
pub trait WorldState {
    /// Current value of `builtin`. Never cached by the caller.
    fn read(&self, builtin: Builtin) -> i64;
}

/// Destination for `print` output.
pub trait MessageSink {
    /// Display `text` to the player.
    fn show(&mut self, text: &str);
}

/// Receiver of the interpreter's syntax-error penalty.
pub trait HealthSink {
    /// Apply `amount` damage to the agent.
    fn damage(&mut self, amount: u32);
}

/// Mutable view of the controlled agent.
pub trait AgentBody {
    /// Current world position.
    fn position(&self) -> Position;
    /// Overwrite the world position.
    fn set_position(&mut self, position: Position);
    /// Direction the agent is facing.
    fn facing(&self) -> crate::runtime::action::Direction;
    /// Face a new direction.
    fn set_facing(&mut self, direction: crate::runtime::action::Direction);
    /// Step the walking animation by one frame.
    fn advance_frame(&mut self);
    /// Collision rectangle the agent would occupy at `position`.
    fn solid_rect_at(&self, position: Position) -> Rect;
}

/// Everything the scheduler needs from the world.
pub trait SchedulerHost: AgentBody + CollisionOracle + MessageSink {}

impl<T: AgentBody + CollisionOracle + MessageSink> SchedulerHost for T {}

/// Everything the interpreter needs from the world.
pub trait InterpreterHost: WorldState + HealthSink {}

impl<T: WorldState + HealthSink> InterpreterHost for T {}
