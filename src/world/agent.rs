//! The player-controlled agent and its walk cycle.

use serde::{Deserialize, Serialize};

use crate::runtime::action::Direction;
use crate::runtime::host::{Position, Rect};

/// Number of frames in a walk cycle.
pub const WALK_FRAMES: u8 = 4;

/// The player-controlled character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// World position of the sprite's top-left corner.
    pub position: Position,
    /// Facing direction.
    pub facing: Direction,
    /// Current walk frame, `1..=WALK_FRAMES`.
    pub sprite_frame: u8,
    /// Hitbox relative to `position`.
    pub solid_area: Rect,
}

impl Agent {
    /// An agent at `position` facing down, with a hitbox half a tile wide
    /// sitting in the lower middle of its tile.
    pub fn new(position: Position, tile_size: u32) -> Self {
        let tile = i32::try_from(tile_size).unwrap_or(i32::MAX);
        Self {
            position,
            facing: Direction::Down,
            sprite_frame: 1,
            solid_area: Rect::new(tile / 8, tile / 4, tile / 2, tile / 2),
        }
    }

    /// Hitbox in world pixels if the agent stood at `position`.
    pub fn solid_rect_at(&self, position: Position) -> Rect {
        self.solid_area.translated(position.x, position.y)
    }

    /// Advance the walk cycle, wrapping back to frame 1.
    pub fn next_frame(&mut self) {
        self.sprite_frame = if self.sprite_frame >= WALK_FRAMES {
            1
        } else {
            self.sprite_frame + 1
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_cycle_wraps() {
        let mut agent = Agent::new(Position::default(), 64);
        let frames: Vec<u8> = (0..5)
            .map(|_| {
                agent.next_frame();
                agent.sprite_frame
            })
            .collect();
        assert_eq!(frames, vec![2, 3, 4, 1, 2]);
    }

    #[test]
    fn hitbox_follows_position() {
        let agent = Agent::new(Position::default(), 64);
        assert_eq!(agent.solid_rect_at(Position::new(64, 128)), Rect::new(72, 144, 32, 32));
    }
}
