//! Reference game world
//!
//! Implements every collaborator trait the core consumes: collision against
//! tiles, objects and NPCs, the agent body, the health bar, and the message
//! bar. Rendering and asset loading stay outside the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The controlled agent
pub mod agent;
/// Health bar
pub mod health;
/// Tiles, objects and NPCs
pub mod map;

pub use agent::Agent;
pub use health::HealthSystem;
pub use map::{MapObject, Npc, TileMap};

use crate::runtime::action::Direction;
use crate::runtime::clock::Clock;
use crate::runtime::error::Result;
use crate::runtime::host::{
    AgentBody, Builtin, CollisionOracle, HealthSink, MessageSink, Position, Rect, WorldState,
};
use crate::runtime::{Session, SessionConfig};

/// Overlaps with objects and NPCs up to this many pixels on either axis are
/// tolerated, so hitboxes can brush past each other.
pub const OVERLAP_TOLERANCE: i32 = 5;

/// A message shown on the message bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownMessage {
    /// Message text.
    pub text: String,
    /// When it was shown.
    pub shown_at: DateTime<Utc>,
}

/// Message bar state plus everything shown so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    current: Option<String>,
    history: Vec<ShownMessage>,
}

impl MessageLog {
    /// Show `text`, replacing the current message.
    pub fn show(&mut self, text: &str) {
        self.current = Some(text.to_string());
        self.history.push(ShownMessage {
            text: text.to_string(),
            shown_at: Utc::now(),
        });
    }

    /// Hide the bar. History is kept.
    pub fn hide(&mut self) {
        self.current = None;
    }

    /// Message on the bar, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Every message shown, oldest first.
    pub fn history(&self) -> &[ShownMessage] {
        &self.history
    }
}

/// Tiles, objects, NPCs and the agent, with health and messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    map: TileMap,
    objects: Vec<MapObject>,
    npcs: Vec<Npc>,
    agent: Agent,
    health: HealthSystem,
    messages: MessageLog,
}

impl World {
    /// A world over `map` with the agent at `start`.
    pub fn new(map: TileMap, start: Position, config: &SessionConfig) -> Self {
        Self {
            agent: Agent::new(start, map.tile_size()),
            map,
            objects: Vec::new(),
            npcs: Vec::new(),
            health: HealthSystem::new(config.max_health),
            messages: MessageLog::default(),
        }
    }

    /// Place an object.
    pub fn add_object(&mut self, object: MapObject) {
        self.objects.push(object);
    }

    /// Place an NPC.
    pub fn add_npc(&mut self, npc: Npc) {
        self.npcs.push(npc);
    }

    /// The tile grid.
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Mutable tile grid.
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    /// The controlled agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Mutable agent.
    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    /// Health bar.
    pub fn health(&self) -> &HealthSystem {
        &self.health
    }

    /// Mutable health bar.
    pub fn health_mut(&mut self) -> &mut HealthSystem {
        &mut self.health
    }

    /// Message bar.
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Mutable message bar.
    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    /// Health ran out; the surrounding game should leave play.
    pub fn is_game_over(&self) -> bool {
        self.health.is_dead()
    }

    fn overlaps(candidate: &Rect, other: &Rect) -> bool {
        candidate
            .intersection(other)
            .is_some_and(|hit| hit.width > OVERLAP_TOLERANCE && hit.height > OVERLAP_TOLERANCE)
    }
}

impl CollisionOracle for World {
    fn check(&self, candidate: Rect) -> bool {
        if self.map.blocks(&candidate) {
            return true;
        }
        if self
            .objects
            .iter()
            .filter(|object| object.solid)
            .any(|object| Self::overlaps(&candidate, &object.area))
        {
            return true;
        }
        self.npcs
            .iter()
            .any(|npc| Self::overlaps(&candidate, &npc.rect()))
    }
}

impl AgentBody for World {
    fn position(&self) -> Position {
        self.agent.position
    }

    fn set_position(&mut self, position: Position) {
        self.agent.position = position;
    }

    fn facing(&self) -> Direction {
        self.agent.facing
    }

    fn set_facing(&mut self, direction: Direction) {
        self.agent.facing = direction;
    }

    fn advance_frame(&mut self) {
        self.agent.next_frame();
    }

    fn solid_rect_at(&self, position: Position) -> Rect {
        self.agent.solid_rect_at(position)
    }
}

impl MessageSink for World {
    fn show(&mut self, text: &str) {
        info!(text, "print");
        self.messages.show(text);
    }
}

impl WorldState for World {
    fn read(&self, builtin: Builtin) -> i64 {
        match builtin {
            Builtin::X => i64::from(self.agent.position.x),
            Builtin::Y => i64::from(self.agent.position.y),
            Builtin::Health => i64::from(self.health.current()),
        }
    }
}

impl HealthSink for World {
    fn damage(&mut self, amount: u32) {
        if self.health.take_damage(amount) {
            warn!(amount, remaining = self.health.current(), "syntax error penalty");
            if self.health.is_dead() {
                warn!("agent health depleted");
            }
        }
    }
}

impl Session<World> {
    /// Build a session over a map given as tile-id rows, agent at cell `(col, row)`.
    pub fn from_map_text(
        config: SessionConfig,
        map_text: &str,
        start_cell: (usize, usize),
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let map = TileMap::parse(map_text, config.tile_size)?;
        let start = map.cell_origin(start_cell.0, start_cell.1);
        let world = World::new(map, start, &config);
        Self::with_clock(config, world, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let config = SessionConfig::default();
        World::new(TileMap::open(4, 4, 64), Position::new(64, 64), &config)
    }

    #[test]
    fn small_overlaps_are_tolerated() {
        let mut world = world();
        world.add_object(MapObject {
            name: "wall".into(),
            area: Rect::new(128, 64, 64, 64),
            solid: true,
        });
        // Agent hitbox spans x 72..104 at (64, 64); the wall starts at 128.
        assert!(!world.check(world.solid_rect_at(Position::new(64 + 29, 64))));
        assert!(world.check(world.solid_rect_at(Position::new(64 + 30, 64))));
    }

    #[test]
    fn non_solid_objects_do_not_block() {
        let mut world = world();
        world.add_object(MapObject {
            name: "bush".into(),
            area: Rect::new(128, 64, 64, 64),
            solid: false,
        });
        assert!(!world.check(world.solid_rect_at(Position::new(128, 64))));
    }

    #[test]
    fn npcs_block() {
        let mut world = world();
        world.add_npc(Npc {
            name: "guard".into(),
            position: Position::new(128, 64),
            solid_area: Rect::new(8, 16, 32, 32),
        });
        assert!(world.check(world.solid_rect_at(Position::new(128, 64))));
        assert!(!world.check(world.solid_rect_at(Position::new(64, 128))));
    }

    #[test]
    fn builtins_read_live_state() {
        let mut world = world();
        assert_eq!(world.read(Builtin::X), 64);
        assert_eq!(world.read(Builtin::Health), 5);
        world.set_position(Position::new(0, 192));
        world.damage(2);
        assert_eq!(world.read(Builtin::Y), 192);
        assert_eq!(world.read(Builtin::Health), 3);
    }

    #[test]
    fn print_updates_message_bar() {
        let mut world = world();
        world.show("hello");
        world.show("again");
        assert_eq!(world.messages().current(), Some("again"));
        assert_eq!(world.messages().history().len(), 2);
        world.messages_mut().hide();
        assert_eq!(world.messages().current(), None);
    }
}
