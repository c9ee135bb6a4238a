//! Session orchestrator and public API
//!
//! A [`Session`] owns the interpreter, the scheduler and the world
//! collaborator, and exposes the surface the game loop and UI call into:
//! submit a line, tick once per frame, query busy state and queue length,
//! and tune timing at runtime.

use serde::{Deserialize, Serialize};
use tracing::info;

// Submodules
pub mod action;
pub mod clock;
pub mod error;
pub mod host;
pub mod scheduler;
pub mod storage;

use crate::interpreter::{DEFAULT_MAX_REPEAT, Interpreter, ParseReport};
use clock::{Clock, SystemClock};
use error::{ConfigError, Result};
use host::{InterpreterHost, SchedulerHost};
use scheduler::{Scheduler, TickOutcome};

/// Fastest command speed level on the options panel.
pub const MAX_COMMAND_SPEED_LEVEL: u8 = 10;

/// Tunable settings for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of one tile in pixels
    pub tile_size: u32,

    /// Minimum milliseconds between dequeued actions
    pub action_delay_ms: u64,

    /// Pixels moved per tick during a move
    pub move_speed: u32,

    /// Milliseconds between walking animation frames
    pub frame_delay_ms: u64,

    /// Duration used by a bare `wait`
    pub default_wait_ms: u64,

    /// Health removed by a line containing a syntax error
    pub damage_per_error: u32,

    /// Starting and maximum health
    pub max_health: u32,

    /// Largest loop bound or walk count a line may use
    pub max_repeat: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_size: 64,
            action_delay_ms: 300,
            move_speed: 3,
            frame_delay_ms: 100,
            default_wait_ms: 1000,
            damage_per_error: 1,
            max_health: 5,
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }
}

impl SessionConfig {
    /// Reject settings the scheduler or health system cannot work with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::Zero("tile_size"));
        }
        if self.move_speed == 0 {
            return Err(ConfigError::Zero("move_speed"));
        }
        if self.damage_per_error == 0 {
            return Err(ConfigError::Zero("damage_per_error"));
        }
        if self.max_health == 0 {
            return Err(ConfigError::Zero("max_health"));
        }
        if self.max_repeat == 0 {
            return Err(ConfigError::Zero("max_repeat"));
        }
        Ok(())
    }
}

/// Action delay for an options-panel speed level (1 = slowest, 10 = fastest).
///
/// Levels outside `1..=10` are clamped.
pub fn command_speed_delay(level: u8) -> u64 {
    let level = level.clamp(1, MAX_COMMAND_SPEED_LEVEL);
    550 - 50 * u64::from(level)
}

/// The game core: interpreter, scheduler and world
pub struct Session<W> {
    config: SessionConfig,
    interpreter: Interpreter,
    scheduler: Scheduler,
    world: W,
}

impl<W: SchedulerHost + InterpreterHost> Session<W> {
    /// Create a session driven by the wall clock
    pub fn new(config: SessionConfig, world: W) -> Result<Self> {
        Self::with_clock(config, world, Box::new(SystemClock))
    }

    /// Create a session with an explicit time source
    pub fn with_clock(config: SessionConfig, world: W, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let interpreter = Interpreter::new(&config);
        let scheduler = Scheduler::new(&config, clock);
        Ok(Self {
            config,
            interpreter,
            scheduler,
            world,
        })
    }

    /// Parse and stage a line; `false` on any syntax error
    pub fn parse(&mut self, line: &str) -> bool {
        self.submit(line).success
    }

    /// Parse and stage a line, returning the detailed outcome
    pub fn submit(&mut self, line: &str) -> ParseReport {
        self.interpreter
            .submit(line, &mut self.scheduler, &mut self.world)
    }

    /// Advance one simulation frame
    pub fn tick(&mut self) -> TickOutcome {
        self.scheduler.tick(&mut self.world)
    }

    /// Whether commands are still running
    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    /// Number of queued actions
    pub fn queue_len(&self) -> usize {
        self.scheduler.queue_len()
    }

    /// Change the minimum delay between actions
    pub fn set_action_delay(&mut self, ms: u64) {
        info!(ms, "action delay changed");
        self.config.action_delay_ms = ms;
        self.scheduler.set_action_delay(ms);
    }

    /// Change the per-tick move distance (zero is clamped to one)
    pub fn set_move_speed(&mut self, pixels_per_tick: u32) {
        info!(pixels_per_tick, "move speed changed");
        self.scheduler.set_move_speed(pixels_per_tick);
        self.config.move_speed = self.scheduler.move_speed();
    }

    /// Apply an options-panel speed level and return the resulting delay
    pub fn set_command_speed_level(&mut self, level: u8) -> u64 {
        let delay = command_speed_delay(level);
        self.set_action_delay(delay);
        delay
    }

    /// Drop queued actions and stop the current move where it is
    pub fn clear(&mut self) {
        self.scheduler.clear();
    }

    /// Current settings, including runtime changes
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The scheduler, for inspection
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The world collaborator
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the world collaborator
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_levels_map_to_delays() {
        assert_eq!(command_speed_delay(1), 500);
        assert_eq!(command_speed_delay(5), 300);
        assert_eq!(command_speed_delay(10), 50);
        assert_eq!(command_speed_delay(0), 500);
        assert_eq!(command_speed_delay(42), 50);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
        let config = SessionConfig {
            tile_size: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero("tile_size")));
    }
}
