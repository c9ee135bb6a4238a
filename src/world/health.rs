//! Heart-based health resource.

use serde::{Deserialize, Serialize};

/// Agent health; reaching zero is permanent until [`HealthSystem::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSystem {
    max: u32,
    current: u32,
    dead: bool,
}

impl HealthSystem {
    /// Full health out of `max`.
    pub fn new(max: u32) -> Self {
        Self {
            max,
            current: max,
            dead: max == 0,
        }
    }

    /// Remove `amount` health, clamping at zero. Returns `false` if already dead.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.dead = true;
        }
        true
    }

    /// Refill and revive.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = self.max == 0;
    }

    /// Remaining health.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Health when full.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Whether health has run out.
    pub fn is_dead(&self) -> bool {
        self.dead
    }
}
