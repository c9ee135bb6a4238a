//! Frame-synchronous action scheduler and motion state machine
//!
//! Holds the FIFO of staged actions, releases them under a minimum-delay gate,
//! and drives at most one interpolated one-tile move at a time.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::SessionConfig;
use super::action::{Direction, PrimitiveAction};
use super::clock::Clock;
use super::host::{Position, SchedulerHost};

/// An in-flight one-tile move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    /// Position when the move started.
    pub origin: Position,
    /// Tile-aligned destination, exactly one tile from `origin`.
    pub target: Position,
}

/// Delay gate between successive dequeues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Minimum milliseconds between two dequeues.
    pub action_delay_ms: u64,
    /// Timestamp of the last dequeue (pushed forward by `Wait`). `None` means
    /// the next action is eligible immediately.
    pub last_action_ms: Option<u64>,
}

impl SchedulerTiming {
    fn gate_open(&self, now: u64) -> bool {
        match self.last_action_ms {
            None => true,
            Some(last) => now >= last && now - last >= self.action_delay_ms,
        }
    }
}

/// What a single [`Scheduler::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing queued and nothing moving.
    Idle,
    /// Actions are queued but the delay gate is still closed.
    Gated,
    /// The in-flight move advanced by one sub-tile step.
    Moved,
    /// The in-flight move snapped onto its target.
    Arrived,
    /// The in-flight move was aborted by a collision.
    Blocked,
    /// A move was dequeued but its destination was blocked; it was dropped.
    Discarded(Direction),
    /// An action was dequeued and executed (moves: motion started).
    Executed(PrimitiveAction),
}

/// Tick-driven action scheduler
pub struct Scheduler {
    /// Staged actions in enqueue order.
    queue: VecDeque<PrimitiveAction>,

    /// Current move, if any.
    motion: Option<MotionState>,

    /// Delay gate state.
    timing: SchedulerTiming,

    /// Set once the gate fires; cleared when the scheduler goes idle.
    executing: bool,

    /// Pixels moved per tick.
    move_speed: u32,

    /// Length of one tile in pixels.
    tile_size: u32,

    /// Milliseconds between walking animation frames.
    frame_delay_ms: u64,

    /// Timestamp of the last animation frame change.
    last_frame_ms: Option<u64>,

    clock: Box<dyn Clock>,
}

impl Scheduler {
    /// Create a scheduler from session settings and a time source.
    pub fn new(config: &SessionConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            queue: VecDeque::new(),
            motion: None,
            timing: SchedulerTiming {
                action_delay_ms: config.action_delay_ms,
                last_action_ms: None,
            },
            executing: false,
            move_speed: config.move_speed.max(1),
            tile_size: config.tile_size.max(1),
            frame_delay_ms: config.frame_delay_ms,
            last_frame_ms: None,
            clock,
        }
    }

    /// Stage an action at the back of the queue and return how many steps it adds.
    ///
    /// A `WalkN` stays one entry and is unrolled a step at a time as it is
    /// dequeued; a zero-length walk is dropped.
    pub fn stage(&mut self, action: PrimitiveAction) -> usize {
        let steps = action.step_count();
        if steps > 0 {
            debug!(action = ?action, steps, "staged action");
            self.queue.push_back(action);
        }
        steps
    }

    /// Advance one frame.
    pub fn tick<H: SchedulerHost + ?Sized>(&mut self, host: &mut H) -> TickOutcome {
        if let Some(motion) = self.motion {
            return self.advance_motion(motion, host);
        }

        if self.queue.is_empty() {
            self.executing = false;
            return TickOutcome::Idle;
        }

        let now = self.clock.now_ms();
        if !self.timing.gate_open(now) {
            return TickOutcome::Gated;
        }

        let Some(action) = self.queue.pop_front() else {
            return TickOutcome::Idle;
        };
        self.executing = true;
        self.timing.last_action_ms = Some(now);
        self.execute(action, now, host)
    }

    fn execute<H: SchedulerHost + ?Sized>(
        &mut self,
        action: PrimitiveAction,
        now: u64,
        host: &mut H,
    ) -> TickOutcome {
        match action {
            PrimitiveAction::MoveStep(direction) => {
                host.set_facing(direction);
                let origin = host.position();
                let (dx, dy) = direction.delta();
                let tile = self.tile_len();
                let target = origin.offset(dx * tile, dy * tile);
                if host.check(host.solid_rect_at(target)) {
                    debug!(%direction, %target, "move discarded, destination blocked");
                    return TickOutcome::Discarded(direction);
                }
                debug!(%direction, %origin, %target, "motion started");
                self.motion = Some(MotionState { origin, target });
                TickOutcome::Executed(action)
            }
            PrimitiveAction::WalkN(direction, count) => {
                if count > 1 {
                    self.queue.push_front(PrimitiveAction::WalkN(direction, count - 1));
                }
                self.execute(PrimitiveAction::MoveStep(direction), now, host)
            }
            PrimitiveAction::Turn(direction) => {
                host.set_facing(direction);
                TickOutcome::Executed(action)
            }
            PrimitiveAction::Wait(duration) => {
                self.timing.last_action_ms = Some(now.saturating_add(duration));
                debug!(duration, "queue held");
                TickOutcome::Executed(action)
            }
            PrimitiveAction::Print(ref message) => {
                host.show(message);
                TickOutcome::Executed(action)
            }
        }
    }

    fn advance_motion<H: SchedulerHost + ?Sized>(
        &mut self,
        motion: MotionState,
        host: &mut H,
    ) -> TickOutcome {
        let current = host.position();
        let dx = motion.target.x - current.x;
        let dy = motion.target.y - current.y;
        let speed = self.speed_len();

        if dx.abs() + dy.abs() <= speed {
            host.set_position(motion.target);
            self.motion = None;
            debug!(target = %motion.target, "motion arrived");
            return TickOutcome::Arrived;
        }

        let step_x = dx.signum() * dx.abs().min(speed);
        let step_y = dy.signum() * dy.abs().min(speed);
        let ahead = current.offset(step_x, step_y);
        if host.check(host.solid_rect_at(ahead)) {
            self.motion = None;
            debug!(at = %current, "motion aborted by collision");
            return TickOutcome::Blocked;
        }

        host.set_position(ahead);
        let now = self.clock.now_ms();
        let frame_due = match self.last_frame_ms {
            None => true,
            Some(last) => now.saturating_sub(last) > self.frame_delay_ms,
        };
        if frame_due {
            host.advance_frame();
            self.last_frame_ms = Some(now);
        }
        TickOutcome::Moved
    }

    /// Empty the queue, cancel motion where it stands, and reopen the gate.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() || self.motion.is_some() {
            info!(
                dropped = self.queue_len(),
                moving = self.motion.is_some(),
                "scheduler cleared"
            );
        }
        self.queue.clear();
        self.motion = None;
        self.executing = false;
        self.timing.last_action_ms = None;
    }

    /// Whether queued, moving, or still inside an active run.
    pub fn is_busy(&self) -> bool {
        !self.queue.is_empty() || self.motion.is_some() || self.executing
    }

    /// Number of single-step actions waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.iter().map(PrimitiveAction::step_count).sum()
    }

    /// Queued single-step actions, front first, with walks unrolled.
    pub fn pending(&self) -> impl Iterator<Item = PrimitiveAction> + '_ {
        self.queue.iter().flat_map(PrimitiveAction::steps)
    }

    /// Current move, if one is in flight.
    pub fn motion(&self) -> Option<&MotionState> {
        self.motion.as_ref()
    }

    /// Delay gate state.
    pub fn timing(&self) -> &SchedulerTiming {
        &self.timing
    }

    /// Change the minimum delay between dequeues.
    pub fn set_action_delay(&mut self, ms: u64) {
        self.timing.action_delay_ms = ms;
    }

    /// Change the per-tick move distance. Zero is clamped to one pixel.
    pub fn set_move_speed(&mut self, pixels_per_tick: u32) {
        if pixels_per_tick == 0 {
            warn!("move speed 0 would never arrive, using 1");
        }
        self.move_speed = pixels_per_tick.max(1);
    }

    /// Per-tick move distance in pixels.
    pub fn move_speed(&self) -> u32 {
        self.move_speed
    }

    fn tile_len(&self) -> i32 {
        i32::try_from(self.tile_size).unwrap_or(i32::MAX)
    }

    fn speed_len(&self) -> i32 {
        i32::try_from(self.move_speed).unwrap_or(i32::MAX)
    }
}
