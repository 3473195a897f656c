//! Cooperative key-repeat timer for held arrow keys.
//!
//! The scheduler never spawns threads or registers callbacks. The host polls
//! it from whatever timer primitive its event loop offers, using
//! [`KeyRepeatScheduler::deadline`] to know when the next poll is due.

use std::time::{Duration, Instant};

/// Delay between the key press and the first repeated step.
pub const INITIAL_DELAY: Duration = Duration::from_millis(400);
/// Delay between subsequent repeated steps.
pub const REPEAT_DELAY: Duration = Duration::from_millis(30);

/// Direction a keyboard step moves the selected knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepDirection {
    /// Toward `min` (Left arrow).
    Decrease,
    /// Toward `max` (Right arrow).
    Increase,
}

impl StepDirection {
    /// `-1.0` or `1.0`.
    pub fn sign(self) -> f64 {
        match self {
            StepDirection::Decrease => -1.0,
            StepDirection::Increase => 1.0,
        }
    }
}

/// Timing of the repeat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatDelays {
    /// Wait before the first repeated step.
    pub initial: Duration,
    /// Wait between repeated steps.
    pub repeat: Duration,
}

impl Default for RepeatDelays {
    fn default() -> Self {
        Self {
            initial: INITIAL_DELAY,
            repeat: REPEAT_DELAY,
        }
    }
}

/// One firing of the repeat timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTick {
    /// Direction of the step.
    pub direction: StepDirection,
    /// Number of grid steps to move.
    pub multiplier: u32,
    /// Set on the first firing after [`KeyRepeatScheduler::schedule`].
    pub first: bool,
}

#[derive(Debug, Clone, Copy)]
struct ArmedRepeat {
    direction: StepDirection,
    multiplier: u32,
    deadline: Instant,
    first: bool,
}

/// Produces repeated step ticks while a directional key is held.
///
/// At most one sequence is live: scheduling again replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct KeyRepeatScheduler {
    delays: RepeatDelays,
    armed: Option<ArmedRepeat>,
}

impl KeyRepeatScheduler {
    /// Creates an idle scheduler with the given delays.
    pub fn new(delays: RepeatDelays) -> Self {
        Self {
            delays,
            armed: None,
        }
    }

    /// Current delays.
    pub fn delays(&self) -> RepeatDelays {
        self.delays
    }

    /// Replaces the delays. A running sequence keeps its current deadline.
    pub fn set_delays(&mut self, delays: RepeatDelays) {
        self.delays = delays;
    }

    /// Cancels any live sequence and arms a new one that first fires
    /// `initial` after `now`.
    pub fn schedule(&mut self, direction: StepDirection, multiplier: u32, now: Instant) {
        if self.armed.is_some() {
            tracing::trace!("replacing live key repeat sequence");
        }
        self.armed = Some(ArmedRepeat {
            direction,
            multiplier,
            deadline: now + self.delays.initial,
            first: true,
        });
    }

    /// Stops the live sequence. Returns whether one was running; cancelling
    /// an idle scheduler is a no-op.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Whether a sequence is armed.
    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    /// When the next tick is due, if a sequence is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.deadline)
    }

    /// Fires the timer if its deadline has passed and re-arms it
    /// `repeat` after `now`.
    ///
    /// A late poll fires once; missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> Option<RepeatTick> {
        let repeat = self.delays.repeat;
        let armed = self.armed.as_mut()?;
        if now < armed.deadline {
            return None;
        }
        let tick = RepeatTick {
            direction: armed.direction,
            multiplier: armed.multiplier,
            first: armed.first,
        };
        armed.first = false;
        armed.deadline = now + repeat;
        Some(tick)
    }
}
