//! # Periodic Task
//!
//! Defines the task record the scheduler walks on every tick. A task is a
//! period, the time accumulated since it last ran, and an opaque action.
//!
//! ## Timing Model
//!
//! Time is virtual: the scheduler adds one base interval to every task per
//! dispatch pass, whether or not the task ran. A task is due once its
//! accumulated time reaches its period.
//!
//! ```text
//!   elapsed:  P ──dispatch──► 0 ──advance──► B ──► 2B ──► ... ──► P
//!             (due)                                             (due)
//! ```
//!
//! `elapsed` starts equal to `period`, so every task runs on the first pass.
//! Dispatch resets it to exactly zero; a late dispatch resynchronises from
//! that point instead of catching up.

use core::fmt;

// ---------------------------------------------------------------------------
// Task body
// ---------------------------------------------------------------------------

/// The work a task performs when dispatched.
///
/// Bodies run to completion on the main context with interrupts enabled.
/// They must finish in bounded time, must not block, and must not mask or
/// unmask the tick interrupt.
///
/// Any `FnMut()` closure is a task body.
pub trait TaskBody {
    /// Run one dispatch of this task.
    fn run(&mut self);
}

impl<F: FnMut()> TaskBody for F {
    #[inline]
    fn run(&mut self) {
        self()
    }
}

// ---------------------------------------------------------------------------
// Task record
// ---------------------------------------------------------------------------

/// One entry of the scheduler's task table.
///
/// The action is borrowed for the lifetime of the table, so bodies live in
/// statics or on the stack of `main` and nothing is heap allocated.
pub struct Task<'a> {
    /// Time between dispatches, in base-interval units (milliseconds).
    period: u32,

    /// Time accumulated since the last dispatch (or since construction).
    elapsed: u32,

    /// Number of times the action has run. Wraps on overflow.
    dispatches: u32,

    /// The task body.
    action: &'a mut dyn TaskBody,
}

impl<'a> Task<'a> {
    /// Create a task that is due on the very first dispatch pass.
    pub fn new(period: u32, action: &'a mut dyn TaskBody) -> Self {
        Self {
            period,
            elapsed: period,
            dispatches: 0,
            action,
        }
    }

    /// Dispatch period in milliseconds.
    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Time accumulated since the last dispatch, in milliseconds.
    #[inline]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// How many times this task has been dispatched.
    #[inline]
    pub fn dispatches(&self) -> u32 {
        self.dispatches
    }

    /// True once the accumulated time has reached the period.
    #[inline]
    pub fn is_due(&self) -> bool {
        self.elapsed >= self.period
    }

    /// Run the action and restart the period from zero.
    pub fn dispatch(&mut self) {
        self.action.run();
        self.elapsed = 0;
        self.dispatches = self.dispatches.wrapping_add(1);
    }

    /// Add one base interval to the accumulated time.
    #[inline]
    pub fn advance(&mut self, base_interval: u32) {
        self.elapsed = self.elapsed.saturating_add(base_interval);
    }

    /// One step of a dispatch pass: run the task if due, then advance its
    /// clock by `base_interval`. Returns whether the task ran.
    pub fn poll(&mut self, base_interval: u32) -> bool {
        let due = self.is_due();
        if due {
            self.dispatch();
        }
        self.advance(base_interval);
        due
    }
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("period", &self.period)
            .field("elapsed", &self.elapsed)
            .field("dispatches", &self.dispatches)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
