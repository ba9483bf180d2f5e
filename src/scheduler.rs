//! # Scheduler
//!
//! The main-context half of RIOS: owns the task table, advances virtual time
//! by one base interval per tick, dispatches due tasks in table order, and
//! sleeps between ticks.
//!
//! ## Scheduling Algorithm
//!
//! Once, at start-up:
//! 1. Drop any stale pending tick, program the tick source, enable interrupts.
//!
//! Then forever:
//! 1. **Dispatch pass**: walk the table in order; run every task whose
//!    elapsed time has reached its period and reset it to zero; add one base
//!    interval to every task, dispatched or not.
//! 2. **Consume** the tick: clear the pending flag.
//! 3. **Idle**: sleep until the tick interrupt sets the flag again.
//!
//! The first pass runs immediately after start-up without waiting for a
//! tick, and every task is due on it.
//!
//! ## Ordering
//!
//! Table order is priority order. Tasks due on the same pass run strictly in
//! table order; a long task delays later ones but never skips them. There is
//! no catch-up: a task whose pass was delayed runs once and restarts its
//! period from that pass.

use core::convert::Infallible;

use crate::config::ConfigError;
use crate::task::Task;
use crate::tick::{Idle, TickFlag, TickSource};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that a task table can be driven by a tick of `base_interval` ms.
///
/// Every period must be a positive multiple of a positive base interval.
/// Reports the first offending task.
pub fn validate(base_interval: u32, tasks: &[Task<'_>]) -> Result<(), ConfigError> {
    if base_interval == 0 {
        return Err(ConfigError::ZeroBaseInterval);
    }

    for (index, task) in tasks.iter().enumerate() {
        let period = task.period();
        if period == 0 {
            return Err(ConfigError::ZeroPeriod { index });
        }
        if period % base_interval != 0 {
            return Err(ConfigError::PeriodNotMultiple {
                index,
                period,
                base: base_interval,
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// The scheduler state: a fixed-size task table and the base interval.
///
/// ## Design Notes
///
/// - The table is an inline array sized at compile time (no heap)
/// - Only the main context touches the table; the tick interrupt sees
///   nothing but the [`TickFlag`]
/// - The table is fixed after construction: no add or remove
pub struct Scheduler<'a, const N: usize> {
    /// Task table. Index order is dispatch priority.
    tasks: [Task<'a>; N],

    /// Base tick interval in milliseconds.
    base_interval: u32,

    /// Completed dispatch passes. Wraps on overflow.
    passes: u32,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    /// Build a scheduler over `tasks`, ticking every `base_interval` ms.
    ///
    /// # Returns
    /// - `Ok(scheduler)` if every period is a positive multiple of the base
    /// - `Err(ConfigError)` naming the first misconfigured entry
    pub fn new(base_interval: u32, tasks: [Task<'a>; N]) -> Result<Self, ConfigError> {
        if let Err(err) = validate(base_interval, &tasks) {
            #[cfg(feature = "defmt")]
            defmt::error!("rejecting task table: {}", err);
            return Err(err);
        }

        Ok(Self {
            tasks,
            base_interval,
            passes: 0,
        })
    }

    /// Base tick interval in milliseconds.
    #[inline]
    pub fn base_interval(&self) -> u32 {
        self.base_interval
    }

    /// Number of dispatch passes completed.
    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// The task table, in dispatch order.
    #[inline]
    pub fn tasks(&self) -> &[Task<'a>] {
        &self.tasks
    }

    /// One-time setup before the loop.
    ///
    /// Clears any stale tick, programs `source` with the base interval, and
    /// enables interrupts. Fails only if the hardware cannot count the
    /// interval, in which case interrupts stay disabled.
    pub fn start<T>(&mut self, tick: &TickFlag, source: &mut T) -> Result<(), ConfigError>
    where
        T: TickSource + ?Sized,
    {
        tick.reset();
        source.configure(self.base_interval)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "scheduler armed: {=usize} tasks, {=u32} ms base interval",
            N,
            self.base_interval
        );

        source.enable_interrupts();
        Ok(())
    }

    /// Walk the table once, running every due task.
    ///
    /// Returns how many tasks ran.
    pub fn dispatch_pass(&mut self) -> usize {
        let base = self.base_interval;
        let mut ran = 0;

        for (_index, task) in self.tasks.iter_mut().enumerate() {
            if task.poll(base) {
                #[cfg(feature = "defmt")]
                defmt::trace!("pass {=u32}: dispatched task {=usize}", self.passes, _index);
                ran += 1;
            }
        }

        self.passes = self.passes.wrapping_add(1);
        ran
    }

    /// Sleep until the tick interrupt sets the pending flag.
    ///
    /// Wakes caused by other interrupts go straight back to sleep.
    pub fn idle_wait<I>(&self, tick: &TickFlag, idle: &mut I)
    where
        I: Idle + ?Sized,
    {
        while !tick.is_pending() {
            idle.sleep(tick);
        }
    }

    /// One iteration of the steady-state loop: dispatch, consume the tick,
    /// idle until the next one. Returns how many tasks ran.
    pub fn cycle<I>(&mut self, tick: &TickFlag, idle: &mut I) -> usize
    where
        I: Idle + ?Sized,
    {
        let ran = self.dispatch_pass();
        tick.clear();
        self.idle_wait(tick, idle);
        ran
    }

    /// Start the tick source and run the loop forever.
    ///
    /// Only returns if start-up fails.
    pub fn run<T, I>(
        mut self,
        tick: &TickFlag,
        source: &mut T,
        idle: &mut I,
    ) -> Result<Infallible, ConfigError>
    where
        T: TickSource + ?Sized,
        I: Idle + ?Sized,
    {
        self.start(tick, source)?;
        loop {
            self.cycle(tick, idle);
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
