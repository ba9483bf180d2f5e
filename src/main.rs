//! # RIOS Example Firmware
//!
//! Runs the two LED tasks on a 200 ms SysTick base interval:
//!
//! | Task | Period | Table slot | Behavior |
//! |------|--------|------------|----------|
//! | `Sequence` | 200 ms | 0 | Walks one lit LED across three outputs |
//! | `Toggle` | 1000 ms | 1 | Blinks one output |
//!
//! Both run on the first pass. After that `Sequence` runs on every tick and
//! `Toggle` on every fifth; on ticks where both are due `Sequence` runs
//! first.
//!
//! Overruns (a pass still running when the next tick fires) are logged over
//! RTT as warnings.

#![no_std]
#![no_main]

use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use panic_halt as _;

use rios::blink::{Sequence, Toggle};
use rios::config::{BASE_INTERVAL_MS, SEQUENCE_PERIOD_MS, TASK_COUNT, TOGGLE_PERIOD_MS};
use rios::diag::DefmtSink;
use rios::kernel;
use rios::scheduler::Scheduler;
use rios::task::Task;

// ---------------------------------------------------------------------------
// Tick interrupt
// ---------------------------------------------------------------------------

/// SysTick exception handler. Fires once per base interval.
#[exception]
fn SysTick() {
    kernel::on_tick_interrupt(&DefmtSink);
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Firmware entry point. Builds the task table and hands it to the
/// scheduler. Does not return.
#[entry]
fn main() -> ! {
    // Take ownership of core peripherals
    let cp = cortex_m::Peripherals::take().expect("core peripherals already taken");

    defmt::info!("rios: {=u32} ms base interval", BASE_INTERVAL_MS);

    let mut sequence = Sequence::new();
    let mut toggle = Toggle::new();

    // Table order is dispatch priority.
    let tasks: [Task<'_>; TASK_COUNT] = [
        Task::new(SEQUENCE_PERIOD_MS, &mut sequence),
        Task::new(TOGGLE_PERIOD_MS, &mut toggle),
    ];

    let scheduler =
        Scheduler::new(BASE_INTERVAL_MS, tasks).expect("task periods must fit the base interval");

    // Only returns if SysTick cannot count the base interval.
    let err = kernel::run(scheduler, cp.SYST);
    panic!("scheduler failed to start: {}", err);
}
