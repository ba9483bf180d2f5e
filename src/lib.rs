//! # RIOS: Cooperative Periodic Task Scheduler
//!
//! A timer-driven, run-to-completion scheduler for ARM Cortex-M4
//! microcontrollers, in the style of the RIOS scheduler from
//! "Programming Embedded Systems".
//!
//! ## Overview
//!
//! A fixed table of periodic tasks is dispatched from the main loop at
//! integer multiples of a base tick. A hardware timer marks each tick by
//! setting a flag; the main loop walks the table, runs whatever is due, and
//! sleeps until the flag is set again. There is no preemption and no
//! context switching: tasks run one after another on the main stack.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │             Application Tasks (blink.rs, main.rs)       │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel (kernel.rs)                      │
//! │        TICK · on_tick_interrupt() · run()               │
//! ├──────────────────────────┬─────────────────────────────┤
//! │  Scheduler Loop          │  Tick Source                │
//! │  scheduler.rs            │  tick.rs · diag.rs          │
//! │  ─ dispatch_pass()       │  ─ on_fire()                │
//! │  ─ idle_wait()           │  ─ overrun reporting        │
//! ├──────────────────────────┴─────────────────────────────┤
//! │        Task Model (task.rs) · Config (config.rs)        │
//! │        Sync Primitives (sync.rs)                        │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │          SysTick · WFI idle                             │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing
//!
//! With a 200 ms base interval, a 200 ms task and a 1000 ms task:
//!
//! | Pass | 0 | 1 | 2 | 3 | 4 | 5 | 6 | ... |
//! |------|---|---|---|---|---|---|---|-----|
//! | 200 ms task  | ✓ | ✓ | ✓ | ✓ | ✓ | ✓ | ✓ | ... |
//! | 1000 ms task | ✓ |   |   |   |   | ✓ |   | ... |
//!
//! If a pass takes longer than the base interval, the next tick finds the
//! flag still set and an overrun is reported. The schedule is not corrupted;
//! the late tasks simply run late.
//!
//! ## Memory Model
//!
//! - **No heap**: the task table is a fixed-size array inside `Scheduler`
//! - **One shared datum**: the atomic pending-tick flag in `kernel::TICK`
//! - **Critical sections**: `critical-section` (backed by `cortex-m` on
//!   target) for the interrupt check-then-set and the race-free sleep

#![no_std]

pub mod config;
pub mod task;
pub mod tick;
pub mod diag;
pub mod scheduler;
pub mod blink;
#[cfg(target_arch = "arm")]
pub mod arch;
pub mod kernel;
pub mod sync;
