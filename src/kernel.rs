//! # Kernel
//!
//! The single process-wide tick flag and the entry points that tie it to
//! the hardware.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► build task bodies and the task table
//!         ├─► Scheduler::new()       ← Validate periods
//!         └─► kernel::run()          ← Never returns
//!               ├─► TICK.reset()
//!               ├─► Configure SysTick
//!               ├─► Enable interrupts
//!               └─► dispatch / clear / WFI, forever
//!
//! SysTick exception
//!   └─► kernel::on_tick_interrupt()  ← Set TICK or report overrun
//! ```

use crate::diag::DiagnosticSink;
use crate::tick::{Fire, TickFlag};

// ---------------------------------------------------------------------------
// Global tick flag
// ---------------------------------------------------------------------------

/// The pending-tick flag shared by the tick interrupt and the scheduler.
///
/// This is the only state both contexts touch. The task table lives inside
/// the `Scheduler` owned by `main` and is never reachable from here.
pub static TICK: TickFlag = TickFlag::new();

/// Interrupt-side entry: call from the tick exception handler.
#[inline]
pub fn on_tick_interrupt<S: DiagnosticSink + ?Sized>(sink: &S) -> Fire {
    TICK.on_fire(sink)
}

// ---------------------------------------------------------------------------
// Scheduler launch (ARM only)
// ---------------------------------------------------------------------------

#[cfg(target_arch = "arm")]
pub use self::launch::run;

#[cfg(target_arch = "arm")]
mod launch {
    use cortex_m::peripheral::SYST;

    use super::TICK;
    use crate::arch::cortex_m4::{SysTickSource, WaitForInterrupt};
    use crate::config::ConfigError;
    use crate::scheduler::Scheduler;

    /// Arm SysTick and run `scheduler` forever. **Does not return.**
    ///
    /// # Returns
    /// Never on success. `Err` only if SysTick cannot count the scheduler's
    /// base interval; interrupts are still disabled in that case.
    pub fn run<const N: usize>(scheduler: Scheduler<'_, N>, syst: SYST) -> ConfigError {
        let mut source = SysTickSource::new(syst);
        let mut idle = WaitForInterrupt;

        match scheduler.run(&TICK, &mut source, &mut idle) {
            Ok(never) => match never {},
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("tick source rejected configuration: {}", err);
                err
            }
        }
    }
}
