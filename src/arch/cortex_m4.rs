//! # Cortex-M4 Port Layer
//!
//! SysTick as the tick source and WFI as the idle wait.
//!
//! ## SysTick
//!
//! SysTick counts down from its reload value at the core clock and raises
//! the `SysTick` exception each time it wraps. The reload register is 24
//! bits wide, which bounds the longest base interval:
//!
//! ```text
//!   reload = SYSTEM_CLOCK_HZ / 1000 * base_interval_ms - 1  <=  0x00FF_FFFF
//!   16 MHz core clock  ->  at most 1048 ms
//! ```
//!
//! ## Sleeping Without Losing a Tick
//!
//! Checking the flag and then executing WFI is racy: a tick landing between
//! the two would be slept through. The check and the WFI run with
//! interrupts masked instead. WFI still wakes on a pending interrupt while
//! PRIMASK is set, and the handler runs as soon as the mask is lifted.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use crate::config::{systick_reload, ConfigError, MAX_BASE_INTERVAL_MS};
use crate::sync;
use crate::tick::{Idle, TickFlag, TickSource};

// ---------------------------------------------------------------------------
// SysTick tick source
// ---------------------------------------------------------------------------

/// The SysTick timer driving the scheduler tick.
pub struct SysTickSource {
    syst: SYST,
}

impl SysTickSource {
    /// Take ownership of the SysTick peripheral. The counter is left stopped
    /// until [`TickSource::configure`].
    pub fn new(mut syst: SYST) -> Self {
        syst.disable_interrupt();
        syst.disable_counter();
        Self { syst }
    }
}

impl TickSource for SysTickSource {
    fn configure(&mut self, base_interval_ms: u32) -> Result<(), ConfigError> {
        if base_interval_ms == 0 {
            return Err(ConfigError::ZeroBaseInterval);
        }
        let reload = systick_reload(base_interval_ms).ok_or(ConfigError::IntervalOutOfRange {
            base: base_interval_ms,
            max: MAX_BASE_INTERVAL_MS,
        })?;

        self.syst.set_reload(reload);
        self.syst.clear_current();
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.enable_counter();
        self.syst.enable_interrupt();
        Ok(())
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: the only shared state the tick handler touches is the
        // atomic `TickFlag`, which is fully initialised by now.
        unsafe { cortex_m::interrupt::enable() }
    }
}

// ---------------------------------------------------------------------------
// Idle
// ---------------------------------------------------------------------------

/// Sleeps with WFI until the next interrupt.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitForInterrupt;

impl Idle for WaitForInterrupt {
    #[inline]
    fn sleep(&mut self, tick: &TickFlag) {
        sync::critical_section(|_cs| {
            if !tick.is_pending() {
                cortex_m::asm::wfi();
            }
        });
    }
}
