//! # RIOS Configuration
//!
//! Compile-time constants for the tick source and the task table, plus the
//! error type reported when a table does not fit the base interval.
//! Nothing here is loaded at runtime.

use core::fmt;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
/// SysTick counts core clock cycles, so this fixes the tick resolution.
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Largest value the 24-bit SysTick reload register can hold.
pub const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Core clock cycles per millisecond.
pub const CYCLES_PER_MS: u32 = SYSTEM_CLOCK_HZ / 1000;

/// Longest base interval SysTick can count, in milliseconds.
pub const MAX_BASE_INTERVAL_MS: u32 = (SYST_RELOAD_MAX + 1) / CYCLES_PER_MS;

/// Period of the LED sequence task in milliseconds.
pub const SEQUENCE_PERIOD_MS: u32 = 200;

/// Period of the LED toggle task in milliseconds.
pub const TOGGLE_PERIOD_MS: u32 = 1000;

/// Number of entries in the firmware's task table.
pub const TASK_COUNT: usize = 2;

/// Base tick interval in milliseconds: the greatest common divisor of every
/// task period. Every period must be an integer multiple of it.
pub const BASE_INTERVAL_MS: u32 = gcd_of(&[SEQUENCE_PERIOD_MS, TOGGLE_PERIOD_MS]);

const _: () = assert!(BASE_INTERVAL_MS > 0, "base interval must be positive");
const _: () = assert!(
    SEQUENCE_PERIOD_MS % BASE_INTERVAL_MS == 0 && TOGGLE_PERIOD_MS % BASE_INTERVAL_MS == 0,
    "task periods must be multiples of the base interval"
);
const _: () = assert!(
    systick_reload(BASE_INTERVAL_MS).is_some(),
    "base interval does not fit the SysTick reload register"
);

/// SysTick reload value for a base interval, or `None` if the 24-bit
/// counter cannot express it (zero, too long, or overflowing).
pub const fn systick_reload(base_interval_ms: u32) -> Option<u32> {
    let cycles = match CYCLES_PER_MS.checked_mul(base_interval_ms) {
        Some(cycles) if cycles > 0 => cycles,
        _ => return None,
    };
    let reload = cycles - 1;
    if reload <= SYST_RELOAD_MAX {
        Some(reload)
    } else {
        None
    }
}

/// Greatest common divisor of `a` and `b`. `gcd(0, b) == b`.
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Greatest common divisor of a list of periods. Zero for an empty list.
pub const fn gcd_of(periods: &[u32]) -> u32 {
    let mut acc = 0;
    let mut i = 0;
    while i < periods.len() {
        acc = gcd(acc, periods[i]);
        i += 1;
    }
    acc
}

/// A task table or tick interval that cannot be scheduled.
///
/// These are programming errors caught before the loop starts; none of
/// them can occur once the scheduler is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The base interval is zero.
    ZeroBaseInterval,
    /// The task at `index` has a zero period.
    ZeroPeriod { index: usize },
    /// The task at `index` has a period that is not a multiple of `base`.
    PeriodNotMultiple { index: usize, period: u32, base: u32 },
    /// The tick hardware cannot count an interval of `base` ms;
    /// `max` is the longest interval it supports.
    IntervalOutOfRange { base: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::ZeroBaseInterval => f.write_str("base interval is zero"),
            ConfigError::ZeroPeriod { index } => write!(f, "task {} has a zero period", index),
            ConfigError::PeriodNotMultiple { index, period, base } => write!(
                f,
                "task {} period {} ms is not a multiple of the {} ms base interval",
                index, period, base
            ),
            ConfigError::IntervalOutOfRange { base, max } => write!(
                f,
                "base interval {} ms exceeds the {} ms the tick hardware can count",
                base, max
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(200, 1000), 200);
        assert_eq!(gcd(300, 500), 100);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(0, 40), 40);
    }

    #[test]
    fn test_gcd_of_periods() {
        assert_eq!(gcd_of(&[]), 0);
        assert_eq!(gcd_of(&[250]), 250);
        assert_eq!(gcd_of(&[150, 450, 600]), 150);
    }

    #[test]
    fn test_systick_reload_edges() {
        assert_eq!(MAX_BASE_INTERVAL_MS, 1048);
        assert_eq!(systick_reload(200), Some(3_199_999));
        assert_eq!(systick_reload(1048), Some(16_767_999));
        assert_eq!(systick_reload(1049), None);
        assert_eq!(systick_reload(0), None);
        assert_eq!(systick_reload(u32::MAX), None);
    }

    #[test]
    fn test_firmware_base_interval() {
        assert_eq!(BASE_INTERVAL_MS, 200);
        assert_eq!(TOGGLE_PERIOD_MS / BASE_INTERVAL_MS, 5);
    }
}
