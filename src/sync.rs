//! # Synchronization Primitives
//!
//! Interrupt-safe critical section used where the tick interrupt and the
//! main loop meet. On the target the `critical-section` implementation comes
//! from `cortex-m` (single core: PRIMASK is set for the duration); on the
//! host it comes from the `std` implementation pulled in by the tests.

pub use critical_section::CriticalSection;

/// Execute a closure within a critical section (interrupts disabled).
///
/// Interrupts are disabled on entry and restored on exit. A WFI executed
/// inside the closure still wakes on a pending interrupt; the handler then
/// runs as soon as the section ends.
///
/// # Usage
/// ```ignore
/// sync::critical_section(|_cs| {
///     // check-then-set on shared state
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
