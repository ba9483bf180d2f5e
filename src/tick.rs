//! # Tick Source
//!
//! The interrupt-side half of the scheduler. A hardware timer fires once per
//! base interval; its handler calls [`TickFlag::on_fire`], which sets the
//! pending-tick flag for the main loop to consume.
//!
//! ## Flag Protocol
//!
//! ```text
//!   interrupt context                 main context
//!   ─────────────────                 ────────────
//!   on_fire():                        dispatch pass
//!     pending? ── yes ──► overrun     clear()
//!        │                            while !is_pending() { sleep }
//!        no
//!        ▼
//!     pending = true  ───────────────►  (wakes)
//! ```
//!
//! Each context owns one transition: the interrupt only sets, the main loop
//! only clears. The flag is written with `Release` and read with `Acquire`.
//! Only loads and stores are used, so the protocol also works on cores
//! without compare-and-swap.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::ConfigError;
use crate::diag::DiagnosticSink;
use crate::sync;

// ---------------------------------------------------------------------------
// Fire outcome
// ---------------------------------------------------------------------------

/// What a single firing of the tick source did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fire {
    /// The flag was clear and is now set.
    Tick,
    /// The flag was still set from the previous tick. It stays set and an
    /// overrun has been reported.
    Overrun,
}

// ---------------------------------------------------------------------------
// Pending-tick flag
// ---------------------------------------------------------------------------

/// The pending-tick flag shared between the tick interrupt and the main loop,
/// plus counters for diagnostics.
///
/// Intended to live in a `static`; every method takes `&self`.
pub struct TickFlag {
    /// Set by the interrupt, cleared by the main loop.
    pending: AtomicBool,

    /// Total firings since the last reset. Written by the interrupt only.
    fired: AtomicU32,

    /// Firings that found the flag still set. Written by the interrupt only.
    overruns: AtomicU32,
}

impl TickFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            fired: AtomicU32::new(0),
            overruns: AtomicU32::new(0),
        }
    }

    /// Interrupt-side entry: called once per hardware tick.
    ///
    /// Sets the flag, or reports an overrun through `sink` if the previous
    /// tick was never consumed. Bounded time, never blocks, never touches
    /// the task table.
    pub fn on_fire<S: DiagnosticSink + ?Sized>(&self, sink: &S) -> Fire {
        let (outcome, seq, total) = sync::critical_section(|_cs| {
            let seq = self.fired.load(Ordering::Relaxed).wrapping_add(1);
            self.fired.store(seq, Ordering::Relaxed);

            if self.pending.load(Ordering::Acquire) {
                let total = self.overruns.load(Ordering::Relaxed).wrapping_add(1);
                self.overruns.store(total, Ordering::Relaxed);
                (Fire::Overrun, seq, total)
            } else {
                self.pending.store(true, Ordering::Release);
                (Fire::Tick, seq, 0)
            }
        });

        if outcome == Fire::Overrun {
            sink.overrun(seq, total);
        }
        outcome
    }

    /// Whether a tick is waiting to be consumed.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Main-side: consume the current tick.
    #[inline]
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }

    /// Drop any stale pending tick and zero the counters. Called while the
    /// tick interrupt is not yet armed.
    pub fn reset(&self) {
        self.pending.store(false, Ordering::Release);
        self.fired.store(0, Ordering::Relaxed);
        self.overruns.store(0, Ordering::Relaxed);
    }

    /// Number of firings since the last reset.
    #[inline]
    pub fn fired(&self) -> u32 {
        self.fired.load(Ordering::Relaxed)
    }

    /// Number of overruns since the last reset.
    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Platform seams
// ---------------------------------------------------------------------------

/// Hardware that raises the tick interrupt.
pub trait TickSource {
    /// Program the periodic interrupt to fire every `base_interval_ms` and
    /// arm it. Called once, before interrupts are enabled.
    fn configure(&mut self, base_interval_ms: u32) -> Result<(), ConfigError>;

    /// Globally enable interrupts. After this the tick handler may run.
    fn enable_interrupts(&mut self);
}

/// Low-power wait between dispatch passes.
pub trait Idle {
    /// Suspend until an interrupt arrives, unless `tick` is already pending.
    ///
    /// May return on any interrupt; the scheduler re-checks the flag and
    /// calls again if no tick arrived.
    fn sleep(&mut self, tick: &TickFlag);
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
