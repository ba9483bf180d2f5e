//! # Diagnostics
//!
//! Where overrun notifications go. The tick handler reports through a
//! [`DiagnosticSink`] so the firmware can log over RTT while tests count.

/// Receiver for soft scheduling diagnostics.
///
/// Called from interrupt context: implementations must be short and must
/// not block.
pub trait DiagnosticSink {
    /// A tick fired before the previous one was consumed.
    ///
    /// `tick` is the sequence number of the firing that collided, `total`
    /// the number of overruns seen so far.
    fn overrun(&self, tick: u32, total: u32);
}

/// Discards every notification.
impl DiagnosticSink for () {
    #[inline]
    fn overrun(&self, _tick: u32, _total: u32) {}
}

/// Logs overruns as `defmt` warnings.
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn overrun(&self, tick: u32, total: u32) {
        defmt::warn!(
            "tick {=u32} fired before task processing finished ({=u32} overruns)",
            tick,
            total
        );
    }
}
