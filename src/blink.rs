//! # Demo Task Bodies
//!
//! The two LED tasks the firmware schedules. Both hold their output state in
//! software; the first dispatch initialises the outputs and every later
//! dispatch advances them.
//!
//! | Task | Period | Behaviour |
//! |------|--------|-----------|
//! | [`Sequence`] | 200 ms | Rotates a single lit output across three |
//! | [`Toggle`] | 1000 ms | Inverts one output |

use crate::task::TaskBody;

/// Rotates a single `true` across three outputs.
#[derive(Debug, Default)]
pub struct Sequence {
    started: bool,
    outputs: [bool; 3],
}

impl Sequence {
    pub const fn new() -> Self {
        Self {
            started: false,
            outputs: [false; 3],
        }
    }

    /// Current output levels, first output first.
    pub fn outputs(&self) -> [bool; 3] {
        self.outputs
    }
}

impl TaskBody for Sequence {
    fn run(&mut self) {
        if !self.started {
            self.started = true;
            self.outputs = [true, false, false];
        } else {
            // Each output takes its predecessor's level; the last wraps.
            self.outputs.rotate_right(1);
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("sequence -> {}", self.outputs);
    }
}

/// Inverts a single output on every dispatch after the first.
#[derive(Debug, Default)]
pub struct Toggle {
    started: bool,
    level: bool,
}

impl Toggle {
    pub const fn new() -> Self {
        Self {
            started: false,
            level: false,
        }
    }

    /// Current output level.
    pub fn level(&self) -> bool {
        self.level
    }
}

impl TaskBody for Toggle {
    fn run(&mut self) {
        if !self.started {
            self.started = true;
            self.level = false;
        } else {
            self.level = !self.level;
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("toggle -> {}", self.level);
    }
}
