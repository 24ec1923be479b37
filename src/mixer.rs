//! Time-division color mixing.
//!
//! A receiver can only show its 8 presets. [`ColorMixer`] gets everything in
//! between by cycling red, green and blue and holding each for a time
//! proportional to its channel value, fast enough that the eye blends them.
//!
//! How fast the caller ticks decides whether that blend flickers. Each pass
//! blocks for up to `3 × 255 × quantum` plus the pulses, which is the budget
//! the caller's loop has to live with.

use crate::colors::{DiscreteColor, Rgb8};
use crate::discrete::DiscreteColorState;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// RGB target and the per-channel hold durations derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMixer {
    target: Rgb8,
    holds_us: [u32; 3],
    increment_time_us: u32,
}

impl ColorMixer {
    pub fn new(target: Rgb8, increment_time_us: u32) -> Self {
        let mut mixer = Self {
            target,
            holds_us: [0; 3],
            increment_time_us,
        };
        mixer.set_target(target);
        mixer
    }

    /// Stores the target and recomputes the holds.
    pub fn set_target(&mut self, target: Rgb8) {
        self.target = target;
        self.holds_us = [
            u32::from(target.red) * self.increment_time_us,
            u32::from(target.green) * self.increment_time_us,
            u32::from(target.blue) * self.increment_time_us,
        ];
    }

    #[inline]
    pub fn target(&self) -> Rgb8 {
        self.target
    }

    /// Red, green and blue holds in microseconds.
    #[inline]
    pub fn holds_us(&self) -> [u32; 3] {
        self.holds_us
    }

    /// Runs one red → green → blue pass, blocking for each hold.
    pub fn mix<P: OutputPin, D: DelayNs>(&self, state: &mut DiscreteColorState<P, D>) {
        let [red, green, blue] = self.holds_us;
        for (primary, hold_us) in [
            (DiscreteColor::Red, red),
            (DiscreteColor::Green, green),
            (DiscreteColor::Blue, blue),
        ] {
            state.set_color(primary);
            state.encoder().wait_us(hold_us);
        }
    }
}
