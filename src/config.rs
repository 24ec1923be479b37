//! Timing and behavior tunables.

use crate::colors::Rgb8;
use palette::Srgb;

/// Tunables for a [`StringLight`](crate::StringLight).
///
/// The defaults match the receivers this driver was built against. Widths
/// are in microseconds, holds in milliseconds, speeds in degrees of hue per
/// second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    /// Hold time per channel unit when mixing (hold = value × quantum).
    pub increment_time_us: u32,

    /// Width of the pulses the driver emits to advance a receiver.
    pub pulse_width_us: u32,

    /// Default width for raw pulses sent in USER mode.
    pub user_pulse_width_us: u32,

    /// LOW hold that resets every receiver to state 0.
    pub reset_low_ms: u32,

    /// HIGH hold after a reset, before pulses are accepted again.
    pub reset_high_ms: u32,

    /// Settle time after raising the line on power-on.
    pub power_on_settle_ms: u32,

    /// First (widest) pulse of the desync sweep.
    pub sweep_start_us: u32,

    /// The sweep stops before reaching this width.
    pub sweep_end_us: u32,

    /// Width decrement between sweep steps.
    pub sweep_step_us: u32,

    /// Pulses emitted at each sweep width.
    pub sweep_pulses: u8,

    /// Pause between sweep steps.
    pub sweep_gap_ms: u32,

    /// Hue rate at speed 0.
    pub min_speed: u32,

    /// Hue rate at speed 255.
    pub max_speed: u32,

    /// Mixer target applied by `start`.
    pub initial_color: Rgb8,

    /// Speed applied at construction.
    pub initial_speed: u8,
}

impl LightConfig {
    pub const fn new() -> Self {
        Self {
            increment_time_us: 25,
            pulse_width_us: 50,
            user_pulse_width_us: 5,
            reset_low_ms: 1000,
            reset_high_ms: 1000,
            power_on_settle_ms: 10,
            sweep_start_us: 6000,
            sweep_end_us: 100,
            sweep_step_us: 20,
            sweep_pulses: 5,
            sweep_gap_ms: 5,
            min_speed: 3,
            max_speed: 180,
            initial_color: Srgb::new(150, 150, 150),
            initial_speed: 50,
        }
    }

    /// Sets the mixing quantum.
    #[must_use]
    pub const fn with_increment_time_us(mut self, us: u32) -> Self {
        self.increment_time_us = us;
        self
    }

    /// Sets the hue rate range.
    #[must_use]
    pub const fn with_speed_range(mut self, min: u32, max: u32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Sets the desync sweep ramp.
    #[must_use]
    pub const fn with_sweep(mut self, start_us: u32, end_us: u32, step_us: u32) -> Self {
        self.sweep_start_us = start_us;
        self.sweep_end_us = end_us;
        self.sweep_step_us = step_us;
        self
    }

    /// Sets the reset holds.
    #[must_use]
    pub const fn with_reset_holds(mut self, low_ms: u32, high_ms: u32) -> Self {
        self.reset_low_ms = low_ms;
        self.reset_high_ms = high_ms;
        self
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::new()
    }
}
