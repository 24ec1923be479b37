//! Desynchronizing receivers that share one line.
//!
//! Every receiver on the strand sees the same pulses, so normally they all
//! show the same color. Their pulse detection thresholds differ slightly
//! though. Sweeping the pulse width from well above to below those
//! thresholds makes each unit start counting pulses at a different point in
//! the ramp, leaving them in different states. Nothing confirms this worked;
//! how far apart the units end up depends on analog tolerances.

use crate::config::LightConfig;
use crate::discrete::DiscreteColorState;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Sweep and reset timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AsyncDesynchronizer {
    start_us: u32,
    end_us: u32,
    step_us: u32,
    pulses: u8,
    gap_ms: u32,
    reset_low_ms: u32,
    reset_high_ms: u32,
}

impl AsyncDesynchronizer {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            start_us: config.sweep_start_us,
            end_us: config.sweep_end_us,
            step_us: config.sweep_step_us.max(1),
            pulses: config.sweep_pulses,
            gap_ms: config.sweep_gap_ms,
            reset_low_ms: config.reset_low_ms,
            reset_high_ms: config.reset_high_ms,
        }
    }

    /// Pulse widths of the sweep, widest first. Stops before `end_us`.
    pub fn widths(&self) -> impl Iterator<Item = u32> + use<> {
        let end = self.end_us;
        let step = self.step_us;
        core::iter::successors(Some(self.start_us), move |w| w.checked_sub(step))
            .take_while(move |w| *w > end)
    }

    /// Runs the descending sweep: a burst of pulses at each width, then a
    /// short gap.
    pub fn desync<P: OutputPin, D: DelayNs>(&self, state: &mut DiscreteColorState<P, D>) {
        for width in self.widths() {
            state.advance(self.pulses, width);
            state.encoder().wait_ms(self.gap_ms);
        }
        state.encoder().set_high();
    }

    /// Forces every receiver back to White with a long LOW then HIGH hold.
    pub fn resync<P: OutputPin, D: DelayNs>(&self, state: &mut DiscreteColorState<P, D>) {
        state.resync(self.reset_low_ms, self.reset_high_ms);
    }
}
