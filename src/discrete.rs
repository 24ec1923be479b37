//! Believed receiver state, kept in lock-step with every emitted pulse.
//!
//! The link is open loop: the receivers never report back. The only thing
//! tying [`DiscreteColorState::current`] to what the strand actually shows is
//! that every pulse goes through this type and advances the index as it is
//! emitted. If a pulse train is cut short (power glitch, reset mid-train) the
//! two drift apart and only a full resync brings them back.

use crate::colors::DiscreteColor;
use crate::pulse::PulseEncoder;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// How to step past the White and Off states when advancing raw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipPolicy {
    /// One pulse train that jumps straight over White/Off. Used while all
    /// receivers are in lock-step.
    DoublePulse,

    /// One single-pulse iteration per state, re-looping instead of counting
    /// White/Off as a step. Used while receivers are desynchronized, where
    /// White/Off on one unit is a color on another.
    ExtraIteration,
}

impl SkipPolicy {
    /// Policy that applies for the given async flag.
    #[inline]
    pub const fn for_async(is_async: bool) -> Self {
        if is_async {
            SkipPolicy::ExtraIteration
        } else {
            SkipPolicy::DoublePulse
        }
    }
}

/// Pulse encoder plus the receiver state it is believed to have produced.
pub struct DiscreteColorState<P, D> {
    encoder: PulseEncoder<P, D>,
    current: DiscreteColor,
    pulse_width_us: u32,
}

impl<P: OutputPin, D: DelayNs> DiscreteColorState<P, D> {
    /// Starts out believing the receivers are at White (state 0).
    pub fn new(encoder: PulseEncoder<P, D>, pulse_width_us: u32) -> Self {
        Self {
            encoder,
            current: DiscreteColor::White,
            pulse_width_us,
        }
    }

    /// The state the receivers are believed to be in.
    #[inline]
    pub fn current(&self) -> DiscreteColor {
        self.current
    }

    /// Moves the receivers forward to `target` with the minimal number of
    /// pulses, then leaves the line HIGH.
    ///
    /// Emits `(8 + target - current) % 8` pulses, so nothing when already
    /// at `target`.
    pub fn set_color(&mut self, target: DiscreteColor) {
        let count = self.current.pulses_to(target);
        self.advance(count, self.pulse_width_us);
        debug_assert_eq!(self.current, target);
        self.encoder.set_high();
    }

    /// Emits `count` pulses of `width_us`, advancing the index once per
    /// pulse.
    pub fn advance(&mut self, count: u8, width_us: u32) {
        for _ in 0..count {
            self.encoder.pulse(width_us);
            self.current = self.current.next();
        }
    }

    /// Advances to the next colored state under `policy`.
    pub fn skip_to_next_colored(&mut self, policy: SkipPolicy) {
        match policy {
            SkipPolicy::DoublePulse => {
                let target = self.current.next_colored();
                let count = self.current.pulses_to(target);
                self.advance(count, self.pulse_width_us);
            }
            SkipPolicy::ExtraIteration => loop {
                self.advance(1, self.pulse_width_us);
                if self.current.is_colored() {
                    break;
                }
            },
        }
        self.encoder.set_high();
    }

    /// Holds the line LOW then HIGH long enough to reset every receiver to
    /// White.
    pub fn resync(&mut self, low_ms: u32, high_ms: u32) {
        self.encoder.hold_low(low_ms);
        self.encoder.hold_high(high_ms);
        self.current = DiscreteColor::White;
    }

    /// Records that the receivers lost power and restarted at White without
    /// any pulse being sent.
    #[inline]
    pub fn assume_reset(&mut self) {
        self.current = DiscreteColor::White;
    }

    /// Direct access to the line for holds and waits that emit no pulse.
    #[inline]
    pub fn encoder(&mut self) -> &mut PulseEncoder<P, D> {
        &mut self.encoder
    }

    /// Gives back the pin and delay.
    pub fn release(self) -> (P, D) {
        self.encoder.release()
    }
}
