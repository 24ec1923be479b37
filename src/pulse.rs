//! Bit-banged pulse output on a single GPIO line.
//!
//! [`PulseEncoder`] is the only code in the crate that touches hardware. A
//! pulse is a LOW hold followed by a return to HIGH. Short pulses advance a
//! receiver by one state; a LOW hold of about a second resets it.
//!
//! All waits are blocking `DelayNs` calls. They monopolize the calling
//! context for their full length and cannot be cancelled part way.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Owns the line and the delay provider used to time it.
pub struct PulseEncoder<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> PulseEncoder<P, D> {
    /// Wraps a pin and delay. The line level is left as the HAL set it.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Emits one pulse: LOW for `width_us`, then HIGH.
    #[inline]
    pub fn pulse(&mut self, width_us: u32) {
        self.pin.set_low().ok();
        self.delay.delay_us(width_us);
        self.pin.set_high().ok();
    }

    /// Emits `count` back-to-back pulses of `width_us`.
    pub fn pulse_train(&mut self, count: u8, width_us: u32) {
        for _ in 0..count {
            self.pulse(width_us);
        }
    }

    /// Drives the line HIGH.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high().ok();
    }

    /// Drives the line LOW.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low().ok();
    }

    /// Drives the line LOW and blocks for `ms`.
    pub fn hold_low(&mut self, ms: u32) {
        self.set_low();
        self.delay.delay_ms(ms);
    }

    /// Drives the line HIGH and blocks for `ms`.
    pub fn hold_high(&mut self, ms: u32) {
        self.set_high();
        self.delay.delay_ms(ms);
    }

    /// Blocks without touching the line.
    #[inline]
    pub fn wait_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// Blocks without touching the line.
    #[inline]
    pub fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Gives back the pin and delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
