//! Speed control for the JUMP and FADE animations.
//!
//! An 8-bit speed maps linearly onto a hue rate between `min` and `max`
//! degrees per second. Everything else is derived from that rate: the time
//! per degree drives FADE, and sixty of those (one hue state) drive JUMP.

/// Degrees of hue between two adjacent hue states.
pub const DEGREES_PER_HUE_STATE: u32 = 60;

/// Speed setting plus the intervals derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedModel {
    speed: u8,
    min: u32,
    max: u32,
    ms_per_degree: u32,
}

impl SpeedModel {
    /// Creates a model for the `min..=max` degrees-per-second range. The
    /// bounds are swapped if given in the wrong order.
    pub fn new(min: u32, max: u32, speed: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut model = Self {
            speed,
            min,
            max,
            ms_per_degree: 0,
        };
        model.set_speed(speed);
        model
    }

    /// Changes the speed. Intervals are recomputed immediately; the caller's
    /// hue position is untouched.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
        self.ms_per_degree = Self::interval_for(self.min, self.max, speed);
    }

    #[inline]
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Milliseconds per degree of hue. Never zero.
    #[inline]
    pub fn ms_per_degree(&self) -> u32 {
        self.ms_per_degree
    }

    /// Milliseconds each JUMP hue state is held.
    #[inline]
    pub fn jump_interval_ms(&self) -> u32 {
        self.ms_per_degree * DEGREES_PER_HUE_STATE
    }

    /// `1000 / rate`, with `rate = min + speed × (max − min) / 255`.
    ///
    /// Worked in units of 1/255 degree per second to stay in integers.
    fn interval_for(min: u32, max: u32, speed: u8) -> u32 {
        let rate_x255 = min * 255 + u32::from(speed) * (max - min);
        (1000 * 255 / rate_x255.max(1)).max(1)
    }
}

const DEGREES_PER_TURN: u64 = 6 * DEGREES_PER_HUE_STATE as u64;

/// Converts elapsed degrees of hue into hexagon channel units.
///
/// An edge is 255 units and 60 degrees long, so a degree is 4.25 units. The
/// fraction is carried between calls and every 60 degrees come out as
/// exactly 255 units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitCarry {
    remainder: u32,
}

impl UnitCarry {
    pub const fn new() -> Self {
        Self { remainder: 0 }
    }

    /// Units covered by `degrees` more degrees of hue.
    pub fn take(&mut self, degrees: u64) -> u32 {
        let per_state = u64::from(DEGREES_PER_HUE_STATE);
        // Whole turns leave the position unchanged.
        let degrees = degrees % DEGREES_PER_TURN;
        let scaled = degrees * 255 + u64::from(self.remainder);
        self.remainder = (scaled % per_state) as u32;
        (scaled / per_state) as u32
    }
}
