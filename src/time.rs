//! Time abstraction traits for the animation clock.
//!
//! Pulse timing never goes through these traits; it uses blocking
//! `DelayNs` waits. The clock only answers "how long since the last
//! transition" for JUMP/FADE pacing and command timeouts.

/// Source of monotonic time instants.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Duration type with millisecond resolution.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Instant type paired with its duration type.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}

/// Milliseconds elapsed from `earlier` to `now`.
#[inline]
pub(crate) fn millis_since<I: TimeInstant>(now: I, earlier: I) -> u64 {
    now.duration_since(earlier).as_millis()
}
