//! Core types shared across the controller and the command boundary.

use crate::colors::Rgb8;

/// Animation mode of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Mix and hold a fixed RGB target.
    #[default]
    Solid = 0,

    /// Hop between the six hue states at a speed-derived interval.
    Jump = 1,

    /// Walk the hue hexagon continuously.
    Fade = 2,

    /// Raw pulse access. No animation runs.
    User = 3,
}

impl Mode {
    /// Wire id of this mode.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = LightError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Mode::Solid),
            1 => Ok(Mode::Jump),
            2 => Ok(Mode::Fade),
            3 => Ok(Mode::User),
            other => Err(LightError::InvalidMode(other)),
        }
    }
}

/// Snapshot of everything the controller reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightStatus {
    pub mode: Mode,
    pub color: Rgb8,
    pub on: bool,
    pub is_async: bool,
    pub speed: u8,
}

/// Errors surfaced by the controller and the command boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightError {
    /// Mode id outside the known range.
    InvalidMode(u8),

    /// Command byte with no matching command.
    UnknownCommand(u8),

    /// Parameter byte a command does not accept.
    InvalidParameter(u8),

    /// Parameter bytes stopped arriving before the command was complete.
    Timeout,
}

impl core::fmt::Display for LightError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LightError::InvalidMode(id) => write!(f, "invalid mode id {}", id),
            LightError::UnknownCommand(byte) => write!(f, "unknown command byte 0x{:02X}", byte),
            LightError::InvalidParameter(byte) => {
                write!(f, "invalid parameter byte 0x{:02X}", byte)
            }
            LightError::Timeout => write!(f, "timed out waiting for parameter bytes"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LightError {}
