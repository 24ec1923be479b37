//! Color types: the receiver's 8 preset states and 8-bit RGB helpers.
//!
//! Continuous colors are `palette::Srgb<u8>` (0-255 per channel). The
//! receivers themselves only know [`DiscreteColor`], a ring of 8 presets that
//! advances by one on each qualifying pulse.

use palette::Srgb;

/// 8-bit RGB color.
pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);
pub const WHITE: Rgb8 = Srgb::new(255, 255, 255);
pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const YELLOW: Rgb8 = Srgb::new(255, 255, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const CYAN: Rgb8 = Srgb::new(0, 255, 255);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);
pub const MAGENTA: Rgb8 = Srgb::new(255, 0, 255);

/// The six colors JUMP mode cycles through, 60° of hue apart.
pub const HUE_STATES: [Rgb8; 6] = [RED, YELLOW, GREEN, CYAN, BLUE, MAGENTA];

/// One of the 8 preset states of a receiver, in the order a pulse advances
/// through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DiscreteColor {
    White = 0,
    Off = 1,
    Red = 2,
    Green = 3,
    /// Red and green together.
    Yellow = 4,
    Blue = 5,
    /// Red and blue together.
    Magenta = 6,
    /// Blue and green together.
    Cyan = 7,
}

impl DiscreteColor {
    /// Number of states in the receiver ring.
    pub const COUNT: u8 = 8;

    const ALL: [DiscreteColor; 8] = [
        DiscreteColor::White,
        DiscreteColor::Off,
        DiscreteColor::Red,
        DiscreteColor::Green,
        DiscreteColor::Yellow,
        DiscreteColor::Blue,
        DiscreteColor::Magenta,
        DiscreteColor::Cyan,
    ];

    /// Position of this state in the ring.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// State at `index`, wrapping modulo 8.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % Self::COUNT) as usize]
    }

    /// The state one pulse later.
    #[inline]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Number of forward pulses needed to get from `self` to `target`.
    ///
    /// Always in `0..8`; zero when already there.
    #[inline]
    pub const fn pulses_to(self, target: Self) -> u8 {
        (Self::COUNT + target.index() - self.index()) % Self::COUNT
    }

    /// True for the six colored states (everything but White and Off).
    #[inline]
    pub const fn is_colored(self) -> bool {
        !matches!(self, DiscreteColor::White | DiscreteColor::Off)
    }

    /// The first colored state strictly after `self`.
    pub const fn next_colored(self) -> Self {
        let mut next = self.next();
        while !next.is_colored() {
            next = next.next();
        }
        next
    }

    /// The nominal color a receiver shows in this state.
    pub const fn rgb(self) -> Rgb8 {
        match self {
            DiscreteColor::White => WHITE,
            DiscreteColor::Off => BLACK,
            DiscreteColor::Red => RED,
            DiscreteColor::Green => GREEN,
            DiscreteColor::Yellow => YELLOW,
            DiscreteColor::Blue => BLUE,
            DiscreteColor::Magenta => MAGENTA,
            DiscreteColor::Cyan => CYAN,
        }
    }
}

/// Packs a color as `0x00RRGGBB`.
#[inline]
pub fn pack_rgb(color: Rgb8) -> u32 {
    (u32::from(color.red) << 16) | (u32::from(color.green) << 8) | u32::from(color.blue)
}

/// Unpacks a `0x00RRGGBB` value; the top byte is ignored.
#[inline]
pub fn unpack_rgb(packed: u32) -> Rgb8 {
    Srgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}
