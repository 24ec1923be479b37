#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`StringLight`**: The controller. Owns the line, tracks receiver state and runs the modes
//! - **`Mode`**: `Solid`, `Jump`, `Fade` or `User`
//! - **`DiscreteColor`**: One of the 8 presets a receiver steps through per pulse
//! - **`DiscreteColorState`**: Believed receiver state, advanced in lock-step with every pulse
//! - **`PulseEncoder`**: Bit-banged pulses on an `embedded-hal` output pin
//! - **`ColorMixer`**: Time-division RGB mixing over the red/green/blue presets
//! - **`fade`**: Hue hexagon walk used by FADE
//! - **`SpeedModel`**: Maps the 8-bit speed onto JUMP/FADE intervals
//! - **`AsyncDesynchronizer`**: Pulse-width sweep that spreads receivers apart, and the reset that rejoins them
//! - **`CommandDispatcher`**: Non-blocking byte protocol with a parameter timeout
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Colors are `Srgb<u8>` (0-255 per channel).

#[macro_use]
mod fmt;

pub mod colors;
pub mod command;
pub mod config;
pub mod desync;
pub mod discrete;
pub mod fade;
pub mod light;
pub mod mixer;
pub mod pulse;
pub mod speed;
pub mod time;
pub mod types;

pub use palette::Srgb;

pub use colors::{
    BLACK, BLUE, CYAN, DiscreteColor, GREEN, HUE_STATES, MAGENTA, RED, Rgb8, WHITE, YELLOW,
    pack_rgb, unpack_rgb,
};
pub use command::{ACK, CommandDispatcher, CommandTarget, FAIL, LightCommand, Reply};
pub use config::LightConfig;
pub use desync::AsyncDesynchronizer;
pub use discrete::{DiscreteColorState, SkipPolicy};
pub use light::StringLight;
pub use mixer::ColorMixer;
pub use pulse::PulseEncoder;
pub use speed::{SpeedModel, UnitCarry};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{LightError, LightStatus, Mode};
