//! The string light controller.
//!
//! [`StringLight`] owns the line and layers modes on top of the receivers'
//! 8 presets: software RGB mixing (SOLID), hue hopping (JUMP), hue fading
//! (FADE) and raw pulse access (USER). It is driven by calling
//! [`StringLight::tick`] from the main loop.
//!
//! Nothing here is reentrant. Every call may block on pulse timing, and
//! state is only consistent between calls; a caller that commands and ticks
//! from different contexts has to put its own lock around the controller.

use crate::colors::{DiscreteColor, HUE_STATES, Rgb8, pack_rgb};
use crate::command::{ACK, CommandTarget, FAIL, LightCommand, Reply};
use crate::config::LightConfig;
use crate::desync::AsyncDesynchronizer;
use crate::discrete::{DiscreteColorState, SkipPolicy};
use crate::fade;
use crate::mixer::ColorMixer;
use crate::pulse::PulseEncoder;
use crate::speed::{SpeedModel, UnitCarry};
use crate::time::{TimeDuration, TimeInstant, TimeSource, millis_since};
use crate::types::{LightError, LightStatus, Mode};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use palette::Srgb;

/// Controls one strand of 8-state receivers over a single GPIO line.
///
/// Nothing happens on the line until [`start`](Self::start); before that,
/// every mutating call is a silent no-op.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `P` - Output pin driving the line
/// * `D` - Blocking delay used for pulse timing
/// * `I` - Time instant type
/// * `T` - Time source implementation type
pub struct StringLight<'t, P, D, I: TimeInstant, T: TimeSource<I>> {
    state: DiscreteColorState<P, D>,
    time_source: &'t T,
    config: LightConfig,
    desync: AsyncDesynchronizer,
    mixer: ColorMixer,
    speed: SpeedModel,
    mode: Mode,
    started: bool,
    powered: bool,
    is_async: bool,
    hue_index: usize,
    fade_carry: UnitCarry,
    last_transition: Option<I>,
}

impl<'t, P, D, I, T> StringLight<'t, P, D, I, T>
where
    P: OutputPin,
    D: DelayNs,
    I: TimeInstant,
    T: TimeSource<I>,
{
    /// Creates a controller with the default timings.
    pub fn new(pin: P, delay: D, time_source: &'t T) -> Self {
        Self::with_config(pin, delay, time_source, LightConfig::default())
    }

    /// Creates a controller with custom timings.
    pub fn with_config(pin: P, delay: D, time_source: &'t T, config: LightConfig) -> Self {
        let encoder = PulseEncoder::new(pin, delay);
        Self {
            state: DiscreteColorState::new(encoder, config.pulse_width_us),
            time_source,
            desync: AsyncDesynchronizer::from_config(&config),
            mixer: ColorMixer::new(config.initial_color, config.increment_time_us),
            speed: SpeedModel::new(config.min_speed, config.max_speed, config.initial_speed),
            config,
            mode: Mode::Solid,
            started: false,
            powered: false,
            is_async: false,
            // First JUMP hop lands on red.
            hue_index: HUE_STATES.len() - 1,
            fade_carry: UnitCarry::new(),
            last_transition: None,
        }
    }

    /// First hardware setup. Must precede every other operation.
    ///
    /// Applies the configured initial color and powers the strand on or
    /// leaves it off. Calling it again does nothing.
    pub fn start(&mut self, start_on: bool) {
        if self.started {
            return;
        }
        info!("string light starting, on={}", start_on);

        self.started = true;
        self.mixer.set_target(self.config.initial_color);
        self.last_transition = Some(self.time_source.now());

        if start_on {
            self.turn_on();
        } else {
            self.state.encoder().set_low();
            self.state.assume_reset();
            self.powered = false;
        }
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Sets the RGB target shown in SOLID (and the starting point in FADE).
    pub fn set_color(&mut self, red: u8, green: u8, blue: u8) {
        if !self.started {
            return;
        }
        trace!("color -> ({}, {}, {})", red, green, blue);
        self.mixer.set_target(Srgb::new(red, green, blue));
    }

    /// The current RGB target.
    #[inline]
    pub fn color(&self) -> Rgb8 {
        self.mixer.target()
    }

    /// The current RGB target packed as `0x00RRGGBB`.
    #[inline]
    pub fn get_color(&self) -> u32 {
        pack_rgb(self.mixer.target())
    }

    /// Per-channel mixing holds derived from the target, in microseconds.
    #[inline]
    pub fn holds_us(&self) -> [u32; 3] {
        self.mixer.holds_us()
    }

    /// Changes mode by wire id.
    ///
    /// Unknown ids fail with [`LightError::InvalidMode`] and change nothing.
    pub fn set_mode_id(&mut self, id: u8) -> Result<(), LightError> {
        match Mode::try_from(id) {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            Err(err) => {
                warn!("rejected mode id {}", id);
                Err(err)
            }
        }
    }

    /// Changes mode.
    ///
    /// Leaving USER first resets every receiver (long LOW, long HIGH), since
    /// raw pulses may have left the believed index wrong. Every SOLID, JUMP
    /// or FADE request also ends an async spread; call
    /// [`start_async`](Self::start_async) afterwards to animate units apart.
    /// Entering JUMP or FADE restarts their interval.
    pub fn set_mode(&mut self, mode: Mode) {
        if !self.started {
            return;
        }

        if self.mode == Mode::User && mode != Mode::User {
            debug!("leaving user mode, resyncing receivers");
            self.resync();
            if !self.powered {
                self.state.encoder().set_low();
            }
        }

        if mode != Mode::User {
            self.stop_async();
        }

        if matches!(mode, Mode::Jump | Mode::Fade) && mode != self.mode {
            self.last_transition = Some(self.time_source.now());
            self.fade_carry = UnitCarry::new();
        }

        if mode != self.mode {
            info!("mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Spreads the receivers apart with the desync sweep.
    ///
    /// While powered off only the flag is set; the sweep runs on the next
    /// [`turn_on`](Self::turn_on). No-op when already async.
    pub fn start_async(&mut self) {
        if !self.started || self.is_async {
            return;
        }
        if self.powered {
            self.run_desync_sweep();
        }
        self.is_async = true;
    }

    /// Brings every receiver back to White and in step. No-op when not
    /// async.
    pub fn stop_async(&mut self) {
        if !self.started || !self.is_async {
            return;
        }
        if self.powered {
            self.resync();
        } else {
            self.state.assume_reset();
        }
        self.is_async = false;
    }

    #[inline]
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Sets the animation speed, 0 (slowest) to 255 (fastest). The hue
    /// position is kept.
    pub fn set_speed(&mut self, speed: u8) {
        if !self.started {
            return;
        }
        self.speed.set_speed(speed);
        debug!("speed {} -> {} ms/deg", speed, self.speed.ms_per_degree());
    }

    #[inline]
    pub fn speed(&self) -> u8 {
        self.speed.speed()
    }

    /// The derived timing for the current speed.
    #[inline]
    pub fn speed_model(&self) -> &SpeedModel {
        &self.speed
    }

    /// Raises the line. Receivers power up at White; an async spread that
    /// was active is rebuilt with a fresh sweep.
    pub fn turn_on(&mut self) {
        if !self.started || self.powered {
            return;
        }
        info!("power on");

        self.state.encoder().hold_high(self.config.power_on_settle_ms);
        self.state.assume_reset();
        self.powered = true;

        if self.is_async {
            self.run_desync_sweep();
        }
    }

    /// Drops the line and stops animating.
    pub fn turn_off(&mut self) {
        if !self.started || !self.powered {
            return;
        }
        info!("power off");

        self.state.encoder().set_low();
        self.powered = false;
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.powered
    }

    /// The receiver state the controller believes the strand is in.
    #[inline]
    pub fn discrete_color(&self) -> DiscreteColor {
        self.state.current()
    }

    /// Everything a status query reports.
    pub fn status(&self) -> LightStatus {
        LightStatus {
            mode: self.mode,
            color: self.mixer.target(),
            on: self.powered,
            is_async: self.is_async,
            speed: self.speed.speed(),
        }
    }

    /// Sends raw pulses. Only honored in USER mode; ignored otherwise so
    /// outside pulses cannot corrupt the tracked state.
    pub fn send_pulse(&mut self, count: u8, width_us: u32) {
        if !self.started || self.mode != Mode::User {
            return;
        }
        self.state.advance(count, width_us);
    }

    /// [`send_pulse`](Self::send_pulse) with the configured default width.
    pub fn send_user_pulse(&mut self, count: u8) {
        self.send_pulse(count, self.config.user_pulse_width_us);
    }

    /// Steps the raw receiver state to the next colored preset, skipping
    /// White and Off.
    ///
    /// In lock-step the skip is a single double-pulse train; while async it
    /// loops one pulse at a time. Ignored when off or in USER mode.
    pub fn select_next_color_skipping_off_and_white(&mut self) {
        if !self.started || !self.powered || self.mode == Mode::User {
            return;
        }
        self.state
            .skip_to_next_colored(SkipPolicy::for_async(self.is_async));
    }

    /// Runs one animation step. Call this from the main loop as often as
    /// possible.
    ///
    /// Blocks for one full mixing pass in SOLID, JUMP and FADE. Holds the
    /// line LOW while powered off.
    pub fn tick(&mut self) {
        if !self.started {
            return;
        }
        if !self.powered {
            self.state.encoder().set_low();
            return;
        }

        match self.mode {
            Mode::Solid => self.mixer.mix(&mut self.state),
            Mode::Jump => {
                self.mixer.mix(&mut self.state);
                let steps = self.take_elapsed_periods(self.speed.jump_interval_ms());
                if steps > 0 {
                    self.hue_index = (self.hue_index + (steps % 6) as usize) % HUE_STATES.len();
                    self.mixer.set_target(HUE_STATES[self.hue_index]);
                }
            }
            Mode::Fade => {
                self.mixer.mix(&mut self.state);
                let degrees = self.take_elapsed_periods(self.speed.ms_per_degree());
                if degrees > 0 {
                    let units = self.fade_carry.take(degrees);
                    let next = fade::advance(self.mixer.target(), units);
                    self.mixer.set_target(next);
                }
            }
            Mode::User => {}
        }
    }

    /// Gives back the pin and delay.
    pub fn release(self) -> (P, D) {
        self.state.release()
    }

    /// Whole `period_ms` periods since the last transition. The transition
    /// mark advances by exactly that many periods so remainders carry over.
    fn take_elapsed_periods(&mut self, period_ms: u32) -> u64 {
        let now = self.time_source.now();
        let last = *self.last_transition.get_or_insert(now);
        let period = u64::from(period_ms.max(1));
        let periods = millis_since(now, last) / period;
        if periods > 0 {
            let consumed = I::Duration::from_millis(periods * period);
            self.last_transition = Some(last.checked_add(consumed).unwrap_or(now));
        }
        periods
    }

    fn run_desync_sweep(&mut self) {
        info!("desync sweep");
        self.desync.desync(&mut self.state);
    }

    fn resync(&mut self) {
        info!("resync");
        self.desync.resync(&mut self.state);
        self.is_async = false;
    }
}

impl<'t, P, D, I, T> CommandTarget for StringLight<'t, P, D, I, T>
where
    P: OutputPin,
    D: DelayNs,
    I: TimeInstant,
    T: TimeSource<I>,
{
    fn execute(&mut self, command: LightCommand) -> Reply {
        let mut reply = Reply::new();
        let mut push = |bytes: &[u8]| {
            for byte in bytes {
                let _ = reply.push(*byte);
            }
        };
        let flag = |set: bool| if set { ACK } else { FAIL };

        match command {
            LightCommand::TurnOff => {
                push(&[ACK]);
                self.turn_off();
            }
            LightCommand::TurnOn => {
                push(&[ACK]);
                self.turn_on();
            }
            LightCommand::SetColor(color) => {
                self.set_color(color.red, color.green, color.blue);
                push(&[ACK]);
            }
            LightCommand::GetMode => push(&[ACK, self.mode.id()]),
            LightCommand::GetOnOff => push(&[flag(self.powered)]),
            LightCommand::GetColor => {
                let color = self.color();
                push(&[color.red, color.green, color.blue]);
            }
            LightCommand::GetAsync => push(&[ACK, flag(self.is_async)]),
            LightCommand::GetStatus => {
                let status = self.status();
                push(&[
                    ACK,
                    status.mode.id(),
                    status.color.red,
                    status.color.green,
                    status.color.blue,
                    flag(status.on),
                    flag(status.is_async),
                    status.speed,
                ]);
            }
            LightCommand::SetMode(id) => match self.set_mode_id(id) {
                Ok(()) => push(&[ACK]),
                Err(_) => push(&[FAIL]),
            },
            LightCommand::SetAsync(enable) => {
                push(&[ACK]);
                if enable {
                    self.start_async();
                } else {
                    self.stop_async();
                }
            }
            LightCommand::GetSpeed => push(&[self.speed.speed()]),
            LightCommand::SetSpeed(speed) => {
                self.set_speed(speed);
                push(&[ACK]);
            }
        }
        reply
    }
}
