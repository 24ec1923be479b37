//! Shared test infrastructure for string-light integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use string_light::{StringLight, TimeDuration, TimeInstant, TimeSource};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing (milliseconds since the bus was created)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Bus: one clock shared by the pin, the delay and the time source
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// A `set_low`/`set_high` call and when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub level: Level,
    pub at_ns: u64,
}

/// Records every line write against a simulated clock. Delays advance the
/// clock, so pulse widths and animation timing come out exactly.
pub struct Bus {
    now_ns: Cell<u64>,
    edges: RefCell<Vec<Edge>>,
}

impl Bus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            now_ns: Cell::new(0),
            edges: RefCell::new(Vec::new()),
        })
    }

    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_ns(ms * 1_000_000);
    }

    fn record(&self, level: Level) {
        self.edges.borrow_mut().push(Edge {
            level,
            at_ns: self.now_ns.get(),
        });
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.edges.borrow_mut().clear();
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.edges.borrow().clone()
    }

    /// Last level written, if any.
    pub fn level(&self) -> Option<Level> {
        self.edges.borrow().last().map(|e| e.level)
    }

    /// Width in nanoseconds of every completed LOW period (HIGH → LOW →
    /// HIGH), in order. Writes that do not change the level are ignored.
    pub fn low_widths_ns(&self) -> Vec<u64> {
        let mut widths = Vec::new();
        let mut level = Level::High;
        let mut low_since = 0;
        for edge in self.edges.borrow().iter() {
            match (level, edge.level) {
                (Level::High, Level::Low) => low_since = edge.at_ns,
                (Level::Low, Level::High) => widths.push(edge.at_ns - low_since),
                _ => {}
            }
            level = edge.level;
        }
        widths
    }

    /// Number of LOW periods shorter than 100 ms (state-advancing pulses).
    pub fn pulse_count(&self) -> usize {
        self.low_widths_ns()
            .iter()
            .filter(|w| **w < 100_000_000)
            .count()
    }

    /// Number of LOW periods of at least 900 ms (full resets).
    pub fn reset_count(&self) -> usize {
        self.low_widths_ns()
            .iter()
            .filter(|w| **w >= 900_000_000)
            .count()
    }
}

// ============================================================================
// Mock Pin / Delay / Time Source
// ============================================================================

pub struct MockPin {
    bus: Rc<Bus>,
}

impl MockPin {
    pub fn new(bus: &Rc<Bus>) -> Self {
        Self { bus: Rc::clone(bus) }
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bus.record(Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bus.record(Level::High);
        Ok(())
    }
}

pub struct MockDelay {
    bus: Rc<Bus>,
}

impl MockDelay {
    pub fn new(bus: &Rc<Bus>) -> Self {
        Self { bus: Rc::clone(bus) }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.bus.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.bus.advance_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.bus.advance_ns(u64::from(ms) * 1_000_000);
    }
}

/// Time source reading the bus clock at millisecond resolution
pub struct MockTimeSource {
    bus: Rc<Bus>,
}

impl MockTimeSource {
    pub fn new(bus: &Rc<Bus>) -> Self {
        Self { bus: Rc::clone(bus) }
    }

    /// Advance time without touching the line
    pub fn advance(&self, duration: TestDuration) {
        self.bus.advance_ms(duration.0);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        TestInstant(self.bus.now_ns() / 1_000_000)
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestLight<'t> = StringLight<'t, MockPin, MockDelay, TestInstant, MockTimeSource>;

/// A controller wired to `bus`, not yet started.
pub fn light<'t>(bus: &Rc<Bus>, clock: &'t MockTimeSource) -> TestLight<'t> {
    StringLight::new(MockPin::new(bus), MockDelay::new(bus), clock)
}

/// A started, powered controller with the recording cleared.
pub fn started_light<'t>(bus: &Rc<Bus>, clock: &'t MockTimeSource) -> TestLight<'t> {
    let mut light = light(bus, clock);
    light.start(true);
    bus.clear();
    light
}
