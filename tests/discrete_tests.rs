//! Integration tests for pulse emission and believed-state tracking

mod common;
use common::*;

use string_light::{DiscreteColor, DiscreteColorState, PulseEncoder, SkipPolicy};

fn state(bus: &std::rc::Rc<Bus>) -> DiscreteColorState<MockPin, MockDelay> {
    DiscreteColorState::new(PulseEncoder::new(MockPin::new(bus), MockDelay::new(bus)), 50)
}

#[test]
fn pulse_is_low_for_its_width_then_high() {
    let bus = Bus::new();
    let mut encoder = PulseEncoder::new(MockPin::new(&bus), MockDelay::new(&bus));

    encoder.pulse_train(3, 50);

    assert_eq!(bus.low_widths_ns(), vec![50_000; 3]);
    assert_eq!(bus.level(), Some(Level::High));
}

#[test]
fn set_color_emits_minimal_forward_pulses() {
    let bus = Bus::new();
    let mut state = state(&bus);

    state.set_color(DiscreteColor::Blue);
    assert_eq!(bus.pulse_count(), 5);
    assert_eq!(state.current(), DiscreteColor::Blue);

    bus.clear();
    state.set_color(DiscreteColor::Red);
    assert_eq!(bus.pulse_count(), 5);
    assert_eq!(state.current(), DiscreteColor::Red);
}

#[test]
fn set_color_to_current_emits_nothing_but_leaves_line_high() {
    let bus = Bus::new();
    let mut state = state(&bus);
    state.set_color(DiscreteColor::Green);
    bus.clear();

    state.set_color(DiscreteColor::Green);

    assert_eq!(bus.pulse_count(), 0);
    assert_eq!(bus.level(), Some(Level::High));
}

#[test]
fn every_pulse_advances_the_index() {
    let bus = Bus::new();
    let mut state = state(&bus);

    state.advance(11, 5);

    assert_eq!(bus.pulse_count(), 11);
    assert_eq!(state.current(), DiscreteColor::from_index(11));
}

#[test]
fn double_pulse_skips_white_and_off_in_one_train() {
    let bus = Bus::new();
    let mut state = state(&bus);
    state.set_color(DiscreteColor::Cyan);
    bus.clear();

    state.skip_to_next_colored(SkipPolicy::DoublePulse);

    assert_eq!(state.current(), DiscreteColor::Red);
    assert_eq!(bus.pulse_count(), 3);
}

#[test]
fn extra_iteration_lands_on_the_same_state() {
    let bus = Bus::new();
    let mut state = state(&bus);
    bus.clear();

    state.skip_to_next_colored(SkipPolicy::ExtraIteration);

    assert_eq!(state.current(), DiscreteColor::Red);
    assert_eq!(bus.pulse_count(), 2);
}

#[test]
fn skip_between_colored_states_is_one_pulse() {
    let bus = Bus::new();
    let mut state = state(&bus);
    state.set_color(DiscreteColor::Green);
    bus.clear();

    state.skip_to_next_colored(SkipPolicy::DoublePulse);

    assert_eq!(state.current(), DiscreteColor::Yellow);
    assert_eq!(bus.pulse_count(), 1);
}

#[test]
fn resync_holds_low_then_high_and_resets_index() {
    let bus = Bus::new();
    let mut state = state(&bus);
    state.set_color(DiscreteColor::Magenta);
    bus.clear();

    state.resync(1000, 1000);

    assert_eq!(state.current(), DiscreteColor::White);
    assert_eq!(bus.low_widths_ns(), vec![1_000_000_000]);
    assert_eq!(bus.level(), Some(Level::High));
    assert_eq!(bus.now_ns() - bus.edges()[1].at_ns, 1_000_000_000);
}
