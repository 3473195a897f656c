//! End-to-end interaction scenarios against the headless target.
//!
//! Every slider here sits in a 100px wide root with a full-width line, so a
//! pointer coordinate equals the value it maps to on a `0..=100` range.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use twinslide::{
    CrossoverPolicy, InteractionState, StepDirection,
    prelude::*,
    render::{Visibility, class_names},
};

type Commits = Arc<Mutex<Vec<CommitEvent>>>;

fn slider_with(config: SliderConfig) -> (RangeSliderController<HeadlessTarget>, Commits) {
    let mut target = HeadlessTarget::new(HeadlessMetrics {
        knob_width: Px(10),
        tick_width: Px(2),
        glyph_width: Px(5),
        ..HeadlessMetrics::default()
    });
    target.attach(PxSize::new(Px(100), Px(20)));
    let mut slider = RangeSliderController::with_config(target, config);
    slider.on_attach();

    let commits = Commits::default();
    let sink = Arc::clone(&commits);
    slider.on_commit(move |event| sink.lock().push(event));
    (slider, commits)
}

fn final_commit(low: f64, high: f64) -> CommitEvent {
    CommitEvent {
        values: CurrentValues::new(low, high),
        immediate: false,
        flush: false,
    }
}

fn knob_center(slider: &RangeSliderController<HeadlessTarget>, knob: Knob) -> i32 {
    let element = slider.elements().knob(knob);
    let left = slider.target().left(element).unwrap_or_default();
    left.raw() + slider.target().offset_width(element).raw() / 2
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn home_end_and_space_collapse_both_knobs() {
    let (mut slider, commits) = slider_with(SliderConfig::default());

    slider.handle_key_down(SliderKey::Home, false);
    assert_eq!(slider.values(), CurrentValues::new(0.0, 0.0));
    slider.handle_key_up();

    slider.handle_key_down(SliderKey::End, false);
    assert_eq!(slider.values(), CurrentValues::new(100.0, 100.0));
    slider.handle_key_up();

    slider.handle_key_down(SliderKey::Space, false);
    assert_eq!(slider.values(), CurrentValues::new(50.0, 50.0));
    slider.handle_key_up();

    assert_eq!(
        commits.lock().as_slice(),
        &[
            final_commit(0.0, 0.0),
            final_commit(100.0, 100.0),
            final_commit(50.0, 50.0),
        ]
    );
}

#[test]
fn pointer_press_is_confined_and_committed_on_release() {
    let (mut slider, commits) = slider_with(SliderConfig::default());

    slider.handle_pointer_down(Px(27));
    assert_eq!(slider.selected_knob(), Knob::Low);
    assert_eq!(slider.values().low, 30.0);
    assert!(commits.lock().is_empty());

    slider.handle_pointer_up(Px(27));
    assert_eq!(slider.interaction_state(), InteractionState::Idle);
    assert_eq!(commits.lock().as_slice(), &[final_commit(30.0, 100.0)]);
}

#[test]
fn resizing_preserves_knob_fractions() {
    let (mut slider, _) = slider_with(SliderConfig::default());
    slider.set_current_values(20.0, 60.0, false);
    assert_eq!(knob_center(&slider, Knob::Low), 20);
    assert_eq!(knob_center(&slider, Knob::High), 60);

    slider.target_mut().set_client_size(PxSize::new(Px(200), Px(20)));
    slider.handle_resize(Px(200), Px(20));

    let track = slider.track().expect("laid out");
    assert_eq!(track.length, Px(200));
    assert_eq!(knob_center(&slider, Knob::Low), 40);
    assert_eq!(knob_center(&slider, Knob::High), 120);

    slider.set_current_values(100.0, 100.0, false);
    let high = slider.elements().knob(Knob::High);
    let left = slider.target().left(high).expect("placed");
    // Never past the end minus half the knob.
    assert!(left <= track.end() - Px(5));
}

#[test]
fn held_arrow_key_repeats_until_released() {
    let (mut slider, commits) = slider_with(SliderConfig::default());
    let line = slider.elements().line();
    let start = Instant::now();

    slider.handle_key_down_at(SliderKey::Right, false, start);
    assert_eq!(slider.values().low, 10.0);
    assert_eq!(
        slider.interaction_state(),
        InteractionState::DraggingKeyboard {
            direction: StepDirection::Increase,
            multiplier: 1,
        }
    );
    assert_eq!(slider.next_repeat_deadline(), Some(start + ms(400)));

    assert!(!slider.tick(start + ms(399)));
    assert_eq!(slider.target().class_name(line), class_names::LINE);

    assert!(slider.tick(start + ms(400)));
    assert_eq!(slider.values().low, 20.0);
    assert_eq!(slider.target().class_name(line), class_names::LINE_SLIDING);

    assert!(slider.tick(start + ms(430)));
    assert_eq!(slider.values().low, 30.0);

    // Repeated key-down events from the OS are ignored while held.
    slider.handle_key_down_at(SliderKey::Right, false, start + ms(440));
    assert_eq!(slider.next_repeat_deadline(), Some(start + ms(460)));

    slider.handle_key_up_at(start + ms(450));
    assert_eq!(slider.next_repeat_deadline(), None);
    assert!(!slider.tick(start + ms(1_000)));
    assert_eq!(slider.values().low, 30.0);
    assert_eq!(slider.target().class_name(line), class_names::LINE);
    assert_eq!(commits.lock().as_slice(), &[final_commit(30.0, 100.0)]);
}

#[test]
fn ctrl_moves_a_tenth_of_the_range() {
    let (mut slider, _) = slider_with(SliderConfig::default().step_size(1.0));
    let start = Instant::now();

    slider.handle_key_down_at(SliderKey::Right, true, start);
    assert_eq!(slider.values().low, 10.0);
    slider.tick(start + ms(400));
    assert_eq!(slider.values().low, 20.0);
    slider.handle_key_up_at(start + ms(410));

    slider.handle_key_down_at(SliderKey::Left, false, start + ms(500));
    assert_eq!(slider.values().low, 19.0);
}

#[test]
fn keyboard_steps_follow_the_last_grabbed_knob() {
    let (mut slider, _) = slider_with(SliderConfig::default());
    slider.handle_pointer_down(Px(90));
    slider.handle_pointer_up(Px(90));
    assert_eq!(slider.selected_knob(), Knob::High);

    slider.handle_key_down(SliderKey::Left, false);
    slider.handle_key_up();
    assert_eq!(slider.values(), CurrentValues::new(0.0, 80.0));
}

#[test]
fn super_immediate_keyboard_steps_report_live() {
    let (mut slider, commits) = slider_with(SliderConfig::default().super_immediate(true));
    let start = Instant::now();

    slider.handle_key_down_at(SliderKey::Right, false, start);
    slider.tick(start + ms(400));
    slider.handle_key_up_at(start + ms(420));

    let flags: Vec<bool> = commits.lock().iter().map(|c| c.immediate).collect();
    assert_eq!(flags, vec![true, true, false]);
}

#[test]
fn blur_finalizes_a_pointer_drag() {
    let (mut slider, commits) = slider_with(SliderConfig::default());
    let root = slider.target().root();

    slider.handle_pointer_down(Px(27));
    assert_eq!(slider.target().class_name(root), class_names::ROOT_FOCUSED);
    slider.handle_pointer_move(Px(62));

    slider.handle_blur();
    assert_eq!(slider.interaction_state(), InteractionState::Idle);
    assert_eq!(slider.target().class_name(root), class_names::ROOT);
    assert_eq!(commits.lock().as_slice(), &[final_commit(60.0, 100.0)]);

    // The drag is over: later motion does nothing.
    slider.handle_pointer_move(Px(10));
    assert_eq!(slider.values().low, 60.0);
}

#[test]
fn blur_finalizes_a_keyboard_drag() {
    let (mut slider, commits) = slider_with(SliderConfig::default());
    let start = Instant::now();

    slider.handle_focus();
    slider.handle_key_down_at(SliderKey::Right, false, start);
    slider.handle_blur();

    assert_eq!(slider.next_repeat_deadline(), None);
    assert!(!slider.tick(start + ms(400)));
    assert!(!slider.is_focused());
    assert_eq!(commits.lock().as_slice(), &[final_commit(10.0, 100.0)]);
}

#[test]
fn coinciding_knobs_hand_the_press_to_the_low_knob() {
    let (mut slider, _) = slider_with(SliderConfig::default());
    slider.set_current_values(50.0, 50.0, false);
    let low = slider.elements().knob(Knob::Low);
    let at = slider.target().absolute_left(low);

    slider.handle_pointer_down(at);
    assert_eq!(slider.selected_knob(), Knob::Low);
    slider.handle_pointer_up(at);

    slider.handle_pointer_down(at + Px(1));
    assert_eq!(slider.selected_knob(), Knob::High);
}

#[test]
fn crossover_is_reported_but_allowed_by_default() {
    let (mut slider, commits) = slider_with(SliderConfig::default());
    slider.set_current_values(40.0, 60.0, false);

    slider.handle_pointer_down(Px(30));
    assert_eq!(slider.selected_knob(), Knob::Low);
    slider.handle_pointer_move(Px(80));
    slider.handle_pointer_up(Px(80));

    assert_eq!(slider.values(), CurrentValues::new(80.0, 60.0));
    assert_eq!(commits.lock().as_slice(), &[final_commit(80.0, 60.0)]);
}

#[test]
fn clamp_policy_stops_at_the_other_knob() {
    let config = SliderConfig::default().crossover_policy(CrossoverPolicy::Clamp);
    let (mut slider, commits) = slider_with(config);
    slider.set_current_values(40.0, 60.0, false);

    slider.handle_pointer_down(Px(30));
    slider.handle_pointer_move(Px(80));
    slider.handle_pointer_up(Px(80));
    assert_eq!(slider.values(), CurrentValues::new(60.0, 60.0));
    assert_eq!(commits.lock().as_slice(), &[final_commit(60.0, 60.0)]);

    slider.handle_key_down(SliderKey::Right, false);
    slider.handle_key_up();
    assert_eq!(slider.values(), CurrentValues::new(60.0, 60.0));
}

#[test]
fn ticks_and_labels_follow_reconfiguration() {
    let config = SliderConfig::default().tick_count(4).label_count(2);
    let (mut slider, _) = slider_with(config);
    assert_eq!(slider.elements().ticks().len(), 5);

    let texts: Vec<String> = slider
        .elements()
        .labels()
        .iter()
        .map(|&label| slider.target().text(label).to_owned())
        .collect();
    assert_eq!(texts, vec!["0.0", "50.0", "100.0"]);

    slider.set_range(-1.0, 1.0);
    let middle = slider.elements().labels()[1];
    assert_eq!(slider.target().text(middle), "0.0");

    slider.set_enabled(false);
    let tick = slider.elements().ticks()[0];
    assert_eq!(slider.target().class_name(tick), class_names::TICK_DISABLED);
    assert_eq!(slider.target().class_name(middle), class_names::LABEL_DISABLED);

    slider.set_label_count(0);
    assert!(
        slider
            .elements()
            .labels()
            .iter()
            .all(|&label| slider.target().visibility(label) == Visibility::Collapsed)
    );
}

#[test]
fn degenerate_range_pins_everything_to_min() {
    let (mut slider, _) = slider_with(SliderConfig::default().range_min(10.0).range_max(10.0));
    assert_eq!(slider.total_range(), 0.0);

    slider.handle_pointer_down(Px(70));
    slider.handle_pointer_up(Px(70));
    assert_eq!(slider.values(), CurrentValues::new(10.0, 10.0));

    let high_fill = slider.elements().progress(Knob::High);
    assert_eq!(slider.target().width_percent(high_fill), Some(0.0));
}
