//! The range slider controller.
//!
//! [`RangeSliderController`] owns the configuration, the current values and
//! the interaction state of one slider. Hosts feed it input events and layout
//! changes; it drives the [`RenderTarget`] and reports value changes through
//! [`HostSync`].
//!
//! # Reentrancy
//!
//! A host must not call back into the controller from inside
//! [`HostSync::commit`]. Instead it files requests on the [`HostRequests`]
//! passed alongside the event. Requests of the same kind coalesce (the last
//! one wins) and are applied once the commit returns. Applying them may
//! commit again; that chain is bounded to [`MAX_NESTED_ROUNDS`] rounds, after
//! which further requests are dropped with a warning.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::{
    callback::{CallbackWith, LabelFormatter},
    config::{CrossoverPolicy, HostState, SliderConfig},
    confine::CurrentValues,
    geometry::TrackGeometry,
    interaction::{CollapseTarget, Effect, InputEvent, InteractionState, SliderKey, transition},
    key_repeat::{KeyRepeatScheduler, StepDirection},
    px::{Px, PxSize},
    render::{RenderTarget, SliderElements},
    selector::Knob,
};

/// Upper bound on request rounds applied after a single commit.
pub const MAX_NESTED_ROUNDS: usize = 8;

/// A value change reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitEvent {
    /// The values after the change.
    pub values: CurrentValues,
    /// `true` for a live update during a drag (super-immediate mode),
    /// `false` for a finalized value.
    pub immediate: bool,
    /// Whether the host should synchronize at once instead of batching.
    pub flush: bool,
}

/// Updates a host wants applied after the current commit returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostRequests {
    values: Option<(CurrentValues, bool)>,
    size: Option<PxSize>,
    config: Option<SliderConfig>,
}

impl HostRequests {
    /// Requests [`RangeSliderController::set_current_values`].
    pub fn set_current_values(&mut self, low: f64, high: f64, commit: bool) {
        self.values = Some((CurrentValues::new(low, high), commit));
    }

    /// Requests [`RangeSliderController::handle_resize`].
    pub fn resize(&mut self, size: PxSize) {
        self.size = Some(size);
    }

    /// Requests [`RangeSliderController::configure`].
    pub fn configure(&mut self, config: SliderConfig) {
        self.config = Some(config);
    }

    /// Whether nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.values.is_none() && self.size.is_none() && self.config.is_none()
    }
}

/// Receives value changes.
pub trait HostSync {
    /// Called whenever an interaction finalizes a value, or on every
    /// intermediate move in super-immediate mode.
    fn commit(&mut self, event: &CommitEvent, requests: &mut HostRequests);
}

impl HostSync for CallbackWith<CommitEvent> {
    fn commit(&mut self, event: &CommitEvent, _requests: &mut HostRequests) {
        self.call(*event);
    }
}

/// Orchestrates a dual-knob range slider on a render target.
pub struct RangeSliderController<T: RenderTarget> {
    target: T,
    elements: SliderElements<T::Element>,
    config: SliderConfig,
    values: CurrentValues,
    state: InteractionState,
    selected: Knob,
    focused: bool,
    scheduler: KeyRepeatScheduler,
    track: Option<TrackGeometry>,
    host: Option<Box<dyn HostSync>>,
    deferred: HostRequests,
    committing: bool,
}

impl<T: RenderTarget> RangeSliderController<T> {
    /// Creates a slider with the default configuration, both knobs at the
    /// ends of the range.
    pub fn new(target: T) -> Self {
        Self::with_config(target, SliderConfig::default())
    }

    /// Creates a slider with `config`, both knobs at the ends of the range.
    pub fn with_config(mut target: T, config: SliderConfig) -> Self {
        let elements = SliderElements::create(&mut target);
        let values = config
            .confiner()
            .confine_values(CurrentValues::new(config.range_min, config.range_max));
        let mut controller = Self {
            target,
            elements,
            scheduler: KeyRepeatScheduler::new(config.key_repeat),
            config,
            values,
            state: InteractionState::Idle,
            selected: Knob::Low,
            focused: false,
            track: None,
            host: None,
            deferred: HostRequests::default(),
            committing: false,
        };
        controller.refresh_line_class();
        controller.redraw();
        controller
    }

    /// Installs the receiver of value changes.
    pub fn set_host_sync(&mut self, host: impl HostSync + 'static) {
        self.host = Some(Box::new(host));
    }

    /// Installs a closure as the receiver of value changes.
    pub fn on_commit<F>(&mut self, on_commit: F)
    where
        F: Fn(CommitEvent) + Send + Sync + 'static,
    {
        self.set_host_sync(CallbackWith::new(on_commit));
    }

    /// The current values.
    pub fn values(&self) -> CurrentValues {
        self.values
    }

    /// The active configuration.
    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    /// `max - min`, or `0` for an inverted range.
    pub fn total_range(&self) -> f64 {
        self.config.range().total()
    }

    /// The interaction in progress.
    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    /// The knob keyboard steps apply to.
    pub fn selected_knob(&self) -> Knob {
        self.selected
    }

    /// Whether the focus highlight is on.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// When [`RangeSliderController::tick`] should next be called.
    pub fn next_repeat_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// The track measured by the last layout pass.
    pub fn track(&self) -> Option<TrackGeometry> {
        self.track
    }

    /// The render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The render target, mutably. Call [`RangeSliderController::redraw`]
    /// after changing anything that affects measurements.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Handles to the slider's elements.
    pub fn elements(&self) -> &SliderElements<T::Element> {
        &self.elements
    }

    /// Replaces the configuration, re-confines the current values and
    /// redraws. Commits when the values moved.
    #[tracing::instrument(level = "debug", skip(self, config))]
    pub fn configure(&mut self, config: SliderConfig) {
        if self.apply_config(config) {
            self.emit_commit(false);
        }
    }

    /// Sets the range bounds.
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.reconfigure(|config| {
            config.range_min = min;
            config.range_max = max;
        });
    }

    /// Sets the step. Non-positive steps fall back to
    /// [`crate::confine::StepSize::FALLBACK`].
    pub fn set_step_size(&mut self, step_size: f64) {
        self.reconfigure(|config| config.step_size = step_size);
    }

    /// Sets the number of tick intervals. Negative counts are a programming
    /// error.
    pub fn set_tick_count(&mut self, count: i64) {
        if let Some(count) = checked_count("tick", count) {
            self.reconfigure(|config| config.tick_count = count);
        }
    }

    /// Sets the number of label intervals. Negative counts are a programming
    /// error.
    pub fn set_label_count(&mut self, count: i64) {
        if let Some(count) = checked_count("label", count) {
            self.reconfigure(|config| config.label_count = count);
        }
    }

    /// Enables or disables input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.reconfigure(|config| config.enabled = enabled);
    }

    /// Makes the slider read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.reconfigure(|config| config.read_only = read_only);
    }

    /// Sets the flush flag carried by every [`CommitEvent`].
    pub fn set_immediate(&mut self, immediate: bool) {
        self.reconfigure(|config| config.immediate = immediate);
    }

    /// Reports intermediate drag positions when set.
    pub fn set_super_immediate(&mut self, super_immediate: bool) {
        self.reconfigure(|config| config.super_immediate = super_immediate);
    }

    /// Sets the text appended to labels.
    pub fn set_label_suffix(&mut self, suffix: impl Into<String>) {
        let suffix = suffix.into();
        self.reconfigure(|config| config.label_suffix = suffix);
    }

    /// Replaces the label formatter.
    pub fn set_label_formatter(&mut self, formatter: LabelFormatter) {
        self.reconfigure(|config| config.label_formatter = formatter);
    }

    /// Applies host-owned configuration and values without committing. A
    /// drag in progress is dropped.
    pub fn sync_from_host(&mut self, state: HostState) {
        debug!(low = state.low, high = state.high, "syncing from host");
        if self.state.is_dragging() {
            self.abort_interaction();
        }
        self.apply_config(state.config);
        self.store_values(CurrentValues::new(state.low, state.high));
    }

    /// Confines and shows new values; reports them when `commit` is set.
    pub fn set_current_values(&mut self, low: f64, high: f64, commit: bool) {
        self.store_values(CurrentValues::new(low, high));
        if commit {
            self.emit_commit(false);
        }
    }

    /// Sets up the root for layout and runs a layout pass. Call once the
    /// target is mounted.
    pub fn on_attach(&mut self) {
        self.elements.set_focused(&mut self.target, self.focused);
        self.redraw();
    }

    /// Re-measures the root and lays everything out. A no-op while detached.
    pub fn redraw(&mut self) {
        if self.target.is_attached() {
            let size = self.target.client_size();
            self.handle_resize(size.width, size.height);
        }
    }

    /// Centers the track in a root of `width` and lays out labels, ticks,
    /// knobs and progress fills.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn handle_resize(&mut self, width: Px, height: Px) {
        if !self.target.is_attached() {
            trace!("skipping layout of detached slider");
            return;
        }
        let track = self.elements.center_line(&mut self.target, width);
        debug!(origin = %track.origin, length = %track.length, "track laid out");
        self.track = Some(track);
        self.elements.draw_labels(&mut self.target, track, &self.config);
        self.elements.draw_ticks(
            &mut self.target,
            track,
            self.config.tick_count,
            self.config.enabled,
        );
        self.draw_knobs();
    }

    /// Pointer pressed or touch started at `x`.
    pub fn handle_pointer_down(&mut self, x: Px) {
        if !self.accepts_input() {
            return;
        }
        if !self.target.is_attached() {
            trace!("ignoring pointer press on detached slider");
            return;
        }
        let low_x = self.target.absolute_left(self.elements.knob(Knob::Low));
        let high_x = self.target.absolute_left(self.elements.knob(Knob::High));
        self.dispatch(InputEvent::PointerDown { x, low_x, high_x }, Instant::now());
    }

    /// Pointer or touch moved to `x`.
    pub fn handle_pointer_move(&mut self, x: Px) {
        if self.accepts_input() {
            self.dispatch(InputEvent::PointerMove { x }, Instant::now());
        }
    }

    /// Pointer released at `x`.
    pub fn handle_pointer_up(&mut self, x: Px) {
        if self.accepts_input() {
            self.dispatch(InputEvent::PointerUp { x }, Instant::now());
        }
    }

    /// A key went down. `ctrl` selects coarse steps for arrow keys.
    pub fn handle_key_down(&mut self, key: SliderKey, ctrl: bool) {
        self.handle_key_down_at(key, ctrl, Instant::now());
    }

    /// [`RangeSliderController::handle_key_down`] at an explicit time.
    pub fn handle_key_down_at(&mut self, key: SliderKey, ctrl: bool, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        let multiplier = if ctrl {
            self.config.coarse_multiplier()
        } else {
            1
        };
        self.dispatch(InputEvent::KeyDown { key, multiplier }, now);
    }

    /// A key went up.
    pub fn handle_key_up(&mut self) {
        self.handle_key_up_at(Instant::now());
    }

    /// [`RangeSliderController::handle_key_up`] at an explicit time.
    pub fn handle_key_up_at(&mut self, now: Instant) {
        if self.accepts_input() {
            self.dispatch(InputEvent::KeyUp, now);
        }
    }

    /// Focus gained.
    pub fn handle_focus(&mut self) {
        if self.accepts_input() {
            self.dispatch(InputEvent::Focus, Instant::now());
        }
    }

    /// Focus lost. Finalizes any drag in progress.
    pub fn handle_blur(&mut self) {
        if self.accepts_input() {
            self.dispatch(InputEvent::Blur, Instant::now());
        }
    }

    /// Drives the key repeat timer. Returns whether a repeat step fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.scheduler.poll(now) {
            Some(tick) => {
                self.dispatch(InputEvent::Repeat(tick), now);
                true
            }
            None => false,
        }
    }

    fn accepts_input(&self) -> bool {
        self.config.accepts_input()
    }

    fn dispatch(&mut self, event: InputEvent, now: Instant) {
        let next = transition(self.state, event, self.selected);
        trace!(?event, from = ?self.state, to = ?next.state, "interaction transition");
        self.state = next.state;
        for effect in next.effects {
            // A nested host request may have ended the interaction.
            if self.state != next.state {
                debug!(?effect, state = ?self.state, "dropping effects of interrupted transition");
                break;
            }
            self.execute(effect, now);
        }
    }

    fn execute(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::Highlight(focused) => {
                self.focused = focused;
                self.elements.set_focused(&mut self.target, focused);
            }
            Effect::Select(knob) => self.selected = knob,
            Effect::StartSliding(knob) => {
                self.elements.set_line_state(&mut self.target, self.config.enabled, true);
                self.elements.set_knob_active(&mut self.target, knob, true);
            }
            Effect::StopSliding(knob) => {
                self.elements.set_line_state(&mut self.target, self.config.enabled, false);
                self.elements.set_knob_active(&mut self.target, knob, false);
            }
            Effect::ApplyPointer { knob, x, preview } => {
                if let Some(value) = self.value_at_pointer(x) {
                    self.move_knob(knob, value, preview && self.config.super_immediate);
                }
            }
            Effect::Step {
                direction,
                multiplier,
            } => self.step_selected(direction, multiplier),
            Effect::Collapse(target) => {
                let range = self.config.range();
                let value = match target {
                    CollapseTarget::Min => range.min,
                    CollapseTarget::Max => range.max,
                    CollapseTarget::Middle => range.midpoint(),
                };
                self.set_current_values(value, value, true);
            }
            Effect::ScheduleRepeat {
                direction,
                multiplier,
            } => self.scheduler.schedule(direction, multiplier, now),
            Effect::CancelRepeat => {
                self.scheduler.cancel();
            }
            Effect::Commit => self.emit_commit(false),
        }
    }

    fn value_at_pointer(&self, x: Px) -> Option<f64> {
        if !self.target.is_attached() {
            return None;
        }
        let line = self.elements.line();
        let origin = self.target.absolute_left(line).to_f64();
        let length = self.target.offset_width(line).to_f64();
        Some(self.config.range().from_pixel(x.to_f64(), origin, length))
    }

    fn step_selected(&mut self, direction: StepDirection, multiplier: u32) {
        let knob = self.selected;
        let delta = direction.sign() * f64::from(multiplier) * self.config.step().get();
        let value = self.values.get(knob) + delta;
        self.move_knob(knob, value, self.config.super_immediate);
    }

    /// Confines `raw`, applies the crossover policy and shows the result.
    fn move_knob(&mut self, knob: Knob, raw: f64, live_commit: bool) {
        let mut value = self.config.confiner().confine(raw);
        let other = self.values.get(knob.opposite());
        let crosses = match knob {
            Knob::Low => value > other,
            Knob::High => value < other,
        };
        if crosses && self.config.crossover_policy == CrossoverPolicy::Clamp {
            trace!(%knob, value, other, "clamping knob at the other knob");
            value = other;
        }
        self.values = self.values.with(knob, value);
        self.report_crossover();
        self.draw_knobs();
        if live_commit {
            self.emit_commit(true);
        }
    }

    fn store_values(&mut self, values: CurrentValues) {
        self.values = self.config.confiner().confine_values(values);
        self.report_crossover();
        self.draw_knobs();
    }

    fn report_crossover(&self) {
        if self.values.is_crossed() {
            warn!(
                low = self.values.low,
                high = self.values.high,
                "low value is greater than high value"
            );
        }
    }

    fn draw_knobs(&mut self) {
        if !self.target.is_attached() {
            return;
        }
        if let Some(track) = self.track {
            self.elements.draw_knobs_and_progress(
                &mut self.target,
                track,
                self.config.range(),
                self.values,
            );
        }
    }

    fn refresh_line_class(&mut self) {
        self.elements.set_line_state(
            &mut self.target,
            self.config.enabled,
            self.state.is_dragging(),
        );
    }

    fn reconfigure(&mut self, update: impl FnOnce(&mut SliderConfig)) {
        let mut config = self.config.clone();
        update(&mut config);
        self.configure(config);
    }

    /// Installs `config` and returns whether the host should hear about it:
    /// the values moved, or a drag was cut short because input was turned
    /// off.
    fn apply_config(&mut self, config: SliderConfig) -> bool {
        debug!(
            min = config.range_min,
            max = config.range_max,
            step = config.step().get(),
            ticks = config.tick_count,
            labels = config.label_count,
            "applying slider configuration"
        );
        let previous = self.values;
        self.scheduler.set_delays(config.key_repeat);
        self.config = config;

        let mut interrupted = false;
        if !self.config.accepts_input() && self.state.is_dragging() {
            self.abort_interaction();
            interrupted = true;
        }
        self.values = self.config.confiner().confine_values(self.values);
        self.report_crossover();
        self.refresh_line_class();
        self.redraw();
        interrupted || self.values != previous
    }

    /// Drops the drag in progress without committing.
    fn abort_interaction(&mut self) {
        debug!(state = ?self.state, "interaction aborted");
        self.scheduler.cancel();
        let knob = match self.state {
            InteractionState::DraggingPointer { knob, .. } => knob,
            _ => self.selected,
        };
        self.state = InteractionState::Idle;
        self.elements.set_knob_active(&mut self.target, knob, false);
    }

    fn emit_commit(&mut self, immediate: bool) {
        let event = CommitEvent {
            values: self.values,
            immediate,
            flush: self.config.immediate,
        };
        trace!(?event, "commit");
        if let Some(host) = self.host.as_mut() {
            host.commit(&event, &mut self.deferred);
        }
        if self.committing {
            // The outermost commit drains the requests.
            return;
        }
        self.committing = true;
        let mut rounds = 0;
        while !self.deferred.is_empty() {
            if rounds == MAX_NESTED_ROUNDS {
                warn!(
                    rounds,
                    requests = ?self.deferred,
                    "dropping host requests after too many nested commits"
                );
                self.deferred = HostRequests::default();
                break;
            }
            rounds += 1;
            let requests = std::mem::take(&mut self.deferred);
            self.apply_requests(requests);
        }
        self.committing = false;
    }

    fn apply_requests(&mut self, requests: HostRequests) {
        if let Some(config) = requests.config {
            self.configure(config);
        }
        if let Some(size) = requests.size {
            self.handle_resize(size.width, size.height);
        }
        if let Some((values, commit)) = requests.values {
            self.set_current_values(values.low, values.high, commit);
        }
    }
}

fn checked_count(kind: &str, count: i64) -> Option<usize> {
    debug_assert!(count >= 0, "{kind} count must not be negative, got {count}");
    match usize::try_from(count) {
        Ok(count) => Some(count),
        Err(_) => {
            warn!(count, "ignoring negative {kind} count");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use parking_lot::Mutex;

    use super::*;
    use crate::{
        headless::{HeadlessMetrics, HeadlessTarget},
        render::{Visibility, class_names},
    };

    fn attached(width: i32) -> HeadlessTarget {
        let mut target = HeadlessTarget::new(HeadlessMetrics {
            knob_width: Px(10),
            ..HeadlessMetrics::default()
        });
        target.attach(PxSize::new(Px(width), Px(20)));
        target
    }

    fn slider(config: SliderConfig) -> RangeSliderController<HeadlessTarget> {
        let mut slider = RangeSliderController::with_config(attached(100), config);
        slider.on_attach();
        slider
    }

    type Commits = Arc<Mutex<Vec<CommitEvent>>>;

    fn record(slider: &mut RangeSliderController<HeadlessTarget>) -> Commits {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&commits);
        slider.on_commit(move |event| sink.lock().push(event));
        commits
    }

    #[test]
    fn starts_at_the_range_ends() {
        let slider = slider(SliderConfig::default());
        assert_eq!(slider.values(), CurrentValues::new(0.0, 100.0));
        assert_eq!(slider.total_range(), 100.0);
        assert_eq!(slider.interaction_state(), InteractionState::Idle);
        assert_eq!(
            slider.track(),
            Some(TrackGeometry {
                origin: Px(0),
                length: Px(100)
            })
        );
    }

    #[test]
    fn set_current_values_commits_only_on_request() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);

        slider.set_current_values(23.0, 67.0, false);
        assert_eq!(slider.values(), CurrentValues::new(20.0, 70.0));
        assert!(commits.lock().is_empty());

        slider.set_current_values(41.0, 88.0, true);
        assert_eq!(
            commits.lock().as_slice(),
            &[CommitEvent {
                values: CurrentValues::new(40.0, 90.0),
                immediate: false,
                flush: false,
            }]
        );
    }

    #[test]
    fn super_immediate_reports_intermediate_moves() {
        let mut slider = slider(SliderConfig::default().super_immediate(true).immediate(true));
        let commits = record(&mut slider);

        slider.handle_pointer_down(Px(12));
        slider.handle_pointer_move(Px(31));
        slider.handle_pointer_up(Px(33));

        let commits = commits.lock();
        let flags: Vec<bool> = commits.iter().map(|c| c.immediate).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert!(commits.iter().all(|c| c.flush));
        assert_eq!(commits[2].values, CurrentValues::new(30.0, 100.0));
    }

    #[test]
    fn ordinary_drag_commits_once() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);

        slider.handle_pointer_down(Px(90));
        assert_eq!(slider.selected_knob(), Knob::High);
        slider.handle_pointer_move(Px(72));
        assert_eq!(slider.values().high, 70.0);
        assert!(commits.lock().is_empty());

        slider.handle_pointer_up(Px(58));
        assert_eq!(commits.lock().len(), 1);
        assert_eq!(commits.lock()[0].values, CurrentValues::new(0.0, 60.0));
    }

    #[test]
    fn dragging_updates_classes() {
        let mut slider = slider(SliderConfig::default());
        let line = slider.elements().line();
        let high = slider.elements().knob(Knob::High);

        slider.handle_pointer_down(Px(80));
        assert_eq!(slider.target().class_name(line), class_names::LINE_SLIDING);
        assert_eq!(slider.target().class_name(high), class_names::KNOB_HIGH);
        assert!(slider.is_focused());

        slider.handle_pointer_up(Px(80));
        assert_eq!(slider.target().class_name(line), class_names::LINE);
        assert_eq!(slider.target().class_name(high), class_names::KNOB_HIGH_INACTIVE);
    }

    #[test]
    fn disabled_slider_ignores_input_but_accepts_values() {
        let mut slider = slider(SliderConfig::default().enabled(false));
        let commits = record(&mut slider);
        let line = slider.elements().line();
        assert_eq!(slider.target().class_name(line), class_names::LINE_DISABLED);

        slider.handle_pointer_down(Px(50));
        slider.handle_key_down(SliderKey::Home, false);
        assert_eq!(slider.values(), CurrentValues::new(0.0, 100.0));
        assert_eq!(slider.interaction_state(), InteractionState::Idle);

        slider.set_current_values(30.0, 40.0, true);
        assert_eq!(slider.values(), CurrentValues::new(30.0, 40.0));
        assert_eq!(commits.lock().len(), 1);
    }

    #[test]
    fn read_only_slider_ignores_keys() {
        let mut slider = slider(SliderConfig::default().read_only(true));
        slider.handle_key_down(SliderKey::End, false);
        assert_eq!(slider.values(), CurrentValues::new(0.0, 100.0));
    }

    #[test]
    fn reconfiguring_commits_only_when_values_move() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);

        slider.set_label_suffix("%");
        assert!(commits.lock().is_empty());

        slider.set_range(0.0, 50.0);
        assert_eq!(slider.values(), CurrentValues::new(0.0, 50.0));
        assert_eq!(commits.lock().len(), 1);
        assert!(!commits.lock()[0].immediate);
    }

    #[test]
    fn non_positive_step_falls_back() {
        let mut slider = slider(SliderConfig::default());
        slider.set_step_size(0.0);
        slider.set_current_values(12.3, 12.8, false);
        assert_eq!(slider.values(), CurrentValues::new(12.5, 13.0));
    }

    #[test]
    fn disabling_mid_drag_ends_the_interaction() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);
        let start = Instant::now();

        slider.handle_key_down_at(SliderKey::Right, false, start);
        assert!(slider.next_repeat_deadline().is_some());

        slider.set_enabled(false);
        assert_eq!(slider.interaction_state(), InteractionState::Idle);
        assert_eq!(slider.next_repeat_deadline(), None);
        assert!(!slider.tick(start + Duration::from_secs(1)));
        assert_eq!(commits.lock().len(), 1);
    }

    #[test]
    fn host_sync_does_not_commit() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);

        slider.sync_from_host(HostState {
            config: SliderConfig::default().range_max(200.0).label_count(2),
            low: 55.0,
            high: 149.0,
        });
        assert_eq!(slider.values(), CurrentValues::new(50.0, 150.0));
        assert_eq!(slider.config().range_max, 200.0);
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn detached_slider_skips_layout() {
        let mut target = HeadlessTarget::new(HeadlessMetrics::default());
        target.set_client_size(PxSize::new(Px(100), Px(20)));
        let mut slider = RangeSliderController::with_config(
            target,
            SliderConfig::default().tick_count(4),
        );
        slider.handle_resize(Px(100), Px(20));
        slider.handle_pointer_down(Px(40));

        assert_eq!(slider.track(), None);
        assert!(slider.elements().ticks().is_empty());
        assert_eq!(slider.interaction_state(), InteractionState::Idle);

        slider.target_mut().attach(PxSize::new(Px(100), Px(20)));
        slider.on_attach();
        assert_eq!(slider.elements().ticks().len(), 5);
    }

    #[test]
    fn tick_pool_is_reused_and_collapsed() {
        let mut slider = slider(SliderConfig::default().tick_count(4));
        let first: Vec<_> = slider.elements().ticks().to_vec();

        slider.set_tick_count(2);
        assert_eq!(slider.elements().ticks(), first.as_slice());
        let visibility: Vec<Visibility> = first
            .iter()
            .map(|&tick| slider.target().visibility(tick))
            .collect();
        assert_eq!(
            visibility,
            vec![
                Visibility::Visible,
                Visibility::Visible,
                Visibility::Visible,
                Visibility::Collapsed,
                Visibility::Collapsed,
            ]
        );

        slider.set_tick_count(0);
        assert!(
            first
                .iter()
                .all(|&tick| slider.target().visibility(tick) == Visibility::Collapsed)
        );
    }

    #[test]
    fn labels_use_formatter_and_suffix() {
        let mut slider = slider(SliderConfig::default().label_count(2).label_suffix("%"));
        let texts: Vec<String> = slider
            .elements()
            .labels()
            .iter()
            .map(|&label| slider.target().text(label).to_owned())
            .collect();
        assert_eq!(texts, vec!["0.0%", "50.0%", "100.0%"]);

        slider.set_label_formatter(LabelFormatter::new(|value, _| format!("<{value}>")));
        let label = slider.elements().labels()[1];
        assert_eq!(slider.target().text(label), "<50>");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "tick count must not be negative")]
    fn negative_tick_count_panics_in_debug() {
        let mut slider = slider(SliderConfig::default());
        slider.set_tick_count(-1);
    }

    #[test]
    fn nested_requests_are_applied_after_the_commit() {
        struct Echo;

        impl HostSync for Echo {
            fn commit(&mut self, event: &CommitEvent, requests: &mut HostRequests) {
                if event.values.high > 50.0 {
                    requests.set_current_values(event.values.low, event.values.high - 10.0, true);
                }
            }
        }

        let mut slider = slider(SliderConfig::default());
        slider.set_host_sync(Echo);
        slider.set_current_values(0.0, 90.0, true);
        // 90 -> 80 -> 70 -> 60 -> 50, each step a nested commit.
        assert_eq!(slider.values(), CurrentValues::new(0.0, 50.0));
    }

    #[test]
    fn runaway_host_requests_are_bounded() {
        struct PingPong {
            commits: Arc<Mutex<usize>>,
        }

        impl HostSync for PingPong {
            fn commit(&mut self, event: &CommitEvent, requests: &mut HostRequests) {
                *self.commits.lock() += 1;
                let low = if event.values.low == 0.0 { 10.0 } else { 0.0 };
                requests.set_current_values(low, event.values.high, true);
            }
        }

        let commits = Arc::new(Mutex::new(0));
        let mut slider = slider(SliderConfig::default());
        slider.set_host_sync(PingPong {
            commits: Arc::clone(&commits),
        });
        slider.set_current_values(0.0, 100.0, true);
        assert_eq!(*commits.lock(), MAX_NESTED_ROUNDS + 1);
    }

    /// Records every commit and files `request` during the first one.
    struct RequestOnce<F> {
        commits: Commits,
        request: Option<F>,
    }

    impl<F: FnOnce(&mut HostRequests)> HostSync for RequestOnce<F> {
        fn commit(&mut self, event: &CommitEvent, requests: &mut HostRequests) {
            self.commits.lock().push(*event);
            if let Some(request) = self.request.take() {
                request(requests);
            }
        }
    }

    fn request_once<F>(slider: &mut RangeSliderController<HeadlessTarget>, request: F) -> Commits
    where
        F: FnOnce(&mut HostRequests) + 'static,
    {
        let commits = Commits::default();
        slider.set_host_sync(RequestOnce {
            commits: Arc::clone(&commits),
            request: Some(request),
        });
        commits
    }

    #[test]
    fn nested_resize_is_laid_out_after_the_commit() {
        let mut slider = slider(SliderConfig::default());
        let commits = request_once(&mut slider, |requests| {
            requests.resize(PxSize::new(Px(200), Px(20)));
        });

        slider.set_current_values(20.0, 60.0, true);
        assert_eq!(commits.lock().len(), 1);
        assert_eq!(
            slider.track(),
            Some(TrackGeometry {
                origin: Px(50),
                length: Px(100)
            })
        );
        // 50 + 0.2 * 100 - 5.
        let low = slider.elements().knob(Knob::Low);
        assert_eq!(slider.target().left(low), Some(Px(65)));
    }

    #[test]
    fn nested_configure_commits_the_reconfined_values() {
        let mut slider = slider(SliderConfig::default());
        let commits = request_once(&mut slider, |requests| {
            requests.configure(SliderConfig::default().range_max(50.0));
        });

        slider.set_current_values(10.0, 90.0, true);
        assert_eq!(slider.config().range_max, 50.0);
        assert_eq!(slider.values(), CurrentValues::new(10.0, 50.0));
        let values: Vec<CurrentValues> = commits.lock().iter().map(|c| c.values).collect();
        assert_eq!(
            values,
            vec![CurrentValues::new(10.0, 90.0), CurrentValues::new(10.0, 50.0)]
        );
    }

    #[test]
    fn disabling_from_a_live_key_step_leaves_no_repeat_armed() {
        let mut slider = slider(SliderConfig::default().super_immediate(true));
        let commits = request_once(&mut slider, |requests| {
            requests.configure(SliderConfig::default().super_immediate(true).enabled(false));
        });
        let start = Instant::now();

        slider.handle_key_down_at(SliderKey::Right, false, start);
        assert!(!slider.config().enabled);
        assert_eq!(slider.interaction_state(), InteractionState::Idle);
        assert_eq!(slider.next_repeat_deadline(), None);
        assert!(!slider.tick(start + Duration::from_secs(1)));
        assert_eq!(slider.values(), CurrentValues::new(10.0, 100.0));

        let flags: Vec<bool> = commits.lock().iter().map(|c| c.immediate).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn host_sync_drops_a_pointer_drag() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);
        let line = slider.elements().line();
        let low = slider.elements().knob(Knob::Low);

        slider.handle_pointer_down(Px(20));
        slider.sync_from_host(HostState {
            config: SliderConfig::default(),
            low: 30.0,
            high: 70.0,
        });
        assert_eq!(slider.interaction_state(), InteractionState::Idle);
        assert_eq!(slider.target().class_name(line), class_names::LINE);
        assert_eq!(slider.target().class_name(low), class_names::KNOB_LOW_INACTIVE);

        slider.handle_pointer_move(Px(80));
        slider.handle_pointer_up(Px(80));
        assert_eq!(slider.values(), CurrentValues::new(30.0, 70.0));
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn host_sync_drops_a_keyboard_drag() {
        let mut slider = slider(SliderConfig::default());
        let commits = record(&mut slider);
        let start = Instant::now();

        slider.handle_key_down_at(SliderKey::Right, false, start);
        slider.sync_from_host(HostState {
            config: SliderConfig::default(),
            low: 0.0,
            high: 100.0,
        });
        assert_eq!(slider.interaction_state(), InteractionState::Idle);
        assert_eq!(slider.next_repeat_deadline(), None);
        assert!(!slider.tick(start + Duration::from_secs(1)));
        assert_eq!(slider.values(), CurrentValues::new(0.0, 100.0));
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn programmatic_values_may_cross_under_clamp() {
        let config = SliderConfig::default().crossover_policy(CrossoverPolicy::Clamp);
        let mut slider = slider(config);
        slider.set_current_values(80.0, 20.0, false);
        assert_eq!(slider.values(), CurrentValues::new(80.0, 20.0));
    }
}
