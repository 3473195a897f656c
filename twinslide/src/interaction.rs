//! Drag and keyboard interaction state.
//!
//! [`transition`] is a pure function from the current state and one input
//! event to the next state plus a list of [`Effect`]s. It never touches
//! values, geometry or the render target; the controller executes the
//! effects in order.

use smallvec::SmallVec;

use crate::{
    key_repeat::{RepeatTick, StepDirection},
    px::Px,
    selector::{Knob, select_knob},
};

/// Where a single interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A pointer is dragging `knob`.
    DraggingPointer {
        /// Knob chosen on pointer-down; fixed for the whole drag.
        knob: Knob,
        /// Last pointer coordinate, replayed when focus is lost mid-drag.
        last_x: Px,
    },
    /// A directional key is held.
    DraggingKeyboard {
        /// Direction of every step.
        direction: StepDirection,
        /// Grid steps per step.
        multiplier: u32,
    },
}

impl InteractionState {
    /// Whether any drag is in progress.
    pub fn is_dragging(&self) -> bool {
        !matches!(self, InteractionState::Idle)
    }
}

/// Keys the slider reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderKey {
    /// Step the selected knob down.
    Left,
    /// Step the selected knob up.
    Right,
    /// Collapse both knobs onto `min`.
    Home,
    /// Collapse both knobs onto `max`.
    End,
    /// Collapse both knobs onto the middle of the range.
    Space,
    /// Any other key; ignored.
    Other,
}

/// Value both knobs collapse onto for [`SliderKey::Home`], [`SliderKey::End`]
/// and [`SliderKey::Space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollapseTarget {
    /// The range minimum.
    Min,
    /// The range maximum.
    Max,
    /// `min + total / 2`.
    Middle,
}

/// One input delivered to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer pressed (or touch started) at `x`, with the knobs' measured
    /// left edges in the same coordinate space.
    PointerDown {
        /// Pointer coordinate.
        x: Px,
        /// Left edge of the low knob.
        low_x: Px,
        /// Left edge of the high knob.
        high_x: Px,
    },
    /// Pointer moved to `x`.
    PointerMove {
        /// Pointer coordinate.
        x: Px,
    },
    /// Pointer released at `x`.
    PointerUp {
        /// Pointer coordinate.
        x: Px,
    },
    /// A key went down.
    KeyDown {
        /// The key.
        key: SliderKey,
        /// Grid steps for a directional key: `1`, or the coarse multiplier
        /// when the modifier is held.
        multiplier: u32,
    },
    /// A key went up.
    KeyUp,
    /// Focus gained.
    Focus,
    /// Focus lost.
    Blur,
    /// The key repeat timer fired.
    Repeat(RepeatTick),
}

/// Side effects requested by a transition, executed in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Toggle the focus highlight.
    Highlight(bool),
    /// Make `knob` the target of later keyboard steps.
    Select(Knob),
    /// Show `knob` and the line as being dragged.
    StartSliding(Knob),
    /// Show `knob` as released and the line as idle.
    StopSliding(Knob),
    /// Move `knob` to the value under `x`. When `preview` is set the move is
    /// reported as a live update in super-immediate mode.
    ApplyPointer {
        /// Knob being dragged.
        knob: Knob,
        /// Pointer coordinate.
        x: Px,
        /// Whether this is an intermediate position.
        preview: bool,
    },
    /// Move the selected knob by `multiplier` steps.
    Step {
        /// Direction of the step.
        direction: StepDirection,
        /// Grid steps to move.
        multiplier: u32,
    },
    /// Put both knobs on one value and commit.
    Collapse(CollapseTarget),
    /// Arm the key repeat timer.
    ScheduleRepeat {
        /// Direction of repeated steps.
        direction: StepDirection,
        /// Grid steps per repeated step.
        multiplier: u32,
    },
    /// Stop the key repeat timer.
    CancelRepeat,
    /// Report the current values to the host as final.
    Commit,
}

/// Effects of one transition. Inline storage covers every transition.
pub type Effects = SmallVec<[Effect; 6]>;

/// Result of [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: InteractionState,
    /// Effects to execute, in order.
    pub effects: Effects,
}

impl Transition {
    fn stay(state: InteractionState) -> Self {
        Self {
            state,
            effects: Effects::new(),
        }
    }

    fn to(state: InteractionState, effects: impl IntoIterator<Item = Effect>) -> Self {
        Self {
            state,
            effects: effects.into_iter().collect(),
        }
    }
}

/// Computes the next state for `event`.
///
/// `selected` is the knob keyboard steps currently apply to.
pub fn transition(state: InteractionState, event: InputEvent, selected: Knob) -> Transition {
    use InteractionState::{DraggingKeyboard, DraggingPointer, Idle};

    match (state, event) {
        (Idle, InputEvent::PointerDown { x, low_x, high_x }) => {
            let knob = select_knob(x, low_x, high_x);
            Transition::to(
                DraggingPointer { knob, last_x: x },
                [
                    Effect::Highlight(true),
                    Effect::Select(knob),
                    Effect::StartSliding(knob),
                    Effect::ApplyPointer {
                        knob,
                        x,
                        preview: true,
                    },
                ],
            )
        }
        // A second press while dragging keeps the knob chosen first.
        (DraggingPointer { knob, .. }, InputEvent::PointerDown { x, .. })
        | (DraggingPointer { knob, .. }, InputEvent::PointerMove { x }) => Transition::to(
            DraggingPointer { knob, last_x: x },
            [Effect::ApplyPointer {
                knob,
                x,
                preview: true,
            }],
        ),
        (DraggingPointer { knob, .. }, InputEvent::PointerUp { x }) => Transition::to(
            Idle,
            [
                Effect::ApplyPointer {
                    knob,
                    x,
                    preview: false,
                },
                Effect::StopSliding(knob),
                Effect::Commit,
            ],
        ),
        (DraggingPointer { knob, last_x }, InputEvent::Blur) => Transition::to(
            Idle,
            [
                Effect::CancelRepeat,
                Effect::ApplyPointer {
                    knob,
                    x: last_x,
                    preview: false,
                },
                Effect::StopSliding(knob),
                Effect::Commit,
                Effect::Highlight(false),
            ],
        ),
        (DraggingKeyboard { .. }, InputEvent::Blur) => Transition::to(
            Idle,
            [
                Effect::CancelRepeat,
                Effect::StopSliding(selected),
                Effect::Commit,
                Effect::Highlight(false),
            ],
        ),
        (Idle, InputEvent::Blur) => {
            Transition::to(Idle, [Effect::CancelRepeat, Effect::Highlight(false)])
        }
        (state, InputEvent::Focus) => Transition::to(state, [Effect::Highlight(true)]),

        // Keyboard.
        (DraggingKeyboard { .. }, InputEvent::KeyDown { .. }) => Transition::stay(state),
        (Idle, InputEvent::KeyDown { key, multiplier }) => {
            let direction = match key {
                SliderKey::Left => StepDirection::Decrease,
                SliderKey::Right => StepDirection::Increase,
                _ => return collapse(state, key),
            };
            Transition::to(
                DraggingKeyboard {
                    direction,
                    multiplier,
                },
                [
                    Effect::Step {
                        direction,
                        multiplier,
                    },
                    Effect::ScheduleRepeat {
                        direction,
                        multiplier,
                    },
                ],
            )
        }
        (DraggingPointer { .. }, InputEvent::KeyDown { key, .. }) => collapse(state, key),
        (DraggingKeyboard { .. }, InputEvent::KeyUp) => Transition::to(
            Idle,
            [
                Effect::CancelRepeat,
                Effect::StopSliding(selected),
                Effect::Commit,
            ],
        ),
        (_, InputEvent::KeyUp) => Transition::to(state, [Effect::CancelRepeat]),
        (
            DraggingKeyboard {
                direction,
                multiplier,
            },
            InputEvent::Repeat(tick),
        ) => {
            let mut effects = Effects::new();
            if tick.first {
                effects.push(Effect::StartSliding(selected));
            }
            effects.push(Effect::Step {
                direction,
                multiplier,
            });
            Transition { state, effects }
        }
        // A tick outside a keyboard drag belongs to a sequence that should
        // have been cancelled already.
        (_, InputEvent::Repeat(_)) => Transition::to(state, [Effect::CancelRepeat]),

        (DraggingKeyboard { .. }, InputEvent::PointerDown { .. })
        | (Idle | DraggingKeyboard { .. }, InputEvent::PointerMove { .. })
        | (Idle | DraggingKeyboard { .. }, InputEvent::PointerUp { .. }) => Transition::stay(state),
    }
}

fn collapse(state: InteractionState, key: SliderKey) -> Transition {
    let target = match key {
        SliderKey::Home => CollapseTarget::Min,
        SliderKey::End => CollapseTarget::Max,
        SliderKey::Space => CollapseTarget::Middle,
        SliderKey::Left | SliderKey::Right | SliderKey::Other => return Transition::stay(state),
    };
    Transition::to(state, [Effect::Collapse(target)])
}
