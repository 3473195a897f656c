//! Render target abstraction and the slider's drawing passes.
//!
//! The slider never draws by itself. It creates a small tree of elements on a
//! [`RenderTarget`], positions them with typed [`Style`] values and reads
//! measured widths back to correct its centering math. Any backend that can
//! host absolutely positioned boxes (a DOM, a retained widget tree, a
//! terminal canvas) can implement the trait.

use std::fmt;

use smallvec::SmallVec;

use crate::{
    config::SliderConfig,
    confine::CurrentValues,
    geometry::{TrackGeometry, ValueRange},
    marks::{self, MarkSlots},
    px::{Px, PxSize},
    selector::Knob,
};

/// Class names assigned to the slider's elements.
pub mod class_names {
    /// Root element.
    pub const ROOT: &str = "twinslide";
    /// Root element while focused.
    pub const ROOT_FOCUSED: &str = "twinslide twinslide-focused";
    /// Track line.
    pub const LINE: &str = "twinslide-line";
    /// Track line while a drag is in progress.
    pub const LINE_SLIDING: &str = "twinslide-line twinslide-line-sliding";
    /// Track line of a disabled slider.
    pub const LINE_DISABLED: &str = "twinslide-line twinslide-line-disabled";
    /// Low knob.
    pub const KNOB_LOW: &str = "twinslide-knob-low";
    /// Low knob after a drag released it.
    pub const KNOB_LOW_INACTIVE: &str = "twinslide-knob-low-inactive";
    /// High knob.
    pub const KNOB_HIGH: &str = "twinslide-knob-high";
    /// High knob after a drag released it.
    pub const KNOB_HIGH_INACTIVE: &str = "twinslide-knob-high-inactive";
    /// Both progress fills.
    pub const PROGRESS: &str = "twinslide-progress";
    /// Tick mark.
    pub const TICK: &str = "twinslide-tick";
    /// Tick mark of a disabled slider.
    pub const TICK_DISABLED: &str = "twinslide-tick twinslide-tick-disabled";
    /// Value label.
    pub const LABEL: &str = "twinslide-label";
    /// Value label of a disabled slider.
    pub const LABEL_DISABLED: &str = "twinslide-label-disabled";
}

/// What an element created by the slider represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// The track line.
    Line,
    /// One of the two knobs.
    Knob(Knob),
    /// Fill between the track origin and the low knob, or between the high
    /// knob and the track end.
    Progress(Knob),
    /// A tick mark.
    Tick,
    /// A value label.
    Label,
}

/// Positioning scheme of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Laid out in normal flow; the reference box for absolute children.
    Relative,
    /// Placed by explicit offsets relative to the root.
    Absolute,
}

/// A single style attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    /// Positioning scheme.
    Position(Position),
    /// Offset of the left edge from the root's left edge.
    Left(Px),
    /// Offset of the right edge from the root's right edge.
    Right(Px),
    /// Width as a percentage of the root's width.
    WidthPercent(f64),
}

/// Whether and how an element is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Drawn.
    #[default]
    Visible,
    /// Not drawn but still laid out, so it can be measured.
    Hidden,
    /// Removed from layout entirely.
    Collapsed,
}

/// Capability set the slider needs from a rendering backend.
///
/// Measurements are only meaningful while [`RenderTarget::is_attached`]
/// returns `true`; the slider skips every geometry-dependent pass otherwise.
pub trait RenderTarget {
    /// Handle to an element owned by the backend.
    type Element: Copy + Eq + fmt::Debug;

    /// The root element the slider's elements are appended to.
    fn root(&self) -> Self::Element;

    /// Whether the root is mounted and measurable.
    fn is_attached(&self) -> bool;

    /// Creates a detached element.
    fn create_element(&mut self, role: ElementRole) -> Self::Element;

    /// Appends `child` to `parent`.
    fn append_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Applies a style attribute.
    fn set_style(&mut self, element: Self::Element, style: Style);

    /// Replaces the element's class name.
    fn set_class_name(&mut self, element: Self::Element, class_name: &str);

    /// Shows, hides or collapses the element.
    fn set_visibility(&mut self, element: Self::Element, visibility: Visibility);

    /// Replaces the element's text content.
    fn set_text(&mut self, element: Self::Element, text: &str);

    /// Measured outer width of the element.
    fn offset_width(&self, element: Self::Element) -> Px;

    /// Left edge of the element in the coordinate space of pointer events.
    fn absolute_left(&self, element: Self::Element) -> Px;

    /// Client area of the root element.
    fn client_size(&self) -> PxSize;
}

/// Share of the track a progress fill may cover at most, in percent.
const PROGRESS_SPAN_PERCENT: f64 = 95.0;

/// Class name of the track line.
pub fn line_class(enabled: bool, sliding: bool) -> &'static str {
    if !enabled {
        class_names::LINE_DISABLED
    } else if sliding {
        class_names::LINE_SLIDING
    } else {
        class_names::LINE
    }
}

/// Class name of a knob.
pub fn knob_class(knob: Knob, active: bool) -> &'static str {
    match (knob, active) {
        (Knob::Low, true) => class_names::KNOB_LOW,
        (Knob::Low, false) => class_names::KNOB_LOW_INACTIVE,
        (Knob::High, true) => class_names::KNOB_HIGH,
        (Knob::High, false) => class_names::KNOB_HIGH_INACTIVE,
    }
}

/// Widths of the two progress fills in percent of the root, low fill first.
///
/// The high fill spans from the high value to `max`; it is empty for a
/// degenerate range.
pub fn progress_widths(range: ValueRange, values: CurrentValues) -> (f64, f64) {
    let low = PROGRESS_SPAN_PERCENT * range.to_fraction(values.low);
    let high = if range.is_degenerate() {
        0.0
    } else {
        PROGRESS_SPAN_PERCENT * (1.0 - range.to_fraction(values.high))
    };
    (low, high)
}

/// Handles to every element the slider owns on a target.
///
/// Ticks and labels are pooled: elements are created on demand, reused on
/// every relayout and collapsed when the count shrinks.
#[derive(Debug, Clone)]
pub struct SliderElements<E> {
    root: E,
    line: E,
    low_knob: E,
    high_knob: E,
    low_progress: E,
    high_progress: E,
    ticks: Vec<E>,
    labels: Vec<E>,
}

impl<E> SliderElements<E>
where
    E: Copy + Eq + fmt::Debug,
{
    /// Creates the fixed part of the element tree under the target's root.
    pub fn create<T>(target: &mut T) -> Self
    where
        T: RenderTarget<Element = E>,
    {
        let root = target.root();
        target.set_style(root, Style::Position(Position::Relative));
        target.set_class_name(root, class_names::ROOT);

        let mut child = |role: ElementRole, class_name: &str| {
            let element = target.create_element(role);
            target.append_child(root, element);
            target.set_style(element, Style::Position(Position::Absolute));
            target.set_class_name(element, class_name);
            element
        };
        let line = child(ElementRole::Line, class_names::LINE);
        let low_knob = child(ElementRole::Knob(Knob::Low), class_names::KNOB_LOW);
        let high_knob = child(ElementRole::Knob(Knob::High), class_names::KNOB_HIGH);
        let low_progress = child(ElementRole::Progress(Knob::Low), class_names::PROGRESS);
        let high_progress = child(ElementRole::Progress(Knob::High), class_names::PROGRESS);

        Self {
            root,
            line,
            low_knob,
            high_knob,
            low_progress,
            high_progress,
            ticks: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// The root element.
    pub fn root(&self) -> E {
        self.root
    }

    /// The track line.
    pub fn line(&self) -> E {
        self.line
    }

    /// The element of `knob`.
    pub fn knob(&self, knob: Knob) -> E {
        match knob {
            Knob::Low => self.low_knob,
            Knob::High => self.high_knob,
        }
    }

    /// The progress fill attached to `knob`.
    pub fn progress(&self, knob: Knob) -> E {
        match knob {
            Knob::Low => self.low_progress,
            Knob::High => self.high_progress,
        }
    }

    /// Every tick element created so far, visible or not.
    pub fn ticks(&self) -> &[E] {
        &self.ticks
    }

    /// Every label element created so far, visible or not.
    pub fn labels(&self) -> &[E] {
        &self.labels
    }

    /// Measures the line, centers it inside a root of `root_width` and
    /// returns the resulting track.
    pub fn center_line<T>(&self, target: &mut T, root_width: Px) -> TrackGeometry
    where
        T: RenderTarget<Element = E>,
    {
        let track = TrackGeometry::centered(root_width, target.offset_width(self.line));
        target.set_style(self.line, Style::Left(track.origin));
        track
    }

    /// Places both knobs and sizes both progress fills.
    pub fn draw_knobs_and_progress<T>(
        &self,
        target: &mut T,
        track: TrackGeometry,
        range: ValueRange,
        values: CurrentValues,
    ) where
        T: RenderTarget<Element = E>,
    {
        for knob in [Knob::Low, Knob::High] {
            let element = self.knob(knob);
            let width = target.offset_width(element);
            let left = track.knob_left(range.to_fraction(values.get(knob)), width);
            target.set_style(element, Style::Left(left));
        }

        let (low_width, high_width) = progress_widths(range, values);
        target.set_style(self.low_progress, Style::Left(track.origin));
        target.set_style(self.low_progress, Style::WidthPercent(low_width));
        target.set_style(self.high_progress, Style::Right(track.origin));
        target.set_style(self.high_progress, Style::WidthPercent(high_width));
    }

    /// Lays out `count + 1` tick marks along the track.
    pub fn draw_ticks<T>(
        &mut self,
        target: &mut T,
        track: TrackGeometry,
        count: usize,
        enabled: bool,
    ) where
        T: RenderTarget<Element = E>,
    {
        let class_name = if enabled {
            class_names::TICK
        } else {
            class_names::TICK_DISABLED
        };
        let widths = prepare_pool(
            target,
            self.root,
            &mut self.ticks,
            ElementRole::Tick,
            count,
            |target, tick, _| target.set_class_name(tick, class_name),
        );
        place_marks(target, &self.ticks, marks::layout_marks(count, track, |i| widths[i]));
        collapse_unused(target, &self.ticks, count);
    }

    /// Lays out `label_count + 1` value labels along the track.
    pub fn draw_labels<T>(&mut self, target: &mut T, track: TrackGeometry, config: &SliderConfig)
    where
        T: RenderTarget<Element = E>,
    {
        let count = config.label_count;
        let range = config.range();
        let class_name = if config.enabled {
            class_names::LABEL
        } else {
            class_names::LABEL_DISABLED
        };
        let widths = prepare_pool(
            target,
            self.root,
            &mut self.labels,
            ElementRole::Label,
            count,
            |target, label, index| {
                target.set_class_name(label, class_name);
                let value = marks::mark_value(range, index, count);
                let text = config.label_formatter.format(value, &config.label_suffix);
                target.set_text(label, &text);
                // Measure unclipped by the root's right edge.
                target.set_style(label, Style::Left(Px::ZERO));
            },
        );
        place_marks(target, &self.labels, marks::layout_marks(count, track, |i| widths[i]));
        collapse_unused(target, &self.labels, count);
    }

    /// Toggles the focus highlight of the root.
    pub fn set_focused<T>(&self, target: &mut T, focused: bool)
    where
        T: RenderTarget<Element = E>,
    {
        let class_name = if focused {
            class_names::ROOT_FOCUSED
        } else {
            class_names::ROOT
        };
        target.set_class_name(self.root, class_name);
    }

    /// Updates the line's class for the enabled and sliding states.
    pub fn set_line_state<T>(&self, target: &mut T, enabled: bool, sliding: bool)
    where
        T: RenderTarget<Element = E>,
    {
        target.set_class_name(self.line, line_class(enabled, sliding));
    }

    /// Marks `knob` as being dragged or released.
    pub fn set_knob_active<T>(&self, target: &mut T, knob: Knob, active: bool)
    where
        T: RenderTarget<Element = E>,
    {
        target.set_class_name(self.knob(knob), knob_class(knob, active));
    }
}

/// Grows `pool` to `count + 1` elements, runs `prepare` on each while it is
/// hidden, and returns the widths measured afterwards.
fn prepare_pool<T, E>(
    target: &mut T,
    root: E,
    pool: &mut Vec<E>,
    role: ElementRole,
    count: usize,
    mut prepare: impl FnMut(&mut T, E, usize),
) -> SmallVec<[Px; 16]>
where
    T: RenderTarget<Element = E>,
    E: Copy + Eq + fmt::Debug,
{
    if count == 0 {
        return SmallVec::new();
    }
    (0..=count)
        .map(|index| {
            let element = match pool.get(index) {
                Some(&element) => element,
                None => {
                    let element = target.create_element(role);
                    target.set_style(element, Style::Position(Position::Absolute));
                    target.set_visibility(element, Visibility::Collapsed);
                    target.append_child(root, element);
                    pool.push(element);
                    element
                }
            };
            prepare(target, element, index);
            target.set_visibility(element, Visibility::Hidden);
            target.offset_width(element)
        })
        .collect()
}

fn place_marks<T: RenderTarget>(target: &mut T, pool: &[T::Element], slots: MarkSlots) {
    for slot in slots {
        let element = pool[slot.index];
        target.set_style(element, Style::Left(slot.left));
        target.set_visibility(element, Visibility::Visible);
    }
}

fn collapse_unused<T: RenderTarget>(target: &mut T, pool: &[T::Element], count: usize) {
    let first_unused = if count == 0 { 0 } else { count + 1 };
    for &element in pool.iter().skip(first_unused) {
        target.set_visibility(element, Visibility::Collapsed);
    }
}
