//! An in-memory [`RenderTarget`].
//!
//! [`HeadlessTarget`] keeps a flat element table, records every operation
//! it receives and answers measurements from [`HeadlessMetrics`]. It backs
//! the crate's own tests and lets hosts drive a slider without a display.
//!
//! Recording is on by default and the log grows with every call. Long-lived
//! hosts should turn it off with [`HeadlessTarget::set_recording`] or drain
//! it with [`HeadlessTarget::clear_ops`].

use crate::{
    px::{Px, PxSize},
    render::{ElementRole, Position, RenderTarget, Style, Visibility},
};

/// Measured sizes reported by a [`HeadlessTarget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessMetrics {
    /// Width of the track line as a share of the root's client width.
    pub line_ratio: f64,
    /// Width of each knob.
    pub knob_width: Px,
    /// Width of each tick.
    pub tick_width: Px,
    /// Width of one character of label text.
    pub glyph_width: Px,
}

impl Default for HeadlessMetrics {
    fn default() -> Self {
        Self {
            line_ratio: 1.0,
            knob_width: Px(0),
            tick_width: Px(0),
            glyph_width: Px(0),
        }
    }
}

/// Handle to an element of a [`HeadlessTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessElement(usize);

/// One call received by a [`HeadlessTarget`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// `create_element`.
    Create(HeadlessElement, ElementRole),
    /// `append_child`.
    Append {
        /// Parent element.
        parent: HeadlessElement,
        /// Appended element.
        child: HeadlessElement,
    },
    /// `set_style`.
    Style(HeadlessElement, Style),
    /// `set_class_name`.
    ClassName(HeadlessElement, String),
    /// `set_visibility`.
    Visibility(HeadlessElement, Visibility),
    /// `set_text`.
    Text(HeadlessElement, String),
}

#[derive(Debug, Clone, Default)]
struct Node {
    role: Option<ElementRole>,
    parent: Option<HeadlessElement>,
    position: Option<Position>,
    left: Option<Px>,
    right: Option<Px>,
    width_percent: Option<f64>,
    class_name: String,
    text: String,
    visibility: Visibility,
}

/// A render target that lives entirely in memory.
///
/// ```
/// use twinslide::{
///     controller::RangeSliderController,
///     headless::{HeadlessMetrics, HeadlessTarget},
///     px::{Px, PxSize},
/// };
///
/// let mut target = HeadlessTarget::new(HeadlessMetrics::default());
/// target.attach(PxSize::new(Px(200), Px(24)));
/// let mut slider = RangeSliderController::new(target);
/// slider.handle_pointer_down(Px(120));
/// slider.handle_pointer_up(Px(120));
/// assert_eq!(slider.values().high, 60.0);
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessTarget {
    metrics: HeadlessMetrics,
    nodes: Vec<Node>,
    attached: bool,
    client_size: PxSize,
    root_left: Px,
    ops: Vec<RenderOp>,
    recording: bool,
}

impl HeadlessTarget {
    const ROOT: HeadlessElement = HeadlessElement(0);

    /// Creates a detached target with an empty root.
    pub fn new(metrics: HeadlessMetrics) -> Self {
        Self {
            metrics,
            nodes: vec![Node::default()],
            attached: false,
            client_size: PxSize::default(),
            root_left: Px::ZERO,
            ops: Vec::new(),
            recording: true,
        }
    }

    /// Mounts the root with the given client size.
    pub fn attach(&mut self, client_size: PxSize) {
        self.attached = true;
        self.client_size = client_size;
    }

    /// Unmounts the root.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Changes the root's client size.
    pub fn set_client_size(&mut self, client_size: PxSize) {
        self.client_size = client_size;
    }

    /// Moves the root's left edge in pointer coordinates.
    pub fn set_root_left(&mut self, left: Px) {
        self.root_left = left;
    }

    /// The reported measurements.
    pub fn metrics(&self) -> HeadlessMetrics {
        self.metrics
    }

    /// Replaces the reported measurements.
    pub fn set_metrics(&mut self, metrics: HeadlessMetrics) {
        self.metrics = metrics;
    }

    /// Every operation received so far.
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Forgets the recorded operations.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Turns operation recording on or off. Turning it off drops the log.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
        if !recording {
            self.ops = Vec::new();
        }
    }

    /// Whether operations are being recorded.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Role the element was created with; `None` for the root.
    pub fn role(&self, element: HeadlessElement) -> Option<ElementRole> {
        self.node(element).role
    }

    /// Parent set by `append_child`.
    pub fn parent(&self, element: HeadlessElement) -> Option<HeadlessElement> {
        self.node(element).parent
    }

    /// Positioning scheme, if set.
    pub fn position(&self, element: HeadlessElement) -> Option<Position> {
        self.node(element).position
    }

    /// Last `left` offset.
    pub fn left(&self, element: HeadlessElement) -> Option<Px> {
        self.node(element).left
    }

    /// Last `right` offset.
    pub fn right(&self, element: HeadlessElement) -> Option<Px> {
        self.node(element).right
    }

    /// Last width percentage.
    pub fn width_percent(&self, element: HeadlessElement) -> Option<f64> {
        self.node(element).width_percent
    }

    /// Current class name.
    pub fn class_name(&self, element: HeadlessElement) -> &str {
        &self.node(element).class_name
    }

    /// Current text content.
    pub fn text(&self, element: HeadlessElement) -> &str {
        &self.node(element).text
    }

    /// Current visibility.
    pub fn visibility(&self, element: HeadlessElement) -> Visibility {
        self.node(element).visibility
    }

    /// Elements created with `role`, in creation order.
    pub fn elements_with_role(&self, role: ElementRole) -> Vec<HeadlessElement> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.role == Some(role))
            .map(|(index, _)| HeadlessElement(index))
            .collect()
    }

    fn record(&mut self, op: impl FnOnce() -> RenderOp) {
        if self.recording {
            self.ops.push(op());
        }
    }

    fn node(&self, element: HeadlessElement) -> &Node {
        &self.nodes[element.0]
    }

    fn node_mut(&mut self, element: HeadlessElement) -> &mut Node {
        &mut self.nodes[element.0]
    }

    fn measured_width(&self, element: HeadlessElement) -> Px {
        let node = self.node(element);
        if element == Self::ROOT {
            return self.client_size.width;
        }
        if node.visibility == Visibility::Collapsed {
            return Px::ZERO;
        }
        match node.role {
            Some(ElementRole::Line) => {
                Px::saturating_from_f64(self.client_size.width.to_f64() * self.metrics.line_ratio)
            }
            Some(ElementRole::Knob(_)) => self.metrics.knob_width,
            Some(ElementRole::Tick) => self.metrics.tick_width,
            Some(ElementRole::Label) => {
                let glyphs = i32::try_from(node.text.chars().count()).unwrap_or(i32::MAX);
                Px(self.metrics.glyph_width.raw().saturating_mul(glyphs))
            }
            Some(ElementRole::Progress(_)) => {
                let percent = node.width_percent.unwrap_or(0.0);
                Px::saturating_from_f64(self.client_size.width.to_f64() * percent / 100.0)
            }
            None => Px::ZERO,
        }
    }
}

impl RenderTarget for HeadlessTarget {
    type Element = HeadlessElement;

    fn root(&self) -> HeadlessElement {
        Self::ROOT
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn create_element(&mut self, role: ElementRole) -> HeadlessElement {
        let element = HeadlessElement(self.nodes.len());
        self.nodes.push(Node {
            role: Some(role),
            ..Node::default()
        });
        self.record(|| RenderOp::Create(element, role));
        element
    }

    fn append_child(&mut self, parent: HeadlessElement, child: HeadlessElement) {
        self.node_mut(child).parent = Some(parent);
        self.record(|| RenderOp::Append { parent, child });
    }

    fn set_style(&mut self, element: HeadlessElement, style: Style) {
        let node = self.node_mut(element);
        match style {
            Style::Position(position) => node.position = Some(position),
            Style::Left(left) => node.left = Some(left),
            Style::Right(right) => node.right = Some(right),
            Style::WidthPercent(percent) => node.width_percent = Some(percent),
        }
        self.record(|| RenderOp::Style(element, style));
    }

    fn set_class_name(&mut self, element: HeadlessElement, class_name: &str) {
        class_name.clone_into(&mut self.node_mut(element).class_name);
        self.record(|| RenderOp::ClassName(element, class_name.to_owned()));
    }

    fn set_visibility(&mut self, element: HeadlessElement, visibility: Visibility) {
        self.node_mut(element).visibility = visibility;
        self.record(|| RenderOp::Visibility(element, visibility));
    }

    fn set_text(&mut self, element: HeadlessElement, text: &str) {
        text.clone_into(&mut self.node_mut(element).text);
        self.record(|| RenderOp::Text(element, text.to_owned()));
    }

    fn offset_width(&self, element: HeadlessElement) -> Px {
        self.measured_width(element)
    }

    fn absolute_left(&self, element: HeadlessElement) -> Px {
        if element == Self::ROOT {
            return self.root_left;
        }
        let node = self.node(element);
        let relative = match (node.left, node.right) {
            (Some(left), _) => left,
            (None, Some(right)) => self.client_size.width - right - self.measured_width(element),
            (None, None) => Px::ZERO,
        };
        self.root_left + relative
    }

    fn client_size(&self) -> PxSize {
        self.client_size
    }
}
