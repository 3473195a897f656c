//! Mapping between the value domain and track-relative pixel offsets.
//!
//! The value domain is a [`ValueRange`]; the pixel side is a
//! [`TrackGeometry`] describing where the track line sits inside the slider.
//! Nothing here confines values to the step grid; that happens later in
//! [`crate::confine`].

use crate::px::Px;

/// The configured `[min, max]` bounds of the slider.
///
/// A range whose `min` exceeds its `max` is degenerate: its total span is
/// zero and every value maps to fraction `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ValueRange {
    /// Creates a range. Inverted bounds are accepted and treated as empty.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Total span `max - min`, or `0` when `min > max`.
    pub fn total(&self) -> f64 {
        if self.min > self.max {
            return 0.0;
        }
        self.max - self.min
    }

    /// Returns `true` when the range cannot be divided (`max <= min`).
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// The value halfway through the range.
    pub fn midpoint(&self) -> f64 {
        self.min + self.total() / 2.0
    }

    /// The value at `fraction` of the range, unclamped.
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + self.total() * fraction
    }

    /// Relative position of `value` within the range, clamped to `0..=1`.
    ///
    /// Returns `0` for a degenerate range instead of dividing by zero.
    pub fn to_fraction(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let fraction = (value - self.min) / (self.max - self.min);
        fraction.clamp(0.0, 1.0)
    }

    /// Converts a pointer coordinate back into the value domain.
    ///
    /// The result is not clamped: a pointer left of the track yields a value
    /// below `min`. A track of zero or negative length maps everything to
    /// `min`.
    pub fn from_pixel(&self, pixel_x: f64, origin: f64, length: f64) -> f64 {
        if length <= 0.0 {
            return self.min;
        }
        self.value_at((pixel_x - origin) / length)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Pixel offset of `fraction` along a track starting at `origin`.
pub fn to_pixel(fraction: f64, origin: f64, length: f64) -> f64 {
    origin + fraction * length
}

/// Placement of the track line inside the slider's root element.
///
/// Recomputed on every layout pass; only the controller owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackGeometry {
    /// Left offset of the line relative to the root element.
    pub origin: Px,
    /// Measured width of the line.
    pub length: Px,
}

impl TrackGeometry {
    /// Centers a line of `line_width` inside a root of `root_width`.
    pub fn centered(root_width: Px, line_width: Px) -> Self {
        Self {
            origin: root_width / 2 - line_width / 2,
            length: line_width,
        }
    }

    /// Right edge of the line.
    pub fn end(&self) -> Px {
        self.origin + self.length
    }

    /// Root-relative offset of `fraction` along the line.
    pub fn offset_of(&self, fraction: f64) -> f64 {
        to_pixel(fraction, self.origin.to_f64(), self.length.to_f64())
    }

    /// Left edge of a knob of `knob_width` centered on `fraction`.
    ///
    /// The knob may overhang the origin by half its width but stops one pixel
    /// short of overhanging the end by half its width.
    pub fn knob_left(&self, fraction: f64, knob_width: Px) -> Px {
        let half = knob_width / 2;
        let left = Px::saturating_from_f64(self.offset_of(fraction) - half.to_f64());
        left.min(self.end() - half - Px(1))
    }
}
