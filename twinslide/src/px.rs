//! Physical pixel values used for every measured or placed offset.
//!
//! Render targets report widths and absolute offsets as whole pixels, and the
//! slider writes whole-pixel `left`/`right` offsets back. [`Px`] keeps that
//! integer space separate from the `f64` value domain so the two are never
//! mixed by accident.
//!
//! # Example
//!
//! ```
//! use twinslide::px::Px;
//!
//! let origin = Px(12);
//! let width = Px(200);
//! assert_eq!(origin + width, Px(212));
//! assert_eq!(width / 2, Px(100));
//! assert_eq!(Px::saturating_from_f64(41.9), Px(41));
//! ```

use std::{
    fmt,
    ops::{Add, Div, Sub},
};

/// A physical pixel coordinate or length.
///
/// Negative values are allowed: a pointer left of the track, or a knob offset
/// computed before clamping, can legitimately be negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// Returns the raw `i32` value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Converts the pixel value to `f64` for geometry math.
    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }

    /// Creates a `Px` from an `f64`, truncating toward zero and saturating at
    /// the `i32` bounds. `NaN` maps to zero.
    ///
    /// Truncation matches how integer pixel offsets are derived from
    /// fractional layout math everywhere in the slider.
    pub fn saturating_from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Px::ZERO;
        }
        let clamped = value.clamp(i32::MIN as f64, i32::MAX as f64);
        Px(clamped as i32)
    }

    /// Returns the value, or zero when negative.
    pub fn non_negative(self) -> Self {
        Px(self.0.max(0))
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl Add for Px {
    type Output = Px;

    fn add(self, rhs: Self) -> Self::Output {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Px;

    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0 - rhs.0)
    }
}

impl Div<i32> for Px {
    type Output = Px;

    fn div(self, rhs: i32) -> Self::Output {
        Px(self.0 / rhs)
    }
}

/// Width and height of an element's client area.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PxSize {
    /// Width.
    pub width: Px,
    /// Height.
    pub height: Px,
}

impl PxSize {
    /// Creates a new size.
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }
}
