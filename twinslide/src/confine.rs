//! Snapping raw values onto the range/step grid.

use crate::{geometry::ValueRange, selector::Knob};

/// Granularity of the slider. Always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize(f64);

impl StepSize {
    /// Step used whenever a configured step is not strictly positive.
    pub const FALLBACK: f64 = 0.5;

    /// Normalizes a configured step. Zero, negative, `NaN` and infinite steps
    /// become [`StepSize::FALLBACK`].
    pub fn new(raw: f64) -> Self {
        if raw > 0.0 && raw.is_finite() {
            Self(raw)
        } else {
            Self(Self::FALLBACK)
        }
    }

    /// The step as a plain number.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self(10.0)
    }
}

/// Snaps values onto `min + k * step`, never leaving `[min, max]`.
///
/// Rounding is nearest-step with two deliberate asymmetries:
///
/// - an exact half step rounds down (`remainder > step / 2` is strict);
/// - rounding up is refused when the next grid point would pass `max`, so a
///   `max` that is not on the grid is only reachable by an exact hit.
///
/// ```
/// use twinslide::{confine::{StepSize, ValueConfiner}, geometry::ValueRange};
///
/// let confiner = ValueConfiner::new(ValueRange::new(0.0, 100.0), StepSize::new(10.0));
/// assert_eq!(confiner.confine(23.0), 20.0);
/// assert_eq!(confiner.confine(27.0), 30.0);
/// assert_eq!(confiner.confine(105.0), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueConfiner {
    range: ValueRange,
    step: StepSize,
}

impl ValueConfiner {
    /// Creates a confiner for `range` and `step`.
    pub fn new(range: ValueRange, step: StepSize) -> Self {
        Self { range, step }
    }

    /// The range values are confined to.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// The grid step.
    pub fn step(&self) -> StepSize {
        self.step
    }

    /// Confines `raw` to the range and snaps it to the step grid.
    pub fn confine(&self, raw: f64) -> f64 {
        let ValueRange { min, max } = self.range;
        let step = self.step.get();

        // `min` wins over `max` when the range is inverted.
        let clamped = min.max(max.min(raw));
        let offset = clamped - min;
        let remainder = offset % step;

        // Grid index below `clamped`, kept integral so the result is always
        // rebuilt from `min` and stays stable under a second confinement.
        let mut index = ((offset - remainder) / step).round();
        if remainder > step / 2.0 && min + (index + 1.0) * step <= max {
            index += 1.0;
        }
        min + index * step
    }

    /// Confines both values independently.
    pub fn confine_values(&self, values: CurrentValues) -> CurrentValues {
        CurrentValues {
            low: self.confine(values.low),
            high: self.confine(values.high),
        }
    }
}

/// The pair of values held by the two knobs.
///
/// Ordering is not enforced: `low > high` is representable and is reported
/// or clamped by the controller depending on its crossover policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrentValues {
    /// Value of the low knob.
    pub low: f64,
    /// Value of the high knob.
    pub high: f64,
}

impl CurrentValues {
    /// Creates a pair.
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Both knobs on the same value.
    pub const fn collapsed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Value held by `knob`.
    pub fn get(&self, knob: Knob) -> f64 {
        match knob {
            Knob::Low => self.low,
            Knob::High => self.high,
        }
    }

    /// Copy with `knob` moved to `value`.
    pub fn with(mut self, knob: Knob, value: f64) -> Self {
        match knob {
            Knob::Low => self.low = value,
            Knob::High => self.high = value,
        }
        self
    }

    /// Whether the low value lies above the high value.
    pub fn is_crossed(&self) -> bool {
        self.low > self.high
    }
}
