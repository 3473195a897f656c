//! Choosing which knob a pointer interaction targets.

use std::fmt;

use crate::px::Px;

/// One of the two draggable handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Knob {
    /// The handle holding the lower value.
    #[default]
    Low,
    /// The handle holding the upper value.
    High,
}

impl Knob {
    /// The other knob.
    pub fn opposite(self) -> Self {
        match self {
            Knob::Low => Knob::High,
            Knob::High => Knob::Low,
        }
    }
}

impl fmt::Display for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Knob::Low => f.write_str("low"),
            Knob::High => f.write_str("high"),
        }
    }
}

/// Picks the knob nearest to `x`, given the knobs' measured positions.
///
/// Anything at or left of the low knob targets [`Knob::Low`], anything at or
/// right of the high knob targets [`Knob::High`]. Between them the split is
/// the integer midpoint, and the midpoint itself belongs to the low knob.
/// When both knobs sit on the same pixel a press exactly there therefore
/// always grabs the low knob.
pub fn select_knob(x: Px, low_x: Px, high_x: Px) -> Knob {
    if x <= low_x {
        return Knob::Low;
    }
    if x >= high_x {
        return Knob::High;
    }
    let mid = low_x + (high_x - low_x) / 2;
    if x <= mid { Knob::Low } else { Knob::High }
}
