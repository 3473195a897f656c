//! Evenly spaced tick and label placement along the track.

use smallvec::SmallVec;

use crate::{
    geometry::{TrackGeometry, ValueRange},
    px::Px,
};

/// Placement of a single tick or label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkSlot {
    /// Position in the sequence, `0..=count`.
    pub index: usize,
    /// `index / count`.
    pub fraction: f64,
    /// Root-relative offset the mark is centered on.
    pub anchor: f64,
    /// Root-relative left edge after centering and clamping.
    pub left: Px,
}

/// Marks for one layout pass. Inline storage covers common counts.
pub type MarkSlots = SmallVec<[MarkSlot; 16]>;

/// Lays out `count + 1` marks at `origin + length * i / count`.
///
/// Each mark is centered on its anchor using the width reported by
/// `width_of(i)`, then kept inside the track: its left edge is capped at
/// `end - width` and floored at `origin`. The floor wins when a mark is wider
/// than the track. A `count` of zero hides the marks and yields nothing.
pub fn layout_marks(
    count: usize,
    track: TrackGeometry,
    mut width_of: impl FnMut(usize) -> Px,
) -> MarkSlots {
    if count == 0 {
        return MarkSlots::new();
    }
    (0..=count)
        .map(|index| {
            let fraction = index as f64 / count as f64;
            let anchor = track.offset_of(fraction);
            let width = width_of(index);
            let left = Px::saturating_from_f64(anchor) - width / 2;
            let left = left.min(track.end() - width).max(track.origin);
            MarkSlot {
                index,
                fraction,
                anchor,
                left,
            }
        })
        .collect()
}

/// Value displayed by label `index` of `count`.
pub fn mark_value(range: ValueRange, index: usize, count: usize) -> f64 {
    if count == 0 {
        return range.min;
    }
    range.min + range.total() * index as f64 / count as f64
}
