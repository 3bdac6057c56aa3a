//! Quartile segmentation of customer groups by mean price
//!
//! Groups are ranked ascending by (mean price, key) and split into four
//! equal-count bins. The lowest bin is segment D, the highest segment A.

use serde::Serialize;

/// Number of quartile bins
pub const SEGMENT_COUNT: usize = 4;

/// Quartile segment label. Ordered so that `D < C < B < A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Segment {
    D,
    C,
    B,
    A,
}

impl Segment {
    /// Segments from lowest to highest price quartile
    pub const ASCENDING: [Segment; SEGMENT_COUNT] = [Segment::D, Segment::C, Segment::B, Segment::A];

    fn from_bin(bin: usize) -> Segment {
        Self::ASCENDING[bin.min(SEGMENT_COUNT - 1)]
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::A => write!(f, "A"),
            Segment::B => write!(f, "B"),
            Segment::C => write!(f, "C"),
            Segment::D => write!(f, "D"),
        }
    }
}

/// Assign a quartile segment to each `(key, mean_price)` pair.
///
/// The returned vector is parallel to the input. Ranking is by mean price
/// ascending with the key as tie-break, so equal prices straddling a bin
/// edge are split in key order. The group at rank `i` of `n` lands in bin
/// `floor(4 * i / n)`: bin sizes differ by at most one and, with at least
/// four groups, every segment is non-empty.
pub fn assign_quartile_segments(groups: &[(&str, f64)]) -> Vec<Segment> {
    let n = groups.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        groups[a]
            .1
            .total_cmp(&groups[b].1)
            .then_with(|| groups[a].0.cmp(groups[b].0))
    });

    let mut segments = vec![Segment::D; n];
    for (rank, &idx) in order.iter().enumerate() {
        segments[idx] = Segment::from_bin(rank * SEGMENT_COUNT / n);
    }
    segments
}
