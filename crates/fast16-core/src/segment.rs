//! The segment test: circular longest run of same-sign luminosity deviations.
use crate::ring::RING_LEN;

/// How a ring pixel compares to the center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deviation {
    /// Darker than the center by more than the threshold.
    Darker,
    /// Within the threshold.
    Similar,
    /// Brighter than the center by more than the threshold.
    Brighter,
}

impl Deviation {
    /// Swap brighter and darker.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Deviation::Darker => Deviation::Brighter,
            Deviation::Similar => Deviation::Similar,
            Deviation::Brighter => Deviation::Darker,
        }
    }
}

#[inline]
pub fn classify(center: f64, neighbor: f64, threshold: f64) -> Deviation {
    let diff = neighbor - center;
    if diff.abs() <= threshold {
        Deviation::Similar
    } else if diff > 0.0 {
        Deviation::Brighter
    } else {
        Deviation::Darker
    }
}

/// Sign vector of the ring against the center.
#[inline]
pub fn deviations(center: f64, ring: &[f64; RING_LEN], threshold: f64) -> [Deviation; RING_LEN] {
    let mut out = [Deviation::Similar; RING_LEN];
    for (d, &y) in out.iter_mut().zip(ring.iter()) {
        *d = classify(center, y, threshold);
    }
    out
}

/// Length of the longest circular run of equal, non-`Similar` entries.
///
/// One linear pass finds the longest run that does not cross the end of the
/// array; a run ending at index 15 is then stitched onto a run of the same
/// kind starting at index 0.
pub fn longest_arc(signs: &[Deviation; RING_LEN]) -> usize {
    let mut best = 0usize;
    let mut run = 0usize;
    let mut prev = Deviation::Similar;

    for &s in signs {
        if s == Deviation::Similar {
            run = 0;
        } else if s == prev {
            run += 1;
        } else {
            run = 1;
        }
        prev = s;
        best = best.max(run);
    }

    if best == RING_LEN {
        return RING_LEN;
    }

    // `run` is now the trailing run and `prev` its kind.
    if run > 0 && signs[0] == prev {
        let leading = signs.iter().take_while(|&&s| s == prev).count();
        best = best.max(run + leading);
    }

    best
}

/// Segment-test verdict: accept iff the longest arc is strictly longer than `min_arc`.
#[inline]
pub fn is_corner(center: f64, ring: &[f64; RING_LEN], threshold: f64, min_arc: u8) -> bool {
    longest_arc(&deviations(center, ring, threshold)) > usize::from(min_arc)
}
