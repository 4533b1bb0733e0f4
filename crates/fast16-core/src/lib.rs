//! Core primitives for segment-test (FAST-16) corner detection.
//!
//! # Overview
//!
//! A pixel is a corner candidate when a long enough contiguous arc of the
//! 16-sample Bresenham ring around it (see [`ring`]) is uniformly brighter or
//! uniformly darker than the pixel itself. Brightness is compared on a
//! perceptual luminosity scale (see [`luminosity`]), and the arc test lives in
//! [`segment`].
//!
//! Detection runs in two phases on a pool of `k` workers:
//!
//! - [`scan`] – every worker walks the interior rectangle, claiming pixels in
//!   a shared [`visited`] map so that each pixel is inspected at most once.
//!   Workers keep their own tallies and hand them back at join time.
//! - [`paint`] – the ring pixels of every accepted center are drained from a
//!   shared coordinate bag and painted red into an atomic RGBA canvas.
//!
//! [`detect`] wires both phases together with a barrier in between and
//! reports per-phase timings.
//!
//! # Features
//!
//! - `tracing` – instruments the scan and paint phases with `tracing` spans
//!   and emits per-worker events. Results are identical with or without it.

pub mod detect;
pub mod luminosity;
pub mod paint;
pub mod ring;
pub mod scan;
pub mod segment;
pub mod source;
pub mod visited;

pub use crate::detect::{detect_and_paint, detect_corners, DetectionTrace};
pub use crate::paint::{Canvas, CoordinateBag, PaintOutcome, RED};
pub use crate::scan::ScanOutcome;
pub use crate::source::{PixelSource, RgbView};

/// Tunable parameters for the segment test and the worker pool.
#[derive(Clone, Debug, PartialEq)]
pub struct FastParams {
    /// Luminosity difference a ring pixel must exceed to count as brighter or
    /// darker than the center. Valid range is (0, 1].
    pub threshold: f64,
    /// The longest same-sign arc must be strictly longer than this (0..=16).
    pub min_arc: u8,
    /// Number of scan and paint workers (>= 1).
    pub workers: usize,
}

impl Default for FastParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            min_arc: 8,
            workers: 8,
        }
    }
}

impl FastParams {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(DetectError::InvalidThreshold(self.threshold));
        }
        if usize::from(self.min_arc) > ring::RING_LEN {
            return Err(DetectError::InvalidMinArc(self.min_arc));
        }
        if self.workers == 0 {
            return Err(DetectError::InvalidWorkers);
        }
        Ok(())
    }
}

/// Errors reported by the detection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("luminosity threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("minimum arc length must be in 0..=16, got {0}")]
    InvalidMinArc(u8),
    #[error("worker count must be >= 1")]
    InvalidWorkers,
    #[error("{what} is {dims:?} but the source image is {source_dims:?}")]
    DimensionMismatch {
        what: &'static str,
        dims: (u32, u32),
        source_dims: (u32, u32),
    },
    #[error("point {point:?} lies outside the {dims:?} image")]
    PointOutOfBounds { point: (u32, u32), dims: (u32, u32) },
    #[error("failed to start worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
