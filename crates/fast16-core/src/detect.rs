//! Detection pipeline: validate, scan, join, paint.
use crate::paint::{paint, Canvas, CoordinateBag};
use crate::scan::{scan, ScanOutcome};
use crate::source::PixelSource;
use crate::{DetectError, FastParams};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Timed detection outcome.
#[derive(Clone, Debug)]
pub struct DetectionTrace {
    /// Accepted centers, sorted row-major.
    pub centers: Vec<(u32, u32)>,
    /// Number of accepted centers.
    pub corners: usize,
    /// Number of centers inspected during the scan.
    pub inspected: usize,
    /// Ring pixels painted, duplicates included.
    pub painted: usize,
    /// Time spent in the scan phase (milliseconds).
    pub scan_ms: f64,
    /// Time spent in the paint phase (milliseconds).
    pub paint_ms: f64,
}

/// A pool with exactly `workers` threads, shared by both phases of a run.
pub fn build_pool(workers: usize) -> Result<ThreadPool, DetectError> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("fast16-worker-{i}"))
        .build()?)
}

/// Run only the scan phase.
pub fn detect_corners<S: PixelSource>(
    src: &S,
    params: &FastParams,
) -> Result<ScanOutcome, DetectError> {
    params.validate()?;
    let pool = build_pool(params.workers)?;
    Ok(scan(src, params, &pool))
}

/// Scan `src`, then paint the ring of every accepted center into `canvas`.
///
/// The paint phase starts only after every scan worker has returned.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip_all,
        fields(w = src.width(), h = src.height(), workers = params.workers)
    )
)]
pub fn detect_and_paint<S: PixelSource>(
    src: &S,
    canvas: &Canvas,
    params: &FastParams,
) -> Result<DetectionTrace, DetectError> {
    params.validate()?;
    if (canvas.width(), canvas.height()) != (src.width(), src.height()) {
        return Err(DetectError::DimensionMismatch {
            what: "canvas",
            dims: (canvas.width(), canvas.height()),
            source_dims: (src.width(), src.height()),
        });
    }
    let pool = build_pool(params.workers)?;

    let scan_started = Instant::now();
    let scanned = scan(src, params, &pool);
    let scan_ms = scan_started.elapsed().as_secs_f64() * 1000.0;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        corners = scanned.corners,
        inspected = scanned.inspected,
        points = scanned.to_paint.len(),
        "scan finished"
    );

    let paint_started = Instant::now();
    let bag = CoordinateBag::new(scanned.to_paint);
    let painted = paint(canvas, &bag, params.workers, &pool);
    let paint_ms = paint_started.elapsed().as_secs_f64() * 1000.0;

    Ok(DetectionTrace {
        centers: scanned.centers,
        corners: scanned.corners,
        inspected: scanned.inspected,
        painted: painted.painted,
        scan_ms,
        paint_ms,
    })
}
