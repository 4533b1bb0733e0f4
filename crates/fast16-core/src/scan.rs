//! Parallel scan of the interior rectangle.
//!
//! Every worker is handed the same rectangle and walks all of it, starting in
//! its own band of rows and wrapping around. Duplicate work is avoided by
//! claiming each center in a shared [`VisitedMap`] before inspecting it, so
//! the bands mostly end up disjoint without any coordination beyond that.
//! Each worker returns its own [`WorkerTally`] at join; nothing is shared
//! between workers except the read-only image and the map.
use crate::luminosity::LumaTable;
use crate::ring::{ring_points, RING3, RING_LEN, RING_RADIUS};
use crate::segment::is_corner;
use crate::source::PixelSource;
use crate::visited::VisitedMap;
use crate::{DetectError, FastParams};
use rayon::prelude::*;
use rayon::ThreadPool;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Pixels whose full radius-3 ring is in bounds: `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interior {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl Interior {
    /// `None` when the image is too small to hold a single full ring.
    pub fn of(width: u32, height: u32) -> Option<Self> {
        let r = RING_RADIUS;
        if width <= 2 * r || height <= 2 * r {
            return None;
        }
        Some(Self {
            x0: r,
            x1: width - r,
            y0: r,
            y1: height - r,
        })
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.x1 - self.x0
    }
}

/// What a single scan worker found.
#[derive(Clone, Debug, Default)]
pub struct WorkerTally {
    pub corners: usize,
    pub inspected: usize,
    pub centers: Vec<(u32, u32)>,
    pub to_paint: Vec<(u32, u32)>,
}

/// Merged result of all scan workers.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    /// Number of accepted centers.
    pub corners: usize,
    /// Number of centers inspected across all workers.
    pub inspected: usize,
    /// Accepted centers, sorted row-major.
    pub centers: Vec<(u32, u32)>,
    /// Ring coordinates of every accepted center; 16 per center, unordered.
    pub to_paint: Vec<(u32, u32)>,
}

impl ScanOutcome {
    fn merge(tallies: Vec<WorkerTally>) -> Self {
        let mut out = ScanOutcome::default();
        for t in tallies {
            out.corners += t.corners;
            out.inspected += t.inspected;
            out.centers.extend(t.centers);
            out.to_paint.extend(t.to_paint);
        }
        out.centers.sort_unstable_by_key(|&(x, y)| (y, x));
        out
    }
}

/// Scan `src` with `params.workers` workers on `pool`, using a fresh visited map.
pub fn scan<S: PixelSource>(src: &S, params: &FastParams, pool: &ThreadPool) -> ScanOutcome {
    let visited = VisitedMap::new(src.width(), src.height());
    scan_claimed(src, params, pool, &visited)
}

/// Scan `src`, skipping every center already claimed in `visited`.
///
/// `visited` must cover exactly the same grid as `src`.
pub fn scan_with_visited<S: PixelSource>(
    src: &S,
    params: &FastParams,
    pool: &ThreadPool,
    visited: &VisitedMap,
) -> Result<ScanOutcome, DetectError> {
    if (visited.width(), visited.height()) != (src.width(), src.height()) {
        return Err(DetectError::DimensionMismatch {
            what: "visited map",
            dims: (visited.width(), visited.height()),
            source_dims: (src.width(), src.height()),
        });
    }
    Ok(scan_claimed(src, params, pool, visited))
}

#[cfg_attr(
    feature = "tracing",
    instrument(
        name = "scan",
        level = "debug",
        skip_all,
        fields(w = src.width(), h = src.height(), workers = params.workers)
    )
)]
fn scan_claimed<S: PixelSource>(
    src: &S,
    params: &FastParams,
    pool: &ThreadPool,
    visited: &VisitedMap,
) -> ScanOutcome {
    let Some(interior) = Interior::of(src.width(), src.height()) else {
        return ScanOutcome::default();
    };

    let table = LumaTable::new();
    let workers = params.workers.max(1);

    let tallies: Vec<WorkerTally> = pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|worker| {
                scan_worker(src, &interior, visited, &table, params, worker, workers)
            })
            .collect()
    });

    ScanOutcome::merge(tallies)
}

fn scan_worker<S: PixelSource>(
    src: &S,
    interior: &Interior,
    visited: &VisitedMap,
    table: &LumaTable,
    params: &FastParams,
    worker: usize,
    workers: usize,
) -> WorkerTally {
    let rows = interior.rows() as usize;
    let start = worker * rows / workers;
    let mut tally = WorkerTally::default();
    let mut ring = [0.0f64; RING_LEN];

    for r in 0..rows {
        let y = interior.y0 + ((start + r) % rows) as u32;
        for x in interior.x0..interior.x1 {
            if visited.test_and_set(x, y) {
                continue;
            }
            tally.inspected += 1;

            let center = table.luminosity(src.rgb(x, y));
            for (v, &(dx, dy)) in ring.iter_mut().zip(RING3.iter()) {
                *v = table.luminosity(src.rgb(
                    x.wrapping_add_signed(dx),
                    y.wrapping_add_signed(dy),
                ));
            }

            if is_corner(center, &ring, params.threshold, params.min_arc) {
                tally.corners += 1;
                tally.centers.push((x, y));
                tally.to_paint.extend_from_slice(&ring_points(x, y));
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        worker,
        start_row = start,
        inspected = tally.inspected,
        corners = tally.corners,
        "scan worker done"
    );

    tally
}
