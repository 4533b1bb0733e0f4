//! Parallel annotation of accepted ring pixels.
//!
//! The output raster is held as one `AtomicU32` per RGBA pixel so workers can
//! store concurrently without a lock; since every store writes the same
//! color, overlapping writes are harmless. The coordinate bag is the only
//! contended structure and sits behind a single mutex.
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicU32, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Opaque sRGB red.
pub const RED: [u8; 4] = [255, 0, 0, 255];

/// RGBA raster with race-free per-pixel stores.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl Canvas {
    /// Copy tightly packed RGBA bytes. Returns `None` on a size mismatch.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Option<Self> {
        let len = (width as usize).checked_mul(height as usize)?;
        if data.len() != len.checked_mul(4)? {
            return None;
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| AtomicU32::new(u32::from_ne_bytes([px[0], px[1], px[2], px[3]])))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Store [`RED`] at (x, y).
    #[inline]
    pub fn paint(&self, x: u32, y: u32) {
        self.pixels[self.index(x, y)].store(u32::from_ne_bytes(RED), Ordering::Relaxed);
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
            .load(Ordering::Relaxed)
            .to_ne_bytes()
    }

    /// Back to packed RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in self.pixels {
            out.extend_from_slice(&px.into_inner().to_ne_bytes());
        }
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}

/// Unordered multiset of coordinates awaiting paint.
#[derive(Debug, Default)]
pub struct CoordinateBag {
    inner: Mutex<Vec<(u32, u32)>>,
}

impl CoordinateBag {
    pub fn new(points: Vec<(u32, u32)>) -> Self {
        Self {
            inner: Mutex::new(points),
        }
    }

    /// Remove one coordinate; each element is handed out exactly once.
    #[inline]
    pub fn take(&self) -> Option<(u32, u32)> {
        self.inner.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintOutcome {
    /// Paint operations performed, duplicates included.
    pub painted: usize,
}

/// Drain `bag` into `canvas` with `workers` workers on `pool`.
///
/// Coordinates outside the canvas are a caller bug.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(points = bag.len(), workers = workers))
)]
pub fn paint(
    canvas: &Canvas,
    bag: &CoordinateBag,
    workers: usize,
    pool: &ThreadPool,
) -> PaintOutcome {
    let workers = workers.max(1);
    let painted = pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|_worker| {
                let mut n = 0usize;
                while let Some((x, y)) = bag.take() {
                    canvas.paint(x, y);
                    n += 1;
                }
                n
            })
            .sum()
    });
    PaintOutcome { painted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::ThreadPoolBuilder;

    fn pool(n: usize) -> ThreadPool {
        ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .expect("thread pool")
    }

    fn grey_rgba(w: u32, h: u32) -> Vec<u8> {
        [90u8, 91, 92, 200].repeat((w * h) as usize)
    }

    #[test]
    fn canvas_round_trips_untouched_pixels() {
        let data: Vec<u8> = (0..4 * 6).map(|v| v as u8).collect();
        let canvas = Canvas::from_rgba(3, 2, &data).expect("canvas");
        assert_eq!(canvas.pixel(1, 1), [16, 17, 18, 19]);
        assert_eq!(canvas.into_rgba(), data);
        assert!(Canvas::from_rgba(3, 2, &data[..20]).is_none());
    }

    #[test]
    fn bag_hands_out_every_element() {
        let bag = CoordinateBag::new(vec![(1, 1), (2, 2), (1, 1)]);
        assert_eq!(bag.len(), 3);
        let mut seen = Vec::new();
        while let Some(p) = bag.take() {
            seen.push(p);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![(1, 1), (1, 1), (2, 2)]);
        assert!(bag.is_empty());
    }

    #[test]
    fn paint_drains_bag_and_writes_red() {
        let canvas = Canvas::from_rgba(8, 8, &grey_rgba(8, 8)).unwrap();
        let points: Vec<(u32, u32)> = (0..8).map(|i| (i, 7 - i)).collect();
        let bag = CoordinateBag::new(points.clone());
        let out = paint(&canvas, &bag, 4, &pool(4));
        assert_eq!(out.painted, points.len());
        assert!(bag.is_empty());
        for (x, y) in points {
            assert_eq!(canvas.pixel(x, y), RED);
        }
        assert_eq!(canvas.pixel(0, 0), [90, 91, 92, 200]);
    }

    #[test]
    fn duplicates_paint_like_their_set() {
        let points = vec![(1, 2), (3, 4), (1, 2), (5, 5), (3, 4), (1, 2)];
        let mut unique = points.clone();
        unique.sort_unstable();
        unique.dedup();

        let with_dups = Canvas::from_rgba(8, 8, &grey_rgba(8, 8)).unwrap();
        paint(&with_dups, &CoordinateBag::new(points), 3, &pool(3));
        let as_set = Canvas::from_rgba(8, 8, &grey_rgba(8, 8)).unwrap();
        paint(&as_set, &CoordinateBag::new(unique), 1, &pool(1));

        assert_eq!(with_dups.into_rgba(), as_set.into_rgba());
    }

    #[test]
    fn painting_twice_is_a_fixed_point() {
        let points = vec![(0, 0), (7, 7), (4, 2)];
        let canvas = Canvas::from_rgba(8, 8, &grey_rgba(8, 8)).unwrap();
        paint(&canvas, &CoordinateBag::new(points.clone()), 2, &pool(2));
        let once = canvas.into_rgba();

        let again = Canvas::from_rgba(8, 8, &once).unwrap();
        paint(&again, &CoordinateBag::new(points), 2, &pool(2));
        assert_eq!(again.into_rgba(), once);
    }
}
