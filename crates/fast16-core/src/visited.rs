//! Shared claim map that keeps each pixel from being inspected twice.
use std::sync::atomic::{AtomicBool, Ordering};

/// W x H grid of write-once flags, one atomic per cell.
#[derive(Debug)]
pub struct VisitedMap {
    width: u32,
    height: u32,
    cells: Vec<AtomicBool>,
}

impl VisitedMap {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let cells = (0..len).map(|_| AtomicBool::new(false)).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mark (x, y) as claimed and return whether it was already claimed.
    ///
    /// Exactly one caller observes `false` for a given cell.
    #[inline]
    pub fn test_and_set(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)].swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)].load(Ordering::Acquire)
    }

    pub fn count_set(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.load(Ordering::Acquire))
            .count()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}
