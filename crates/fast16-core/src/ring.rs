/// Number of samples on the ring.
pub const RING_LEN: usize = 16;

/// Ring radius; also the width of the border excluded from scanning.
pub const RING_RADIUS: u32 = 3;

/// 16 point Bresenham circle of radius 3. Consecutive entries (including
/// the last and the first) are 8-connected neighbors, so an index range is a
/// contiguous arc on the circle.
pub const RING3: [(i32, i32); RING_LEN] = [
    (-3, -1),
    (-3, 0),
    (-3, 1),
    (-2, 2),
    (-1, 3),
    (0, 3),
    (1, 3),
    (2, 2),
    (3, 1),
    (3, 0),
    (3, -1),
    (2, -2),
    (1, -3),
    (0, -3),
    (-1, -3),
    (-2, -2),
];

/// Absolute ring coordinates around (x, y), in ring order.
///
/// The caller guarantees `x >= 3` and `y >= 3`.
#[inline]
pub fn ring_points(x: u32, y: u32) -> [(u32, u32); RING_LEN] {
    let mut out = [(0u32, 0u32); RING_LEN];
    for (dst, &(dx, dy)) in out.iter_mut().zip(RING3.iter()) {
        *dst = (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy));
    }
    out
}
