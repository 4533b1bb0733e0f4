use fast16_core::detect::{build_pool, detect_and_paint, detect_corners};
use fast16_core::scan::scan;
use fast16_core::{Canvas, FastParams, RgbView, RED};

const SIZE: u32 = 64;

fn rgba_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = f(x, y);
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    data
}

/// Black disk of radius 20 centered at (32, 32) on a white 64x64 field.
fn disk_image() -> Vec<u8> {
    rgba_from_fn(SIZE, SIZE, |x, y| {
        let dx = x as i64 - 32;
        let dy = y as i64 - 32;
        if dx * dx + dy * dy <= 20 * 20 {
            [0, 0, 0]
        } else {
            [255, 255, 255]
        }
    })
}

fn params(threshold: f64, min_arc: u8, workers: usize) -> FastParams {
    FastParams {
        threshold,
        min_arc,
        workers,
    }
}

fn run(data: &[u8], p: &FastParams) -> (Vec<(u32, u32)>, Vec<u8>) {
    let view = RgbView::from_rgba(SIZE, SIZE, data).expect("view");
    let canvas = Canvas::from_rgba(SIZE, SIZE, data).expect("canvas");
    let trace = detect_and_paint(&view, &canvas, p).expect("detection");
    assert_eq!(trace.corners, trace.centers.len());
    (trace.centers, canvas.into_rgba())
}

#[test]
fn uniform_gray_has_no_corners() {
    let data = rgba_from_fn(SIZE, SIZE, |_, _| [128, 128, 128]);
    let (centers, out) = run(&data, &params(0.1, 8, 8));
    assert!(centers.is_empty());
    assert_eq!(out, data);
}

#[test]
fn single_bright_pixel_only_accepts_itself() {
    let (cx, cy) = (SIZE / 2, SIZE / 2);
    let data = rgba_from_fn(SIZE, SIZE, |x, y| {
        if (x, y) == (cx, cy) {
            [255, 255, 255]
        } else {
            [0, 0, 0]
        }
    });
    let (centers, _) = run(&data, &params(0.1, 8, 8));
    // Centers whose ring crosses the bright pixel see a one-sample arc; the
    // bright pixel itself sees its whole ring darker.
    assert_eq!(centers, vec![(cx, cy)]);
}

#[test]
fn disk_boundary_is_detected_independently_of_worker_count() {
    let data = disk_image();
    let (reference, reference_out) = run(&data, &params(0.1, 8, 1));
    assert!(!reference.is_empty());
    for &(x, y) in &reference {
        let d2 = (x as i64 - 32).pow(2) + (y as i64 - 32).pow(2);
        assert!((14 * 14..=26 * 26).contains(&d2), "({x}, {y}) is far from the rim");
    }

    for workers in [2usize, 8] {
        let (centers, out) = run(&data, &params(0.1, 8, workers));
        assert_eq!(centers, reference, "workers={workers}");
        assert_eq!(out, reference_out, "workers={workers}");
    }
}

#[test]
fn disk_tips_are_accepted() {
    let data = disk_image();
    let view = RgbView::from_rgba(SIZE, SIZE, &data).unwrap();
    let out = detect_corners(&view, &params(0.1, 8, 4)).unwrap();
    for tip in [(32, 12), (32, 52), (12, 32), (52, 32)] {
        assert!(out.centers.contains(&tip), "missing {tip:?}");
    }
}

#[test]
fn full_threshold_suppresses_everything() {
    let data = disk_image();
    let (centers, out) = run(&data, &params(1.0, 8, 8));
    assert!(centers.is_empty());
    assert_eq!(out, data);
}

#[test]
fn zero_arc_requirement_over_accepts() {
    let data = disk_image();
    let view = RgbView::from_rgba(SIZE, SIZE, &data).unwrap();
    let strict = detect_corners(&view, &params(0.1, 8, 8)).unwrap();
    let loose = detect_corners(&view, &params(0.1, 0, 8)).unwrap();
    assert!(loose.corners > strict.corners);
    for c in &strict.centers {
        assert!(loose.centers.contains(c));
    }
}

#[test]
fn repeated_scans_agree() {
    let data = disk_image();
    let view = RgbView::from_rgba(SIZE, SIZE, &data).unwrap();
    let p = params(0.1, 8, 4);
    let pool = build_pool(p.workers).unwrap();
    let first = scan(&view, &p, &pool);
    let second = scan(&view, &p, &pool);
    assert_eq!(first.centers, second.centers);
    assert_eq!(first.inspected, (SIZE as usize - 6).pow(2));
    assert_eq!(second.inspected, first.inspected);
}

#[test]
fn painting_an_annotated_image_again_changes_nothing() {
    let data = disk_image();
    let p = params(0.1, 8, 8);
    let (centers, once) = run(&data, &p);
    assert!(!centers.is_empty());

    // Paint the same accepted rings onto the already annotated output.
    let view = RgbView::from_rgba(SIZE, SIZE, &data).unwrap();
    let scanned = detect_corners(&view, &p).unwrap();
    let canvas = Canvas::from_rgba(SIZE, SIZE, &once).unwrap();
    let pool = build_pool(p.workers).unwrap();
    let bag = fast16_core::CoordinateBag::new(scanned.to_paint);
    fast16_core::paint::paint(&canvas, &bag, p.workers, &pool);
    let twice = canvas.into_rgba();
    assert_eq!(twice, once);

    let red_pixels = twice.chunks_exact(4).filter(|px| *px == RED).count();
    assert!(red_pixels > 0);
}
