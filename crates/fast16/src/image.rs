//! Helpers that run the detector on `image::RgbaImage`.

use fast16_core::detect::{build_pool, detect_and_paint, detect_corners, DetectionTrace};
use fast16_core::paint::{paint, Canvas, CoordinateBag};
use fast16_core::{DetectError, FastParams, RgbView, ScanOutcome};
use image::RgbaImage;

/// Borrow the pixels of `img` as a detector source.
#[inline]
pub fn view_of(img: &RgbaImage) -> RgbView<'_> {
    RgbView::from_rgba(img.width(), img.height(), img.as_raw())
        .expect("RgbaImage buffers are always width * height * 4 bytes")
}

fn canvas_of(img: &RgbaImage) -> Canvas {
    Canvas::from_rgba(img.width(), img.height(), img.as_raw())
        .expect("RgbaImage buffers are always width * height * 4 bytes")
}

fn image_from_canvas(canvas: Canvas) -> RgbaImage {
    let (w, h) = (canvas.width(), canvas.height());
    RgbaImage::from_raw(w, h, canvas.into_rgba()).expect("canvas keeps its dimensions")
}

/// Scan `img` and return the accepted centers without painting.
pub fn find_corners_image(
    img: &RgbaImage,
    params: &FastParams,
) -> Result<ScanOutcome, DetectError> {
    detect_corners(&view_of(img), params)
}

/// Detect corners in `img` and return an annotated copy with every accepted
/// ring painted red.
pub fn annotate_image(
    img: &RgbaImage,
    params: &FastParams,
) -> Result<(RgbaImage, DetectionTrace), DetectError> {
    let canvas = canvas_of(img);
    let trace = detect_and_paint(&view_of(img), &canvas, params)?;
    Ok((image_from_canvas(canvas), trace))
}

/// Paint `points` red into a copy of `img` using `workers` workers.
///
/// Every point must lie inside `img`; the first one that does not is
/// reported as [`DetectError::PointOutOfBounds`] and nothing is painted.
pub fn paint_image(
    img: &RgbaImage,
    points: Vec<(u32, u32)>,
    workers: usize,
) -> Result<RgbaImage, DetectError> {
    if workers == 0 {
        return Err(DetectError::InvalidWorkers);
    }
    let dims = img.dimensions();
    if let Some(&point) = points.iter().find(|&&(x, y)| x >= dims.0 || y >= dims.1) {
        return Err(DetectError::PointOutOfBounds { point, dims });
    }
    let canvas = canvas_of(img);
    let pool = build_pool(workers)?;
    paint(&canvas, &CoordinateBag::new(points), workers, &pool);
    Ok(image_from_canvas(canvas))
}
