//! Integer sampling of straight segments between two canvas pixels.

use super::action::Coord;

/// Evenly spaced samples from `start` to `stop` inclusive, last one exact.
fn linspace(start: f64, stop: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (stop - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| if n > 1 && i == n - 1 { stop } else { start + step * i as f64 })
}

/// Pixel coordinates of the segment from `(x0, y0)` to `(x1, y1)`.
///
/// The sample count is the Euclidean length rounded to the nearest integer;
/// samples are spread evenly over the segment, both endpoints included, and
/// truncated to integers. Coincident endpoints produce no samples at all, and
/// long segments may skip pixels along their major axis.
pub fn rasterize_line(x0: usize, y0: usize, x1: usize, y1: usize) -> Vec<Coord> {
    let (fx0, fy0, fx1, fy1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
    let n = (fx1 - fx0).hypot(fy1 - fy0).round() as usize;
    linspace(fx0, fx1, n)
        .zip(linspace(fy0, fy1, n))
        .map(|(x, y)| (x as usize, y as usize))
        .collect()
}
