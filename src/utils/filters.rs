//! Image primitives the environment depends on: Gaussian smoothing of the
//! ground-truth mask and morphological hole filling of drawn polygons.
//!
//! Both operate on row-major `ndarray` planes indexed `[row, column]`.

use std::collections::VecDeque;

use image::{ImageBuffer, Luma};
use ndarray::Array2;

use crate::core::{EnvError, Result};

/// Smooth a plane with an isotropic Gaussian of standard deviation `sigma`.
///
/// Wraps [`imageproc::filter::gaussian_blur_f32`], which clamps at the
/// edges. Non-positive `sigma` returns the plane unchanged, since
/// `imageproc` panics on it.
pub fn gaussian_filter(input: &Array2<f32>, sigma: f32) -> Result<Array2<f32>> {
    if sigma <= 0.0 || input.is_empty() {
        return Ok(input.clone());
    }
    let (h, w) = input.dim();
    let plane: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_raw(w as u32, h as u32, input.iter().copied().collect())
            .ok_or_else(|| EnvError::Other(format!("cannot view {h}x{w} plane as an image")))?;
    let blurred = imageproc::filter::gaussian_blur_f32(&plane, sigma);
    Array2::from_shape_vec((h, w), blurred.into_raw())
        .map_err(|e| EnvError::Other(format!("blurred plane has the wrong size: {e}")))
}

/// Fill every background region that is not 4-connected to the border.
///
/// Foreground pixels are kept. The traced outline of a polygon therefore
/// becomes the outline plus its enclosed interior.
#[must_use = "returns the filled mask"]
pub fn binary_fill_holes(mask: &Array2<bool>) -> Array2<bool> {
    if mask.is_empty() {
        return mask.clone();
    }
    let (h, w) = mask.dim();
    let mut outside = Array2::<bool>::from_elem((h, w), false);
    let mut queue = VecDeque::new();

    let seed = |r: usize, c: usize, outside: &mut Array2<bool>, queue: &mut VecDeque<(usize, usize)>| {
        if !mask[[r, c]] && !outside[[r, c]] {
            outside[[r, c]] = true;
            queue.push_back((r, c));
        }
    };
    for c in 0..w {
        seed(0, c, &mut outside, &mut queue);
        seed(h - 1, c, &mut outside, &mut queue);
    }
    for r in 0..h {
        seed(r, 0, &mut outside, &mut queue);
        seed(r, w - 1, &mut outside, &mut queue);
    }

    while let Some((r, c)) = queue.pop_front() {
        let neighbours = [
            (r.wrapping_sub(1), c),
            (r + 1, c),
            (r, c.wrapping_sub(1)),
            (r, c + 1),
        ];
        for (nr, nc) in neighbours {
            if nr < h && nc < w && !mask[[nr, nc]] && !outside[[nr, nc]] {
                outside[[nr, nc]] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    outside.mapv(|o| !o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn zero_sigma_returns_identical_plane() {
        let plane = array![[0.0, 1.0], [2.0, 3.0]];
        assert_eq!(gaussian_filter(&plane, 0.0).expect("blur"), plane);
        assert_eq!(gaussian_filter(&plane, -1.0).expect("blur"), plane);
    }

    #[test]
    fn uniform_plane_stays_uniform() {
        let plane = Array2::<f32>::from_elem((9, 7), 0.5);
        let smoothed = gaussian_filter(&plane, 1.5).expect("blur");
        assert_eq!(smoothed.dim(), (9, 7));
        assert!(smoothed.iter().all(|v| (v - 0.5).abs() < 1e-5));
    }

    #[test]
    fn impulse_spreads_and_keeps_mass() {
        let mut plane = Array2::<f32>::zeros((21, 21));
        plane[[10, 10]] = 1.0;
        let smoothed = gaussian_filter(&plane, 2.0).expect("blur");
        assert!(smoothed[[10, 10]] < 1.0);
        assert!(smoothed[[10, 11]] > 0.0);
        assert!((smoothed[[10, 11]] - smoothed[[11, 10]]).abs() < 1e-6);
        assert!((smoothed.sum() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn rows_and_columns_keep_their_orientation() {
        let mut plane = Array2::<f32>::zeros((9, 7));
        plane.row_mut(0).fill(1.0);
        let smoothed = gaussian_filter(&plane, 1.0).expect("blur");
        assert_eq!(smoothed.dim(), (9, 7));
        for c in 0..7 {
            assert!(smoothed[[0, c]] > smoothed[[8, c]]);
            assert!((smoothed[[0, c]] - smoothed[[0, 3]]).abs() < 1e-5);
        }
    }

    #[test]
    fn fills_enclosed_square() {
        let mut ring = Array2::<bool>::from_elem((5, 5), false);
        for i in 0..5 {
            ring[[0, i]] = true;
            ring[[4, i]] = true;
            ring[[i, 0]] = true;
            ring[[i, 4]] = true;
        }
        let filled = binary_fill_holes(&ring);
        assert!(filled.iter().all(|&v| v));
    }

    #[test]
    fn open_outline_is_not_filled() {
        let mut outline = Array2::<bool>::from_elem((5, 5), false);
        for i in 1..4 {
            outline[[1, i]] = true;
            outline[[i, 1]] = true;
            outline[[i, 3]] = true;
        }
        let filled = binary_fill_holes(&outline);
        assert_eq!(filled, outline);
    }

    #[test]
    fn diagonal_ring_blocks_four_connected_flood() {
        // Diamond outline: pixels with |r-3| + |c-3| == 3.
        let outline = Array2::from_shape_fn((7, 7), |(r, c)| {
            (r as i64 - 3).abs() + (c as i64 - 3).abs() == 3
        });
        let filled = binary_fill_holes(&outline);
        let expected = Array2::from_shape_fn((7, 7), |(r, c)| {
            (r as i64 - 3).abs() + (c as i64 - 3).abs() <= 3
        });
        assert_eq!(filled, expected);
    }

    #[test]
    fn empty_mask_stays_empty() {
        let mask = Array2::<bool>::from_elem((3, 4), false);
        assert_eq!(binary_fill_holes(&mask), mask);
    }
}
