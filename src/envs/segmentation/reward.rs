//! Reward terms: contour following along drawn edges and region overlap of
//! closed polygons.

use ndarray::{Array2, Zip};

use super::action::Coord;

/// Line integral of the smoothed mask along `pixels`, scaled by `1 / alpha`.
///
/// An empty pixel sequence yields 0.
pub fn contour_reward(smoothed_mask: &Array2<f32>, pixels: &[Coord], alpha: f32) -> f32 {
    let total: f32 = pixels.iter().map(|&(x, y)| smoothed_mask[[x, y]]).sum();
    total / alpha
}

/// Intersection over union of two boolean planes.
///
/// When both planes are empty the union is empty and the overlap is defined
/// as 0.0.
pub fn region_iou(drawn: &Array2<bool>, truth: &Array2<bool>) -> f32 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    Zip::from(drawn).and(truth).for_each(|&d, &t| {
        intersection += usize::from(d && t);
        union += usize::from(d || t);
    });
    if union == 0 {
        return 0.0;
    }
    intersection as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn contour_reward_sums_and_scales() {
        let smoothed = array![[0.1f32, 0.2], [0.3, 0.4]];
        let r = contour_reward(&smoothed, &[(0, 1), (1, 1)], 0.05);
        assert!((r - 12.0).abs() < 1e-4);
        assert_eq!(contour_reward(&smoothed, &[], 0.05), 0.0);
    }

    #[test]
    fn identical_regions_score_one() {
        let a = array![[true, false], [true, true]];
        assert_eq!(region_iou(&a, &a), 1.0);
    }

    #[test]
    fn partial_overlap() {
        let drawn = array![[true, true], [false, false]];
        let truth = array![[true, false], [true, false]];
        assert!((region_iou(&drawn, &truth) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_regions_score_zero() {
        let drawn = array![[true, false], [false, false]];
        let truth = array![[false, false], [false, true]];
        assert_eq!(region_iou(&drawn, &truth), 0.0);
    }

    #[test]
    fn empty_union_is_zero_not_nan() {
        let empty = Array2::<bool>::from_elem((3, 3), false);
        let iou = region_iou(&empty, &empty);
        assert_eq!(iou, 0.0);
    }
}
