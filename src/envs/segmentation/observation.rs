use ndarray::{Array3, Axis, concatenate};

use crate::core::{EnvError, Result};

/// Stack the image channels on top of the three state channels.
///
/// `image` is `C x H x W`, `state_map` is `3 x H x W`; the result is
/// `(C + 3) x H x W` with state values widened to `f32`.
pub fn assemble_observation(image: &Array3<f32>, state_map: &Array3<i16>) -> Result<Array3<f32>> {
    let state = state_map.mapv(f32::from);
    concatenate(Axis(0), &[image.view(), state.view()]).map_err(|_| EnvError::ShapeMismatch {
        what: "observation planes",
        expected: state_map.shape()[1..].to_vec(),
        actual: image.shape()[1..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_image_before_state() {
        let image = Array3::<f32>::from_elem((2, 3, 4), 0.25);
        let mut state = Array3::<i16>::zeros((3, 3, 4));
        state[[2, 1, 1]] = 1;
        let obs = assemble_observation(&image, &state).expect("matching planes");
        assert_eq!(obs.dim(), (5, 3, 4));
        assert_eq!(obs[[0, 0, 0]], 0.25);
        assert_eq!(obs[[1, 2, 3]], 0.25);
        assert_eq!(obs[[4, 1, 1]], 1.0);
        assert_eq!(obs.index_axis(Axis(0), 2).sum(), 0.0);
    }

    #[test]
    fn mismatched_planes_are_reported() {
        let image = Array3::<f32>::zeros((1, 2, 2));
        let state = Array3::<i16>::zeros((3, 3, 3));
        assert!(matches!(
            assemble_observation(&image, &state),
            Err(EnvError::ShapeMismatch { .. })
        ));
    }
}
