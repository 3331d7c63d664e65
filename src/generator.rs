//! Sources of (image, ground-truth mask) pairs pulled by the environment on
//! every reset.
//!
//! The environment only checks shapes; everything about where samples come
//! from lives behind the [`Generator`] trait.

use ndarray::{Array2, Array3, Axis};
use rand::Rng;

use crate::core::{EnvError, Result};
use crate::utils::rng::{RngStream, rng_from_seed};

/// One episode's input: a `C x H x W` image and its `H x W` mask.
///
/// Mask values are boolean-castable: any nonzero value is foreground.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub image: Array3<f32>,
    pub mask: Array2<f32>,
}

impl Sample {
    pub fn new(image: Array3<f32>, mask: Array2<f32>) -> Self { Self { image, mask } }

    /// Single-channel sample from an `H x W` image.
    pub fn grayscale(image: Array2<f32>, mask: Array2<f32>) -> Self {
        Self { image: image.insert_axis(Axis(0)), mask }
    }

    /// `(height, width)` of the image planes.
    pub fn image_hw(&self) -> (usize, usize) {
        let (_, h, w) = self.image.dim();
        (h, w)
    }
}

/// Produces the next sample for a fresh episode.
pub trait Generator {
    fn next_sample(&mut self) -> Result<Sample>;

    /// Restart any internal randomness from `seed`. Deterministic sources ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn next_sample(&mut self) -> Result<Sample> { (**self).next_sample() }
    fn reseed(&mut self, seed: u64) { (**self).reseed(seed) }
}

/// Adapts a closure into a [`Generator`].
pub struct FnGenerator<F> {
    f: F,
}

pub fn from_fn<F>(f: F) -> FnGenerator<F>
where
    F: FnMut() -> Result<Sample>,
{
    FnGenerator { f }
}

impl<F> Generator for FnGenerator<F>
where
    F: FnMut() -> Result<Sample>,
{
    fn next_sample(&mut self) -> Result<Sample> { (self.f)() }
}

/// Replays a fixed list of samples in order, wrapping around.
#[derive(Clone, Debug)]
pub struct CyclingGenerator {
    samples: Vec<Sample>,
    next: usize,
}

impl CyclingGenerator {
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(EnvError::Generator("CyclingGenerator needs at least one sample".into()));
        }
        Ok(Self { samples, next: 0 })
    }

    /// A generator that always yields the same sample.
    pub fn repeat(sample: Sample) -> Self {
        Self { samples: vec![sample], next: 0 }
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
}

impl Generator for CyclingGenerator {
    fn next_sample(&mut self) -> Result<Sample> {
        let sample = self.samples[self.next].clone();
        self.next = (self.next + 1) % self.samples.len();
        Ok(sample)
    }
}

/// Random blob masks on a noisy grayscale canvas.
///
/// Each sample holds between one and `max_shapes` filled rectangles or
/// ellipses. The image is the mask drawn at a fixed contrast plus uniform
/// noise, clamped to `[0, 1]`.
pub struct SyntheticGenerator {
    height: usize,
    width: usize,
    pub max_shapes: usize,
    pub noise: f32,
    rng: RngStream,
}

impl SyntheticGenerator {
    pub fn new(height: usize, width: usize, seed: u64) -> Self {
        Self { height, width, max_shapes: 3, noise: 0.1, rng: rng_from_seed(seed) }
    }

    fn paint_shape(&mut self, mask: &mut Array2<f32>) {
        let (h, w) = (self.height, self.width);
        let cx = self.rng.gen_range(0..h) as f32;
        let cy = self.rng.gen_range(0..w) as f32;
        let rx = self.rng.gen_range((h as f32 / 8.0).max(1.0)..=(h as f32 / 3.0).max(1.0));
        let ry = self.rng.gen_range((w as f32 / 8.0).max(1.0)..=(w as f32 / 3.0).max(1.0));
        let ellipse = self.rng.gen_bool(0.5);
        for ((r, c), v) in mask.indexed_iter_mut() {
            let dx = (r as f32 - cx) / rx;
            let dy = (c as f32 - cy) / ry;
            let inside = if ellipse { dx * dx + dy * dy <= 1.0 } else { dx.abs() <= 1.0 && dy.abs() <= 1.0 };
            if inside {
                *v = 1.0;
            }
        }
    }
}

impl Generator for SyntheticGenerator {
    fn next_sample(&mut self) -> Result<Sample> {
        let mut mask = Array2::<f32>::zeros((self.height, self.width));
        let shapes = self.rng.gen_range(1..=self.max_shapes.max(1));
        for _ in 0..shapes {
            self.paint_shape(&mut mask);
        }
        let noise = self.noise.abs();
        let image = mask.mapv(|m| {
            let jitter = if noise > 0.0 { self.rng.gen_range(-noise..=noise) } else { 0.0 };
            (0.2 + 0.6 * m + jitter).clamp(0.0, 1.0)
        });
        Ok(Sample::grayscale(image, mask))
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = rng_from_seed(seed);
    }
}

#[cfg(feature = "image-io")]
pub use image_pairs::ImagePairGenerator;

#[cfg(feature = "image-io")]
mod image_pairs {
    use std::path::{Path, PathBuf};

    use ndarray::Array2;

    use super::{Generator, Sample};
    use crate::core::{EnvError, Result};

    /// Loads (image, mask) file pairs from disk, cycling through them.
    ///
    /// Images are converted to luma and scaled to `[0, 1]`; any nonzero mask
    /// pixel is foreground.
    pub struct ImagePairGenerator {
        pairs: Vec<(PathBuf, PathBuf)>,
        next: usize,
    }

    impl ImagePairGenerator {
        pub fn new<P: Into<PathBuf>>(pairs: impl IntoIterator<Item = (P, P)>) -> Result<Self> {
            let pairs: Vec<_> = pairs.into_iter().map(|(i, m)| (i.into(), m.into())).collect();
            if pairs.is_empty() {
                return Err(EnvError::Generator("ImagePairGenerator needs at least one pair".into()));
            }
            Ok(Self { pairs, next: 0 })
        }
    }

    fn load_luma(path: &Path) -> Result<Array2<f32>> {
        let img = image::open(path)
            .map_err(|e| EnvError::Generator(format!("failed to load {}: {e}", path.display())))?
            .to_luma8();
        let (w, h) = img.dimensions();
        Ok(Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
            f32::from(img.get_pixel(c as u32, r as u32).0[0]) / 255.0
        }))
    }

    impl Generator for ImagePairGenerator {
        fn next_sample(&mut self) -> Result<Sample> {
            let (image_path, mask_path) = &self.pairs[self.next];
            self.next = (self.next + 1) % self.pairs.len();
            let image = load_luma(image_path)?;
            let mask = load_luma(mask_path)?.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
            log::debug!("loaded {} with mask {}", image_path.display(), mask_path.display());
            Ok(Sample::grayscale(image, mask))
        }
    }
}
