pub mod filters;
pub mod rng;

pub use filters::{binary_fill_holes, gaussian_filter};
pub use rng::{RngStream, SeedSequence, rng_from_seed, split_n};
