pub mod segmentation;

pub use segmentation::SegmentationEnv;
