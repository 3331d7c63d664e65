pub mod config;
pub mod core;
pub mod envs;
pub mod generator;
pub mod registry;
pub mod spaces;
pub mod utils;
pub mod vector;
pub mod wrappers;

pub use crate::config::{EnvConfig, KwArgs};
pub use crate::core::{Env, EnvError, Info, InfoValue, Result, Step};
pub use crate::envs::segmentation::{Action, ActionKind, Coord, PenState, SegmentationEnv};
pub use crate::generator::{CyclingGenerator, FnGenerator, Generator, Sample, SyntheticGenerator};
#[cfg(feature = "image-io")]
pub use crate::generator::ImagePairGenerator;
pub use crate::spaces::{Discrete, PenActionSpace, Space};
pub use crate::vector::SyncVectorEnv;
pub use crate::wrappers::{ClipReward, RecordEpisodeStatistics, TimeLimit, TransformReward};
