//! Polygon-tracing segmentation environment.
//!
//! The agent opens a polygon with PEN_DOWN, extends it with further PEN_DOWN
//! actions, and closes it with PEN_UP (or FINISH, which also ends the
//! episode). Edges earn the smoothed-mask line integral, closed polygons earn
//! their IoU with the ground truth.

pub mod action;
pub mod env;
pub mod observation;
pub mod raster;
pub mod reward;

pub use action::{Action, ActionKind, Coord};
pub use env::{ACTIVE, COMMITTED, CURSOR, ClosingReward, INVALID_ACTION_REWARD, PenState, SegmentationEnv};
pub use observation::assemble_observation;
pub use raster::rasterize_line;
pub use reward::{contour_reward, region_iou};
