use log::{debug, trace};
use ndarray::{Array2, Array3, ArrayView2, Axis, Zip};

use super::action::{Action, ActionKind, Coord};
use super::observation::assemble_observation;
use super::raster::rasterize_line;
use super::reward::{contour_reward, region_iou};
use crate::config::EnvConfig;
use crate::core::{Env, EnvError, Info, InfoValue, Result, Step};
use crate::generator::Generator;
use crate::spaces::PenActionSpace;
use crate::utils::filters::{binary_fill_holes, gaussian_filter};

/// Union of every polygon finished this episode.
pub const COMMITTED: usize = 0;
/// Outline (and, while closing, interior) of the polygon being drawn.
pub const ACTIVE: usize = 1;
/// One-hot marker on the last placed vertex.
pub const CURSOR: usize = 2;

/// Penalty for lifting an already lifted pen or finishing without drawing.
pub const INVALID_ACTION_REWARD: f32 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenState {
    /// No polygon is open.
    Up,
    /// A polygon is open and `first_vertex` is set.
    Down,
    /// The episode was finished; only `reset` is allowed.
    Done,
}

impl PenState {
    fn as_str(self) -> &'static str {
        match self {
            PenState::Up => "up",
            PenState::Down => "down",
            PenState::Done => "done",
        }
    }
}

/// Fixed inputs of the current episode.
struct Episode {
    image: Array3<f32>,
    ground_truth: Array2<bool>,
    smoothed_mask: Array2<f32>,
}

/// Reward of one closed polygon, accumulated through the closing procedure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClosingReward {
    pub contour: f32,
    pub region: f32,
}

impl ClosingReward {
    pub fn total(&self) -> f32 { self.contour + self.region }
}

/// Interactive segmentation environment: an agent traces polygons with pen
/// actions and is rewarded for following the mask boundary and for the
/// overlap of each closed polygon with the ground truth.
///
/// Observation: `(C + 3) x H x W` float array, the image channels followed by
/// the committed, active and cursor channels.
/// Action: [`Action`], a pen decision at a canvas coordinate `(row, column)`.
pub struct SegmentationEnv<G: Generator> {
    config: EnvConfig,
    generator: G,
    episode: Option<Episode>,
    state_map: Array3<i16>,
    pen: PenState,
    first_vertex: Option<Coord>,
    current_vertex: Option<Coord>,
    polygons: usize,
}

impl<G: Generator> SegmentationEnv<G> {
    /// Build an environment. No sample is drawn until the first `reset`.
    pub fn new(config: EnvConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let (h, w) = config.canvas_shape;
        Ok(Self {
            config,
            generator,
            episode: None,
            state_map: Array3::zeros((3, h, w)),
            pen: PenState::Up,
            first_vertex: None,
            current_vertex: None,
            polygons: 0,
        })
    }

    pub fn config(&self) -> &EnvConfig { &self.config }
    pub fn pen_state(&self) -> PenState { self.pen }
    pub fn first_vertex(&self) -> Option<Coord> { self.first_vertex }
    pub fn current_vertex(&self) -> Option<Coord> { self.current_vertex }
    pub fn polygons(&self) -> usize { self.polygons }
    pub fn state_map(&self) -> &Array3<i16> { &self.state_map }

    pub fn channel(&self, index: usize) -> ArrayView2<'_, i16> {
        self.state_map.index_axis(Axis(0), index)
    }

    pub fn image(&self) -> Option<&Array3<f32>> { self.episode.as_ref().map(|e| &e.image) }
    pub fn ground_truth(&self) -> Option<&Array2<bool>> { self.episode.as_ref().map(|e| &e.ground_truth) }
    pub fn smoothed_mask(&self) -> Option<&Array2<f32>> { self.episode.as_ref().map(|e| &e.smoothed_mask) }

    pub fn action_space(&self) -> PenActionSpace {
        PenActionSpace::new(self.config.height(), self.config.width())
    }

    /// `(C + 3, H, W)` once an image has been loaded.
    pub fn observation_shape(&self) -> Option<(usize, usize, usize)> {
        let (c, h, w) = self.episode.as_ref()?.image.dim();
        Some((c + 3, h, w))
    }

    pub fn into_generator(self) -> G { self.generator }

    fn episode(&self) -> Result<&Episode> {
        self.episode
            .as_ref()
            .ok_or_else(|| EnvError::NotReady("call reset() before stepping".into()))
    }

    /// Current observation. Pure projection of the episode image and state map.
    pub fn observation(&self) -> Result<Array3<f32>> {
        assemble_observation(&self.episode()?.image, &self.state_map)
    }

    /// Sum of the smoothed mask over `pixels`, divided by `alpha`.
    pub fn contour_reward(&self, pixels: &[Coord]) -> Result<f32> {
        Ok(contour_reward(&self.episode()?.smoothed_mask, pixels, self.config.alpha))
    }

    /// IoU between the active channel and the ground truth (0.0 for an empty union).
    pub fn region_reward(&self) -> Result<f32> {
        let active = self.channel(ACTIVE).mapv(|v| v != 0);
        Ok(region_iou(&active, &self.episode()?.ground_truth))
    }

    fn check_coord(&self, (x, y): Coord) -> Result<()> {
        let (h, w) = self.config.canvas_shape;
        if x >= h || y >= w {
            return Err(EnvError::InvalidAction(format!("coordinate ({x}, {y}) outside {h}x{w} canvas")));
        }
        Ok(())
    }

    fn mark_active(&mut self, pixels: &[Coord]) {
        for &(x, y) in pixels {
            self.state_map[[ACTIVE, x, y]] = 1;
        }
    }

    fn move_cursor(&mut self, to: Coord) {
        if let Some((px, py)) = self.current_vertex {
            self.state_map[[CURSOR, px, py]] = 0;
        }
        self.state_map[[CURSOR, to.0, to.1]] = 1;
        self.current_vertex = Some(to);
    }

    /// Place the first vertex of a new polygon.
    fn open_polygon(&mut self, at: Coord) -> Result<f32> {
        let reward = self.contour_reward(&[at])?;
        self.state_map.index_axis_mut(Axis(0), CURSOR).fill(0);
        self.current_vertex = None;
        self.move_cursor(at);
        self.state_map[[ACTIVE, at.0, at.1]] = 1;
        self.first_vertex = Some(at);
        Ok(reward)
    }

    /// Draw the edge from the current vertex to `to`.
    fn extend_polygon(&mut self, to: Coord) -> Result<f32> {
        let from = self
            .current_vertex
            .ok_or_else(|| EnvError::Other("open polygon without a current vertex".into()))?;
        let edge = rasterize_line(from.0, from.1, to.0, to.1);
        let reward = self.contour_reward(&edge)?;
        self.mark_active(&edge);
        self.move_cursor(to);
        Ok(reward)
    }

    /// Close the open polygon at `last` and commit it.
    ///
    /// Draws the closing edge `last` -> first vertex, fills the enclosed
    /// interior, scores it against the ground truth, merges it into the
    /// committed channel and clears the active and cursor channels. The
    /// current vertex is not joined to `last`; agents place the final vertex
    /// with PEN_DOWN and lift the pen on it.
    fn close_polygon(&mut self, last: Coord) -> Result<ClosingReward> {
        let first = self
            .first_vertex
            .ok_or_else(|| EnvError::Other("closing without a first vertex".into()))?;
        let closing_edge = rasterize_line(last.0, last.1, first.0, first.1);
        let mut reward = ClosingReward { contour: self.contour_reward(&closing_edge)?, region: 0.0 };
        self.mark_active(&closing_edge);

        let outline = self.channel(ACTIVE).mapv(|v| v != 0);
        let filled = binary_fill_holes(&outline);
        Zip::from(self.state_map.index_axis_mut(Axis(0), ACTIVE))
            .and(&filled)
            .for_each(|a, &f| *a = i16::from(f));
        reward.region = self.region_reward()?;

        Zip::from(self.state_map.index_axis_mut(Axis(0), COMMITTED))
            .and(&filled)
            .for_each(|c, &f| {
                if f {
                    *c = 1;
                }
            });
        self.state_map.index_axis_mut(Axis(0), ACTIVE).fill(0);
        self.state_map.index_axis_mut(Axis(0), CURSOR).fill(0);
        self.first_vertex = None;
        self.current_vertex = None;
        self.polygons += 1;

        debug!(
            "committed polygon #{} ({} px): contour {:.4}, region {:.4}",
            self.polygons,
            filled.iter().filter(|&&f| f).count(),
            reward.contour,
            reward.region
        );
        Ok(reward)
    }

    fn step_info(&self) -> Info {
        Info::new()
            .with("pen_state", self.pen.as_str())
            .with("polygons", self.polygons)
    }
}

impl<G: Generator> Env for SegmentationEnv<G> {
    type Obs = Array3<f32>;
    type Act = Action;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        if let Some(s) = seed {
            self.generator.reseed(s);
        }
        // A failed reset leaves no episode to step.
        self.episode = None;
        let sample = self.generator.next_sample()?;
        let (h, w) = self.config.canvas_shape;
        if sample.image_hw() != (h, w) {
            return Err(EnvError::ShapeMismatch {
                what: "image",
                expected: vec![h, w],
                actual: sample.image.shape()[1..].to_vec(),
            });
        }
        if sample.mask.dim() != (h, w) {
            return Err(EnvError::ShapeMismatch {
                what: "mask",
                expected: vec![h, w],
                actual: sample.mask.shape().to_vec(),
            });
        }

        let smoothed_mask = gaussian_filter(&sample.mask, self.config.gaussian_std)?;
        let ground_truth = sample.mask.mapv(|v| v != 0.0);
        debug!(
            "reset: {} channel(s), {}x{} canvas, {} foreground px",
            sample.image.dim().0,
            h,
            w,
            ground_truth.iter().filter(|&&g| g).count()
        );
        self.episode = Some(Episode { image: sample.image, ground_truth, smoothed_mask });
        self.state_map.fill(0);
        self.pen = PenState::Up;
        self.first_vertex = None;
        self.current_vertex = None;
        self.polygons = 0;

        Ok((self.observation()?, self.step_info()))
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        self.episode()?;
        if self.pen == PenState::Done {
            return Err(EnvError::EpisodeFinished);
        }
        self.check_coord(action.coord)?;

        let mut info = Info::new();
        let (reward, next) = if self.pen == PenState::Up {
            match action.kind {
                ActionKind::PenUp => {
                    info.insert("penalty", InfoValue::Bool(true));
                    (INVALID_ACTION_REWARD, PenState::Up)
                }
                ActionKind::PenDown => (self.open_polygon(action.coord)?, PenState::Down),
                ActionKind::Finish => {
                    info.insert("penalty", InfoValue::Bool(true));
                    (INVALID_ACTION_REWARD, PenState::Done)
                }
            }
        } else {
            match action.kind {
                ActionKind::PenDown => (self.extend_polygon(action.coord)?, PenState::Down),
                kind => {
                    let closed = self.close_polygon(action.coord)?;
                    info.insert("contour_reward", InfoValue::from(closed.contour));
                    info.insert("region_reward", InfoValue::from(closed.region));
                    let next = if kind == ActionKind::Finish { PenState::Done } else { PenState::Up };
                    (closed.total(), next)
                }
            }
        };
        trace!("{action} with pen {} -> {} (reward {reward:.4})", self.pen.as_str(), next.as_str());
        self.pen = next;

        for (k, v) in self.step_info().iter() {
            info.insert(k, v.clone());
        }
        Ok(Step::new(self.observation()?, reward, next == PenState::Done, false, info))
    }
}
