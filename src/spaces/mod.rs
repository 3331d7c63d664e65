//! Action spaces.

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::envs::segmentation::{Action, ActionKind};

/// A trait implemented by all spaces.
/// `Element` is the value type that lives in the space.
pub trait Space {
    type Element;

    /// Draw a sample from the space using the provided RNG.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Return true if the given element is a valid member of the space.
    fn contains(&self, elem: &Self::Element) -> bool;
}

/// A discrete space of integers in [0, n).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discrete {
    n: u32,
}

impl Discrete {
    pub fn new(n: u32) -> Self {
        assert!(n > 0, "Discrete space requires n > 0");
        Self { n }
    }

    pub fn n(&self) -> u32 { self.n }
}

impl Space for Discrete {
    type Element = u32;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        if self.n == 1 { return 0; }
        Uniform::from(0..self.n).sample(rng)
    }

    fn contains(&self, elem: &Self::Element) -> bool { *elem < self.n }
}

/// All pen actions on an `height x width` canvas.
///
/// Sampling picks the action kind from `kinds` and the coordinate uniformly
/// over the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenActionSpace {
    kinds: Discrete,
    height: usize,
    width: usize,
}

impl PenActionSpace {
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "PenActionSpace requires a non-empty canvas");
        Self { kinds: Discrete::new(ActionKind::ALL.len() as u32), height, width }
    }

    pub fn kinds(&self) -> &Discrete { &self.kinds }
    pub fn shape(&self) -> (usize, usize) { (self.height, self.width) }
}

impl Space for PenActionSpace {
    type Element = Action;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let kind = ActionKind::ALL[self.kinds.sample(rng) as usize];
        let x = Uniform::from(0..self.height).sample(rng);
        let y = Uniform::from(0..self.width).sample(rng);
        Action::new(kind, (x, y))
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        elem.coord.0 < self.height && elem.coord.1 < self.width
    }
}
