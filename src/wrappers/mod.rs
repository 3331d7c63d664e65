// Wrappers compose around any Env without touching its dynamics.
//
// - TimeLimit: truncates episodes that never FINISH
// - ClipReward / TransformReward: reward shaping
// - RecordEpisodeStatistics: episode return and length in the final info

use crate::core::{Env, Info, InfoValue, Result, Step};

/// Marks truncation once an episode reaches `max_steps` steps.
pub struct TimeLimit<E: Env> {
    inner: E,
    max_steps: u32,
    steps: u32,
}

impl<E: Env> TimeLimit<E> {
    pub fn new(inner: E, max_steps: u32) -> Self {
        Self { inner, max_steps, steps: 0 }
    }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E: Env> Env for TimeLimit<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        self.steps = 0;
        self.inner.reset(seed)
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        self.steps += 1;
        if !s.terminated && !s.truncated && self.steps >= self.max_steps {
            s.truncated = true;
        }
        Ok(s)
    }

    fn close(&mut self) { self.inner.close() }
}

/// Clamps rewards into [min, max].
pub struct ClipReward<E: Env> {
    inner: E,
    min: f32,
    max: f32,
}

impl<E: Env> ClipReward<E> {
    pub fn new(inner: E, min: f32, max: f32) -> Self {
        assert!(min <= max, "ClipReward requires min <= max");
        Self { inner, min, max }
    }

    pub fn inner(&self) -> &E { &self.inner }
}

impl<E: Env> Env for ClipReward<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.inner.reset(seed) }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        s.reward = s.reward.clamp(self.min, self.max);
        Ok(s)
    }

    fn close(&mut self) { self.inner.close() }
}

/// Maps rewards through a user-provided function (e.g., scaling).
pub struct TransformReward<E, F>
where
    E: Env,
    F: Fn(f32) -> f32,
{
    inner: E,
    f: F,
}

impl<E, F> TransformReward<E, F>
where
    E: Env,
    F: Fn(f32) -> f32,
{
    pub fn new(inner: E, f: F) -> Self { Self { inner, f } }

    pub fn inner(&self) -> &E { &self.inner }
}

impl<E, F> Env for TransformReward<E, F>
where
    E: Env,
    F: Fn(f32) -> f32,
{
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.inner.reset(seed) }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        s.reward = (self.f)(s.reward);
        Ok(s)
    }

    fn close(&mut self) { self.inner.close() }
}

/// RecordEpisodeStatistics tracks cumulative return and episode length.
/// On episode end (terminated or truncated), it injects keys into the returned Step's Info:
/// - "episode_return": f64
/// - "episode_length": i64
pub struct RecordEpisodeStatistics<E: Env> {
    inner: E,
    ep_return: f64,
    ep_length: i64,
}

impl<E: Env> RecordEpisodeStatistics<E> {
    pub fn new(inner: E) -> Self { Self { inner, ep_return: 0.0, ep_length: 0 } }

    pub fn inner(&self) -> &E { &self.inner }
}

impl<E: Env> Env for RecordEpisodeStatistics<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        self.ep_return = 0.0;
        self.ep_length = 0;
        self.inner.reset(seed)
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        self.ep_return += s.reward as f64;
        self.ep_length += 1;
        if s.done() {
            s.info.insert("episode_return", InfoValue::from(self.ep_return));
            s.info.insert("episode_length", InfoValue::from(self.ep_length));
            self.ep_return = 0.0;
            self.ep_length = 0;
        }
        Ok(s)
    }

    fn close(&mut self) { self.inner.close() }
}
