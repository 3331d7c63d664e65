// Vectorized environments: N independent instances driven from one thread.

use crate::core::{Env, Info, Result, Step};
use crate::utils::rng::split_n;

/// Runs N copies of an environment in the current thread.
///
/// - Construct with `SyncVectorEnv::new(n, || make_env())`
/// - Reset all envs (optionally with a base seed): `reset_all(Some(0))`
/// - Step with a batch of actions: `step_all(actions)`
///
/// Instances share nothing; each owns its generator and pixel state.
pub struct SyncVectorEnv<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> SyncVectorEnv<E> {
    pub fn new<F>(n: usize, factory: F) -> Self
    where
        F: FnMut() -> E,
    {
        Self { envs: std::iter::repeat_with(factory).take(n).collect() }
    }

    /// Build from a fallible factory, stopping at the first error.
    pub fn try_new<F>(n: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut() -> Result<E>,
    {
        let envs = (0..n).map(|_| factory()).collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    pub fn len(&self) -> usize { self.envs.len() }
    pub fn is_empty(&self) -> bool { self.envs.is_empty() }

    /// Reset all environments. With a base seed, each env receives its own
    /// sub-seed derived deterministically from it.
    pub fn reset_all(&mut self, base_seed: Option<u64>) -> Result<Vec<(E::Obs, Info)>> {
        let seeds: Vec<Option<u64>> = match base_seed {
            Some(s) => split_n(s, self.envs.len()).into_iter().map(Some).collect(),
            None => vec![None; self.envs.len()],
        };
        self.envs
            .iter_mut()
            .zip(seeds)
            .map(|(e, seed)| e.reset(seed))
            .collect()
    }

    /// Step all environments with a batch of actions.
    /// The length of `actions` must equal `self.len()`.
    pub fn step_all(&mut self, actions: Vec<E::Act>) -> Result<Vec<Step<E::Obs>>> {
        assert_eq!(actions.len(), self.envs.len(), "actions len must match envs len");
        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(e, a)| e.step(a))
            .collect()
    }

    pub fn close_all(&mut self) {
        for e in &mut self.envs { e.close(); }
    }

    pub fn envs(&self) -> &[E] { &self.envs }
    pub fn envs_mut(&mut self) -> &mut [E] { &mut self.envs }
}
