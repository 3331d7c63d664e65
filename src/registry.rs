//! Registry that constructs environments by id from string kwargs.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Once, OnceLock, RwLock};

use log::warn;

use crate::config::{EnvConfig, parse_kwarg};
use crate::core::{Env, EnvError, Info, Result, Step};
use crate::envs::segmentation::SegmentationEnv;
use crate::generator::SyntheticGenerator;

pub use crate::config::KwArgs;

/// Id of the built-in environment backed by [`SyntheticGenerator`].
pub const POLYGON_SEGMENTATION_V0: &str = "PolygonSegmentation-v0";

/// Environment specification metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvSpec {
    /// Unique identifier like "PolygonSegmentation-v0".
    pub id: String,
    /// Suggested max episode steps for TimeLimit wrapper.
    pub max_episode_steps: Option<u32>,
    /// Whether environment has inherent nondeterminism beyond RNG seed.
    pub nondeterministic: bool,
    pub version: Option<String>,
}

impl EnvSpec {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), max_episode_steps: None, nondeterministic: false, version: None }
    }
}

/// A type-erased environment so that make() can return boxed envs.
pub trait EnvDyn {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Box<dyn Any>, Info)>;
    fn step(&mut self, action: Box<dyn Any>) -> Result<Step<Box<dyn Any>>>;
    fn close(&mut self);
}

/// Adapts any Env into EnvDyn by boxing Obs/Act via Any.
struct DynEnv<E: Env>(E);

impl<E: Env> EnvDyn for DynEnv<E>
where
    E::Obs: Any + 'static,
    E::Act: Any + 'static,
{
    fn reset(&mut self, seed: Option<u64>) -> Result<(Box<dyn Any>, Info)> {
        let (obs, info) = self.0.reset(seed)?;
        Ok((Box::new(obs), info))
    }

    fn step(&mut self, action: Box<dyn Any>) -> Result<Step<Box<dyn Any>>> {
        let action = *action
            .downcast::<E::Act>()
            .map_err(|_| EnvError::InvalidAction("action type does not match environment".into()))?;
        let s = self.0.step(action)?;
        Ok(Step::new(Box::new(s.observation) as Box<dyn Any>, s.reward, s.terminated, s.truncated, s.info))
    }

    fn close(&mut self) { self.0.close() }
}

/// Factory closure type for constructing environments with kwargs.
pub type FactoryFn = Box<dyn Fn(KwArgs) -> Result<Box<dyn EnvDyn + Send + Sync>> + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    specs: HashMap<String, EnvSpec>,
    factories: HashMap<String, FactoryFn>,
}

struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    fn new() -> Self { Self { inner: RwLock::new(RegistryInner::default()) } }

    fn register(&self, spec: EnvSpec, factory: FactoryFn) -> Result<()> {
        let mut g = self.inner.write().map_err(|_| EnvError::Other("registry poisoned".into()))?;
        if g.specs.contains_key(&spec.id) {
            return Err(EnvError::Other(format!("Env id already registered: {}", spec.id)));
        }
        g.factories.insert(spec.id.clone(), factory);
        g.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn get_spec(&self, id: &str) -> Option<EnvSpec> {
        let g = self.inner.read().ok()?;
        g.specs.get(id).cloned()
    }

    fn make(&self, id: &str, kwargs: KwArgs) -> Result<Box<dyn EnvDyn + Send + Sync>> {
        let guard = self.inner.read().map_err(|_| EnvError::Other("registry poisoned".into()))?;
        match guard.factories.get(id) {
            Some(f) => f(kwargs),
            None => Err(EnvError::Other(format!("Unknown environment id: {}", id))),
        }
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Register an environment spec and its factory globally.
pub fn register(spec: EnvSpec, factory: FactoryFn) -> Result<()> { registry().register(spec, factory) }

/// Fetch a registered EnvSpec by id.
pub fn get_spec(id: &str) -> Option<EnvSpec> { registry().get_spec(id) }

/// Construct an environment by id with kwargs, returning a boxed dynamic env.
pub fn make<S: AsRef<str>>(id: S, kwargs: KwArgs) -> Result<Box<dyn EnvDyn + Send + Sync>> {
    registry().make(id.as_ref(), kwargs)
}

/// Helper to adapt a fallible Env constructor into a factory function.
pub fn factory_of<E, F>(ctor: F) -> FactoryFn
where
    E: Env + Send + Sync + 'static,
    E::Obs: Any + 'static,
    E::Act: Any + 'static,
    F: Fn(KwArgs) -> Result<E> + Send + Sync + 'static,
{
    Box::new(move |kwargs: KwArgs| {
        let env = ctor(kwargs)?;
        Ok(Box::new(DynEnv::<E>(env)) as Box<dyn EnvDyn + Send + Sync>)
    })
}

/// Build the built-in synthetic environment from kwargs (`height`, `width`,
/// `gaussian_std`, `alpha`, `seed`).
pub fn synthetic_env(kwargs: &KwArgs) -> Result<SegmentationEnv<SyntheticGenerator>> {
    let config = EnvConfig::from_kwargs(kwargs)?;
    let seed = parse_kwarg::<u64>(kwargs, "seed")?.unwrap_or(0);
    let generator = SyntheticGenerator::new(config.height(), config.width(), seed);
    SegmentationEnv::new(config, generator)
}

/// Register the crate's built-in environments. Safe to call repeatedly.
pub fn register_builtins() {
    static BUILTINS: Once = Once::new();
    BUILTINS.call_once(|| {
        let spec = EnvSpec {
            id: POLYGON_SEGMENTATION_V0.into(),
            max_episode_steps: Some(200),
            nondeterministic: false,
            version: Some("0".into()),
        };
        if let Err(err) = register(spec, factory_of(|kwargs| synthetic_env(&kwargs))) {
            warn!("built-in registration skipped: {err}");
        }
    });
}
