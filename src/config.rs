//! Constructor-time configuration for the segmentation environment.
//!
//! A config is fixed for the lifetime of an environment instance. It can be
//! built in code, parsed from the stringly-typed kwargs used by
//! [`crate::registry::make`], or (with the `serde` feature) deserialized.

use std::collections::HashMap;
use std::str::FromStr;

use crate::core::{EnvError, Result};

/// Key-value kwargs for make(). Keep simple for now: stringly-typed values.
pub type KwArgs = HashMap<String, String>;

pub const DEFAULT_CANVAS_SHAPE: (usize, usize) = (256, 256);
pub const DEFAULT_GAUSSIAN_STD: f32 = 2.0;
pub const DEFAULT_ALPHA: f32 = 0.05;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvConfig {
    /// Canvas shape as (height, width). Every generated sample must match it.
    pub canvas_shape: (usize, usize),
    /// Standard deviation of the Gaussian used to smooth the ground-truth mask.
    pub gaussian_std: f32,
    /// Contour rewards are divided by this scale.
    pub alpha: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            canvas_shape: DEFAULT_CANVAS_SHAPE,
            gaussian_std: DEFAULT_GAUSSIAN_STD,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl EnvConfig {
    pub fn new(height: usize, width: usize) -> Self {
        Self { canvas_shape: (height, width), ..Self::default() }
    }

    pub fn with_gaussian_std(mut self, std: f32) -> Self {
        self.gaussian_std = std;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn height(&self) -> usize { self.canvas_shape.0 }
    pub fn width(&self) -> usize { self.canvas_shape.1 }

    pub fn validate(&self) -> Result<()> {
        let (h, w) = self.canvas_shape;
        if h == 0 || w == 0 {
            return Err(EnvError::InvalidConfig(format!("canvas_shape must be non-empty, got {h}x{w}")));
        }
        if !self.gaussian_std.is_finite() || self.gaussian_std < 0.0 {
            return Err(EnvError::InvalidConfig(format!(
                "gaussian_std must be finite and >= 0, got {}",
                self.gaussian_std
            )));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(EnvError::InvalidConfig(format!("alpha must be finite and > 0, got {}", self.alpha)));
        }
        Ok(())
    }

    /// Build a config from kwargs, starting from defaults.
    ///
    /// Recognized keys: `height`, `width`, `gaussian_std`, `alpha`. Unknown keys
    /// are ignored so that factories can carry their own extra options.
    pub fn from_kwargs(kwargs: &KwArgs) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(h) = parse_kwarg::<usize>(kwargs, "height")? { cfg.canvas_shape.0 = h; }
        if let Some(w) = parse_kwarg::<usize>(kwargs, "width")? { cfg.canvas_shape.1 = w; }
        if let Some(s) = parse_kwarg::<f32>(kwargs, "gaussian_std")? { cfg.gaussian_std = s; }
        if let Some(a) = parse_kwarg::<f32>(kwargs, "alpha")? { cfg.alpha = a; }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Parse an optional kwarg, reporting the offending key on failure.
pub fn parse_kwarg<T: FromStr>(kwargs: &KwArgs, key: &str) -> Result<Option<T>> {
    match kwargs.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EnvError::InvalidConfig(format!("cannot parse kwarg {key}={raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(pairs: &[(&str, &str)]) -> KwArgs {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_match_reference_values() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.canvas_shape, (256, 256));
        assert_eq!(cfg.gaussian_std, 2.0);
        assert_eq!(cfg.alpha, 0.05);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn kwargs_override_defaults() {
        let cfg = EnvConfig::from_kwargs(&kw(&[("height", "32"), ("width", "48"), ("alpha", "0.1"), ("seed", "7")]))
            .expect("valid kwargs");
        assert_eq!(cfg.canvas_shape, (32, 48));
        assert_eq!(cfg.alpha, 0.1);
        assert_eq!(cfg.gaussian_std, DEFAULT_GAUSSIAN_STD);
    }

    #[test]
    fn unparsable_kwarg_is_invalid_config() {
        let err = EnvConfig::from_kwargs(&kw(&[("width", "wide")])).unwrap_err();
        assert!(matches!(err, EnvError::InvalidConfig(msg) if msg.contains("width")));
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(EnvConfig::new(0, 4).validate().is_err());
        assert!(EnvConfig::new(4, 4).with_alpha(0.0).validate().is_err());
        assert!(EnvConfig::new(4, 4).with_alpha(f32::NAN).validate().is_err());
        assert!(EnvConfig::new(4, 4).with_gaussian_std(-1.0).validate().is_err());
        assert!(EnvConfig::new(4, 4).with_gaussian_std(0.0).validate().is_ok());
    }
}
