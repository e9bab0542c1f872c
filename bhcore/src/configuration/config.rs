//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – gravity model, octree geometry and tick count
//! - [`ParametersConfig`] – physical constants (`G`, speed cap `C`)
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   barnes_hut: true        # false -> exact pairwise sum
//!   tolerance: 0.5          # optional, width/distance threshold
//!   min_width: 1.0          # optional, smallest node that is still split
//!   width: 10000.0          # edge of the root cube, centered at the origin
//!   parallel: false         # optional, rayon fan-out of tree queries
//!   ticks: 100              # optional, ticks run by the binary
//!
//! parameters:
//!   G: 1.0                  # gravitational constant
//!   C: 1000.0               # speed cap
//!
//! bodies:
//!   - location: [ -500.0, 0.0, 0.0 ]
//!     mass: 1.0e6
//!   - location: [  500.0, 0.0, 0.0 ]
//!     velocity: [ 0.0, 1.0, 0.0 ]   # optional, defaults to rest
//! ```
//!
//! `mass` defaults to `1e6`. The raw config is checked and turned into
//! runtime [`Parameters`], [`Engine`] and [`Body`] values by the methods
//! below; everything invalid surfaces as a [`ConfigError`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::engine::Engine;
use crate::simulation::error::SimError;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, DEFAULT_MASS};

/// Error type for scenario loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("parameter `{name}` is out of range: {value}")]
    Parameter { name: &'static str, value: f64 },

    #[error("body {index}: `{field}` needs 3 components, got {len}")]
    BodyLength { index: usize, field: &'static str, len: usize },

    #[error("body {index}: {source}")]
    Body {
        index: usize,
        #[source]
        source: SimError,
    },
}

fn default_ticks() -> u64 {
    Engine::default().ticks
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub barnes_hut: bool, // `true` - octree approximation, `false` - direct N^2 summation
    pub tolerance: Option<f64>, // Barnes–Hut width/distance threshold
    pub min_width: Option<f64>, // nodes narrower than this are never split
    pub width: f64, // edge length of the root cube
    #[serde(default)]
    pub parallel: bool, // evaluate tree queries with rayon
    #[serde(default = "default_ticks")]
    pub ticks: u64, // number of ticks the host loop runs
}

/// Physical constants for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64, // gravitational constant
    #[serde(rename = "C")]
    pub c: f64, // speed cap
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub location: Vec<f64>, // initial position
    #[serde(default)]
    pub velocity: Option<Vec<f64>>, // initial velocity, at rest if omitted
    #[serde(default)]
    pub mass: Option<f64>, // defaults to DEFAULT_MASS
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // gravity model and octree geometry
    pub parameters: ParametersConfig, // physical constants
    pub bodies: Vec<BodyConfig>, // initial state of the system
}

impl ScenarioConfig {
    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Runtime parameters, with defaults for the optional octree settings.
    pub fn parameters(&self) -> Result<Parameters, ConfigError> {
        let defaults = Parameters::default();
        let params = Parameters {
            g: self.parameters.g,
            c: self.parameters.c,
            tolerance: self.engine.tolerance.unwrap_or(defaults.tolerance),
            min_width: self.engine.min_width.unwrap_or(defaults.min_width),
            width: self.engine.width,
        };

        non_negative("G", params.g)?;
        positive("C", params.c)?;
        non_negative("tolerance", params.tolerance)?;
        positive("min_width", params.min_width)?;
        positive("width", params.width)?;

        Ok(params)
    }

    pub fn engine(&self) -> Engine {
        Engine {
            barnes_hut: self.engine.barnes_hut,
            parallel: self.engine.parallel,
            ticks: self.engine.ticks,
        }
    }

    /// Runtime bodies, in file order.
    pub fn bodies(&self) -> Result<Vec<Body>, ConfigError> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, bc)| bc.to_body(index))
            .collect()
    }
}

impl BodyConfig {
    fn to_body(&self, index: usize) -> Result<Body, ConfigError> {
        let location = vec3(index, "location", &self.location)?;
        let velocity = match &self.velocity {
            Some(v) => vec3(index, "velocity", v)?,
            None => NVec3::zeros(),
        };
        let mass = self.mass.unwrap_or(DEFAULT_MASS);

        Body::new(location, mass, velocity).map_err(|source| ConfigError::Body { index, source })
    }
}

fn vec3(index: usize, field: &'static str, v: &[f64]) -> Result<NVec3, ConfigError> {
    match v {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(ConfigError::BodyLength { index, field, len: v.len() }),
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Parameter { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Parameter { name, value })
    }
}
