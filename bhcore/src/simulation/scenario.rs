//! Build fully-initialized simulation worlds from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `World` containing:
//! - engine settings (`Engine`)
//! - physical and octree parameters (`Parameters`)
//! - the bodies at tick 0
//! - the active force set (`AccelSet`)
//!
//! The `World` is what a host loop drives: one `step` per tick

use tracing::{debug, info, instrument};

use crate::configuration::config::{ConfigError, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::error::SimError;
use crate::simulation::forces::{AccelSet, BarnesHutGravity, DirectGravity};
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::rotation::rotate;
use crate::simulation::states::{Body, NVec3};

/// Runtime bundle for one simulation: settings, bodies and force terms.
///
/// The force terms are derived from `engine` and `parameters`, so those are
/// only reachable through accessors; [`World::set_parameters`] keeps the two
/// in sync.
pub struct World {
    engine: Engine,
    parameters: Parameters,
    forces: AccelSet,
    pub bodies: Vec<Body>,
    pub tick: u64,
}

/// Gravity term selected by `engine.barnes_hut`.
fn gravity_for(parameters: Parameters, engine: Engine) -> AccelSet {
    if engine.barnes_hut {
        AccelSet::new().with(BarnesHutGravity {
            params: parameters,
            parallel: engine.parallel,
        })
    } else {
        AccelSet::new().with(DirectGravity { g: parameters.g })
    }
}

impl World {
    pub fn new(bodies: Vec<Body>, parameters: Parameters, engine: Engine) -> Self {
        Self {
            engine,
            parameters,
            forces: gravity_for(parameters, engine),
            bodies,
            tick: 0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn forces(&self) -> &AccelSet {
        &self.forces
    }

    /// Swap the physical and octree constants. The gravity term is rebuilt,
    /// so the next tick uses the new `g`, `tolerance`, `min_width` and `width`
    /// as well as the new speed cap.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        debug!(?parameters, "parameters replaced");
        self.parameters = parameters;
        self.forces = gravity_for(parameters, self.engine);
    }

    pub fn build_world(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        let parameters = cfg.parameters()?;
        let engine = cfg.engine();
        let bodies = cfg.bodies()?;

        info!(
            bodies = bodies.len(),
            barnes_hut = engine.barnes_hut,
            tolerance = parameters.tolerance,
            "world built"
        );

        Ok(Self::new(bodies, parameters, engine))
    }

    /// Run one tick. On error the bodies are unchanged and the tick counter
    /// doesn't advance.
    #[instrument(skip(self), fields(tick = self.tick))]
    pub fn step(&mut self) -> Result<(), SimError> {
        euler_step(&mut self.bodies, &self.forces, &self.parameters)?;
        self.tick += 1;
        debug!(max_speed = self.max_speed(), "tick done");
        Ok(())
    }

    pub fn run(&mut self, ticks: u64) -> Result<(), SimError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Rotate the whole world about an axis through the origin.
    pub fn rotate(&mut self, axis: &NVec3, angle: f64) -> Result<(), SimError> {
        for b in self.bodies.iter_mut() {
            rotate(b, axis, angle)?;
        }
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    /// Mass-weighted mean location. `None` when the total mass is zero.
    pub fn center_of_mass(&self) -> Option<NVec3> {
        let m = self.total_mass();
        if m <= 0.0 {
            return None;
        }
        let weighted = self
            .bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + b.location * b.mass());
        Some(weighted / m)
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn max_speed(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.velocity.norm())
            .fold(0.0, f64::max)
    }
}
