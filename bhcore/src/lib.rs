pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, NVec3, DEFAULT_MASS};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::error::SimError;
pub use simulation::barnes_hut::{Occupancy, Octree, OctreeNode};
pub use simulation::forces::{AccelSet, Acceleration, BarnesHutGravity, DirectGravity};
pub use simulation::integrator::euler_step;
pub use simulation::rotation::rotate;
pub use simulation::scenario::World;

pub use configuration::config::{BodyConfig, ConfigError, EngineConfig, ParametersConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_gravity, bench_step, make_bodies};
