//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait and the set that sums terms, plus the two
//! gravity terms: exact pairwise summation and the Barnes–Hut octree

use rayon::prelude::*;
use tracing::debug;

use crate::simulation::barnes_hut::Octree;
use crate::simulation::error::SimError;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations for all `bodies`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimError> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(bodies, out)?;
        }
        Ok(())
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimError>;
}

/// Newtonian gravity by direct n^2 summation
///
/// Reference result for the tree: uses the same radius guard, so with
/// `tolerance -> 0` the two agree.
pub struct DirectGravity {
    pub g: f64, // gravitational constant
}

impl Acceleration for DirectGravity {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimError> {
        let n = bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &bodies[i];

            for j in (i + 1)..n {
                let bj = &bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.location - bi.location;
                let r2 = r.norm_squared();

                let inv_r3 = (r2 * r2.sqrt()).recip();
                let coef = self.g * inv_r3;

                // Each side applies its own radius guard, so overlapping
                // bodies of different sizes can pull one way only.
                if r2 >= bi.radius() * bi.radius() {
                    out[i] += coef * bj.mass() * r;
                }
                if r2 >= bj.radius() * bj.radius() {
                    out[j] -= coef * bi.mass() * r;
                }
            }
        }
        Ok(())
    }
}

/// Newtonian gravity evaluated via a Barnes–Hut octree
///
/// Builds a fresh [`Octree`] from the bodies on every call and queries it
/// once per body. With `parallel` set the queries fan out over rayon; the
/// tree is read-only by then and each body writes only its own slot.
pub struct BarnesHutGravity {
    pub params: Parameters,
    pub parallel: bool,
}

impl Acceleration for BarnesHutGravity {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimError> {
        let tree = Octree::build(bodies, self.params)?;
        debug!(
            nodes = tree.node_count(),
            bodies = tree.total_bodies(),
            "octree built"
        );

        if self.parallel {
            out.par_iter_mut()
                .zip(bodies.par_iter())
                .for_each(|(acc, body)| tree.accelerate(body, acc));
        } else {
            for (acc, body) in out.iter_mut().zip(bodies.iter()) {
                tree.accelerate(body, acc);
            }
        }
        Ok(())
    }
}
