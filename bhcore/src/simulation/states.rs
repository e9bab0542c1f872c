//! Core state types for the simulation.
//!
//! Defines the 3D `Body` (a point mass with its kinematic state) and the
//! `NVec3` vector alias used everywhere else in the crate.

use std::f64::consts::PI;

use nalgebra::Vector3;

use super::error::SimError;

pub type NVec3 = Vector3<f64>;

/// Mass used when a body is placed without an explicit mass.
pub const DEFAULT_MASS: f64 = 1.0e6;

/// A point mass with position, velocity and a per-tick acceleration accumulator.
///
/// `mass` and `radius` are fixed at construction. `acceleration` is scratch
/// space: force terms add into it during a tick and [`Body::update`] clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub location: NVec3,     // position
    pub velocity: NVec3,     // velocity per tick
    pub acceleration: NVec3, // accumulated this tick
    mass: f64,
    radius: f64, // derived from mass
}

impl Body {
    /// Body at the origin, at rest, with the given mass.
    pub fn with_mass(mass: f64) -> Result<Self, SimError> {
        Self::new(NVec3::zeros(), mass, NVec3::zeros())
    }

    /// Body at rest at `location` with [`DEFAULT_MASS`].
    pub fn at(location: NVec3) -> Result<Self, SimError> {
        Self::new(location, DEFAULT_MASS, NVec3::zeros())
    }

    /// Fully specified body. Rejects negative or non-finite mass and
    /// non-finite vectors so they never reach the tree aggregates.
    pub fn new(location: NVec3, mass: f64, velocity: NVec3) -> Result<Self, SimError> {
        if !mass.is_finite() {
            return Err(SimError::NonFiniteMass(mass));
        }
        if mass < 0.0 {
            return Err(SimError::NegativeMass(mass));
        }
        check_finite("location", &location)?;
        check_finite("velocity", &velocity)?;

        Ok(Self {
            location,
            velocity,
            acceleration: NVec3::zeros(),
            mass,
            radius: Self::radius_for_mass(mass),
        })
    }

    /// Visual radius for a body of uniform density: `10 * cbrt(3m / 4pi) + 1`.
    /// The `+ 1` keeps massless bodies visible.
    pub fn radius_for_mass(mass: f64) -> f64 {
        10.0 * (3.0 * mass / (4.0 * PI)).cbrt() + 1.0
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn momentum(&self) -> NVec3 {
        self.velocity * self.mass
    }

    /// Integrate one tick (semi-implicit Euler, unit step).
    ///
    /// Kick with the accumulated acceleration, clamp the speed to `speed_cap`
    /// keeping the direction, drift, then clear the accumulator.
    pub fn update(&mut self, speed_cap: f64) {
        // Kick: v_n+1 = v_n + a_n
        self.velocity += self.acceleration;

        let speed = self.velocity.norm();
        if speed > speed_cap {
            self.velocity *= speed_cap / speed;
        }

        // Drift: x_n+1 = x_n + v_n+1
        self.location += self.velocity;

        self.acceleration = NVec3::zeros();
    }
}

/// Reject a vector with any NaN or infinite component.
pub(crate) fn check_finite(field: &'static str, v: &NVec3) -> Result<(), SimError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SimError::NonFiniteVector { field })
    }
}
