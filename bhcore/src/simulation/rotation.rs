//! Rigid rotation of a body about an axis through the origin.
//!
//! Pure geometry for view manipulation: location, velocity and acceleration
//! are all turned by the same rotation, so the dynamics are unchanged.

use nalgebra::{Rotation3, Unit};

use super::error::SimError;
use super::states::{Body, NVec3};

/// Rotate `body` by `angle` radians about `axis` (right-hand rule).
///
/// # Errors
/// [`SimError::DegenerateAxis`] if `axis` has (near) zero length.
pub fn rotate(body: &mut Body, axis: &NVec3, angle: f64) -> Result<(), SimError> {
    let axis = Unit::try_new(*axis, f64::EPSILON).ok_or(SimError::DegenerateAxis)?;
    let rot = Rotation3::from_axis_angle(&axis, angle);

    body.location = rot * body.location;
    body.velocity = rot * body.velocity;
    body.acceleration = rot * body.acceleration;
    Ok(())
}
