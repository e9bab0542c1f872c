//! Fixed-step time integration for the N-body system
//!
//! One tick is: accumulate accelerations from the `AccelSet`, add them into
//! each body's accumulator, then let every body integrate itself

use super::states::{Body, NVec3};
use super::forces::AccelSet;
use super::params::Parameters;
use super::error::SimError;

/// Advance `bodies` by one unit step using semi-implicit Euler.
///
/// Forces are evaluated for every body before any body moves, so the result
/// doesn't depend on body order. If accumulation fails no body is touched and
/// the tick counts as not having happened.
pub fn euler_step(bodies: &mut [Body], forces: &AccelSet, params: &Parameters) -> Result<(), SimError> {
    let n = bodies.len();
    if n == 0 { // no bodies, return
        return Ok(());
    }

    // a[i] holds the acceleration on body i from the current positions
    let mut accels = vec![NVec3::zeros(); n];
    forces.accumulate_accels(bodies, &mut accels)?;

    // Kick, clamp, drift and clear the accumulator (see Body::update)
    for (b, a) in bodies.iter_mut().zip(accels.iter()) {
        b.acceleration += *a;
        b.update(params.c);
    }

    Ok(())
}
