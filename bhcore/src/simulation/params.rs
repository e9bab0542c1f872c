//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the constants every tick reads:
//! - gravitational constant `g` and speed cap `c`,
//! - Barnes–Hut `tolerance` (accuracy / speed trade-off),
//! - octree `min_width` (smallest node that may be subdivided) and root `width`

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub c: f64, // speed cap
    pub tolerance: f64, // width / distance threshold, smaller = more accurate
    pub min_width: f64, // nodes narrower than this are never split
    pub width: f64, // root cube edge for Octree::build, explicit constructors take their own
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: 1.0,
            c: 1000.0,
            tolerance: 0.5,
            min_width: 1.0,
            width: 10_000.0,
        }
    }
}
