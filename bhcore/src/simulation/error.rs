//! Errors raised at the boundary of the numerical core.
//!
//! Nothing inside a tick fails; these only come out of body construction,
//! tree insertion and the rotation utility.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("body mass must be non-negative, got {0}")]
    NegativeMass(f64),

    #[error("body mass must be finite, got {0}")]
    NonFiniteMass(f64),

    #[error("{field} has a non-finite component")]
    NonFiniteVector { field: &'static str },

    #[error("rotation axis has zero length")]
    DegenerateAxis,
}
