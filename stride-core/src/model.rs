use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A dynamical model consumed by an optimal control program.
///
/// Only the variable counts and the admissible ranges are queried. Rigid-body
/// dynamics, integration and everything else stay with the implementor.
pub trait Model {
    /// Number of generalized coordinates.
    fn nb_q(&self) -> usize;

    /// Number of generalized velocities.
    fn nb_qdot(&self) -> usize;

    /// Number of generalized torques (actuated degrees of freedom).
    fn nb_generalized_torque(&self) -> usize;

    /// Number of muscles.
    fn nb_muscles(&self) -> usize {
        0
    }

    /// Admissible ranges of the generalized coordinates, one per coordinate.
    fn q_ranges(&self) -> Vec<Range> {
        vec![Range::UNBOUNDED; self.nb_q()]
    }

    /// Admissible ranges of the generalized velocities, one per velocity.
    fn qdot_ranges(&self) -> Vec<Range> {
        vec![Range::UNBOUNDED; self.nb_qdot()]
    }
}

/// Error returned when a [`Range`] has `min > max` or a NaN endpoint.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("invalid range: [{min}, {max}]")]
pub struct RangeError {
    pub min: f64,
    pub max: f64,
}

/// A closed interval `[min, max]`; endpoints may be infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// The interval `(-inf, +inf)`.
    pub const UNBOUNDED: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if either endpoint is NaN or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, RangeError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(RangeError { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl TryFrom<[f64; 2]> for Range {
    type Error = RangeError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<Range> for [f64; 2] {
    fn from(range: Range) -> Self {
        [range.min, range.max]
    }
}
