use stride_core::{Dimensions, DynamicsType, Model};

use crate::{condition::Target, error::Error};

/// One phase of a multiple-shooting program.
///
/// A phase with `n_shooting` intervals has `n_shooting + 1` state nodes and
/// `n_shooting` control nodes; the terminal node carries states only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    dynamics: DynamicsType,
    dims: Dimensions,
    n_shooting: usize,
    final_time: f64,
}

impl Phase {
    /// Creates a phase for `model` under `dynamics`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] if `n_shooting` is zero or `final_time`
    /// is not finite and positive.
    pub fn new(
        model: &impl Model,
        dynamics: DynamicsType,
        n_shooting: usize,
        final_time: f64,
    ) -> Result<Self, Error> {
        if n_shooting == 0 {
            return Err(Error::InvalidPhase {
                reason: "n_shooting must be at least 1",
            });
        }
        if !final_time.is_finite() || final_time <= 0.0 {
            return Err(Error::InvalidPhase {
                reason: "final_time must be finite and positive",
            });
        }

        Ok(Self {
            dynamics,
            dims: dynamics.dimensions(model),
            n_shooting,
            final_time,
        })
    }

    #[must_use]
    pub fn dynamics(&self) -> DynamicsType {
        self.dynamics
    }

    /// Number of states per node.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.dims.nx
    }

    /// Number of controls per node.
    #[must_use]
    pub fn nu(&self) -> usize {
        self.dims.nu
    }

    #[must_use]
    pub fn n_shooting(&self) -> usize {
        self.n_shooting
    }

    #[must_use]
    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    /// Duration of one shooting interval.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f64 {
        self.final_time / self.n_shooting as f64
    }

    /// Number of decision variables this phase contributes.
    #[must_use]
    pub fn n_variables(&self) -> usize {
        (self.dims.nx + self.dims.nu) * self.n_shooting + self.dims.nx
    }

    /// Rows expected for `target`.
    pub(crate) fn dimension(&self, target: Target) -> usize {
        if target.is_state() {
            self.dims.nx
        } else {
            self.dims.nu
        }
    }

    /// Nodes spanned by `target`.
    pub(crate) fn n_nodes(&self, target: Target) -> usize {
        if target.is_state() {
            self.n_shooting + 1
        } else {
            self.n_shooting
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use stride_core::ModelDescription;

    #[test]
    fn cube_and_line_layout() {
        let model = ModelDescription::fully_actuated(4);
        let phase = Phase::new(&model, DynamicsType::TorqueDriven, 10, 1.0).expect("valid phase");

        assert_eq!(phase.nx(), 8);
        assert_eq!(phase.nu(), 4);
        assert_eq!(phase.n_variables(), 128);
        assert_eq!(phase.n_nodes(Target::XBounds), 11);
        assert_eq!(phase.n_nodes(Target::UInit), 10);
        assert_eq!(phase.dimension(Target::UBounds), 4);
        assert_relative_eq!(phase.step(), 0.1);
    }

    #[test]
    fn rejects_degenerate_phases() {
        let model = ModelDescription::fully_actuated(1);

        let err = Phase::new(&model, DynamicsType::TorqueDriven, 0, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidPhase { .. }));

        for final_time in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = Phase::new(&model, DynamicsType::TorqueDriven, 5, final_time);
            assert!(matches!(result, Err(Error::InvalidPhase { .. })));
        }
    }
}
