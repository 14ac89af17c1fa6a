use serde::{Deserialize, Serialize};

use crate::Model;

/// Dynamics formulations supported by the decision-vector layout.
///
/// The variant decides which model variables become states and which become
/// controls. The equations of motion themselves are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicsType {
    /// States are `q` and `qdot`; controls are generalized torques.
    #[default]
    TorqueDriven,
    /// Same layout as [`DynamicsType::TorqueDriven`], with contact forces.
    TorqueDrivenWithContact,
    /// States are `q` and `qdot`; controls are muscle activations.
    MuscleActivationsDriven,
    /// States are `q` and `qdot`; controls are torques followed by activations.
    MuscleActivationsAndTorqueDriven,
    /// States are `q`, `qdot` and activations; controls are muscle excitations.
    MuscleExcitationsDriven,
}

/// State and control counts for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of states per node.
    pub nx: usize,
    /// Number of controls per node.
    pub nu: usize,
}

impl DynamicsType {
    /// Returns the state and control counts of `model` under these dynamics.
    #[must_use]
    pub fn dimensions(self, model: &impl Model) -> Dimensions {
        let nq = model.nb_q() + model.nb_qdot();
        let ntau = model.nb_generalized_torque();
        let nmus = model.nb_muscles();

        match self {
            Self::TorqueDriven | Self::TorqueDrivenWithContact => Dimensions { nx: nq, nu: ntau },
            Self::MuscleActivationsDriven => Dimensions { nx: nq, nu: nmus },
            Self::MuscleActivationsAndTorqueDriven => Dimensions {
                nx: nq,
                nu: ntau + nmus,
            },
            Self::MuscleExcitationsDriven => Dimensions {
                nx: nq + nmus,
                nu: nmus,
            },
        }
    }
}
