use serde::{Deserialize, Serialize};

use crate::{Model, Range};

/// A model described by its counts and optional ranges.
///
/// Useful when the biomechanical model lives elsewhere and only its layout
/// is needed, e.g. when a program is loaded from a config file.
/// Missing ranges are treated as unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    #[serde(default)]
    pub name: Option<String>,
    pub nb_q: usize,
    pub nb_qdot: usize,
    pub nb_generalized_torque: usize,
    #[serde(default)]
    pub nb_muscles: usize,
    #[serde(default)]
    pub q_ranges: Option<Vec<Range>>,
    #[serde(default)]
    pub qdot_ranges: Option<Vec<Range>>,
}

impl ModelDescription {
    /// Creates a torque-actuated description with one torque per coordinate.
    #[must_use]
    pub fn fully_actuated(nb_q: usize) -> Self {
        Self {
            nb_q,
            nb_qdot: nb_q,
            nb_generalized_torque: nb_q,
            ..Self::default()
        }
    }

    /// Validates that any provided ranges match the declared counts.
    ///
    /// # Errors
    ///
    /// Returns an error if a range list has the wrong length.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.q_ranges.as_ref().is_some_and(|r| r.len() != self.nb_q) {
            return Err("q_ranges must have one entry per generalized coordinate");
        }
        if self
            .qdot_ranges
            .as_ref()
            .is_some_and(|r| r.len() != self.nb_qdot)
        {
            return Err("qdot_ranges must have one entry per generalized velocity");
        }
        Ok(())
    }

    /// Returns true if neither coordinate nor velocity ranges were provided.
    #[must_use]
    pub fn is_unranged(&self) -> bool {
        self.q_ranges.is_none() && self.qdot_ranges.is_none()
    }
}

impl Model for ModelDescription {
    fn nb_q(&self) -> usize {
        self.nb_q
    }

    fn nb_qdot(&self) -> usize {
        self.nb_qdot
    }

    fn nb_generalized_torque(&self) -> usize {
        self.nb_generalized_torque
    }

    fn nb_muscles(&self) -> usize {
        self.nb_muscles
    }

    fn q_ranges(&self) -> Vec<Range> {
        self.q_ranges
            .clone()
            .unwrap_or_else(|| vec![Range::UNBOUNDED; self.nb_q])
    }

    fn qdot_ranges(&self) -> Vec<Range> {
        self.qdot_ranges
            .clone()
            .unwrap_or_else(|| vec![Range::UNBOUNDED; self.nb_qdot])
    }
}
