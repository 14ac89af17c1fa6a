//! Programs described in TOML.
//!
//! Each condition carries a `kind` naming how it was built, which is where
//! provenance mismatches can still happen and get reported as
//! [`Error::Provenance`](crate::Error::Provenance).
//!
//! ```toml
//! [[phases]]
//! dynamics = "torque_driven"
//! n_shooting = 10
//! final_time = 1.0
//!
//! [phases.model]
//! nb_q = 1
//! nb_qdot = 1
//! nb_generalized_torque = 1
//!
//! [u_bounds]
//! kind = "bounds_option"
//! min = { type = "constant", values = [-100.0] }
//! max = { type = "constant", values = [100.0] }
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ndarray::Array1;
use serde::Deserialize;
use stride_core::{DynamicsType, ModelDescription};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    condition::{PathCondition, Target},
    error::Error,
    option::{BoundsList, BoundsOption, InitialConditionsList, InitialConditionsOption},
    phase::Phase,
    profile::{InterpolationType, NodeProfile, ProfileError},
    program::OptimalControlProgram,
};

/// Errors that can occur when loading or building a program from config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid model in phase {phase}: {reason}")]
    InvalidModel { phase: usize, reason: &'static str },

    #[error("invalid {target} profile")]
    Profile {
        target: Target,
        #[source]
        source: ProfileError,
    },

    #[error(transparent)]
    Program(#[from] Error),
}

/// A complete program description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramConfig {
    pub phases: Vec<PhaseConfig>,
    #[serde(default)]
    pub x_bounds: Option<ConditionSpec>,
    #[serde(default)]
    pub u_bounds: Option<ConditionSpec>,
    #[serde(default)]
    pub x_init: Option<ConditionSpec>,
    #[serde(default)]
    pub u_init: Option<ConditionSpec>,
}

/// One phase: the model layout, its dynamics and its time grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    pub model: ModelDescription,
    #[serde(default)]
    pub dynamics: DynamicsType,
    pub n_shooting: usize,
    pub final_time: f64,
}

/// A bounds or initial-condition entry, tagged with how it is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionSpec {
    BoundsOption(BoundsSpec),
    BoundsList { phases: Vec<BoundsSpec> },
    InitialConditionsOption(InitSpec),
    InitialConditionsList { phases: Vec<InitSpec> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundsSpec {
    pub min: ProfileSpec,
    pub max: ProfileSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitSpec {
    pub init: ProfileSpec,
}

/// Values of a [`NodeProfile`], one variant per [`InterpolationType`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileSpec {
    Constant {
        values: Vec<f64>,
    },
    ConstantWithFirstAndLastDifferent {
        first: Vec<f64>,
        middle: Vec<f64>,
        last: Vec<f64>,
    },
    Linear {
        start: Vec<f64>,
        end: Vec<f64>,
    },
    /// Columns are listed node by node.
    EachNode {
        columns: Vec<Vec<f64>>,
    },
}

impl ProgramConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read program config");
        Self::from_toml_str(&text)
    }

    /// Builds the program and applies the configured bounds and initial guesses.
    ///
    /// # Errors
    ///
    /// Returns an error if a model or profile is invalid, or if the program
    /// rejects a condition.
    pub fn build(&self) -> Result<OptimalControlProgram, ConfigError> {
        let phases = self
            .phases
            .iter()
            .enumerate()
            .map(|(index, phase)| -> Result<Phase, ConfigError> {
                phase
                    .model
                    .validate()
                    .map_err(|reason| ConfigError::InvalidModel { phase: index, reason })?;
                if phase.model.is_unranged() {
                    warn!(phase = index, "phase model declares no coordinate or velocity ranges");
                }
                Ok(Phase::new(
                    &phase.model,
                    phase.dynamics,
                    phase.n_shooting,
                    phase.final_time,
                )?)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut program = OptimalControlProgram::new(phases)?;

        let x_bounds = condition(self.x_bounds.as_ref(), Target::XBounds)?;
        let u_bounds = condition(self.u_bounds.as_ref(), Target::UBounds)?;
        if x_bounds.is_some() || u_bounds.is_some() {
            program.update_bounds(x_bounds, u_bounds)?;
        }

        let x_init = condition(self.x_init.as_ref(), Target::XInit)?;
        let u_init = condition(self.u_init.as_ref(), Target::UInit)?;
        if x_init.is_some() || u_init.is_some() {
            program.update_initial_guess(x_init, u_init)?;
        }

        info!(n_variables = program.n_variables(), "built program from config");
        Ok(program)
    }
}

fn condition(
    spec: Option<&ConditionSpec>,
    target: Target,
) -> Result<Option<PathCondition>, ConfigError> {
    spec.map(|spec| spec.to_condition(target)).transpose()
}

impl ConditionSpec {
    /// Converts this entry into a condition, keeping its declared kind.
    ///
    /// `target` only labels profile errors; whether the kind suits the target
    /// is decided by the program update.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Profile`] if a profile is malformed.
    pub fn to_condition(&self, target: Target) -> Result<PathCondition, ConfigError> {
        let wrap = |source| ConfigError::Profile { target, source };

        Ok(match self {
            Self::BoundsOption(spec) => spec.to_option().map_err(wrap)?.into(),
            Self::BoundsList { phases } => phases
                .iter()
                .map(BoundsSpec::to_option)
                .collect::<Result<BoundsList, _>>()
                .map_err(wrap)?
                .into(),
            Self::InitialConditionsOption(spec) => spec.to_option().map_err(wrap)?.into(),
            Self::InitialConditionsList { phases } => phases
                .iter()
                .map(InitSpec::to_option)
                .collect::<Result<InitialConditionsList, _>>()
                .map_err(wrap)?
                .into(),
        })
    }
}

impl BoundsSpec {
    /// Builds the bounds option this entry describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if either profile is malformed or they differ in size.
    pub fn to_option(&self) -> Result<BoundsOption, ProfileError> {
        BoundsOption::new(self.min.to_profile()?, self.max.to_profile()?)
    }
}

impl InitSpec {
    /// Builds the initial-conditions option this entry describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the profile is malformed.
    pub fn to_option(&self) -> Result<InitialConditionsOption, ProfileError> {
        Ok(InitialConditionsOption::new(self.init.to_profile()?))
    }
}

impl ProfileSpec {
    /// Builds the profile this entry describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the columns are ragged or missing.
    pub fn to_profile(&self) -> Result<NodeProfile, ProfileError> {
        match self {
            Self::Constant { values } => Ok(NodeProfile::constant(values.clone())),
            Self::ConstantWithFirstAndLastDifferent {
                first,
                middle,
                last,
            } => NodeProfile::first_middle_last(first.clone(), middle.clone(), last.clone()),
            Self::Linear { start, end } => NodeProfile::linear(start.clone(), end.clone()),
            Self::EachNode { columns } => {
                let columns: Vec<Array1<f64>> =
                    columns.iter().cloned().map(Array1::from).collect();
                NodeProfile::from_columns(InterpolationType::EachNode, &columns)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const PENDULUM: &str = r#"
        [[phases]]
        dynamics = "torque_driven"
        n_shooting = 3
        final_time = 1.0

        [phases.model]
        nb_q = 1
        nb_qdot = 1
        nb_generalized_torque = 1
    "#;

    #[test]
    fn builds_program_with_defaults() {
        let config = ProgramConfig::from_toml_str(PENDULUM).expect("valid config");
        let program = config.build().expect("valid program");

        assert_eq!(program.n_variables(), 3 * 3 + 2);
        assert!(program.v_init().init.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn unranged_model_still_builds() {
        let config = ProgramConfig::from_toml_str(PENDULUM).expect("valid config");
        assert!(config.phases[0].model.is_unranged());

        let program = config.build().expect("ranges are optional");
        assert!(program.v_bounds().max.iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn applies_configured_conditions() {
        let text = format!(
            r#"{PENDULUM}
            [x_bounds]
            kind = "bounds_option"
            min = {{ type = "constant_with_first_and_last_different", first = [0.0, 0.0], middle = [-1.0, -10.0], last = [1.57, 0.0] }}
            max = {{ type = "constant_with_first_and_last_different", first = [0.0, 0.0], middle = [4.0, 10.0], last = [1.57, 0.0] }}

            [u_init]
            kind = "initial_conditions_list"
            [[u_init.phases]]
            init = {{ type = "each_node", columns = [[1.0], [2.0], [3.0]] }}
        "#
        );

        let program = ProgramConfig::from_toml_str(&text)
            .expect("valid config")
            .build()
            .expect("valid program");

        let layout = program.layout();
        let min = &program.v_bounds().min;
        let last = layout.state_range(0, 3).expect("terminal node");
        assert_relative_eq!(min[last.start], 1.57);
        assert_relative_eq!(min[layout.state_range(0, 1).expect("node").start + 1], -10.0);

        let init = &program.v_init().init;
        assert_relative_eq!(init[layout.control_range(0, 2).expect("node").start], 3.0);
    }

    #[test]
    fn reports_provenance_mismatch() {
        let text = format!(
            r#"{PENDULUM}
            [x_bounds]
            kind = "initial_conditions_option"
            init = {{ type = "constant", values = [0.0, 0.0] }}
        "#
        );

        let err = ProgramConfig::from_toml_str(&text)
            .expect("parses")
            .build()
            .unwrap_err();

        assert!(matches!(err, ConfigError::Program(Error::Provenance { .. })));
        assert_eq!(
            err.to_string(),
            "X_bounds should be built from a BoundsOption or BoundsList"
        );
    }

    #[test]
    fn reports_ragged_profiles() {
        let text = format!(
            r#"{PENDULUM}
            [u_bounds]
            kind = "bounds_option"
            min = {{ type = "linear", start = [0.0], end = [0.0, 1.0] }}
            max = {{ type = "constant", values = [1.0] }}
        "#
        );

        let err = ProgramConfig::from_toml_str(&text)
            .expect("parses")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Profile {
                target: Target::UBounds,
                source: ProfileError::Ragged { .. },
            }
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        let text = format!(
            r#"{PENDULUM}
            [x_bounds]
            kind = "bounds_dict"
        "#
        );
        assert!(matches!(
            ProgramConfig::from_toml_str(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ProgramConfig::from_path("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
