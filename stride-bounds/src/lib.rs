//! Decision-vector bounds and initial guesses for direct multiple shooting.
//!
//! An [`OptimalControlProgram`] owns the flattened bounds ([`DecisionBounds`])
//! and initial guess ([`DecisionInit`]) handed to a nonlinear solver. They are
//! assembled from per-phase state and control specifications:
//!
//! - [`NodeProfile`] — values of one variable group across the shooting nodes,
//!   tagged with an explicit [`InterpolationType`]
//! - [`BoundsOption`], [`InitialConditionsOption`] — one phase's specification,
//!   collected per phase in [`BoundsList`] and [`InitialConditionsList`]
//! - [`PathCondition`] — what an update accepts, remembering how it was built
//!
//! For every phase the decision vector reads `x_0, u_0, x_1, u_1, ..., x_N`.
//!
//! ```
//! use stride_bounds::{BoundsOption, OptimalControlProgram};
//! use stride_core::{DynamicsType, ModelDescription};
//!
//! let model = ModelDescription::fully_actuated(1);
//! let mut ocp = OptimalControlProgram::single_phase(&model, DynamicsType::TorqueDriven, 2, 1.0)
//!     .unwrap();
//!
//! let u_bounds = BoundsOption::constant(vec![-2.0], vec![2.0]).unwrap();
//! ocp.update_bounds(None, Some(u_bounds.into())).unwrap();
//!
//! assert_eq!(ocp.v_bounds().min.len(), 8);
//! assert_eq!(ocp.v_bounds().min[2], -2.0);
//! ```

mod aggregate;
mod condition;
mod error;
mod option;
mod phase;
mod profile;
mod program;

pub mod config;

pub use aggregate::{DecisionBounds, DecisionInit, DecisionLayout};
pub use condition::{ConditionKind, PathCondition, Target};
pub use error::Error;
pub use option::{BoundsList, BoundsOption, InitialConditionsList, InitialConditionsOption};
pub use phase::Phase;
pub use profile::{InterpolationType, NodeProfile, ProfileError};
pub use program::OptimalControlProgram;
