use std::fmt;

use crate::{
    error::Error,
    option::{BoundsList, BoundsOption, InitialConditionsList, InitialConditionsOption},
};

/// The variable group an update is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    XBounds,
    UBounds,
    XInit,
    UInit,
}

impl Target {
    /// Returns true for the state groups.
    #[must_use]
    pub fn is_state(self) -> bool {
        matches!(self, Self::XBounds | Self::XInit)
    }

    /// Describes the construction a condition for this target must come from.
    #[must_use]
    pub fn required_construction(self) -> &'static str {
        match self {
            Self::XBounds | Self::UBounds => "a BoundsOption or BoundsList",
            Self::XInit | Self::UInit => "a InitialConditionsOption or InitialConditionsList",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::XBounds => "X_bounds",
            Self::UBounds => "U_bounds",
            Self::XInit => "X_init",
            Self::UInit => "U_init",
        })
    }
}

/// How a [`PathCondition`] was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    BoundsOption,
    BoundsList,
    InitialConditionsOption,
    InitialConditionsList,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A bounds or initial-guess specification handed to a program update.
///
/// Only obtainable by converting one of the four option and list types, so
/// the provenance is always one of the recognized kinds. Handing bounds to an
/// initial-guess update (or the reverse) is reported as
/// [`Error::Provenance`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathCondition(Inner);

#[derive(Debug, Clone, PartialEq)]
enum Inner {
    BoundsOption(BoundsOption),
    BoundsList(BoundsList),
    InitialConditionsOption(InitialConditionsOption),
    InitialConditionsList(InitialConditionsList),
}

impl PathCondition {
    #[must_use]
    pub fn kind(&self) -> ConditionKind {
        match self.0 {
            Inner::BoundsOption(_) => ConditionKind::BoundsOption,
            Inner::BoundsList(_) => ConditionKind::BoundsList,
            Inner::InitialConditionsOption(_) => ConditionKind::InitialConditionsOption,
            Inner::InitialConditionsList(_) => ConditionKind::InitialConditionsList,
        }
    }

    /// Unwraps bounds destined for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provenance`] if this condition holds initial conditions.
    pub fn into_bounds(self, target: Target) -> Result<BoundsList, Error> {
        let found = self.kind();
        match self.0 {
            Inner::BoundsOption(option) => Ok(option.into()),
            Inner::BoundsList(list) => Ok(list),
            _ => Err(Error::Provenance { target, found }),
        }
    }

    /// Unwraps initial conditions destined for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provenance`] if this condition holds bounds.
    pub fn into_initial_conditions(self, target: Target) -> Result<InitialConditionsList, Error> {
        let found = self.kind();
        match self.0 {
            Inner::InitialConditionsOption(option) => Ok(option.into()),
            Inner::InitialConditionsList(list) => Ok(list),
            _ => Err(Error::Provenance { target, found }),
        }
    }
}

impl From<BoundsOption> for PathCondition {
    fn from(option: BoundsOption) -> Self {
        Self(Inner::BoundsOption(option))
    }
}

impl From<BoundsList> for PathCondition {
    fn from(list: BoundsList) -> Self {
        Self(Inner::BoundsList(list))
    }
}

impl From<InitialConditionsOption> for PathCondition {
    fn from(option: InitialConditionsOption) -> Self {
        Self(Inner::InitialConditionsOption(option))
    }
}

impl From<InitialConditionsList> for PathCondition {
    fn from(list: InitialConditionsList) -> Self {
        Self(Inner::InitialConditionsList(list))
    }
}
