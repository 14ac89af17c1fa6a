use ndarray::Array1;
use stride_core::Model;

use crate::profile::{NodeProfile, ProfileError};

/// Minimum and maximum profiles of one variable group in one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsOption {
    min: NodeProfile,
    max: NodeProfile,
}

impl BoundsOption {
    /// Creates bounds from a min and a max profile.
    ///
    /// The two profiles may use different interpolation types.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::DimensionMismatch`] if the row counts differ.
    pub fn new(min: NodeProfile, max: NodeProfile) -> Result<Self, ProfileError> {
        if min.dim() != max.dim() {
            return Err(ProfileError::DimensionMismatch {
                min: min.dim(),
                max: max.dim(),
            });
        }
        Ok(Self { min, max })
    }

    /// Creates bounds that hold the same columns at every node.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::DimensionMismatch`] if the columns differ in length.
    pub fn constant(
        min: impl Into<Array1<f64>>,
        max: impl Into<Array1<f64>>,
    ) -> Result<Self, ProfileError> {
        Self::new(NodeProfile::constant(min), NodeProfile::constant(max))
    }

    /// Creates state bounds from the model's coordinate and velocity ranges.
    ///
    /// Rows are the generalized coordinates followed by the velocities. The
    /// profile keeps distinct first and last columns so the initial and final
    /// postures can be pinned afterwards through [`BoundsOption::min_mut`] and
    /// [`BoundsOption::max_mut`].
    #[must_use]
    pub fn q_and_qdot(model: &impl Model) -> Self {
        let ranges: Vec<_> = model
            .q_ranges()
            .into_iter()
            .chain(model.qdot_ranges())
            .collect();

        let min: Array1<f64> = ranges.iter().map(|r| r.min()).collect();
        let max: Array1<f64> = ranges.iter().map(|r| r.max()).collect();

        Self {
            min: NodeProfile::uniform_first_middle_last(min),
            max: NodeProfile::uniform_first_middle_last(max),
        }
    }

    /// Bounds of `dim` rows that leave every variable free.
    #[must_use]
    pub fn unbounded(dim: usize) -> Self {
        Self {
            min: NodeProfile::filled(dim, f64::NEG_INFINITY),
            max: NodeProfile::filled(dim, f64::INFINITY),
        }
    }

    #[must_use]
    pub fn min(&self) -> &NodeProfile {
        &self.min
    }

    #[must_use]
    pub fn max(&self) -> &NodeProfile {
        &self.max
    }

    pub fn min_mut(&mut self) -> &mut NodeProfile {
        &mut self.min
    }

    pub fn max_mut(&mut self) -> &mut NodeProfile {
        &mut self.max
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.min.dim()
    }
}

/// Initial guess of one variable group in one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditionsOption {
    init: NodeProfile,
}

impl InitialConditionsOption {
    #[must_use]
    pub fn new(init: NodeProfile) -> Self {
        Self { init }
    }

    /// Creates an initial guess that holds `column` at every node.
    pub fn constant(column: impl Into<Array1<f64>>) -> Self {
        Self::new(NodeProfile::constant(column))
    }

    /// An initial guess of `dim` zeros.
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self::new(NodeProfile::filled(dim, 0.0))
    }

    #[must_use]
    pub fn init(&self) -> &NodeProfile {
        &self.init
    }

    pub fn init_mut(&mut self) -> &mut NodeProfile {
        &mut self.init
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.init.dim()
    }
}

macro_rules! define_option_list {
    ($(#[$meta:meta])* $list:ident, $option:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $list {
            options: Vec<$option>,
        }

        impl $list {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Appends the option for the next phase.
            pub fn add(&mut self, option: $option) {
                self.options.push(option);
            }

            /// Returns the option of `phase`, if any.
            #[must_use]
            pub fn get(&self, phase: usize) -> Option<&$option> {
                self.options.get(phase)
            }

            /// Returns the option of `phase` mutably, if any.
            pub fn get_mut(&mut self, phase: usize) -> Option<&mut $option> {
                self.options.get_mut(phase)
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.options.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.options.is_empty()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $option> {
                self.options.iter()
            }
        }

        impl From<$option> for $list {
            fn from(option: $option) -> Self {
                Self {
                    options: vec![option],
                }
            }
        }

        impl FromIterator<$option> for $list {
            fn from_iter<T: IntoIterator<Item = $option>>(iter: T) -> Self {
                Self {
                    options: iter.into_iter().collect(),
                }
            }
        }

        impl<'a> IntoIterator for &'a $list {
            type Item = &'a $option;
            type IntoIter = std::slice::Iter<'a, $option>;

            fn into_iter(self) -> Self::IntoIter {
                self.options.iter()
            }
        }
    };
}

define_option_list!(
    /// Bounds of one variable group, one [`BoundsOption`] per phase.
    BoundsList,
    BoundsOption
);

define_option_list!(
    /// Initial guesses of one variable group, one [`InitialConditionsOption`] per phase.
    InitialConditionsList,
    InitialConditionsOption
);

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use stride_core::{ModelDescription, Range};

    #[test]
    fn bounds_reject_mismatched_dimensions() {
        let err = BoundsOption::constant(vec![0.0; 3], vec![1.0; 2]).unwrap_err();
        assert_eq!(err, ProfileError::DimensionMismatch { min: 3, max: 2 });
    }

    #[test]
    fn q_and_qdot_stacks_coordinate_then_velocity_ranges() {
        let model = ModelDescription {
            q_ranges: Some(vec![
                Range::new(-1.0, 5.0).expect("valid"),
                Range::new(-2.0, 2.0).expect("valid"),
            ]),
            qdot_ranges: Some(vec![
                Range::new(-31.4, 31.4).expect("valid"),
                Range::new(-10.0, 10.0).expect("valid"),
            ]),
            ..ModelDescription::fully_actuated(2)
        };

        let bounds = BoundsOption::q_and_qdot(&model);
        assert_eq!(bounds.dim(), 4);
        assert_eq!(
            bounds.min().kind(),
            crate::InterpolationType::ConstantWithFirstAndLastDifferent
        );
        for node in 0..5 {
            assert_eq!(bounds.min().at(node, 5), array![-1.0, -2.0, -31.4, -10.0]);
            assert_eq!(bounds.max().at(node, 5), array![5.0, 2.0, 31.4, 10.0]);
        }
    }

    #[test]
    fn q_and_qdot_without_ranges_is_unbounded() {
        let bounds = BoundsOption::q_and_qdot(&ModelDescription::fully_actuated(3));
        assert_eq!(bounds.dim(), 6);
        assert!(bounds.min().values().iter().all(|v| *v == f64::NEG_INFINITY));
        assert!(bounds.max().values().iter().all(|v| *v == f64::INFINITY));
    }

    #[test]
    fn lists_keep_phase_order() {
        let mut list = InitialConditionsList::new();
        assert!(list.is_empty());

        list.add(InitialConditionsOption::constant(vec![1.0]));
        list.add(InitialConditionsOption::zeros(2));

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).map(InitialConditionsOption::dim), Some(1));
        assert_eq!(list.get(1).map(InitialConditionsOption::dim), Some(2));
        assert!(list.get(2).is_none());
    }
}
