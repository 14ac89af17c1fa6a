// Node indices are small enough to be exact in f64.
#![allow(clippy::cast_precision_loss)]

use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut2, Axis};
use thiserror::Error;

/// How a [`NodeProfile`]'s columns map onto the shooting nodes of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationType {
    /// One column, broadcast to every node.
    Constant,
    /// Three columns: first node, intermediate nodes, last node.
    ConstantWithFirstAndLastDifferent,
    /// Two columns interpolated linearly from the first to the last node.
    Linear,
    /// One column per node, used positionally.
    EachNode,
}

impl InterpolationType {
    /// Number of columns required to describe `n_nodes` nodes.
    #[must_use]
    pub fn expected_columns(self, n_nodes: usize) -> usize {
        match self {
            Self::Constant => 1,
            Self::ConstantWithFirstAndLastDifferent => 3,
            Self::Linear => 2,
            Self::EachNode => n_nodes,
        }
    }
}

/// Errors that can occur when building a [`NodeProfile`] or a bounds pair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("columns have different lengths: expected {expected}, found {found}")]
    Ragged { expected: usize, found: usize },

    #[error("{kind:?} profile needs {expected} columns, found {found}")]
    ColumnCount {
        kind: InterpolationType,
        expected: usize,
        found: usize,
    },

    #[error("min has {min} rows but max has {max}")]
    DimensionMismatch { min: usize, max: usize },
}

/// Values of one variable group across the nodes of a phase.
///
/// A profile is a `(dimension, columns)` array tagged with an explicit
/// [`InterpolationType`]. The column count always agrees with the type for
/// the fixed-width types; [`InterpolationType::EachNode`] is checked against
/// the phase when the profile is aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProfile {
    kind: InterpolationType,
    values: Array2<f64>,
}

impl NodeProfile {
    /// Creates a profile holding `column` at every node.
    pub fn constant(column: impl Into<Array1<f64>>) -> Self {
        let column: Array1<f64> = column.into();
        Self {
            kind: InterpolationType::Constant,
            values: column.insert_axis(Axis(1)),
        }
    }

    /// Creates a constant profile of `dim` rows all equal to `value`.
    #[must_use]
    pub fn filled(dim: usize, value: f64) -> Self {
        Self::constant(Array1::from_elem(dim, value))
    }

    /// Creates a profile whose first and last nodes differ from the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Ragged`] if the columns differ in length.
    pub fn first_middle_last(
        first: impl Into<Array1<f64>>,
        middle: impl Into<Array1<f64>>,
        last: impl Into<Array1<f64>>,
    ) -> Result<Self, ProfileError> {
        let columns: [Array1<f64>; 3] = [first.into(), middle.into(), last.into()];
        Self::from_columns(InterpolationType::ConstantWithFirstAndLastDifferent, &columns)
    }

    /// Creates a first/last profile whose three columns all start as `column`.
    ///
    /// The first or last node can then be pinned through [`NodeProfile::values_mut`].
    pub fn uniform_first_middle_last(column: impl Into<Array1<f64>>) -> Self {
        let column: Array1<f64> = column.into();
        Self {
            kind: InterpolationType::ConstantWithFirstAndLastDifferent,
            values: Array2::from_shape_fn((column.len(), 3), |(row, _)| column[row]),
        }
    }

    /// Creates a profile interpolated linearly from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Ragged`] if the columns differ in length.
    pub fn linear(
        start: impl Into<Array1<f64>>,
        end: impl Into<Array1<f64>>,
    ) -> Result<Self, ProfileError> {
        let columns: [Array1<f64>; 2] = [start.into(), end.into()];
        Self::from_columns(InterpolationType::Linear, &columns)
    }

    /// Creates a profile with one column per node.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ColumnCount`] if `values` has no columns.
    pub fn each_node(values: Array2<f64>) -> Result<Self, ProfileError> {
        Self::from_array(InterpolationType::EachNode, values)
    }

    /// Creates a profile of the given type from a `(dimension, columns)` array.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ColumnCount`] if the column count does not fit
    /// `kind`. An [`InterpolationType::EachNode`] profile needs at least one.
    pub fn from_array(kind: InterpolationType, values: Array2<f64>) -> Result<Self, ProfileError> {
        let found = values.ncols();
        let fits = match kind {
            InterpolationType::EachNode => found > 0,
            _ => found == kind.expected_columns(0),
        };
        if !fits {
            return Err(ProfileError::ColumnCount {
                kind,
                expected: kind.expected_columns(0).max(1),
                found,
            });
        }
        Ok(Self { kind, values })
    }

    /// Creates a profile of the given type from a list of columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns are ragged or their count does not fit `kind`.
    pub fn from_columns(kind: InterpolationType, columns: &[Array1<f64>]) -> Result<Self, ProfileError> {
        let dim = columns.first().map_or(0, |c| c.len());
        if let Some(column) = columns.iter().find(|c| c.len() != dim) {
            return Err(ProfileError::Ragged {
                expected: dim,
                found: column.len(),
            });
        }

        let values = Array2::from_shape_fn((dim, columns.len()), |(row, col)| columns[col][row]);
        Self::from_array(kind, values)
    }

    #[must_use]
    pub fn kind(&self) -> InterpolationType {
        self.kind
    }

    /// Number of rows, i.e. the size of the variable group.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.values.nrows()
    }

    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    #[must_use]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Mutable access to the values; the shape cannot change.
    pub fn values_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.values.view_mut()
    }

    /// Returns true if this profile can describe a group of `n_nodes` nodes.
    #[must_use]
    pub fn fits(&self, n_nodes: usize) -> bool {
        self.n_columns() == self.kind.expected_columns(n_nodes)
    }

    /// Evaluates the profile at `node` of a group with `n_nodes` nodes.
    ///
    /// Returns `None` if `node >= n_nodes` or the profile does not fit `n_nodes`.
    #[must_use]
    pub fn value_at(&self, node: usize, n_nodes: usize) -> Option<Array1<f64>> {
        (node < n_nodes && self.fits(n_nodes)).then(|| self.at(node, n_nodes))
    }

    /// Unchecked form of [`NodeProfile::value_at`] for profiles already
    /// validated against their phase.
    pub(crate) fn at(&self, node: usize, n_nodes: usize) -> Array1<f64> {
        debug_assert!(node < n_nodes && self.fits(n_nodes));

        match self.kind {
            InterpolationType::Constant => self.values.column(0).to_owned(),
            InterpolationType::ConstantWithFirstAndLastDifferent => {
                let col = if node == 0 {
                    0
                } else if node + 1 == n_nodes {
                    2
                } else {
                    1
                };
                self.values.column(col).to_owned()
            }
            InterpolationType::Linear => {
                let start = self.values.column(0);
                if n_nodes < 2 {
                    return start.to_owned();
                }
                let end = self.values.column(1);
                let t = node as f64 / (n_nodes - 1) as f64;
                &start + &((&end - &start) * t)
            }
            InterpolationType::EachNode => self.values.column(node).to_owned(),
        }
    }
}
