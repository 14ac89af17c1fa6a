use thiserror::Error;

use crate::condition::{ConditionKind, Target};

/// Errors that can occur when building a program or updating its bounds and
/// initial guesses.
///
/// Every error is raised before the program's stored values are touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{target} should be built from {}", required_construction(.target))]
    Provenance { target: Target, found: ConditionKind },

    #[error("{target} of phase {phase} has {actual} rows, expected {expected}")]
    Shape {
        target: Target,
        phase: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{target} of phase {phase} has {actual} columns, expected {expected}")]
    NodeCount {
        target: Target,
        phase: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{target} has {actual} entries but the program has {expected} phases")]
    PhaseCount {
        target: Target,
        expected: usize,
        actual: usize,
    },

    #[error(
        "{target} of phase {phase} has min > max at node {node}, row {row}: {min} > {max}"
    )]
    InvertedBounds {
        target: Target,
        phase: usize,
        node: usize,
        row: usize,
        min: f64,
        max: f64,
    },

    #[error("invalid phase: {reason}")]
    InvalidPhase { reason: &'static str },

    #[error("a program needs at least one phase")]
    NoPhases,
}

fn required_construction(target: &Target) -> &'static str {
    target.required_construction()
}
