//! Core traits and types for Stride optimal control problems.
//!
//! This crate defines the shared abstractions the bounds aggregator builds on:
//!
//! - [`Model`] — a dynamical model queried for its variable counts and ranges
//! - [`Range`] — the admissible interval of one generalized coordinate or velocity
//! - [`DynamicsType`] — how a model's variables map to states and controls
//! - [`ModelDescription`] — a plain, deserializable [`Model`] implementation

mod description;
mod dynamics;
mod model;

pub use description::ModelDescription;
pub use dynamics::{Dimensions, DynamicsType};
pub use model::{Model, Range, RangeError};
