use std::ops::Range;

use ndarray::{Array1, ArrayView1, s};

use crate::{
    condition::Target,
    error::Error,
    option::{BoundsList, BoundsOption, InitialConditionsList, InitialConditionsOption},
    phase::Phase,
    profile::NodeProfile,
};

/// Flattened lower and upper bounds of the decision vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionBounds {
    pub min: Array1<f64>,
    pub max: Array1<f64>,
}

/// Flattened initial guess of the decision vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionInit {
    pub init: Array1<f64>,
}

impl DecisionBounds {
    /// Min and max of the states at `node` of `phase`, if that node exists.
    #[must_use]
    pub fn state_at(
        &self,
        layout: &DecisionLayout,
        phase: usize,
        node: usize,
    ) -> Option<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        let range = layout.state_range(phase, node)?;
        Some((self.min.slice(s![range.clone()]), self.max.slice(s![range])))
    }

    /// Min and max of the controls at `node` of `phase`, if that node has controls.
    #[must_use]
    pub fn control_at(
        &self,
        layout: &DecisionLayout,
        phase: usize,
        node: usize,
    ) -> Option<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        let range = layout.control_range(phase, node)?;
        Some((self.min.slice(s![range.clone()]), self.max.slice(s![range])))
    }
}

impl DecisionInit {
    /// Initial guess of the states at `node` of `phase`, if that node exists.
    #[must_use]
    pub fn state_at(
        &self,
        layout: &DecisionLayout,
        phase: usize,
        node: usize,
    ) -> Option<ArrayView1<'_, f64>> {
        let range = layout.state_range(phase, node)?;
        Some(self.init.slice(s![range]))
    }

    /// Initial guess of the controls at `node` of `phase`, if that node has controls.
    #[must_use]
    pub fn control_at(
        &self,
        layout: &DecisionLayout,
        phase: usize,
        node: usize,
    ) -> Option<ArrayView1<'_, f64>> {
        let range = layout.control_range(phase, node)?;
        Some(self.init.slice(s![range]))
    }
}

/// Positions of every state and control block in the decision vector.
///
/// Within a phase, node `k` contributes its states followed by its controls,
/// and the terminal node contributes states only. Phases follow each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionLayout {
    blocks: Vec<Block>,
    len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    offset: usize,
    nx: usize,
    nu: usize,
    n_shooting: usize,
}

impl DecisionLayout {
    #[must_use]
    pub fn new(phases: &[Phase]) -> Self {
        let mut len = 0;
        let blocks = phases
            .iter()
            .map(|phase| {
                let block = Block {
                    offset: len,
                    nx: phase.nx(),
                    nu: phase.nu(),
                    n_shooting: phase.n_shooting(),
                };
                len += phase.n_variables();
                block
            })
            .collect();

        Self { blocks, len }
    }

    /// Total length of the decision vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index range of the states at `node` of `phase`, if that node exists.
    #[must_use]
    pub fn state_range(&self, phase: usize, node: usize) -> Option<Range<usize>> {
        let block = self.blocks.get(phase)?;
        if node > block.n_shooting {
            return None;
        }
        let start = block.offset + node * (block.nx + block.nu);
        Some(start..start + block.nx)
    }

    /// Index range of the controls at `node` of `phase`, if that node has controls.
    #[must_use]
    pub fn control_range(&self, phase: usize, node: usize) -> Option<Range<usize>> {
        let block = self.blocks.get(phase)?;
        if node >= block.n_shooting {
            return None;
        }
        let start = block.offset + node * (block.nx + block.nu) + block.nx;
        Some(start..start + block.nu)
    }
}

/// Validates bounds for `target` against the phases of a program.
pub(crate) fn check_bounds(list: &BoundsList, target: Target, phases: &[Phase]) -> Result<(), Error> {
    check_phase_count(list.len(), target, phases)?;

    for (index, (option, phase)) in list.iter().zip(phases).enumerate() {
        check_profile(option.min(), target, index, phase)?;
        check_profile(option.max(), target, index, phase)?;
        check_ordered(option, target, index, phase)?;
    }
    Ok(())
}

/// Validates initial conditions for `target` against the phases of a program.
pub(crate) fn check_initial_conditions(
    list: &InitialConditionsList,
    target: Target,
    phases: &[Phase],
) -> Result<(), Error> {
    check_phase_count(list.len(), target, phases)?;

    for (index, (option, phase)) in list.iter().zip(phases).enumerate() {
        check_profile(option.init(), target, index, phase)?;
    }
    Ok(())
}

/// Flattens checked state and control bounds into decision-vector bounds.
pub(crate) fn flatten_bounds(phases: &[Phase], x: &BoundsList, u: &BoundsList) -> DecisionBounds {
    DecisionBounds {
        min: interleave(
            phases,
            x.iter().map(BoundsOption::min),
            u.iter().map(BoundsOption::min),
        ),
        max: interleave(
            phases,
            x.iter().map(BoundsOption::max),
            u.iter().map(BoundsOption::max),
        ),
    }
}

/// Flattens checked state and control initial conditions into a decision-vector guess.
pub(crate) fn flatten_initial_conditions(
    phases: &[Phase],
    x: &InitialConditionsList,
    u: &InitialConditionsList,
) -> DecisionInit {
    DecisionInit {
        init: interleave(
            phases,
            x.iter().map(InitialConditionsOption::init),
            u.iter().map(InitialConditionsOption::init),
        ),
    }
}

/// Writes `x_0, u_0, x_1, u_1, ..., x_N` for every phase in order.
fn interleave<'a>(
    phases: &[Phase],
    x: impl IntoIterator<Item = &'a NodeProfile>,
    u: impl IntoIterator<Item = &'a NodeProfile>,
) -> Array1<f64> {
    let len = phases.iter().map(Phase::n_variables).sum();
    let mut out = Vec::with_capacity(len);

    for ((phase, x), u) in phases.iter().zip(x).zip(u) {
        let n_shooting = phase.n_shooting();
        let x_nodes = n_shooting + 1;

        for node in 0..n_shooting {
            out.extend(x.at(node, x_nodes).iter().copied());
            out.extend(u.at(node, n_shooting).iter().copied());
        }
        out.extend(x.at(n_shooting, x_nodes).iter().copied());
    }

    debug_assert_eq!(out.len(), len);
    Array1::from(out)
}

fn check_phase_count(actual: usize, target: Target, phases: &[Phase]) -> Result<(), Error> {
    if actual != phases.len() {
        return Err(Error::PhaseCount {
            target,
            expected: phases.len(),
            actual,
        });
    }
    Ok(())
}

fn check_profile(
    profile: &NodeProfile,
    target: Target,
    index: usize,
    phase: &Phase,
) -> Result<(), Error> {
    let expected = phase.dimension(target);
    if profile.dim() != expected {
        return Err(Error::Shape {
            target,
            phase: index,
            expected,
            actual: profile.dim(),
        });
    }

    let n_nodes = phase.n_nodes(target);
    if !profile.fits(n_nodes) {
        return Err(Error::NodeCount {
            target,
            phase: index,
            expected: profile.kind().expected_columns(n_nodes),
            actual: profile.n_columns(),
        });
    }
    Ok(())
}

fn check_ordered(
    option: &BoundsOption,
    target: Target,
    index: usize,
    phase: &Phase,
) -> Result<(), Error> {
    let n_nodes = phase.n_nodes(target);

    for node in 0..n_nodes {
        let min = option.min().at(node, n_nodes);
        let max = option.max().at(node, n_nodes);

        if let Some((row, (&min, &max))) = min
            .iter()
            .zip(max.iter())
            .enumerate()
            .find(|(_, (min, max))| min > max)
        {
            return Err(Error::InvertedBounds {
                target,
                phase: index,
                node,
                row,
                min,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{Array2, array};
    use stride_core::{DynamicsType, ModelDescription};

    fn phase(nq: usize, n_shooting: usize) -> Phase {
        Phase::new(
            &ModelDescription::fully_actuated(nq),
            DynamicsType::TorqueDriven,
            n_shooting,
            1.0,
        )
        .expect("valid phase")
    }

    #[test]
    fn interleaves_states_and_controls() {
        let phases = [phase(1, 2)];
        let x = InitialConditionsList::from(InitialConditionsOption::new(
            NodeProfile::each_node(array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]]).expect("valid"),
        ));
        let u = InitialConditionsList::from(InitialConditionsOption::new(
            NodeProfile::each_node(array![[-1.0, -2.0]]).expect("valid"),
        ));

        check_initial_conditions(&x, Target::XInit, &phases).expect("x fits");
        check_initial_conditions(&u, Target::UInit, &phases).expect("u fits");

        let init = flatten_initial_conditions(&phases, &x, &u).init;
        assert_eq!(init, array![0.0, 10.0, -1.0, 1.0, 11.0, -2.0, 2.0, 12.0]);
    }

    #[test]
    fn layout_locates_every_block() {
        let phases = [phase(1, 2), phase(2, 1)];
        let layout = DecisionLayout::new(&phases);

        assert_eq!(layout.len(), 8 + 10);
        assert_eq!(layout.state_range(0, 0), Some(0..2));
        assert_eq!(layout.control_range(0, 0), Some(2..3));
        assert_eq!(layout.state_range(0, 2), Some(6..8));
        assert_eq!(layout.control_range(0, 2), None);
        assert_eq!(layout.state_range(1, 0), Some(8..12));
        assert_eq!(layout.control_range(1, 0), Some(12..14));
        assert_eq!(layout.state_range(1, 1), Some(14..18));
        assert_eq!(layout.state_range(1, 2), None);
        assert_eq!(layout.state_range(2, 0), None);
    }

    #[test]
    fn phases_are_concatenated() {
        let phases = [phase(1, 1), phase(1, 1)];
        let x: BoundsList = [
            BoundsOption::constant(vec![-1.0, -1.0], vec![1.0, 1.0]).expect("valid"),
            BoundsOption::constant(vec![-2.0, -2.0], vec![2.0, 2.0]).expect("valid"),
        ]
        .into_iter()
        .collect();
        let u: BoundsList = [
            BoundsOption::constant(vec![-5.0], vec![5.0]).expect("valid"),
            BoundsOption::constant(vec![-6.0], vec![6.0]).expect("valid"),
        ]
        .into_iter()
        .collect();

        let bounds = flatten_bounds(&phases, &x, &u);
        assert_eq!(
            bounds.min,
            array![-1.0, -1.0, -5.0, -1.0, -1.0, -2.0, -2.0, -6.0, -2.0, -2.0]
        );
        assert_eq!(bounds.max.slice(s![5..]), array![2.0, 2.0, 6.0, 2.0, 2.0]);
    }

    #[test]
    fn blocks_are_read_back_per_node() {
        let phases = [phase(1, 2), phase(1, 1)];
        let layout = DecisionLayout::new(&phases);
        let x: BoundsList = [
            BoundsOption::constant(vec![-1.0, -2.0], vec![1.0, 2.0]).expect("valid"),
            BoundsOption::constant(vec![-3.0, -4.0], vec![3.0, 4.0]).expect("valid"),
        ]
        .into_iter()
        .collect();
        let u: BoundsList = [
            BoundsOption::constant(vec![-5.0], vec![5.0]).expect("valid"),
            BoundsOption::constant(vec![-6.0], vec![6.0]).expect("valid"),
        ]
        .into_iter()
        .collect();
        let bounds = flatten_bounds(&phases, &x, &u);

        let (min, max) = bounds.state_at(&layout, 0, 2).expect("terminal node");
        assert_eq!(min, array![-1.0, -2.0]);
        assert_eq!(max, array![1.0, 2.0]);

        let (min, max) = bounds.control_at(&layout, 1, 0).expect("control node");
        assert_eq!(min, array![-6.0]);
        assert_eq!(max, array![6.0]);

        assert!(bounds.control_at(&layout, 0, 2).is_none());
        assert!(bounds.state_at(&layout, 2, 0).is_none());

        let x = InitialConditionsList::from_iter([
            InitialConditionsOption::constant(vec![0.5, 0.25]),
            InitialConditionsOption::constant(vec![7.0, 8.0]),
        ]);
        let u = InitialConditionsList::from_iter([
            InitialConditionsOption::constant(vec![-0.5]),
            InitialConditionsOption::constant(vec![9.0]),
        ]);
        let init = flatten_initial_conditions(&phases, &x, &u);

        assert_eq!(init.state_at(&layout, 1, 1), Some(array![7.0, 8.0].view()));
        assert_eq!(init.control_at(&layout, 0, 1), Some(array![-0.5].view()));
        assert_eq!(init.control_at(&layout, 1, 1), None);
    }

    #[test]
    fn rejects_wrong_dimension() {
        let phases = [phase(2, 3)];
        let x = BoundsList::from(BoundsOption::unbounded(3));

        let err = check_bounds(&x, Target::XBounds, &phases).unwrap_err();
        assert_eq!(
            err,
            Error::Shape {
                target: Target::XBounds,
                phase: 0,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn rejects_each_node_profile_of_wrong_length() {
        let phases = [phase(1, 3)];
        // Controls span 3 nodes; four columns is the state count.
        let u = InitialConditionsList::from(InitialConditionsOption::new(
            NodeProfile::each_node(Array2::zeros((1, 4))).expect("valid"),
        ));

        let err = check_initial_conditions(&u, Target::UInit, &phases).unwrap_err();
        assert_eq!(
            err,
            Error::NodeCount {
                target: Target::UInit,
                phase: 0,
                expected: 3,
                actual: 4,
            }
        );
    }

    #[test]
    fn rejects_phase_count_mismatch() {
        let phases = [phase(1, 3), phase(1, 3)];
        let u = BoundsList::from(BoundsOption::unbounded(1));

        let err = check_bounds(&u, Target::UBounds, &phases).unwrap_err();
        assert!(matches!(
            err,
            Error::PhaseCount {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_bounds_at_a_single_node() {
        let phases = [phase(1, 4)];
        let mut option = BoundsOption::new(
            NodeProfile::uniform_first_middle_last(vec![0.0, 0.0]),
            NodeProfile::uniform_first_middle_last(vec![1.0, 1.0]),
        )
        .expect("valid");
        option.min_mut().values_mut()[[1, 2]] = 3.0;

        let err = check_bounds(&BoundsList::from(option), Target::XBounds, &phases).unwrap_err();
        assert!(matches!(
            err,
            Error::InvertedBounds {
                node: 4,
                row: 1,
                ..
            }
        ));
    }
}
