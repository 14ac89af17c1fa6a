//! # Align a marker on a segment
//!
//! Sets up the decision vector of the cube-and-line problem: the cube starts
//! and ends at rest with most coordinates pinned to zero, the rotation ends at
//! 1.57 rad, and both states and torques are initialized with a linear ramp.
//!
//! The marker constraints and the solve itself belong to the solver and are
//! not part of this example.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run --example align_marker_on_segment
//! ```

use ndarray::Array1;
use stride_bounds::{BoundsOption, InitialConditionsOption, NodeProfile, OptimalControlProgram};
use stride_core::{DynamicsType, Model};
use stride_examples::{cube_and_line, print_decision_vector};

const N_SHOOTING: usize = 30;
const FINAL_TIME: f64 = 2.0;
const TORQUE_MIN: f64 = -100.0;
const TORQUE_MAX: f64 = 100.0;

fn main() {
    let initialize_near_solution = true;

    let model = cube_and_line().expect("valid ranges");
    let nq = model.nb_q();
    let nqdot = model.nb_qdot();
    let ntau = model.nb_generalized_torque();

    let mut ocp = OptimalControlProgram::single_phase(
        &model,
        DynamicsType::TorqueDriven,
        N_SHOOTING,
        FINAL_TIME,
    )
    .expect("valid program");

    // Path constraint: start and end at rest, except the free coordinate 3.
    let mut x_bounds = BoundsOption::q_and_qdot(&model);
    for row in 1..nq + nqdot {
        if row != 3 {
            for col in [0, 2] {
                x_bounds.min_mut().values_mut()[[row, col]] = 0.0;
                x_bounds.max_mut().values_mut()[[row, col]] = 0.0;
            }
        }
    }
    x_bounds.min_mut().values_mut()[[2, 2]] = 1.57;
    x_bounds.max_mut().values_mut()[[2, 2]] = 1.57;

    let u_bounds = BoundsOption::constant(
        Array1::from_elem(ntau, TORQUE_MIN),
        Array1::from_elem(ntau, TORQUE_MAX),
    )
    .expect("same dimension");

    // Initial guess: coordinates ramp from 1 to -1, velocities from 2 to -0.5.
    let start: Array1<f64> = (0..nq + nqdot).map(|i| if i < nq { 1.0 } else { 2.0 }).collect();
    let end: Array1<f64> = (0..nq + nqdot).map(|i| if i < nq { -1.0 } else { -0.5 }).collect();
    let mut x_init =
        InitialConditionsOption::new(NodeProfile::linear(start, end).expect("same length"));

    if initialize_near_solution {
        let mut values = x_init.init_mut().values_mut();
        for (rows, value) in [(0..2, 1.5), (4..6, 0.7), (6..8, 0.6)] {
            for row in rows {
                values.row_mut(row).fill(value);
            }
        }
    }

    let u_init = InitialConditionsOption::new(
        NodeProfile::linear(Array1::from_elem(ntau, 25.0), Array1::from_elem(ntau, -25.0))
            .expect("same length"),
    );

    ocp.update_bounds(Some(x_bounds.into()), Some(u_bounds.into()))
        .expect("bounds fit the model");
    ocp.update_initial_guess(Some(x_init.into()), Some(u_init.into()))
        .expect("initial guess fits the model");

    print_decision_vector(&ocp);
}
