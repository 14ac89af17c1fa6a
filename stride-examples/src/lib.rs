//! Shared pieces for the Stride examples.

use std::f64::consts::PI;

use stride_bounds::OptimalControlProgram;
use stride_core::{ModelDescription, Range, RangeError};

/// Layout of the cube-and-line model: a cube translating in three directions
/// and rotating about one axis, all four coordinates actuated.
///
/// # Errors
///
/// Returns a [`RangeError`] if one of the joint ranges is malformed.
pub fn cube_and_line() -> Result<ModelDescription, RangeError> {
    let translation = Range::new(-1.0, 5.0)?;
    let rotation = Range::new(-PI, PI)?;
    let velocity = Range::new(-10.0 * PI, 10.0 * PI)?;

    Ok(ModelDescription {
        name: Some("cube_and_line".into()),
        q_ranges: Some(vec![translation, translation, rotation, translation]),
        qdot_ranges: Some(vec![velocity; 4]),
        ..ModelDescription::fully_actuated(4)
    })
}

/// Prints the bounds and initial guess of every node of every phase.
pub fn print_decision_vector(ocp: &OptimalControlProgram) {
    let layout = ocp.layout();
    let bounds = ocp.v_bounds();
    let init = &ocp.v_init().init;

    println!("decision vector: {} variables", ocp.n_variables());
    for (index, phase) in ocp.phases().iter().enumerate() {
        println!(
            "phase {index}: nx = {}, nu = {}, {} intervals over {} s",
            phase.nx(),
            phase.nu(),
            phase.n_shooting(),
            phase.final_time()
        );

        for node in 0..=phase.n_shooting() {
            let blocks = layout
                .state_range(index, node)
                .into_iter()
                .map(|r| ("x", r))
                .chain(layout.control_range(index, node).map(|r| ("u", r)));

            for (group, range) in blocks {
                let row: Vec<String> = range
                    .map(|i| format!("{:>7.2} [{:>7.2}, {:>7.2}]", init[i], bounds.min[i], bounds.max[i]))
                    .collect();
                println!("  {group}[{node:>2}] {}", row.join(" "));
            }
        }
    }
}
