//! # Program from a config file
//!
//! Builds a two-phase program from `data/cube_and_line.toml` and prints its
//! decision vector. Pass another path to load a different file.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run --example from_config
//! cargo run --example from_config -- path/to/program.toml
//! ```

use std::env;

use stride_bounds::config::ProgramConfig;
use stride_examples::print_decision_vector;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/cube_and_line.toml").to_string()
    });

    let config = ProgramConfig::from_path(&path).expect("readable config");
    match config.build() {
        Ok(ocp) => print_decision_vector(&ocp),
        Err(err) => {
            eprintln!("failed to build program from {path}: {err}");
            std::process::exit(1);
        }
    }
}
