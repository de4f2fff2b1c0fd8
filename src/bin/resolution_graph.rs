//! Renders an alert that fired and then recovered.
//!
//! `resolution-graph <alert_name> <threshold> <unit> <host> <save_path>`

use std::process::ExitCode;

use alert_charts::{cli, generator::Variant};

fn main() -> ExitCode {
    cli::main(Variant::Resolution)
}
