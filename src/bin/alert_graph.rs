//! Renders an alert that is still firing.
//!
//! `alert-graph <alert_name> <threshold> <unit> <host> <save_path>`

use std::process::ExitCode;

use alert_charts::{cli, generator::Variant};

fn main() -> ExitCode {
    cli::main(Variant::Ongoing)
}
