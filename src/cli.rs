//! Command line front end shared by `alert-graph` and `resolution-graph`.
//!
//! Both binaries take the same five positional parameters:
//! `<alert_name> <threshold> <unit> <host> <save_path>`.
//! On success the path of the written image is the only thing printed on stdout.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::draws::{Draw, DrawOptions};
use crate::errors::{Error, Result};
use crate::generator::{SeriesBuilder, Variant};
use crate::series::ThresholdSpec;

/// Positional parameters of both binaries.
///
/// Every parameter is taken verbatim, including values starting with `-`;
/// there is no `--help` flag to collide with a label.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(about = "Render a synthetic monitoring alert chart", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Name of the alert, used in the title and legend.
    #[arg(allow_hyphen_values = true)]
    pub alert_name: String,
    /// Alert threshold, a finite number (`nan` and `inf` are rejected);
    /// drawn as a dashed line and scales the generated values.
    #[arg(allow_hyphen_values = true)]
    pub threshold: String,
    /// Unit of the metric.
    #[arg(allow_hyphen_values = true)]
    pub unit: String,
    /// Host the alert fired on.
    #[arg(allow_hyphen_values = true)]
    pub host: String,
    /// Where the image is written (`.svg` for SVG, PNG otherwise).
    #[arg(allow_hyphen_values = true)]
    pub save_path: PathBuf,
    /// Ignored.
    #[arg(hide = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Parses the command line; anything clap refuses means parameters are missing.
pub fn parse_args<I, T>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args).map_err(|err| {
        debug!(kind = ?err.kind(), "{err}");
        Error::Usage
    })
}

/// Name of the binary generating `variant`.
pub fn program(variant: Variant) -> &'static str {
    match variant {
        Variant::Ongoing => "alert-graph",
        Variant::Resolution => "resolution-graph",
    }
}

/// One-line usage message.
pub fn usage(variant: Variant) -> String {
    format!("Usage: {} <alert_name> <threshold> <unit> <host> <save_path>", program(variant))
}

/// Parses the threshold parameter, rejecting anything that is not a finite number.
pub fn parse_threshold(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(threshold) if threshold.is_finite() => Ok(threshold),
        _ => Err(Error::InvalidThreshold(raw.to_string())),
    }
}

/// Generates the `variant` series and renders it to `args.save_path`.
///
/// ### Returns
/// The path of the written image.
pub fn run(variant: Variant, args: &Args) -> Result<PathBuf> {
    let threshold = parse_threshold(&args.threshold)?;
    if !args.rest.is_empty() {
        debug!(extra = ?args.rest, "ignoring extra parameters");
    }

    let alert = SeriesBuilder::new(Some(threshold))?.generate(variant);
    let spec = ThresholdSpec::new(threshold, &args.unit, &args.alert_name, &args.host);

    Draw::new(&alert, &spec)
        .with_options(DrawOptions::default().variant(variant))
        .plot(&args.save_path)
}

/// Installs a stderr logger; `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point of the binaries.
///
/// Missing parameters print the usage on stdout and exit with status 1 before
/// anything is generated.
pub fn main(variant: Variant) -> ExitCode {
    init_tracing();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(_) => {
            println!("{}", usage(variant));
            return ExitCode::from(1);
        }
    };

    match run(variant, &args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}
