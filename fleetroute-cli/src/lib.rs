//! Command-line interface for the fleetroute delivery planner.
//!
//! The `fleetroute` binary plans a JSON-encoded
//! [`PlanRequest`](fleetroute_core::PlanRequest) (`solve`) or the built-in
//! demonstration problem (`sample`) and prints the resulting
//! [`PlanSummary`](fleetroute_core::PlanSummary) as pretty JSON on stdout.
//! It also exposes the routing layer directly: `matrix` prints the distance
//! matrix for a JSON location list and `polyline` prints the encoded route
//! between two coordinates.
//!
//! Options are layered by `ortho_config`: command-line flags override
//! `FLEETROUTE_*` environment variables, which override configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod matrix;
mod output;
mod planner;
mod polyline;
mod routing;
mod sample;
mod solve;

pub use error::CliError;

use matrix::{MatrixArgs, run_matrix};
use polyline::{PolylineArgs, run_polyline};
use sample::{SampleArgs, run_sample};
use solve::{SolveArgs, run_solve};

const ARG_SOLVE_REQUEST: &str = "request";
const ARG_GRAPHHOPPER_URL: &str = "graphhopper-url";
const ARG_MAX_CONCURRENT_REQUESTS: &str = "max-concurrent-requests";
const ARG_REQUEST_TIMEOUT_SECS: &str = "request-timeout-secs";
const ARG_MAX_STEPS: &str = "max-steps";
const ARG_TIME_LIMIT_SECS: &str = "time-limit-secs";
const ARG_MATRIX_LOCATIONS: &str = "locations";
const ARG_POLYLINE_FROM: &str = "from";
const ARG_POLYLINE_TO: &str = "to";
const ENV_SOLVE_REQUEST: &str = "FLEETROUTE_CMDS_SOLVE_REQUEST_PATH";
const ENV_MATRIX_LOCATIONS: &str = "FLEETROUTE_CMDS_MATRIX_LOCATIONS_PATH";
const ENV_POLYLINE_FROM: &str = "FLEETROUTE_CMDS_POLYLINE_FROM";
const ENV_POLYLINE_TO: &str = "FLEETROUTE_CMDS_POLYLINE_TO";

/// Run the fleetroute CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration loading,
/// planning, routing or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Sample(args) => run_sample(args),
        Command::Matrix(args) => run_matrix(args),
        Command::Polyline(args) => run_polyline(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fleetroute",
    about = "Capacitated delivery route planning over road distances",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan the deliveries described by a JSON request file.
    Solve(SolveArgs),
    /// Plan the built-in demonstration problem.
    Sample(SampleArgs),
    /// Print the distance matrix for a JSON location list.
    Matrix(MatrixArgs),
    /// Print the encoded route between two coordinates.
    Polyline(PolylineArgs),
}

#[cfg(test)]
mod tests;
