//! Solve command implementation for the fleetroute CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fleetroute_core::PlanRequest;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{open_utf8_file, require_file};
use crate::planner::{
    DefaultPlannerBuilder, PlannerBuilder, PlannerOverrides, PlannerSettings, plan_and_write,
};
use crate::{
    ARG_GRAPHHOPPER_URL, ARG_MAX_CONCURRENT_REQUESTS, ARG_MAX_STEPS, ARG_REQUEST_TIMEOUT_SECS,
    ARG_SOLVE_REQUEST, ARG_TIME_LIMIT_SECS, CliError, ENV_SOLVE_REQUEST,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan deliveries for a JSON-encoded PlanRequest (depot, \
                 customer locations, vehicle capacities and customer \
                 demands). Road distances come from a GraphHopper server; \
                 pairs it cannot answer fall back to a great-circle \
                 estimate.",
    about = "Plan deliveries from a JSON request"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a PlanRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the GraphHopper server (e.g. "http://localhost:8989").
    #[arg(long = ARG_GRAPHHOPPER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) graphhopper_url: Option<String>,
    /// Maximum number of concurrent distance requests.
    #[arg(long = ARG_MAX_CONCURRENT_REQUESTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_concurrent_requests: Option<usize>,
    /// Timeout in seconds for a single routing request.
    #[arg(long = ARG_REQUEST_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<u64>,
    /// Maximum number of local search moves.
    #[arg(long = ARG_MAX_STEPS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_steps: Option<usize>,
    /// Wall-clock limit in seconds for local search.
    #[arg(long = ARG_TIME_LIMIT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Planner settings.
    pub(crate) settings: PlannerSettings,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_file(ARG_SOLVE_REQUEST, &self.request_path)
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;
        let settings = PlannerSettings::try_from(PlannerOverrides {
            graphhopper_url: args.graphhopper_url,
            max_concurrent_requests: args.max_concurrent_requests,
            request_timeout_secs: args.request_timeout_secs,
            max_steps: args.max_steps,
            time_limit_secs: args.time_limit_secs,
        })?;
        Ok(Self {
            request_path,
            settings,
        })
    }
}

pub(crate) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &DefaultPlannerBuilder, &mut stdout)
}

pub(crate) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request = load_plan_request(&config.request_path)?;
    plan_and_write(&request, &config.settings, builder, writer)
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPlanRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
