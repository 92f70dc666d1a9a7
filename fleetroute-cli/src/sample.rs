//! Sample command: plan the built-in demonstration problem.

use std::io::Write;

use clap::Parser;
use fleetroute_core::sample_request;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::planner::{
    DefaultPlannerBuilder, PlannerBuilder, PlannerOverrides, PlannerSettings, plan_and_write,
};
use crate::{
    ARG_GRAPHHOPPER_URL, ARG_MAX_CONCURRENT_REQUESTS, ARG_MAX_STEPS, ARG_REQUEST_TIMEOUT_SECS,
    ARG_TIME_LIMIT_SECS, CliError,
};

/// CLI arguments for the `sample` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan the built-in demonstration problem: a depot and ten \
                 customers around Tunis served by one vehicle of capacity \
                 500.",
    about = "Plan the built-in demonstration problem"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct SampleArgs {
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

impl SampleArgs {
    pub(crate) fn into_settings(self) -> Result<PlannerSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlannerSettings::try_from(PlannerOverrides::from(merged))
    }
}

impl From<SampleArgs> for PlannerOverrides {
    fn from(args: SampleArgs) -> Self {
        Self {
            graphhopper_url: args.graphhopper_url,
            max_concurrent_requests: args.max_concurrent_requests,
            request_timeout_secs: args.request_timeout_secs,
            max_steps: args.max_steps,
            time_limit_secs: args.time_limit_secs,
        }
    }
}

pub(crate) fn run_sample(args: SampleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_sample_with(args, &DefaultPlannerBuilder, &mut stdout)
}

pub(crate) fn run_sample_with(
    args: SampleArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let settings = args.into_settings()?;
    plan_and_write(&sample_request(), &settings, builder, writer)
}
