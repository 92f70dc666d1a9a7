//! Planner options shared by the `solve` and `sample` commands.

use std::io::Write;
use std::time::Duration;

use fleetroute_core::{DistanceMatrixBuilder, PlanRequest, Planner, RoutePlanner};
use fleetroute_solver::{LocalSearchConfig, LocalSearchSolver};
use log::{debug, info};

use crate::output::write_json;
use crate::routing::{RoutingOverrides, RoutingSettings, http_provider, positive};
use crate::{ARG_TIME_LIMIT_SECS, CliError};

/// Planner options as merged from every configuration layer, before
/// defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlannerOverrides {
    pub(crate) graphhopper_url: Option<String>,
    pub(crate) max_concurrent_requests: Option<usize>,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) max_steps: Option<usize>,
    pub(crate) time_limit_secs: Option<u64>,
}

/// Resolved planner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannerSettings {
    /// GraphHopper base URL.
    pub(crate) graphhopper_url: String,
    /// Upper bound on concurrent distance lookups per matrix build.
    pub(crate) max_concurrent_requests: usize,
    /// Timeout for a single routing request.
    pub(crate) request_timeout: Duration,
    /// Local search step budget.
    pub(crate) max_steps: usize,
    /// Local search wall-clock limit.
    pub(crate) time_limit: Duration,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::from_parts(RoutingSettings::default(), &LocalSearchConfig::default())
    }
}

impl PlannerSettings {
    fn from_parts(routing: RoutingSettings, search: &LocalSearchConfig) -> Self {
        Self {
            graphhopper_url: routing.graphhopper_url,
            max_concurrent_requests: routing.max_concurrent_requests,
            request_timeout: routing.request_timeout,
            max_steps: search.max_steps,
            time_limit: search.time_limit,
        }
    }

    /// The routing half of these settings.
    pub(crate) fn routing(&self) -> RoutingSettings {
        RoutingSettings {
            graphhopper_url: self.graphhopper_url.clone(),
            max_concurrent_requests: self.max_concurrent_requests,
            request_timeout: self.request_timeout,
        }
    }
}

impl TryFrom<PlannerOverrides> for PlannerSettings {
    type Error = CliError;

    fn try_from(overrides: PlannerOverrides) -> Result<Self, Self::Error> {
        let routing = RoutingSettings::try_from(RoutingOverrides {
            graphhopper_url: overrides.graphhopper_url,
            max_concurrent_requests: overrides.max_concurrent_requests,
            request_timeout_secs: overrides.request_timeout_secs,
        })?;
        let defaults = LocalSearchConfig::default();
        let time_limit = positive(overrides.time_limit_secs, ARG_TIME_LIMIT_SECS)?
            .map_or(defaults.time_limit, Duration::from_secs);
        // A zero step budget is meaningful: construction only.
        let max_steps = overrides.max_steps.unwrap_or(defaults.max_steps);

        Ok(Self::from_parts(
            routing,
            &defaults.with_max_steps(max_steps).with_time_limit(time_limit),
        ))
    }
}

/// Builds the planner for the current invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, settings: &PlannerSettings) -> Result<Box<dyn Planner>, CliError>;
}

/// Planner over GraphHopper distances and [`LocalSearchSolver`].
pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, settings: &PlannerSettings) -> Result<Box<dyn Planner>, CliError> {
        let routing = settings.routing();
        let builder =
            DistanceMatrixBuilder::with_config(http_provider(&routing)?, routing.matrix_config());
        let solver = LocalSearchSolver::with_config(
            LocalSearchConfig::default()
                .with_max_steps(settings.max_steps)
                .with_time_limit(settings.time_limit),
        );
        Ok(Box::new(RoutePlanner::new(builder, solver)))
    }
}

/// Plan `request` with a freshly built planner and print the summary.
pub(crate) fn plan_and_write(
    request: &PlanRequest,
    settings: &PlannerSettings,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    debug!("planning with {settings:?}");
    let planner = builder.build(settings)?;
    let planned = planner.plan(request)?;
    info!(
        "planned {} customers on {} routes: {}",
        planned.summary.total_customers,
        planned.summary.routes.len(),
        planned.summary.score
    );
    write_json(writer, &planned.summary)
}
