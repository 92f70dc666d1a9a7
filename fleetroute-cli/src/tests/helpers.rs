//! Test helpers: file fixtures plus planner and provider builders that never
//! touch the network.

use std::cell::RefCell;

use camino::Utf8Path;
use fleetroute_core::{DistanceMatrixBuilder, DistanceProvider, Planner, RoutePlanner};
use fleetroute_data::routing::test_support::StubDistanceProvider;
use fleetroute_solver::LocalSearchSolver;

use crate::CliError;
use crate::planner::{PlannerBuilder, PlannerSettings};
use crate::routing::{ProviderBuilder, RoutingSettings};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// Builds planners over [`StubDistanceProvider`] and remembers the settings
/// it was asked to honour.
#[derive(Debug)]
pub(super) struct StubPlannerBuilder {
    meters: u64,
    pub(super) seen: RefCell<Option<PlannerSettings>>,
}

impl StubPlannerBuilder {
    pub(super) const fn with_distance(meters: u64) -> Self {
        Self {
            meters,
            seen: RefCell::new(None),
        }
    }
}

impl PlannerBuilder for StubPlannerBuilder {
    fn build(&self, settings: &PlannerSettings) -> Result<Box<dyn Planner>, CliError> {
        self.seen.replace(Some(settings.clone()));
        Ok(Box::new(RoutePlanner::new(
            DistanceMatrixBuilder::new(StubDistanceProvider::with_distance(self.meters)),
            LocalSearchSolver::new(),
        )))
    }
}

/// Hands out clones of a [`StubDistanceProvider`] and remembers the routing
/// settings it was asked to honour.
#[derive(Debug)]
pub(super) struct StubProviderBuilder {
    provider: StubDistanceProvider,
    pub(super) seen: RefCell<Option<RoutingSettings>>,
}

impl StubProviderBuilder {
    pub(super) const fn new(provider: StubDistanceProvider) -> Self {
        Self {
            provider,
            seen: RefCell::new(None),
        }
    }
}

impl ProviderBuilder for StubProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn DistanceProvider>, CliError> {
        self.seen.replace(Some(settings.clone()));
        Ok(Box::new(self.provider.clone()))
    }
}
