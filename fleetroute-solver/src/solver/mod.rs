//! `LocalSearchSolver` implementation.

mod search;


use std::time::{Duration, Instant};

use fleetroute_core::{ObjectiveModel, RouteAssignment, Solver, SolverError, SolverOutcome};
use log::{debug, info};

use search::{Budget, construct, relocate_pass};

/// Configuration for [`LocalSearchSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchConfig {
    /// Upper bound on relocate moves evaluated during improvement.
    pub max_steps: usize,
    /// Wall-clock limit for the improvement phase.
    pub time_limit: Duration,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            time_limit: Duration::from_secs(30),
        }
    }
}

impl LocalSearchConfig {
    /// Set the step budget.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the time limit.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// Greedy construction followed by relocate local search.
///
/// Construction always runs to completion, so every customer in the
/// objective's context ends up on exactly one route even when the budget is
/// zero. Improvement keeps only strictly better moves and stops after a pass
/// without improvement or when the budget runs out.
///
/// # Examples
/// ```
/// use fleetroute_core::test_support::FixedDistanceProvider;
/// use fleetroute_core::{DistanceMatrixBuilder, Location, PlanRequest, RoutePlanner};
/// use fleetroute_solver::LocalSearchSolver;
///
/// let planner = RoutePlanner::new(
///     DistanceMatrixBuilder::new(FixedDistanceProvider::new(1_000)),
///     LocalSearchSolver::new(),
/// );
/// let request = PlanRequest::new(
///     Location::new(0, 0.0, 0.0),
///     vec![Location::new(1, 0.0, 1.0), Location::new(2, 1.0, 0.0)],
///     vec![100],
///     vec![40, 40],
/// );
/// let planned = planner.plan(&request)?;
/// assert!(planned.summary.feasible);
/// assert_eq!(planned.summary.total_customers, 2);
/// # Ok::<(), fleetroute_core::PlanError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearchSolver {
    config: LocalSearchConfig,
}

impl LocalSearchSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: LocalSearchConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocalSearchConfig {
        &self.config
    }
}

impl Solver for LocalSearchSolver {
    fn solve(
        &self,
        objective: &ObjectiveModel<'_>,
        initial: RouteAssignment,
    ) -> Result<SolverOutcome, SolverError> {
        let started_at = Instant::now();
        let mut tracker = objective.tracker(&initial)?;

        let inserted = construct(&mut tracker)?;
        debug!(
            "construction placed {inserted} customers: {}",
            tracker.score()
        );

        let mut budget = Budget::new(&self.config, started_at);
        let mut passes = 0_usize;
        while !budget.exhausted() {
            passes = passes.saturating_add(1);
            if !relocate_pass(&mut tracker, &mut budget)? {
                break;
            }
            debug!("relocate pass {passes} improved to {}", tracker.score());
        }

        let score = tracker.score();
        info!(
            "local search finished after {} steps in {passes} passes ({:?}): {score}",
            budget.steps(),
            started_at.elapsed()
        );
        Ok(SolverOutcome {
            assignment: tracker.assignment(),
            score,
        })
    }
}
