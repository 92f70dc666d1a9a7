//! Orchestration of a planning request.
//!
//! [`RoutePlanner`] turns a [`PlanRequest`] into a [`ProblemInstance`],
//! builds the distance matrix through its [`DistanceMatrixBuilder`], hands
//! the bound [`ObjectiveModel`](crate::ObjectiveModel) to a [`Solver`] and
//! projects the result into a [`PlanSummary`].
//!
//! The builder (and therefore its distance cache) lives as long as the
//! planner, so repeated requests over the same locations reuse earlier
//! provider answers. Cache entries match on coordinates as well as ids, so a
//! later request that reuses ids at other positions is measured afresh.

mod job;
mod projection;
mod request;

use thiserror::Error;

pub use job::{SolveJob, SolveStatus};
pub use projection::{CustomerStop, PlanSummary, VehicleRoute};
pub use request::{PlanRequest, sample_request};

use crate::{
    DEFAULT_VEHICLE_PENALTY, DistanceMatrixBuilder, DistanceProvider, MatrixBuildError,
    ObjectiveError, ProblemError, ProblemInstance, RouteAssignment, Score, Solver, SolverError,
};

/// Errors returned by planning.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Customer locations and demands differ in length.
    #[error("{locations} customer locations but {demands} customer demands")]
    MismatchedInput {
        /// Number of customer locations.
        locations: usize,
        /// Number of customer demands.
        demands: usize,
    },
    /// A demand is negative or too large.
    #[error("customer demand #{index} is invalid: {value}")]
    InvalidDemand {
        /// Position in the demand list.
        index: usize,
        /// Offending value.
        value: i64,
    },
    /// A capacity is negative or too large.
    #[error("vehicle capacity #{index} is invalid: {value}")]
    InvalidCapacity {
        /// Position in the capacity list.
        index: usize,
        /// Offending value.
        value: i64,
    },
    /// Customers were given without any vehicle.
    #[error("{customers} customers but no vehicles")]
    NoVehicles {
        /// Number of customers.
        customers: usize,
    },
    /// The derived problem instance is inconsistent.
    #[error(transparent)]
    Problem(#[from] ProblemError),
    /// The distance matrix could not be built.
    #[error("distance matrix construction failed: {0}")]
    Matrix(#[from] MatrixBuildError),
    /// Scoring found an inconsistency between assignment and matrix.
    #[error("objective evaluation failed: {0}")]
    Objective(#[from] ObjectiveError),
    /// The solver failed.
    #[error("solver failed: {0}")]
    Solver(#[from] SolverError),
    /// The solver placed customers on more than one route position.
    #[error("solver assigned customers more than once: {customers:?}")]
    DuplicateAssignment {
        /// Customers that appear more than once.
        customers: Vec<u64>,
    },
}

/// Result of a successful planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoutes {
    /// Final assignment.
    pub assignment: RouteAssignment,
    /// Score of `assignment`, recomputed by the planner.
    pub score: Score,
    /// Reporting view.
    pub summary: PlanSummary,
}

/// Object-safe planning seam used by front ends.
pub trait Planner {
    /// Plan routes for `request`.
    ///
    /// # Errors
    /// Returns [`PlanError`] when the request is invalid or the solve fails.
    fn plan(&self, request: &PlanRequest) -> Result<PlannedRoutes, PlanError>;
}

/// Plans requests with a distance matrix builder and a solver.
///
/// # Examples
/// ```
/// use fleetroute_core::test_support::{FixedDistanceProvider, SingleRouteSolver};
/// use fleetroute_core::{DistanceMatrixBuilder, Location, PlanRequest, RoutePlanner};
///
/// let planner = RoutePlanner::new(
///     DistanceMatrixBuilder::new(FixedDistanceProvider::new(1_000)),
///     SingleRouteSolver,
/// );
/// let request = PlanRequest::new(
///     Location::new(0, 0.0, 0.0),
///     vec![Location::new(1, 0.0, 1.0), Location::new(2, 1.0, 0.0)],
///     vec![100],
///     vec![5, 6],
/// );
/// let planned = planner.plan(&request)?;
/// assert_eq!(planned.summary.total_distance, 3_000);
/// assert!(planned.summary.feasible);
/// # Ok::<(), fleetroute_core::PlanError>(())
/// ```
#[derive(Debug)]
pub struct RoutePlanner<P, S> {
    builder: DistanceMatrixBuilder<P>,
    solver: S,
    vehicle_penalty: i64,
}

impl<P, S> RoutePlanner<P, S>
where
    P: DistanceProvider,
    S: Solver,
{
    /// Planner with the default per-vehicle penalty.
    pub const fn new(builder: DistanceMatrixBuilder<P>, solver: S) -> Self {
        Self {
            builder,
            solver,
            vehicle_penalty: DEFAULT_VEHICLE_PENALTY,
        }
    }

    /// Override the per-vehicle soft penalty.
    #[must_use]
    pub fn with_vehicle_penalty(mut self, vehicle_penalty: i64) -> Self {
        self.vehicle_penalty = vehicle_penalty;
        self
    }

    /// The matrix builder shared by every solve.
    pub const fn builder(&self) -> &DistanceMatrixBuilder<P> {
        &self.builder
    }

    /// The solver.
    pub const fn solver(&self) -> &S {
        &self.solver
    }

    /// Validate `request` and solve it.
    ///
    /// Validation happens before any provider call.
    ///
    /// # Errors
    /// Returns [`PlanError`] when the request is invalid or the solve fails.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlannedRoutes, PlanError> {
        self.plan_instance(request.to_instance()?)
    }

    /// Solve an already-built instance.
    ///
    /// # Errors
    /// As [`SolveJob::run`].
    pub fn plan_instance(&self, instance: ProblemInstance) -> Result<PlannedRoutes, PlanError> {
        SolveJob::new(instance)
            .with_vehicle_penalty(self.vehicle_penalty)
            .run(&self.builder, &self.solver)
    }
}

impl<P, S> Planner for RoutePlanner<P, S>
where
    P: DistanceProvider,
    S: Solver,
{
    fn plan(&self, request: &PlanRequest) -> Result<PlannedRoutes, PlanError> {
        Self::plan(self, request)
    }
}
