//! Facade crate for the fleetroute delivery planner.
//!
//! This crate re-exports the core domain types and exposes the default solver
//! and the GraphHopper distance provider behind feature flags.
//!
//! # Examples
//! ```
//! use fleetroute_engine::{DistanceMatrixBuilder, Location, PlanRequest, RoutePlanner};
//! # #[cfg(feature = "solver-local")]
//! # {
//! use fleetroute_engine::LocalSearchSolver;
//! use fleetroute_engine::fallback::estimate_meters;
//!
//! struct Estimate;
//!
//! impl fleetroute_engine::DistanceProvider for Estimate {
//!     fn distance(
//!         &self,
//!         from: &Location,
//!         to: &Location,
//!     ) -> Result<u64, fleetroute_engine::ProviderError> {
//!         Ok(estimate_meters(from, to))
//!     }
//! }
//!
//! let planner = RoutePlanner::new(DistanceMatrixBuilder::new(Estimate), LocalSearchSolver::new());
//! let planned = planner.plan(&fleetroute_engine::sample_request())?;
//! assert!(planned.summary.feasible);
//! # }
//! # Ok::<(), fleetroute_engine::PlanError>(())
//! ```

#![forbid(unsafe_code)]

pub use fleetroute_core::distance::fallback;
pub use fleetroute_core::{
    BuildCancellation, BuildReport, Customer, CustomerStop, DEFAULT_VEHICLE_PENALTY, DistanceCache,
    DistanceMatrix, DistanceMatrixBuilder, DistanceProvider, DistanceSource, EvaluationContext,
    Location, MatrixBuildError, MatrixBuilderConfig, MatrixLookupError, MatrixShapeError,
    MeasuredDistance, ObjectiveError, ObjectiveModel, PlanError, PlanRequest, PlanSummary,
    PlannedRoutes, Planner, ProblemError, ProblemInstance, ProviderError, RouteAssignment,
    RouteCost, RoutePlanner, Score, SolveJob, SolveStatus, Solver, SolverError, SolverOutcome,
    TimeWindow, TimeWindowError, VehicleRoute, VehicleSpec, sample_request,
};

#[cfg(feature = "solver-local")]
pub use fleetroute_solver::{LocalSearchConfig, LocalSearchSolver};

#[cfg(feature = "provider-http")]
pub use fleetroute_data::routing::{
    HttpDistanceProvider, HttpDistanceProviderConfig, ProviderBuildError,
};
