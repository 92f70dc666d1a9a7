//! Core domain types and services for fleet route planning.
//!
//! The crate covers the parts of delivery planning that must be engineered
//! carefully:
//! - building a complete, symmetric road-distance matrix from an external
//!   [`DistanceProvider`] with bounded concurrency and geometric fallback;
//! - memoising pairwise distances in a [`DistanceCache`];
//! - scoring candidate route assignments with the [`ObjectiveModel`], either
//!   from scratch or incrementally through a [`ScoreTracker`];
//! - orchestrating a solve through the [`RoutePlanner`].
//!
//! The combinatorial search is delegated to a [`Solver`] implementation.
//!
//! Invariants:
//! - No global mutable state. Each solve owns its matrix and evaluation
//!   context.
//! - Library code returns `Result` for every input-dependent failure.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod assignment;
pub mod distance;
mod location;
pub mod objective;
pub mod planner;
mod problem;
mod solver;

#[doc(hidden)]
pub mod test_support;

pub use assignment::RouteAssignment;
pub use distance::{
    BuildCancellation, BuildReport, DistanceCache, DistanceMatrix, DistanceMatrixBuilder,
    DistanceProvider, DistanceSource, MatrixBuildError, MatrixBuilderConfig, MatrixLookupError,
    MatrixShapeError, MeasuredDistance, ProviderError,
};
pub use location::Location;
pub use objective::{
    DEFAULT_VEHICLE_PENALTY, EvaluationContext, ObjectiveError, ObjectiveModel, ParseScoreError,
    RouteCost, Score, ScoreTracker,
};
pub use planner::{
    CustomerStop, PlanError, PlanRequest, PlanSummary, PlannedRoutes, Planner, RoutePlanner,
    SolveJob, SolveStatus, VehicleRoute, sample_request,
};
pub use problem::{
    Customer, ProblemError, ProblemInstance, TimeWindow, TimeWindowError, VehicleSpec,
};
pub use solver::{Solver, SolverError, SolverOutcome};
