//! Scoring of route assignments.
//!
//! The [`ObjectiveModel`] turns a [`RouteAssignment`] into a [`Score`]:
//!
//! - hard: minus the total capacity excess over all vehicles;
//! - soft: minus the total route distance, plus a fixed penalty for every
//!   vehicle that serves at least one customer.
//!
//! Routes start and end at the vehicle's depot. Full scoring is
//! O(total route length); [`ScoreTracker`] keeps per-vehicle running totals so
//! a single insertion or removal is rescored with a constant number of matrix
//! lookups.

mod context;
mod score;
mod tracker;

use thiserror::Error;

pub use context::EvaluationContext;
pub use score::{ParseScoreError, Score};
pub use tracker::ScoreTracker;

use crate::{MatrixLookupError, RouteAssignment, VehicleSpec};

/// Soft penalty charged for each vehicle that leaves the depot.
pub const DEFAULT_VEHICLE_PENALTY: i64 = 1_000_000;

/// Errors raised while scoring.
///
/// All variants indicate that the assignment or matrix disagrees with the
/// evaluation context; none are expected for assignments produced from the
/// same problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectiveError {
    /// The assignment names a vehicle the context does not know.
    #[error("vehicle {id} is not part of this problem")]
    UnknownVehicle {
        /// Offending vehicle id.
        id: u64,
    },
    /// The assignment names a customer the context does not know.
    #[error("customer {id} is not part of this problem")]
    UnknownCustomer {
        /// Offending customer id.
        id: u64,
    },
    /// An insertion or removal position lies outside the route.
    #[error("position {position} is out of range for vehicle {vehicle} with {len} stops")]
    PositionOutOfRange {
        /// Vehicle whose route was addressed.
        vehicle: u64,
        /// Requested position.
        position: usize,
        /// Current route length.
        len: usize,
    },
    /// The distance matrix does not cover a referenced location.
    #[error(transparent)]
    Matrix(#[from] MatrixLookupError),
}

/// Aggregate cost of one vehicle's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteCost {
    /// Sum of customer demands.
    pub demand: u64,
    /// Depot-to-depot distance in metres.
    pub distance: u64,
    /// Number of customers visited.
    pub stops: usize,
}

impl RouteCost {
    /// This route's contribution to the total score.
    ///
    /// An empty route contributes nothing.
    #[must_use]
    pub fn score(&self, capacity: u32, vehicle_penalty: i64) -> Score {
        if self.stops == 0 {
            return Score::ZERO;
        }
        let excess = self.demand.saturating_sub(u64::from(capacity));
        Score::new(
            saturating_i64(excess).saturating_neg(),
            saturating_i64(self.distance)
                .saturating_add(vehicle_penalty)
                .saturating_neg(),
        )
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Scores assignments against one solve's [`EvaluationContext`].
///
/// The model only reads its context; it is `Send + Sync` and can be shared by
/// reference between threads evaluating different candidates.
///
/// # Examples
/// ```
/// use fleetroute_core::{
///     Customer, DistanceMatrix, EvaluationContext, Location, ObjectiveModel, ProblemInstance,
///     RouteAssignment, Score, VehicleSpec,
/// };
///
/// let depot = Location::new(0, 0.0, 0.0);
/// let customer = Customer::new(1, "Customer 1", Location::new(1, 0.0, 1.0), 4);
/// let vehicle = VehicleSpec::new(1, "Vehicle 1", 10, depot);
/// let instance = ProblemInstance::new(depot, vec![customer], vec![vehicle])?;
/// let rows = vec![vec![0, 300], vec![300, 0]];
/// let matrix = DistanceMatrix::from_rows(&instance.locations(), rows)?;
/// let model = ObjectiveModel::new(EvaluationContext::new(&instance, &matrix));
///
/// let mut assignment = RouteAssignment::empty(instance.vehicles());
/// assert_eq!(model.score(&assignment)?, Score::ZERO);
/// assignment.set_route(1, vec![1]);
/// assert_eq!(model.score(&assignment)?, Score::new(0, -1_000_600));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ObjectiveModel<'a> {
    context: EvaluationContext<'a>,
    vehicle_penalty: i64,
}

impl<'a> ObjectiveModel<'a> {
    /// Model with the default per-vehicle penalty.
    #[must_use]
    pub const fn new(context: EvaluationContext<'a>) -> Self {
        Self {
            context,
            vehicle_penalty: DEFAULT_VEHICLE_PENALTY,
        }
    }

    /// Override the per-vehicle penalty.
    #[must_use]
    pub const fn with_vehicle_penalty(mut self, vehicle_penalty: i64) -> Self {
        self.vehicle_penalty = vehicle_penalty;
        self
    }

    /// The bound evaluation context.
    #[must_use]
    pub const fn context(&self) -> &EvaluationContext<'a> {
        &self.context
    }

    /// Soft penalty per active vehicle.
    #[must_use]
    pub const fn vehicle_penalty(&self) -> i64 {
        self.vehicle_penalty
    }

    /// Score a full assignment.
    ///
    /// Vehicles absent from the assignment count as empty.
    ///
    /// # Errors
    /// Returns [`ObjectiveError`] when the assignment references unknown
    /// vehicles or customers, or the matrix lacks a location.
    pub fn score(&self, assignment: &RouteAssignment) -> Result<Score, ObjectiveError> {
        assignment
            .routes()
            .map(|(vehicle_id, customers)| {
                let vehicle = self.context.vehicle(vehicle_id)?;
                self.route_cost(vehicle, customers)
                    .map(|cost| cost.score(vehicle.capacity, self.vehicle_penalty))
            })
            .sum()
    }

    /// Demand, distance and stop count of one route.
    ///
    /// # Errors
    /// As [`ObjectiveModel::score`].
    pub fn route_cost(
        &self,
        vehicle: &VehicleSpec,
        customers: &[u64],
    ) -> Result<RouteCost, ObjectiveError> {
        let mut cost = RouteCost {
            stops: customers.len(),
            ..RouteCost::default()
        };
        let mut previous = vehicle.depot.id;
        for &customer_id in customers {
            let customer = self.context.customer(customer_id)?;
            cost.demand = cost.demand.saturating_add(u64::from(customer.demand));
            cost.distance = cost
                .distance
                .saturating_add(self.context.distance(previous, customer.location.id)?);
            previous = customer.location.id;
        }
        if !customers.is_empty() {
            cost.distance = cost
                .distance
                .saturating_add(self.context.distance(previous, vehicle.depot.id)?);
        }
        Ok(cost)
    }

    /// Incremental scorer seeded from `assignment`.
    ///
    /// # Errors
    /// As [`ObjectiveModel::score`].
    pub fn tracker(
        &self,
        assignment: &RouteAssignment,
    ) -> Result<ScoreTracker<'_>, ObjectiveError> {
        ScoreTracker::new(self, assignment)
    }
}
