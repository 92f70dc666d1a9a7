//! Reporting view of a solved assignment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Location, ObjectiveError, ObjectiveModel, ProblemInstance, RouteAssignment, Score};

/// One delivery on a vehicle's route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CustomerStop {
    /// Customer identifier.
    pub customer_id: u64,
    /// Customer display name.
    pub customer_name: String,
    /// Delivery location.
    pub location: Location,
    /// Units delivered.
    pub demand: u32,
}

/// One vehicle's route with its totals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehicleRoute {
    /// Vehicle identifier.
    pub vehicle_id: u64,
    /// Vehicle display name.
    pub vehicle_name: String,
    /// Vehicle capacity.
    pub capacity: u32,
    /// Sum of stop demands.
    pub total_demand: u64,
    /// Depot-to-depot distance in metres.
    pub distance: u64,
    /// Stops in visiting order.
    pub stops: Vec<CustomerStop>,
}

/// Summary returned to callers of the planner.
///
/// Only vehicles with at least one stop are listed, in vehicle input order.
/// Distances are recomputed from the matrix used for scoring, so
/// `total_distance` equals the distance part of the soft score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlanSummary {
    /// Final score, rendered as `"{hard}hard/{soft}soft"` when serialised.
    pub score: Score,
    /// Sum of route distances in metres.
    pub total_distance: u64,
    /// Number of customers on routes.
    pub total_customers: usize,
    /// Whether no hard constraint is broken.
    pub feasible: bool,
    /// Active routes.
    pub routes: Vec<VehicleRoute>,
}

impl PlanSummary {
    /// Project `assignment` into a summary.
    ///
    /// # Errors
    /// Returns [`ObjectiveError`] when the assignment references ids the
    /// model does not know or the matrix lacks a location.
    pub fn project(
        model: &ObjectiveModel<'_>,
        instance: &ProblemInstance,
        assignment: &RouteAssignment,
        score: Score,
    ) -> Result<Self, ObjectiveError> {
        let context = model.context();
        let mut routes = Vec::new();
        for vehicle in instance.vehicles() {
            let customers = assignment.route(vehicle.id).unwrap_or_default();
            if customers.is_empty() {
                continue;
            }
            let cost = model.route_cost(vehicle, customers)?;
            let stops = customers
                .iter()
                .map(|&id| {
                    context.customer(id).map(|c| CustomerStop {
                        customer_id: c.id,
                        customer_name: c.name.clone(),
                        location: c.location,
                        demand: c.demand,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            routes.push(VehicleRoute {
                vehicle_id: vehicle.id,
                vehicle_name: vehicle.name.clone(),
                capacity: vehicle.capacity,
                total_demand: cost.demand,
                distance: cost.distance,
                stops,
            });
        }
        Ok(Self {
            score,
            total_distance: routes.iter().map(|r| r.distance).sum(),
            total_customers: routes.iter().map(|r| r.stops.len()).sum(),
            feasible: score.is_feasible(),
            routes,
        })
    }
}
