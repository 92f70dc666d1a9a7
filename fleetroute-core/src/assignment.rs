//! The decision variable mutated by a solver: one customer sequence per vehicle.

use std::collections::{BTreeMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::VehicleSpec;

/// Ordered customer ids per vehicle id.
///
/// Vehicles are kept in a `BTreeMap` so iteration order is stable across runs.
/// The assignment does not enforce that a customer appears in at most one
/// route; keeping that invariant is the solver's job.
///
/// # Examples
/// ```
/// use fleetroute_core::{Location, RouteAssignment, VehicleSpec};
///
/// let depot = Location::new(0, 0.0, 0.0);
/// let vehicles = vec![VehicleSpec::new(1, "Vehicle 1", 100, depot)];
/// let mut assignment = RouteAssignment::empty(&vehicles);
/// assignment.set_route(1, vec![2, 1]);
/// assert_eq!(assignment.route(1), Some(&[2, 1][..]));
/// assert_eq!(assignment.assigned_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteAssignment {
    routes: BTreeMap<u64, Vec<u64>>,
}

impl RouteAssignment {
    /// An assignment with an empty route for every vehicle.
    #[must_use]
    pub fn empty(vehicles: &[VehicleSpec]) -> Self {
        Self {
            routes: vehicles.iter().map(|v| (v.id, Vec::new())).collect(),
        }
    }

    /// Customer sequence of a vehicle, if the vehicle is known.
    #[must_use]
    pub fn route(&self, vehicle_id: u64) -> Option<&[u64]> {
        self.routes.get(&vehicle_id).map(Vec::as_slice)
    }

    /// Replace a vehicle's customer sequence, registering the vehicle if new.
    pub fn set_route(&mut self, vehicle_id: u64, customers: Vec<u64>) {
        self.routes.insert(vehicle_id, customers);
    }

    /// Iterate over `(vehicle id, customer ids)` in ascending vehicle order.
    pub fn routes(&self) -> impl Iterator<Item = (u64, &[u64])> + '_ {
        self.routes.iter().map(|(id, route)| (*id, route.as_slice()))
    }

    /// Number of vehicles tracked by the assignment.
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of vehicles with at least one customer.
    #[must_use]
    pub fn active_vehicle_count(&self) -> usize {
        self.routes.values().filter(|r| !r.is_empty()).count()
    }

    /// Total number of customer visits across all routes.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Customer ids that appear more than once across the assignment.
    ///
    /// Returned in ascending order. An empty result means the membership
    /// invariant holds.
    #[must_use]
    pub fn duplicate_customers(&self) -> Vec<u64> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<u64> = self
            .routes
            .values()
            .flatten()
            .copied()
            .filter(|id| !seen.insert(*id))
            .collect();
        duplicates.sort_unstable();
        duplicates.dedup();
        duplicates
    }
}
