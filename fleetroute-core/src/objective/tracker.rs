//! Incremental score maintenance for local-search moves.

use std::collections::BTreeMap;

use crate::{RouteAssignment, VehicleSpec};

use super::{ObjectiveError, ObjectiveModel, RouteCost, Score};

#[derive(Debug, Clone)]
struct TrackedRoute<'m> {
    vehicle: &'m VehicleSpec,
    customers: Vec<u64>,
    locations: Vec<u64>,
    cost: RouteCost,
}

impl TrackedRoute<'_> {
    fn depot(&self) -> u64 {
        self.vehicle.depot.id
    }

    /// Location before `position`, the depot at the start of the route.
    fn before(&self, position: usize) -> u64 {
        position
            .checked_sub(1)
            .and_then(|p| self.locations.get(p))
            .copied()
            .unwrap_or_else(|| self.depot())
    }

    /// Location at `position`, the depot past the end of the route.
    fn at(&self, position: usize) -> u64 {
        self.locations
            .get(position)
            .copied()
            .unwrap_or_else(|| self.depot())
    }
}

/// Running score of an assignment under edit.
///
/// Each vehicle's demand and distance are kept alongside its route, so
/// [`ScoreTracker::insert`], [`ScoreTracker::remove`] and their side-effect
/// free previews need at most three matrix lookups regardless of route length.
/// The invariant `tracker.score() == model.score(&tracker.assignment())` holds
/// after every successful operation.
///
/// Failed operations leave the tracker unchanged.
///
/// # Examples
/// ```
/// use fleetroute_core::{
///     Customer, DistanceMatrix, EvaluationContext, Location, ObjectiveModel, ProblemInstance,
///     RouteAssignment, VehicleSpec,
/// };
///
/// let depot = Location::new(0, 0.0, 0.0);
/// let customer = Customer::new(1, "Customer 1", Location::new(1, 0.0, 1.0), 4);
/// let instance = ProblemInstance::new(
///     depot,
///     vec![customer],
///     vec![VehicleSpec::new(1, "Vehicle 1", 10, depot)],
/// )?;
/// let rows = vec![vec![0, 300], vec![300, 0]];
/// let matrix = DistanceMatrix::from_rows(&instance.locations(), rows)?;
/// let model = ObjectiveModel::new(EvaluationContext::new(&instance, &matrix));
/// let mut tracker = model.tracker(&RouteAssignment::empty(instance.vehicles()))?;
///
/// let preview = tracker.insertion_delta(1, 0, 1)?;
/// let applied = tracker.insert(1, 0, 1)?;
/// assert_eq!(preview, applied);
/// assert_eq!(tracker.score(), model.score(&tracker.assignment())?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScoreTracker<'m> {
    model: &'m ObjectiveModel<'m>,
    routes: BTreeMap<u64, TrackedRoute<'m>>,
    total: Score,
}

impl<'m> ScoreTracker<'m> {
    pub(super) fn new(
        model: &'m ObjectiveModel<'m>,
        assignment: &RouteAssignment,
    ) -> Result<Self, ObjectiveError> {
        let mut tracker = Self {
            model,
            routes: model
                .context()
                .vehicles()
                .map(|vehicle| {
                    let route = TrackedRoute {
                        vehicle,
                        customers: Vec::new(),
                        locations: Vec::new(),
                        cost: RouteCost::default(),
                    };
                    (vehicle.id, route)
                })
                .collect(),
            total: Score::ZERO,
        };
        for (vehicle_id, customers) in assignment.routes() {
            tracker.replace_route(vehicle_id, customers.to_vec())?;
        }
        Ok(tracker)
    }

    /// The model this tracker scores against.
    #[must_use]
    pub const fn model(&self) -> &'m ObjectiveModel<'m> {
        self.model
    }

    /// Current total score.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.total
    }

    /// Snapshot of the tracked routes, one entry per known vehicle.
    #[must_use]
    pub fn assignment(&self) -> RouteAssignment {
        let mut assignment = RouteAssignment::default();
        for (id, route) in &self.routes {
            assignment.set_route(*id, route.customers.clone());
        }
        assignment
    }

    /// Customer sequence of a vehicle.
    #[must_use]
    pub fn route(&self, vehicle_id: u64) -> Option<&[u64]> {
        self.routes.get(&vehicle_id).map(|r| r.customers.as_slice())
    }

    /// Running demand, distance and stop count of a vehicle.
    #[must_use]
    pub fn route_cost(&self, vehicle_id: u64) -> Option<RouteCost> {
        self.routes.get(&vehicle_id).map(|r| r.cost)
    }

    /// Tracked vehicle ids in ascending order.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.routes.keys().copied()
    }

    /// Score change if `customer` were inserted at `position` of `vehicle`.
    ///
    /// `position` may equal the route length to append.
    ///
    /// # Errors
    /// Returns [`ObjectiveError`] for unknown ids, positions past the end of
    /// the route, or matrix gaps.
    pub fn insertion_delta(
        &self,
        vehicle: u64,
        position: usize,
        customer: u64,
    ) -> Result<Score, ObjectiveError> {
        let route = self.tracked(vehicle)?;
        let (cost, _) = self.cost_after_insert(route, position, customer)?;
        Ok(self.route_score(route, cost) - self.route_score(route, route.cost))
    }

    /// Insert `customer` at `position` of `vehicle` and return the score change.
    ///
    /// # Errors
    /// As [`ScoreTracker::insertion_delta`].
    pub fn insert(
        &mut self,
        vehicle: u64,
        position: usize,
        customer: u64,
    ) -> Result<Score, ObjectiveError> {
        let current = self.tracked(vehicle)?;
        let (cost, location) = self.cost_after_insert(current, position, customer)?;
        let delta = self.route_score(current, cost) - self.route_score(current, current.cost);
        let route = self.tracked_mut(vehicle)?;
        route.customers.insert(position, customer);
        route.locations.insert(position, location);
        route.cost = cost;
        self.total += delta;
        Ok(delta)
    }

    /// Score change if the customer at `position` of `vehicle` were removed.
    ///
    /// # Errors
    /// Returns [`ObjectiveError`] for unknown vehicles, positions outside the
    /// route, or matrix gaps.
    pub fn removal_delta(&self, vehicle: u64, position: usize) -> Result<Score, ObjectiveError> {
        let route = self.tracked(vehicle)?;
        let cost = self.cost_after_remove(route, position)?;
        Ok(self.route_score(route, cost) - self.route_score(route, route.cost))
    }

    /// Remove the customer at `position` of `vehicle`.
    ///
    /// Returns the removed customer id and the score change.
    ///
    /// # Errors
    /// As [`ScoreTracker::removal_delta`].
    pub fn remove(
        &mut self,
        vehicle: u64,
        position: usize,
    ) -> Result<(u64, Score), ObjectiveError> {
        let current = self.tracked(vehicle)?;
        let cost = self.cost_after_remove(current, position)?;
        let delta = self.route_score(current, cost) - self.route_score(current, current.cost);
        let route = self.tracked_mut(vehicle)?;
        let customer = route.customers.remove(position);
        route.locations.remove(position);
        route.cost = cost;
        self.total += delta;
        Ok((customer, delta))
    }

    /// Replace a vehicle's whole route, rescoring it in O(route length).
    ///
    /// # Errors
    /// Returns [`ObjectiveError`] for unknown ids or matrix gaps.
    pub fn replace_route(
        &mut self,
        vehicle: u64,
        customers: Vec<u64>,
    ) -> Result<Score, ObjectiveError> {
        let current = self.tracked(vehicle)?;
        let context = self.model.context();
        let cost = self.model.route_cost(current.vehicle, &customers)?;
        let locations = customers
            .iter()
            .map(|&id| context.customer(id).map(|c| c.location.id))
            .collect::<Result<Vec<_>, _>>()?;
        let delta = self.route_score(current, cost) - self.route_score(current, current.cost);
        let route = self.tracked_mut(vehicle)?;
        route.customers = customers;
        route.locations = locations;
        route.cost = cost;
        self.total += delta;
        Ok(delta)
    }

    fn tracked(&self, vehicle: u64) -> Result<&TrackedRoute<'m>, ObjectiveError> {
        self.routes
            .get(&vehicle)
            .ok_or(ObjectiveError::UnknownVehicle { id: vehicle })
    }

    fn tracked_mut(&mut self, vehicle: u64) -> Result<&mut TrackedRoute<'m>, ObjectiveError> {
        self.routes
            .get_mut(&vehicle)
            .ok_or(ObjectiveError::UnknownVehicle { id: vehicle })
    }

    fn route_score(&self, route: &TrackedRoute<'_>, cost: RouteCost) -> Score {
        cost.score(route.vehicle.capacity, self.model.vehicle_penalty())
    }

    fn cost_after_insert(
        &self,
        route: &TrackedRoute<'_>,
        position: usize,
        customer: u64,
    ) -> Result<(RouteCost, u64), ObjectiveError> {
        let len = route.customers.len();
        if position > len {
            return Err(ObjectiveError::PositionOutOfRange {
                vehicle: route.vehicle.id,
                position,
                len,
            });
        }
        let context = self.model.context();
        let entry = context.customer(customer)?;
        let location = entry.location.id;
        let (prev, next) = (route.before(position), route.at(position));
        let distance = route
            .cost
            .distance
            .saturating_sub(context.distance(prev, next)?)
            .saturating_add(context.distance(prev, location)?)
            .saturating_add(context.distance(location, next)?);
        let cost = RouteCost {
            demand: route.cost.demand.saturating_add(u64::from(entry.demand)),
            distance,
            stops: len + 1,
        };
        Ok((cost, location))
    }

    fn cost_after_remove(
        &self,
        route: &TrackedRoute<'_>,
        position: usize,
    ) -> Result<RouteCost, ObjectiveError> {
        let len = route.customers.len();
        let out_of_range = ObjectiveError::PositionOutOfRange {
            vehicle: route.vehicle.id,
            position,
            len,
        };
        let (Some(&customer), Some(&location)) =
            (route.customers.get(position), route.locations.get(position))
        else {
            return Err(out_of_range);
        };
        let context = self.model.context();
        let entry = context.customer(customer)?;
        let (prev, next) = (route.before(position), route.at(position + 1));
        let distance = route
            .cost
            .distance
            .saturating_sub(context.distance(prev, location)?)
            .saturating_sub(context.distance(location, next)?)
            .saturating_add(context.distance(prev, next)?);
        Ok(RouteCost {
            demand: route.cost.demand.saturating_sub(u64::from(entry.demand)),
            distance,
            stops: len - 1,
        })
    }
}
