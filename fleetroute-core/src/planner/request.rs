//! Plan request input and its conversion into a problem instance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Customer, Location, ProblemInstance, VehicleSpec};

use super::PlanError;

/// Input to one planning run.
///
/// `customer_locations` and `customer_demands` are parallel lists. Integers are
/// signed at this boundary so negative values can be reported rather than
/// silently wrapped.
///
/// # Examples
/// ```
/// use fleetroute_core::{Location, PlanRequest};
///
/// let request = PlanRequest::new(
///     Location::new(0, 36.7682, 10.2753),
///     vec![Location::new(1, 36.8196, 10.3035)],
///     vec![100],
///     vec![12],
/// );
/// let instance = request.to_instance()?;
/// assert_eq!(instance.customers().len(), 1);
/// assert_eq!(instance.vehicles().first().map(|v| v.name.as_str()), Some("Vehicle 1"));
/// # Ok::<(), fleetroute_core::PlanError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlanRequest {
    /// Start and end of every route.
    pub depot: Location,
    /// Customer locations in input order.
    pub customer_locations: Vec<Location>,
    /// One capacity per vehicle.
    pub vehicle_capacities: Vec<i64>,
    /// One demand per customer location.
    pub customer_demands: Vec<i64>,
}

impl PlanRequest {
    /// Bundle the raw request lists.
    #[must_use]
    pub const fn new(
        depot: Location,
        customer_locations: Vec<Location>,
        vehicle_capacities: Vec<i64>,
        customer_demands: Vec<i64>,
    ) -> Self {
        Self {
            depot,
            customer_locations,
            vehicle_capacities,
            customer_demands,
        }
    }

    /// Validate the request and build the problem instance.
    ///
    /// Customers are numbered `1..=n` and named `"Customer {i}"`; vehicles are
    /// numbered `1..=m`, named `"Vehicle {i}"` and share the depot.
    ///
    /// # Errors
    /// Returns [`PlanError::MismatchedInput`] when the location and demand
    /// lists differ in length, [`PlanError::InvalidDemand`] or
    /// [`PlanError::InvalidCapacity`] for values outside `0..=u32::MAX`, and
    /// [`PlanError::NoVehicles`] when customers exist but no vehicle does.
    pub fn to_instance(&self) -> Result<ProblemInstance, PlanError> {
        if self.customer_locations.len() != self.customer_demands.len() {
            return Err(PlanError::MismatchedInput {
                locations: self.customer_locations.len(),
                demands: self.customer_demands.len(),
            });
        }
        if self.vehicle_capacities.is_empty() && !self.customer_locations.is_empty() {
            return Err(PlanError::NoVehicles {
                customers: self.customer_locations.len(),
            });
        }

        let customers = self
            .customer_locations
            .iter()
            .zip(&self.customer_demands)
            .zip(1_u64..)
            .enumerate()
            .map(|(index, ((location, &value), id))| {
                let demand =
                    u32::try_from(value).map_err(|_| PlanError::InvalidDemand { index, value })?;
                Ok(Customer::new(id, format!("Customer {id}"), *location, demand))
            })
            .collect::<Result<Vec<_>, PlanError>>()?;

        let vehicles = self
            .vehicle_capacities
            .iter()
            .zip(1_u64..)
            .enumerate()
            .map(|(index, (&value, id))| {
                let capacity =
                    u32::try_from(value).map_err(|_| PlanError::InvalidCapacity { index, value })?;
                Ok(VehicleSpec::new(id, format!("Vehicle {id}"), capacity, self.depot))
            })
            .collect::<Result<Vec<_>, PlanError>>()?;

        Ok(ProblemInstance::new(self.depot, customers, vehicles)?)
    }
}

/// The built-in demonstration problem: a depot and ten customers around
/// Tunis served by one vehicle of capacity 500.
#[must_use]
pub fn sample_request() -> PlanRequest {
    const CUSTOMERS: [(f64, f64, i64); 10] = [
        (36.8196, 10.3035, 12),
        (36.8064, 10.1817, 10),
        (36.8625, 10.1956, 15),
        (36.8782, 10.3247, 8),
        (36.8687, 10.3417, 20),
        (36.6800, 10.1600, 9),
        (36.6808, 10.2903, 14),
        (36.6965, 10.3858, 7),
        (36.9097, 10.2867, 18),
        (36.8093, 10.0863, 11),
    ];
    let (customer_locations, customer_demands) = CUSTOMERS
        .iter()
        .zip(1_u64..)
        .map(|(&(latitude, longitude, demand), id)| {
            (Location::new(id, latitude, longitude), demand)
        })
        .unzip();
    PlanRequest::new(
        Location::new(0, 36.7682, 10.2753),
        customer_locations,
        vec![500],
        customer_demands,
    )
}
