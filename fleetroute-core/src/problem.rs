//! Static problem facts: customers, vehicles and the instance bundling them.
//!
//! Constructors validate their input and return `Result` so inconsistent
//! instances are rejected before any distance is fetched.

use std::collections::HashSet;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Location;

/// Service time assumed for customers created without an explicit value.
pub(crate) const DEFAULT_SERVICE_TIME: Duration = Duration::from_secs(10 * 60);

/// Delivery time window relative to the start of the working day.
///
/// Windows are recorded on customers but not enforced by the objective model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeWindow {
    ready: Duration,
    due: Duration,
}

/// Errors returned by [`TimeWindow::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    /// The window closes before it opens.
    #[error("time window closes ({due:?}) before it opens ({ready:?})")]
    Inverted {
        /// Earliest service start.
        ready: Duration,
        /// Latest service start.
        due: Duration,
    },
}

impl TimeWindow {
    /// Validate and construct a window.
    ///
    /// # Errors
    /// Returns [`TimeWindowError::Inverted`] when `due < ready`.
    pub fn new(ready: Duration, due: Duration) -> Result<Self, TimeWindowError> {
        if due < ready {
            return Err(TimeWindowError::Inverted { ready, due });
        }
        Ok(Self { ready, due })
    }

    /// Earliest service start.
    #[must_use]
    pub const fn ready(&self) -> Duration {
        self.ready
    }

    /// Latest service start.
    #[must_use]
    pub const fn due(&self) -> Duration {
        self.due
    }
}

/// A customer awaiting delivery.
///
/// Identity is the `id`; two customers with the same id compare equal even if
/// other fields differ.
///
/// # Examples
/// ```
/// use fleetroute_core::{Customer, Location};
///
/// let customer = Customer::new(1, "Customer 1", Location::new(1, 36.81, 10.30), 12);
/// assert_eq!(customer.demand, 12);
/// assert!(customer.time_window.is_none());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Customer {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Delivery location.
    pub location: Location,
    /// Units of vehicle capacity consumed by this customer.
    pub demand: u32,
    /// Time spent at the stop.
    pub service_time: Option<Duration>,
    /// Optional delivery window.
    pub time_window: Option<TimeWindow>,
}

impl Customer {
    /// Construct a customer with the default service time and no window.
    pub fn new(id: u64, name: impl Into<String>, location: Location, demand: u32) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            demand,
            service_time: Some(DEFAULT_SERVICE_TIME),
            time_window: None,
        }
    }

    /// Set the service time.
    #[must_use]
    pub fn with_service_time(mut self, service_time: Duration) -> Self {
        self.service_time = Some(service_time);
        self
    }

    /// Attach a delivery window.
    #[must_use]
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Customer {}

impl std::hash::Hash for Customer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Static description of one vehicle.
///
/// The vehicle's customer sequence lives in a
/// [`RouteAssignment`](crate::RouteAssignment), not here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleSpec {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Maximum total demand the vehicle can carry.
    pub capacity: u32,
    /// Start and end of every route driven by this vehicle.
    pub depot: Location,
}

impl VehicleSpec {
    /// Construct a vehicle.
    pub fn new(id: u64, name: impl Into<String>, capacity: u32, depot: Location) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            depot,
        }
    }
}

/// Errors returned by [`ProblemInstance::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// Two customers share an identifier.
    #[error("customer id {id} appears more than once")]
    DuplicateCustomer {
        /// Repeated identifier.
        id: u64,
    },
    /// Two vehicles share an identifier.
    #[error("vehicle id {id} appears more than once")]
    DuplicateVehicle {
        /// Repeated identifier.
        id: u64,
    },
}

/// The static input to one solve.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    depot: Location,
    customers: Vec<Customer>,
    vehicles: Vec<VehicleSpec>,
}

impl ProblemInstance {
    /// Validate and construct an instance.
    ///
    /// # Errors
    /// Returns [`ProblemError`] when customer or vehicle ids repeat.
    pub fn new(
        depot: Location,
        customers: Vec<Customer>,
        vehicles: Vec<VehicleSpec>,
    ) -> Result<Self, ProblemError> {
        let mut seen = HashSet::with_capacity(customers.len());
        if let Some(dup) = customers.iter().find(|c| !seen.insert(c.id)) {
            return Err(ProblemError::DuplicateCustomer { id: dup.id });
        }
        seen.clear();
        if let Some(dup) = vehicles.iter().find(|v| !seen.insert(v.id)) {
            return Err(ProblemError::DuplicateVehicle { id: dup.id });
        }
        Ok(Self {
            depot,
            customers,
            vehicles,
        })
    }

    /// Shared depot.
    #[must_use]
    pub const fn depot(&self) -> &Location {
        &self.depot
    }

    /// Customers in input order.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Vehicles in input order.
    #[must_use]
    pub fn vehicles(&self) -> &[VehicleSpec] {
        &self.vehicles
    }

    /// The depot followed by every customer location, in input order.
    ///
    /// This is the location set the distance matrix must cover.
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        std::iter::once(self.depot)
            .chain(self.customers.iter().map(|c| c.location))
            .collect()
    }
}
