//! Per-solve evaluation data borrowed by the objective model.

use std::collections::HashMap;

use crate::{Customer, DistanceMatrix, ProblemInstance, VehicleSpec};

use super::ObjectiveError;

/// Everything the objective model needs for one solve.
///
/// The context borrows the problem's vehicles and customers and the solve's
/// distance matrix. It is created inside a solve call and cannot outlive the
/// data it points at, so no matrix is ever visible to another solve.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    vehicles: HashMap<u64, &'a VehicleSpec>,
    customers: HashMap<u64, &'a Customer>,
    matrix: &'a DistanceMatrix,
}

impl<'a> EvaluationContext<'a> {
    /// Bind a problem instance to its distance matrix.
    #[must_use]
    pub fn new(instance: &'a ProblemInstance, matrix: &'a DistanceMatrix) -> Self {
        Self::from_parts(instance.vehicles(), instance.customers(), matrix)
    }

    /// Bind explicit vehicle and customer lists to a matrix.
    ///
    /// When ids repeat, the last entry wins.
    #[must_use]
    pub fn from_parts(
        vehicles: &'a [VehicleSpec],
        customers: &'a [Customer],
        matrix: &'a DistanceMatrix,
    ) -> Self {
        Self {
            vehicles: vehicles.iter().map(|v| (v.id, v)).collect(),
            customers: customers.iter().map(|c| (c.id, c)).collect(),
            matrix,
        }
    }

    /// Vehicle by id.
    ///
    /// # Errors
    /// Returns [`ObjectiveError::UnknownVehicle`] for ids outside the context.
    pub fn vehicle(&self, id: u64) -> Result<&'a VehicleSpec, ObjectiveError> {
        self.vehicles
            .get(&id)
            .copied()
            .ok_or(ObjectiveError::UnknownVehicle { id })
    }

    /// Customer by id.
    ///
    /// # Errors
    /// Returns [`ObjectiveError::UnknownCustomer`] for ids outside the context.
    pub fn customer(&self, id: u64) -> Result<&'a Customer, ObjectiveError> {
        self.customers
            .get(&id)
            .copied()
            .ok_or(ObjectiveError::UnknownCustomer { id })
    }

    /// Vehicles known to the context, in unspecified order.
    pub fn vehicles(&self) -> impl Iterator<Item = &'a VehicleSpec> + '_ {
        self.vehicles.values().copied()
    }

    /// Customers known to the context, in unspecified order.
    pub fn customers(&self) -> impl Iterator<Item = &'a Customer> + '_ {
        self.customers.values().copied()
    }

    /// Number of customers known to the context.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// The solve's distance matrix.
    #[must_use]
    pub const fn matrix(&self) -> &'a DistanceMatrix {
        self.matrix
    }

    /// Distance between two location ids.
    ///
    /// # Errors
    /// Returns [`ObjectiveError::Matrix`] when either id is missing from the
    /// matrix.
    pub fn distance(&self, from: u64, to: u64) -> Result<u64, ObjectiveError> {
        Ok(self.matrix.distance(from, to)?)
    }
}
