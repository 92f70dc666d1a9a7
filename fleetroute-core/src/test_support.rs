//! Deterministic `DistanceProvider` and `Solver` implementations used by
//! unit, behaviour and doc tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::distance::fallback::estimate_meters;
use crate::{
    DistanceProvider, Location, ObjectiveModel, ProviderError, RouteAssignment, Solver,
    SolverError, SolverOutcome,
};

/// Provider returning the same distance for every pair.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistanceProvider {
    meters: u64,
}

impl FixedDistanceProvider {
    /// Provider answering `meters` for every request.
    #[must_use]
    pub const fn new(meters: u64) -> Self {
        Self { meters }
    }
}

impl DistanceProvider for FixedDistanceProvider {
    fn distance(&self, _from: &Location, _to: &Location) -> Result<u64, ProviderError> {
        Ok(self.meters)
    }
}

/// Provider answering from coordinates alone with the great-circle estimate.
///
/// Ids play no part, so moving a location changes its distances.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricProvider;

impl DistanceProvider for GeometricProvider {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        Ok(estimate_meters(from, to))
    }
}

/// Provider that is always unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingProvider;

impl DistanceProvider for FailingProvider {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        Err(ProviderError::Network {
            url: format!("stub://route/{}/{}", from.id, to.id),
            message: "connection refused".to_owned(),
        })
    }
}

/// Provider answering from an explicit table keyed by `(from, to)` ids.
///
/// Pairs missing from the table fail with [`ProviderError::NoRoute`].
#[derive(Debug, Clone, Default)]
pub struct TableProvider {
    table: Arc<HashMap<(u64, u64), u64>>,
}

impl TableProvider {
    /// Table populated for every ordered pair of distinct `locations`.
    pub fn from_fn(locations: &[Location], f: impl Fn(u64, u64) -> u64) -> Self {
        let mut table = HashMap::new();
        for from in locations {
            for to in locations.iter().filter(|to| to.id != from.id) {
                table.insert((from.id, to.id), f(from.id, to.id));
            }
        }
        Self {
            table: Arc::new(table),
        }
    }

    /// Table populated from row-major distances over `locations`.
    ///
    /// Rows or cells beyond `locations` are ignored.
    #[must_use]
    pub fn from_rows(locations: &[Location], rows: &[Vec<u64>]) -> Self {
        let mut table = HashMap::new();
        for (from, row) in locations.iter().zip(rows) {
            for (to, meters) in locations.iter().zip(row) {
                table.insert((from.id, to.id), *meters);
            }
        }
        Self {
            table: Arc::new(table),
        }
    }
}

impl DistanceProvider for TableProvider {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        self.table
            .get(&(from.id, to.id))
            .copied()
            .ok_or_else(|| ProviderError::NoRoute {
                message: format!("no table entry for {} -> {}", from.id, to.id),
            })
    }
}

/// Wrapper failing for one unordered pair and delegating everything else.
#[derive(Debug, Clone)]
pub struct PairFailingProvider<P> {
    inner: P,
    pair: (u64, u64),
}

impl<P> PairFailingProvider<P> {
    /// Fail whenever the request joins `a` and `b`, in either direction.
    pub const fn new(inner: P, a: u64, b: u64) -> Self {
        Self { inner, pair: (a, b) }
    }
}

impl<P: DistanceProvider> DistanceProvider for PairFailingProvider<P> {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        let (a, b) = self.pair;
        if (from.id, to.id) == (a, b) || (from.id, to.id) == (b, a) {
            return Err(ProviderError::Timeout {
                url: format!("stub://route/{}/{}", from.id, to.id),
                timeout_secs: 10,
            });
        }
        self.inner.distance(from, to)
    }
}

/// Wrapper counting calls to the inner provider.
#[derive(Debug, Default)]
pub struct CountingProvider<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingProvider<P> {
    /// Wrap `inner` with a zeroed counter.
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `distance` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: DistanceProvider> DistanceProvider for CountingProvider<P> {
    fn distance(&self, from: &Location, to: &Location) -> Result<u64, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.distance(from, to)
    }
}

/// Solver placing every customer on the lowest-numbered vehicle, in id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleRouteSolver;

impl Solver for SingleRouteSolver {
    fn solve(
        &self,
        objective: &ObjectiveModel<'_>,
        mut initial: RouteAssignment,
    ) -> Result<SolverOutcome, SolverError> {
        let context = objective.context();
        let mut customers: Vec<u64> = context.customers().map(|c| c.id).collect();
        customers.sort_unstable();
        if let Some(vehicle) = context.vehicles().map(|v| v.id).min() {
            initial.set_route(vehicle, customers);
        }
        let score = objective.score(&initial)?;
        Ok(SolverOutcome {
            assignment: initial,
            score,
        })
    }
}
