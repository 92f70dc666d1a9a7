//! Construction and relocate moves over a [`ScoreTracker`].

use std::collections::HashSet;
use std::time::{Duration, Instant};

use fleetroute_core::objective::ScoreTracker;
use fleetroute_core::{ObjectiveError, Score, SolverError};

use super::LocalSearchConfig;

/// Remaining search effort.
#[derive(Debug)]
pub(super) struct Budget {
    max_steps: usize,
    time_limit: Duration,
    started_at: Instant,
    steps: usize,
}

impl Budget {
    pub(super) const fn new(config: &LocalSearchConfig, started_at: Instant) -> Self {
        Self {
            max_steps: config.max_steps,
            time_limit: config.time_limit,
            started_at,
            steps: 0,
        }
    }

    pub(super) fn exhausted(&self) -> bool {
        self.steps >= self.max_steps || self.started_at.elapsed() >= self.time_limit
    }

    pub(super) const fn steps(&self) -> usize {
        self.steps
    }

    const fn spend(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy)]
struct Insertion {
    vehicle: u64,
    position: usize,
    delta: Score,
}

/// Cheapest place for `customer` across every vehicle and position.
///
/// Vehicles are visited in ascending id order and positions front to back;
/// only a strictly better delta replaces the current best.
fn best_insertion(
    tracker: &ScoreTracker<'_>,
    customer: u64,
) -> Result<Option<Insertion>, ObjectiveError> {
    let mut best: Option<Insertion> = None;
    for vehicle in tracker.vehicle_ids() {
        let len = tracker.route(vehicle).map_or(0, <[u64]>::len);
        for position in 0..=len {
            let delta = tracker.insertion_delta(vehicle, position, customer)?;
            if best.is_none_or(|current| delta > current.delta) {
                best = Some(Insertion {
                    vehicle,
                    position,
                    delta,
                });
            }
        }
    }
    Ok(best)
}

/// Insert every customer missing from the tracked routes.
///
/// Customers are placed largest demand first, ties by ascending id. Returns
/// the number of customers inserted.
pub(super) fn construct(tracker: &mut ScoreTracker<'_>) -> Result<usize, SolverError> {
    let assigned: HashSet<u64> = tracker
        .assignment()
        .routes()
        .flat_map(|(_, route)| route.iter().copied())
        .collect();
    let mut pending: Vec<(u32, u64)> = tracker
        .model()
        .context()
        .customers()
        .filter(|customer| !assigned.contains(&customer.id))
        .map(|customer| (customer.demand, customer.id))
        .collect();
    pending.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    for &(_, customer) in &pending {
        let Some(slot) = best_insertion(tracker, customer)? else {
            return Err(SolverError::Engine {
                message: format!("no vehicle available for customer {customer}"),
            });
        };
        tracker.insert(slot.vehicle, slot.position, customer)?;
    }
    Ok(pending.len())
}

fn locate(tracker: &ScoreTracker<'_>, customer: u64) -> Option<(u64, usize)> {
    tracker.vehicle_ids().find_map(|vehicle| {
        tracker
            .route(vehicle)?
            .iter()
            .position(|&id| id == customer)
            .map(|position| (vehicle, position))
    })
}

/// One pass of relocate moves over every assigned customer.
///
/// Each customer is lifted out and reinserted at its cheapest position; the
/// move is kept only when the total score strictly improves, otherwise the
/// customer goes back where it was. Returns whether anything improved.
pub(super) fn relocate_pass(
    tracker: &mut ScoreTracker<'_>,
    budget: &mut Budget,
) -> Result<bool, ObjectiveError> {
    let customers: Vec<u64> = tracker
        .assignment()
        .routes()
        .flat_map(|(_, route)| route.to_vec())
        .collect();
    let mut improved = false;

    for customer in customers {
        if budget.exhausted() {
            break;
        }
        budget.spend();
        let Some((vehicle, position)) = locate(tracker, customer) else {
            continue;
        };
        let (_, removal) = tracker.remove(vehicle, position)?;
        match best_insertion(tracker, customer)? {
            Some(slot) if removal + slot.delta > Score::ZERO => {
                tracker.insert(slot.vehicle, slot.position, customer)?;
                improved = true;
            }
            _ => {
                tracker.insert(vehicle, position, customer)?;
            }
        }
    }
    Ok(improved)
}
