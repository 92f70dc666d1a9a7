//! Boundary between the planner and a search engine.

use thiserror::Error;

use crate::{ObjectiveError, ObjectiveModel, RouteAssignment, Score};

/// Best assignment found by a solver and its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    /// Final assignment.
    pub assignment: RouteAssignment,
    /// Score of `assignment` under the model the solver was given.
    pub score: Score,
}

/// Errors reported by a [`Solver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// Scoring failed while searching.
    #[error("objective evaluation failed: {0}")]
    Objective(#[from] ObjectiveError),
    /// The engine gave up for its own reasons.
    #[error("solver failed: {message}")]
    Engine {
        /// Description from the engine.
        message: String,
    },
}

/// A search engine that improves a [`RouteAssignment`].
///
/// Implementations evaluate candidates exclusively through the
/// [`ObjectiveModel`] they are handed; that model is bound to one solve and
/// must not be retained past the call.
///
/// # Examples
/// ```
/// use fleetroute_core::{ObjectiveModel, RouteAssignment, Solver, SolverError, SolverOutcome};
///
/// struct KeepInitial;
///
/// impl Solver for KeepInitial {
///     fn solve(
///         &self,
///         objective: &ObjectiveModel<'_>,
///         initial: RouteAssignment,
///     ) -> Result<SolverOutcome, SolverError> {
///         let score = objective.score(&initial)?;
///         Ok(SolverOutcome { assignment: initial, score })
///     }
/// }
/// ```
pub trait Solver: Send + Sync {
    /// Search from `initial` and return the best assignment found.
    ///
    /// # Errors
    /// Returns [`SolverError`] when the search cannot proceed.
    fn solve(
        &self,
        objective: &ObjectiveModel<'_>,
        initial: RouteAssignment,
    ) -> Result<SolverOutcome, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn solve(
        &self,
        objective: &ObjectiveModel<'_>,
        initial: RouteAssignment,
    ) -> Result<SolverOutcome, SolverError> {
        (**self).solve(objective, initial)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(
        &self,
        objective: &ObjectiveModel<'_>,
        initial: RouteAssignment,
    ) -> Result<SolverOutcome, SolverError> {
        (**self).solve(objective, initial)
    }
}
