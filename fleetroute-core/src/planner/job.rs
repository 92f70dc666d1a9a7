//! One solve, from matrix construction to projected summary.

use log::{info, warn};

use crate::{
    DEFAULT_VEHICLE_PENALTY, DistanceMatrixBuilder, DistanceProvider, EvaluationContext,
    ObjectiveModel, ProblemInstance, RouteAssignment, Solver,
};

use super::{PlanError, PlanSummary, PlannedRoutes};

/// Lifecycle of a [`SolveJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Created but not yet run.
    Unsolved,
    /// Inside [`SolveJob::run`].
    Solving,
    /// Finished with a result.
    Solved,
    /// Finished with an error.
    Failed,
}

/// A single solve over a fixed problem instance.
///
/// The distance matrix and the [`EvaluationContext`] exist only inside
/// [`SolveJob::run`]; nothing from one job is visible to another.
#[derive(Debug, Clone)]
pub struct SolveJob {
    instance: ProblemInstance,
    vehicle_penalty: i64,
    status: SolveStatus,
}

impl SolveJob {
    /// A job in the [`SolveStatus::Unsolved`] state.
    #[must_use]
    pub const fn new(instance: ProblemInstance) -> Self {
        Self {
            instance,
            vehicle_penalty: DEFAULT_VEHICLE_PENALTY,
            status: SolveStatus::Unsolved,
        }
    }

    /// Override the per-vehicle soft penalty.
    #[must_use]
    pub const fn with_vehicle_penalty(mut self, vehicle_penalty: i64) -> Self {
        self.vehicle_penalty = vehicle_penalty;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> SolveStatus {
        self.status
    }

    /// The instance being solved.
    #[must_use]
    pub const fn instance(&self) -> &ProblemInstance {
        &self.instance
    }

    /// Build the matrix, run the solver and project the result.
    ///
    /// The job ends in [`SolveStatus::Solved`] or [`SolveStatus::Failed`].
    ///
    /// # Errors
    /// Returns [`PlanError::Matrix`] if the matrix cannot be built,
    /// [`PlanError::Solver`] if the solver fails,
    /// [`PlanError::DuplicateAssignment`] if the solver returns a customer more
    /// than once, and [`PlanError::Objective`] if scoring hits an inconsistency.
    pub fn run<P, S>(
        &mut self,
        builder: &DistanceMatrixBuilder<P>,
        solver: &S,
    ) -> Result<PlannedRoutes, PlanError>
    where
        P: DistanceProvider,
        S: Solver + ?Sized,
    {
        self.status = SolveStatus::Solving;
        let result = self.execute(builder, solver);
        self.status = if result.is_ok() {
            SolveStatus::Solved
        } else {
            SolveStatus::Failed
        };
        if let Err(err) = &result {
            warn!("solve failed: {err}");
        }
        result
    }

    fn execute<P, S>(
        &self,
        builder: &DistanceMatrixBuilder<P>,
        solver: &S,
    ) -> Result<PlannedRoutes, PlanError>
    where
        P: DistanceProvider,
        S: Solver + ?Sized,
    {
        let instance = &self.instance;
        info!(
            "starting solve for {} customers with {} vehicles",
            instance.customers().len(),
            instance.vehicles().len()
        );
        let matrix = builder.build(&instance.locations())?;
        let model = ObjectiveModel::new(EvaluationContext::new(instance, &matrix))
            .with_vehicle_penalty(self.vehicle_penalty);

        let outcome = solver.solve(&model, RouteAssignment::empty(instance.vehicles()))?;
        let duplicates = outcome.assignment.duplicate_customers();
        if !duplicates.is_empty() {
            return Err(PlanError::DuplicateAssignment {
                customers: duplicates,
            });
        }
        let unassigned = instance
            .customers()
            .len()
            .saturating_sub(outcome.assignment.assigned_count());
        if unassigned > 0 {
            warn!("{unassigned} customers were left unassigned by the solver");
        }

        let score = model.score(&outcome.assignment)?;
        if score != outcome.score {
            warn!(
                "solver reported score {} but the assignment scores {score}",
                outcome.score
            );
        }
        let summary = PlanSummary::project(&model, instance, &outcome.assignment, score)?;
        info!(
            "solve complete: score {score}, {} m over {} routes",
            summary.total_distance,
            summary.routes.len()
        );
        Ok(PlannedRoutes {
            assignment: outcome.assignment,
            score,
            summary,
        })
    }
}
