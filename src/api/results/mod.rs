//! The outputs of a solve call.

mod solution_iterator;

pub use solution_iterator::IteratedSolution;
pub use solution_iterator::SolutionIterator;

pub use crate::basic_types::Solution;
use crate::statistics::SolverStatistics;

/// The conclusion the solver reached about a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search ran to completion; the reported solution is optimal (or, for an enumeration,
    /// all solutions have been reported).
    Optimal,
    /// A solution was found, but the search did not prove it optimal.
    Feasible,
    /// The search ran to completion without finding any solution.
    Infeasible,
    /// The objective can be improved without bound; no finite optimum exists.
    Unbounded,
    /// The search was cut short by its termination condition before reaching a conclusion.
    Unknown,
}

/// The result of solving a [`Model`](crate::Model).
#[derive(Clone, Debug)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// The best solution found, if any. For [`SolveStatus::Unknown`] this is the incumbent at
    /// the point the search was interrupted.
    pub solution: Option<Solution>,
    /// The objective value of `solution`, when the model has an objective.
    pub objective_value: Option<i64>,
    pub statistics: SolverStatistics,
}

/// Returned by a solution callback to indicate whether enumeration should continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackDecision {
    Continue,
    Stop,
}
