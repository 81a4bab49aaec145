//! Pull-based enumeration of solutions.

use crate::basic_types::Solution;
use crate::branching::InOrderMinValueBrancher;
use crate::engine::SearchEngine;
use crate::engine::SearchOutcome;
use crate::termination::Combinator;
use crate::termination::NodeBudget;
use crate::termination::TimeBudget;

/// An iterator-like handle which produces the solutions of a model one at a time.
///
/// Created by [`Model::solution_iterator`](crate::Model::solution_iterator). Each call to
/// [`next_solution`](SolutionIterator::next_solution) resumes the underlying search; the search
/// state is kept between calls, so every solution is produced exactly once.
#[derive(Debug)]
pub struct SolutionIterator {
    engine: SearchEngine,
    brancher: InOrderMinValueBrancher,
    termination: Combinator<Option<TimeBudget>, Option<NodeBudget>>,
    any_solution_found: bool,
}

/// One step of a [`SolutionIterator`].
#[derive(Debug)]
pub enum IteratedSolution {
    /// The next solution.
    Solution(Solution),
    /// No more solutions exist; at least one was produced earlier.
    Finished,
    /// The model has no solutions at all.
    Unsatisfiable,
    /// The termination condition triggered; calling again may still produce solutions.
    Unknown,
}

impl SolutionIterator {
    pub(crate) fn new(
        engine: SearchEngine,
        termination: Combinator<Option<TimeBudget>, Option<NodeBudget>>,
    ) -> Self {
        SolutionIterator {
            engine,
            brancher: InOrderMinValueBrancher,
            termination,
            any_solution_found: false,
        }
    }

    /// Resume the search and produce the next solution, if one exists.
    pub fn next_solution(&mut self) -> IteratedSolution {
        match self
            .engine
            .next_solution(&mut self.brancher, &mut self.termination)
        {
            SearchOutcome::Solution => {
                self.any_solution_found = true;
                IteratedSolution::Solution(self.engine.solution())
            }
            SearchOutcome::Exhausted if self.any_solution_found => IteratedSolution::Finished,
            SearchOutcome::Exhausted => IteratedSolution::Unsatisfiable,
            SearchOutcome::Terminated => IteratedSolution::Unknown,
        }
    }
}
