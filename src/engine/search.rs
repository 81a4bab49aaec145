use log::debug;

use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::butternut_assert_simple;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;
use crate::propagators::propagate_to_fixpoint;
use crate::propagators::Propagator;
use crate::statistics::SolverStatistics;
use crate::termination::TerminationCondition;

/// A point in the search tree at which a decision was taken and to which the engine can return.
///
/// On backtracking the trail is restored to `checkpoint` and `value` is removed from the domain
/// of `variable`, so that the subtree below the decision is never revisited.
#[derive(Clone, Copy, Debug)]
struct ChoicePoint {
    checkpoint: usize,
    variable: VariableId,
    value: i32,
}

/// The result of resuming the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// All variables are assigned and every propagator accepts the assignment. The assignment can
    /// be read through [`SearchEngine::solution`].
    Solution,
    /// The search tree is exhausted; no (further) solution exists.
    Exhausted,
    /// The termination condition triggered. The search can still be resumed.
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchState {
    Ready,
    AtSolution,
    Exhausted,
}

/// Depth-first search over the domain store with chronological backtracking.
///
/// The search maintains an explicit stack of [`ChoicePoint`]s rather than recursing, so depth is
/// bounded by the number of variables and not by the call stack. The engine is resumable: after
/// [`SearchOutcome::Solution`] a subsequent call to [`SearchEngine::next_solution`] backtracks
/// and continues as if the solution node had been a failure, which enumerates every solution
/// exactly once.
#[derive(Clone, Debug)]
pub(crate) struct SearchEngine {
    assignments: Assignments,
    propagators: Vec<Propagator>,
    choice_points: Vec<ChoicePoint>,
    state: SearchState,
    statistics: SolverStatistics,
}

impl SearchEngine {
    pub(crate) fn new(assignments: Assignments, propagators: Vec<Propagator>) -> Self {
        SearchEngine {
            assignments,
            propagators,
            choice_points: Vec::default(),
            state: SearchState::Ready,
            statistics: SolverStatistics::default(),
        }
    }

    /// Resume the search until the next solution, exhaustion, or termination.
    ///
    /// The termination condition is polled once per search node. When it triggers, the engine
    /// stays at the current node and the call can be repeated later to continue the search.
    pub(crate) fn next_solution(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> SearchOutcome {
        match self.state {
            SearchState::Exhausted => return SearchOutcome::Exhausted,
            SearchState::AtSolution => {
                // Enumeration: leave the solution node as if propagation had failed there.
                if !self.backtrack() {
                    self.state = SearchState::Exhausted;
                    return SearchOutcome::Exhausted;
                }
                self.state = SearchState::Ready;
            }
            SearchState::Ready => {}
        }

        loop {
            if termination.should_stop() {
                debug!(
                    "search interrupted at depth {} after {} decisions",
                    self.choice_points.len(),
                    self.statistics.num_decisions
                );
                return SearchOutcome::Terminated;
            }

            let status = propagate_to_fixpoint(
                &self.propagators,
                &mut self.assignments,
                &mut self.statistics.num_propagations,
            );

            if status.is_err() {
                self.statistics.num_failures += 1;
                if !self.backtrack() {
                    self.state = SearchState::Exhausted;
                    return SearchOutcome::Exhausted;
                }
                continue;
            }

            let context = SelectionContext::new(&self.assignments);
            let Some(decision) = brancher.next_decision(&context) else {
                butternut_assert_simple!(
                    self.assignments.all_assigned(),
                    "a brancher may only return no decision when all variables are assigned"
                );
                self.statistics.num_solutions += 1;
                self.state = SearchState::AtSolution;
                return SearchOutcome::Solution;
            };

            self.statistics.num_decisions += 1;
            let checkpoint = self.assignments.new_checkpoint();
            self.choice_points.push(ChoicePoint {
                checkpoint,
                variable: decision.variable,
                value: decision.value,
            });

            if self.assignments.assign(decision.variable, decision.value).is_err() {
                // The brancher proposed a value outside the domain; treat it as a failure.
                self.statistics.num_failures += 1;
                if !self.backtrack() {
                    self.state = SearchState::Exhausted;
                    return SearchOutcome::Exhausted;
                }
            }
        }
    }

    /// Undo the most recent decision and exclude the value it tried. Keeps unwinding while the
    /// exclusion itself empties a domain. Returns false once no decision is left to undo, i.e.
    /// the search tree is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(ChoicePoint {
            checkpoint,
            variable,
            value,
        }) = self.choice_points.pop()
        {
            self.assignments.backtrack_to(checkpoint);

            // The exclusion is recorded in the parent scope of the trail, so it persists for the
            // remainder of the parent's subtree.
            if self.assignments.remove_value(variable, value).is_ok() {
                return true;
            }
        }

        false
    }

    /// The assignment of the solution node the engine is at.
    ///
    /// Must only be called directly after [`SearchEngine::next_solution`] returned
    /// [`SearchOutcome::Solution`].
    pub(crate) fn solution(&self) -> Solution {
        butternut_assert_simple!(self.state == SearchState::AtSolution);

        Solution::new(self.assignments.snapshot())
    }

    pub(crate) fn statistics(&self) -> SolverStatistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::InOrderMinValueBrancher;
    use crate::constraints::Relation;
    use crate::propagators::LinearRelationPropagator;
    use crate::termination::Indefinite;
    use crate::termination::NodeBudget;

    fn all_solutions(mut engine: SearchEngine) -> Vec<Solution> {
        let mut brancher = InOrderMinValueBrancher;
        let mut solutions = Vec::new();

        while engine.next_solution(&mut brancher, &mut Indefinite) == SearchOutcome::Solution {
            solutions.push(engine.solution());
        }

        solutions
    }

    #[test]
    fn an_unconstrained_variable_enumerates_its_domain() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 5);

        let engine = SearchEngine::new(assignments, Vec::new());
        let solutions = all_solutions(engine);

        let values = solutions
            .iter()
            .map(|solution| solution.value(x))
            .collect::<Vec<_>>();
        assert_eq!(values, vec![2, 3, 4, 5]);
    }

    #[test]
    fn a_binary_disequality_excludes_the_diagonal() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 2);
        let y = assignments.grow(0, 2);

        let propagators = vec![Propagator::LinearRelation(LinearRelationPropagator::new(
            [(1, x), (-1, y)].into(),
            Relation::NotEqual,
            0,
        ))];

        let engine = SearchEngine::new(assignments, propagators);
        let solutions = all_solutions(engine);

        assert_eq!(solutions.len(), 6);
        assert!(solutions
            .iter()
            .all(|solution| solution.value(x) != solution.value(y)));
    }

    #[test]
    fn an_infeasible_model_is_exhausted_without_solutions() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 3);

        // x <= -1 conflicts with the domain at the root.
        let propagators = vec![Propagator::LinearRelation(LinearRelationPropagator::new(
            [(1, x)].into(),
            Relation::LessOrEqual,
            -1,
        ))];

        let mut engine = SearchEngine::new(assignments, propagators);
        let mut brancher = InOrderMinValueBrancher;

        assert_eq!(
            engine.next_solution(&mut brancher, &mut Indefinite),
            SearchOutcome::Exhausted
        );
        // Exhaustion is sticky.
        assert_eq!(
            engine.next_solution(&mut brancher, &mut Indefinite),
            SearchOutcome::Exhausted
        );
    }

    #[test]
    fn a_terminated_search_can_be_resumed() {
        let mut assignments = Assignments::default();
        let _ = assignments.grow(0, 9);
        let _ = assignments.grow(0, 9);

        let mut engine = SearchEngine::new(assignments, Vec::new());
        let mut brancher = InOrderMinValueBrancher;

        assert_eq!(
            engine.next_solution(&mut brancher, &mut NodeBudget::with_budget(0)),
            SearchOutcome::Terminated
        );
        assert_eq!(
            engine.next_solution(&mut brancher, &mut Indefinite),
            SearchOutcome::Solution
        );
    }

    #[test]
    fn statistics_count_solutions_and_decisions() {
        let mut assignments = Assignments::default();
        let _ = assignments.grow(0, 1);

        let engine = SearchEngine::new(assignments, Vec::new());

        let mut brancher = InOrderMinValueBrancher;
        let mut engine = engine;
        let _ = engine.next_solution(&mut brancher, &mut Indefinite);
        let _ = engine.next_solution(&mut brancher, &mut Indefinite);
        let _ = engine.next_solution(&mut brancher, &mut Indefinite);

        let statistics = engine.statistics();
        assert_eq!(statistics.num_solutions, 2);
        assert!(statistics.num_decisions >= 1);
    }
}
