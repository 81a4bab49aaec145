//! Branch-and-bound optimisation on top of the satisfaction engine.
//!
//! The solver-side loop is solution-guided bound tightening: whenever a solution is found, a
//! constraint is added which forces the objective to strictly improve on it, and the search is
//! restarted. Once the strengthened problem is exhausted, the last solution found is optimal.

use log::info;

use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;
use crate::engine::SearchEngine;
use crate::engine::SearchOutcome;
use crate::propagators::LinearRelationPropagator;
use crate::propagators::Propagator;
use crate::statistics::SolverStatistics;
use crate::constraints::Relation;
use crate::termination::TerminationCondition;

/// The direction of optimisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimisationDirection {
    Maximise,
    Minimise,
}

/// The outcome of the optimisation loop.
#[derive(Debug)]
pub(crate) struct OptimisationOutcome {
    /// The best solution found and its objective value, if any solution was found.
    pub(crate) best: Option<(Solution, i64)>,
    /// Whether the search ran to completion. When true, `best` is optimal (or `None` proves
    /// infeasibility); when false, the termination condition cut the search short.
    pub(crate) complete: bool,
    pub(crate) statistics: SolverStatistics,
}

/// Evaluate the objective `\sum coefficient_i * variable_i` under `solution`.
pub(crate) fn evaluate_objective(terms: &[(i32, VariableId)], solution: &Solution) -> i64 {
    terms
        .iter()
        .map(|&(coefficient, variable)| coefficient as i64 * solution.value(variable) as i64)
        .sum()
}

/// Run the bound-tightening loop until the improving problem is exhausted or termination
/// triggers.
pub(crate) fn optimise(
    assignments: &Assignments,
    propagators: &[Propagator],
    objective: &[(i32, VariableId)],
    direction: OptimisationDirection,
    brancher: &mut impl Brancher,
    termination: &mut impl TerminationCondition,
) -> OptimisationOutcome {
    let mut best: Option<(Solution, i64)> = None;
    let mut statistics = SolverStatistics::default();

    loop {
        let mut propagators = propagators.to_vec();

        if let Some((_, incumbent)) = best {
            let Some(improvement) = improving_constraint(objective, direction, incumbent) else {
                // The incumbent saturates the representable objective range; nothing can
                // strictly improve on it.
                return OptimisationOutcome {
                    best,
                    complete: true,
                    statistics,
                };
            };
            propagators.push(improvement);
        }

        let mut engine = SearchEngine::new(assignments.clone(), propagators);
        let outcome = engine.next_solution(brancher, termination);
        statistics.absorb(engine.statistics());

        match outcome {
            SearchOutcome::Solution => {
                let solution = engine.solution();
                let value = evaluate_objective(objective, &solution);
                info!("improved objective value: {value}");
                best = Some((solution, value));
            }
            SearchOutcome::Exhausted => {
                return OptimisationOutcome {
                    best,
                    complete: true,
                    statistics,
                };
            }
            SearchOutcome::Terminated => {
                return OptimisationOutcome {
                    best,
                    complete: false,
                    statistics,
                };
            }
        }
    }
}

/// The constraint that the objective strictly improves on `incumbent`, or `None` when the
/// strictly improving bound does not fit an `i32`.
fn improving_constraint(
    objective: &[(i32, VariableId)],
    direction: OptimisationDirection,
    incumbent: i64,
) -> Option<Propagator> {
    let (relation, bound) = match direction {
        OptimisationDirection::Maximise => (Relation::GreaterOrEqual, incumbent.checked_add(1)?),
        OptimisationDirection::Minimise => (Relation::LessOrEqual, incumbent.checked_sub(1)?),
    };
    let constant = i32::try_from(bound).ok()?;

    Some(Propagator::LinearRelation(LinearRelationPropagator::new(
        objective.to_vec().into(),
        relation,
        constant,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::InOrderMinValueBrancher;
    use crate::termination::Indefinite;

    #[test]
    fn the_maximum_of_a_bounded_variable_is_its_upper_bound() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 7);

        let outcome = optimise(
            &assignments,
            &[],
            &[(1, x)],
            OptimisationDirection::Maximise,
            &mut InOrderMinValueBrancher,
            &mut Indefinite,
        );

        assert!(outcome.complete);
        let (solution, value) = outcome.best.expect("the problem is feasible");
        assert_eq!(value, 7);
        assert_eq!(solution.value(x), 7);
    }

    #[test]
    fn minimisation_respects_the_constraints() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);
        let y = assignments.grow(0, 10);

        // x + y >= 6, minimise 2x + y.
        let propagators = vec![Propagator::LinearRelation(LinearRelationPropagator::new(
            [(1, x), (1, y)].into(),
            Relation::GreaterOrEqual,
            6,
        ))];

        let outcome = optimise(
            &assignments,
            &propagators,
            &[(2, x), (1, y)],
            OptimisationDirection::Minimise,
            &mut InOrderMinValueBrancher,
            &mut Indefinite,
        );

        assert!(outcome.complete);
        let (_, value) = outcome.best.expect("the problem is feasible");
        assert_eq!(value, 6);
    }

    #[test]
    fn an_infeasible_problem_completes_without_a_solution() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 3);

        let propagators = vec![Propagator::LinearRelation(LinearRelationPropagator::new(
            [(1, x)].into(),
            Relation::GreaterOrEqual,
            4,
        ))];

        let outcome = optimise(
            &assignments,
            &propagators,
            &[(1, x)],
            OptimisationDirection::Maximise,
            &mut InOrderMinValueBrancher,
            &mut Indefinite,
        );

        assert!(outcome.complete);
        assert!(outcome.best.is_none());
    }
}
