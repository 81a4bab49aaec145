use std::time::Duration;
use std::time::Instant;

use log::debug;

use crate::basic_types::ModelError;
use crate::branching::InOrderMinValueBrancher;
use crate::butternut_assert_simple;
use crate::constraints::normalise_terms;
use crate::constraints::Constraint;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;
use crate::engine::SearchEngine;
use crate::engine::SearchOutcome;
use crate::optimisation;
use crate::optimisation::OptimisationDirection;
use crate::propagators::AllDifferentPropagator;
use crate::propagators::LinearRelationPropagator;
use crate::propagators::Propagator;
use crate::results::CallbackDecision;
use crate::results::Solution;
use crate::results::SolutionIterator;
use crate::results::SolveResult;
use crate::results::SolveStatus;
use crate::termination::Combinator;
use crate::termination::NodeBudget;
use crate::termination::TimeBudget;

/// Budgets which bound a single solve call.
///
/// The default options impose no budget; the solver runs to completion. When a budget is
/// exhausted mid-search the solve returns [`SolveStatus::Unknown`] together with the best
/// solution found up to that point.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    /// Wall-time budget for the solve call.
    pub time_budget: Option<Duration>,
    /// Budget on the number of search nodes explored.
    pub node_budget: Option<u64>,
}

impl SolveOptions {
    /// The termination condition the budgets describe. The time budget starts counting from
    /// this call.
    fn termination(&self) -> Combinator<Option<TimeBudget>, Option<NodeBudget>> {
        Combinator::new(
            self.time_budget.map(TimeBudget::starting_now),
            self.node_budget.map(NodeBudget::with_budget),
        )
    }
}

/// A finite-domain constraint model: integer variables, constraints over them, and optionally a
/// linear objective.
///
/// The model is the entry point of the constraint satisfaction engine:
/// ```
/// # use butternut_solver::{constraints, Model, SolveOptions};
/// # use butternut_solver::results::SolveStatus;
/// let mut model = Model::default();
/// let x = model.new_variable(0, 9, "x");
/// let y = model.new_variable(0, 9, "y");
///
/// model.add_constraint(constraints::equals(vec![(1, x), (1, y)], 9))?;
/// model.maximise(vec![(1, x), (2, y)])?;
///
/// let result = model.solve(&SolveOptions::default());
/// assert_eq!(result.status, SolveStatus::Optimal);
/// assert_eq!(result.objective_value, Some(18));
/// # Ok::<(), butternut_solver::ModelError>(())
/// ```
#[derive(Debug, Default)]
pub struct Model {
    assignments: Assignments,
    names: KeyedVec<VariableId, String>,
    constraints: Vec<Constraint>,
    objective: Option<(OptimisationDirection, Vec<(i32, VariableId)>)>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`.
    ///
    /// The name is only used for reporting; it does not have to be unique.
    pub fn new_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> VariableId {
        butternut_assert_simple!(
            lower_bound <= upper_bound,
            "a variable must have at least one domain value"
        );

        let variable = self.assignments.grow(lower_bound, upper_bound);
        let _ = self.names.push(name.into());

        variable
    }

    /// The name given to `variable` when it was created.
    pub fn variable_name(&self, variable: VariableId) -> &str {
        &self.names[variable]
    }

    /// The number of variables in the model.
    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    /// Add a constraint to the model.
    ///
    /// Fails with [`ModelError::UnknownVariable`] if the constraint mentions a variable which
    /// was not created through [`Model::new_variable`].
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        self.validate(constraint.variables())?;
        self.constraints.push(constraint);

        Ok(())
    }

    /// Set the objective to maximising `\sum coefficient_i * variable_i`.
    ///
    /// Replaces any previously set objective.
    pub fn maximise(&mut self, terms: Vec<(i32, VariableId)>) -> Result<(), ModelError> {
        self.set_objective(OptimisationDirection::Maximise, terms)
    }

    /// Set the objective to minimising `\sum coefficient_i * variable_i`.
    ///
    /// Replaces any previously set objective.
    pub fn minimise(&mut self, terms: Vec<(i32, VariableId)>) -> Result<(), ModelError> {
        self.set_objective(OptimisationDirection::Minimise, terms)
    }

    fn set_objective(
        &mut self,
        direction: OptimisationDirection,
        terms: Vec<(i32, VariableId)>,
    ) -> Result<(), ModelError> {
        self.validate(terms.iter().map(|&(_, variable)| variable))?;
        self.objective = Some((direction, normalise_terms(terms)));

        Ok(())
    }

    fn validate(&self, variables: impl Iterator<Item = VariableId>) -> Result<(), ModelError> {
        for variable in variables {
            if variable.index() >= self.assignments.num_variables() {
                return Err(ModelError::UnknownVariable(variable.index()));
            }
        }

        Ok(())
    }

    /// Solve the model.
    ///
    /// Without an objective this searches for a single solution and reports
    /// [`SolveStatus::Feasible`]; with an objective it searches for the optimum. A model proven
    /// to have no solution reports [`SolveStatus::Infeasible`].
    pub fn solve(&self, options: &SolveOptions) -> SolveResult {
        let start = Instant::now();
        let mut termination = options.termination();
        let mut brancher = InOrderMinValueBrancher;

        debug!(
            "solving model with {} variables and {} constraints",
            self.num_variables(),
            self.constraints.len()
        );

        let mut result = match &self.objective {
            Some((direction, terms)) => {
                let outcome = optimisation::optimise(
                    &self.assignments,
                    &self.compile(),
                    terms,
                    *direction,
                    &mut brancher,
                    &mut termination,
                );

                let status = match (&outcome.best, outcome.complete) {
                    (Some(_), true) => SolveStatus::Optimal,
                    (None, true) => SolveStatus::Infeasible,
                    (_, false) => SolveStatus::Unknown,
                };
                let (solution, objective_value) = match outcome.best {
                    Some((solution, value)) => (Some(solution), Some(value)),
                    None => (None, None),
                };

                SolveResult {
                    status,
                    solution,
                    objective_value,
                    statistics: outcome.statistics,
                }
            }
            None => {
                let mut engine = SearchEngine::new(self.assignments.clone(), self.compile());
                let outcome = engine.next_solution(&mut brancher, &mut termination);

                let (status, solution) = match outcome {
                    SearchOutcome::Solution => (SolveStatus::Feasible, Some(engine.solution())),
                    SearchOutcome::Exhausted => (SolveStatus::Infeasible, None),
                    SearchOutcome::Terminated => (SolveStatus::Unknown, None),
                };

                SolveResult {
                    status,
                    solution,
                    objective_value: None,
                    statistics: engine.statistics(),
                }
            }
        };

        result.statistics.time_spent = start.elapsed();
        result.statistics.log();

        result
    }

    /// Enumerate every solution of the model, reporting each to `callback`.
    ///
    /// The objective, if any, is ignored; the enumeration covers all satisfying assignments.
    /// When the enumeration runs to completion the result carries [`SolveStatus::Optimal`] (all
    /// solutions have been reported) or [`SolveStatus::Infeasible`] (there are none). Stopping
    /// early through the callback yields [`SolveStatus::Feasible`].
    pub fn solve_all(
        &self,
        options: &SolveOptions,
        mut callback: impl FnMut(&Solution) -> CallbackDecision,
    ) -> SolveResult {
        let start = Instant::now();
        let mut termination = options.termination();
        let mut brancher = InOrderMinValueBrancher;

        let mut engine = SearchEngine::new(self.assignments.clone(), self.compile());
        let mut last_solution: Option<Solution> = None;

        let status = loop {
            match engine.next_solution(&mut brancher, &mut termination) {
                SearchOutcome::Solution => {
                    let solution = engine.solution();
                    let decision = callback(&solution);
                    last_solution = Some(solution);

                    if decision == CallbackDecision::Stop {
                        break SolveStatus::Feasible;
                    }
                }
                SearchOutcome::Exhausted if last_solution.is_some() => break SolveStatus::Optimal,
                SearchOutcome::Exhausted => break SolveStatus::Infeasible,
                SearchOutcome::Terminated => break SolveStatus::Unknown,
            }
        };

        let mut statistics = engine.statistics();
        statistics.time_spent = start.elapsed();
        statistics.log();

        SolveResult {
            status,
            solution: last_solution,
            objective_value: None,
            statistics,
        }
    }

    /// A pull-based alternative to [`Model::solve_all`]: returns a handle from which solutions
    /// are requested one at a time.
    pub fn solution_iterator(&self, options: &SolveOptions) -> SolutionIterator {
        let engine = SearchEngine::new(self.assignments.clone(), self.compile());

        SolutionIterator::new(engine, options.termination())
    }

    /// Compile the posted constraints into their propagators.
    fn compile(&self) -> Vec<Propagator> {
        self.constraints
            .iter()
            .map(|constraint| match constraint {
                Constraint::LinearRelation {
                    terms,
                    relation,
                    constant,
                } => Propagator::LinearRelation(LinearRelationPropagator::new(
                    terms.clone().into(),
                    *relation,
                    *constant,
                )),
                Constraint::AllDifferent(variables) => Propagator::AllDifferent(
                    AllDifferentPropagator::new(variables.clone().into()),
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;

    #[test]
    fn a_constraint_over_a_foreign_variable_is_rejected() {
        let mut first = Model::new();
        let mut second = Model::new();
        let _ = first.new_variable(0, 1, "x");
        let _ = first.new_variable(0, 1, "y");
        let x = second.new_variable(0, 1, "x");

        // `second` has one variable, so any id past it is unknown to it.
        let foreign = first.new_variable(0, 1, "z");
        let result = second.add_constraint(constraints::binary_not_equals(x, foreign));

        assert_eq!(result, Err(ModelError::UnknownVariable(2)));
    }

    #[test]
    fn solving_without_constraints_reports_feasible() {
        let mut model = Model::new();
        let x = model.new_variable(3, 5, "x");

        let result = model.solve(&SolveOptions::default());

        assert_eq!(result.status, SolveStatus::Feasible);
        assert_eq!(result.solution.expect("feasible").value(x), 3);
    }

    #[test]
    fn an_exhausted_node_budget_reports_unknown() {
        let mut model = Model::new();
        let _ = model.new_variable(0, 9, "x");
        let _ = model.new_variable(0, 9, "y");

        let options = SolveOptions {
            node_budget: Some(0),
            ..Default::default()
        };
        let result = model.solve(&options);

        assert_eq!(result.status, SolveStatus::Unknown);
    }

    #[test]
    fn stopping_the_callback_ends_the_enumeration() {
        let mut model = Model::new();
        let _ = model.new_variable(0, 9, "x");

        let mut num_reported = 0;
        let result = model.solve_all(&SolveOptions::default(), |_| {
            num_reported += 1;
            CallbackDecision::Stop
        });

        assert_eq!(num_reported, 1);
        assert_eq!(result.status, SolveStatus::Feasible);
    }

    #[test]
    fn an_objective_over_a_foreign_variable_is_rejected() {
        let mut donor = Model::new();
        let mut model = Model::new();
        let _ = donor.new_variable(0, 1, "a");
        let foreign = donor.new_variable(0, 1, "b");
        let _ = model.new_variable(0, 1, "x");

        assert_eq!(
            model.maximise(vec![(1, foreign)]),
            Err(ModelError::UnknownVariable(1))
        );
    }
}
