//! The linear programming core: continuous models over `f64` variables, solved with the
//! two-phase simplex method, and integer models solved by branch-and-bound on top of it.
//!
//! This engine is independent of the finite-domain engine; it has its own variable identifiers
//! and its own model type:
//! ```
//! # use butternut_solver::lp::LinearProgram;
//! # use butternut_solver::constraints::Relation;
//! # use butternut_solver::results::SolveStatus;
//! let mut program = LinearProgram::default();
//! let x = program.new_variable(0.0, 1.0, "x");
//! let y = program.new_variable(0.0, 2.0, "y");
//!
//! program.add_constraint(vec![(1.0, x), (1.0, y)], Relation::LessOrEqual, 2.0)?;
//! program.maximise(vec![(3.0, x), (1.0, y)])?;
//!
//! let result = program.solve();
//! assert_eq!(result.status, SolveStatus::Optimal);
//!
//! let objective = result.objective_value.expect("an objective is set");
//! assert!((objective - 4.0).abs() < 1e-6);
//! # Ok::<(), butternut_solver::ModelError>(())
//! ```

pub(crate) mod branch_and_bound;
pub(crate) mod simplex;

use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Instant;

use log::debug;

use crate::basic_types::ModelError;
use crate::butternut_assert_simple;
use crate::constraints::Relation;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::lp::simplex::LpRow;
use crate::lp::simplex::SimplexOutcome;
use crate::lp::simplex::StandardLp;
use crate::optimisation::OptimisationDirection;
use crate::results::SolveStatus;
use crate::statistics::LpStatistics;

/// The identifier of a variable in a [`LinearProgram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    id: u32,
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "y{}", self.id)
    }
}

impl StorageKey for ColumnId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ColumnId { id: index as u32 }
    }
}

#[derive(Clone, Debug)]
struct Column {
    lower_bound: f64,
    /// May be `f64::INFINITY` for a variable without an upper bound.
    upper_bound: f64,
    name: String,
}

#[derive(Clone, Debug)]
struct RowConstraint {
    terms: Vec<(f64, ColumnId)>,
    relation: Relation,
    constant: f64,
}

/// A linear model over continuous variables: bounded `f64` variables, linear rows over them,
/// and optionally a linear objective.
#[derive(Clone, Debug, Default)]
pub struct LinearProgram {
    columns: KeyedVec<ColumnId, Column>,
    rows: Vec<RowConstraint>,
    objective: Option<(OptimisationDirection, Vec<(f64, ColumnId)>)>,
}

/// The values of the variables at the point the solver reports.
#[derive(Clone, Debug)]
pub struct LpSolution {
    values: Vec<f64>,
}

impl LpSolution {
    /// The value of `column` in the reported point.
    pub fn value(&self, column: ColumnId) -> f64 {
        self.values[column.index()]
    }
}

/// The result of solving a [`LinearProgram`].
#[derive(Clone, Debug)]
pub struct LpResult {
    pub status: SolveStatus,
    /// The optimal point, when one was found.
    pub solution: Option<LpSolution>,
    /// The objective value of `solution`, when the program has an objective.
    pub objective_value: Option<f64>,
    pub statistics: LpStatistics,
}

impl LinearProgram {
    pub fn new() -> Self {
        LinearProgram::default()
    }

    /// Create a new variable with the domain `[lower_bound, upper_bound]`.
    ///
    /// The lower bound must be finite; the upper bound may be `f64::INFINITY`.
    pub fn new_variable(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        name: impl Into<String>,
    ) -> ColumnId {
        butternut_assert_simple!(
            lower_bound.is_finite(),
            "a variable must have a finite lower bound"
        );
        butternut_assert_simple!(
            lower_bound <= upper_bound,
            "a variable must have a non-empty domain"
        );

        self.columns.push(Column {
            lower_bound,
            upper_bound,
            name: name.into(),
        })
    }

    /// The number of variables in the program.
    pub fn num_variables(&self) -> usize {
        self.columns.len()
    }

    /// The name given to `column` when it was created.
    pub fn variable_name(&self, column: ColumnId) -> &str {
        &self.columns[column].name
    }

    /// Add the row `\sum terms (relation) constant`.
    ///
    /// Fails with [`ModelError::UnsupportedRelation`] for the `!=` relation, which a linear
    /// program cannot express.
    pub fn add_constraint(
        &mut self,
        terms: Vec<(f64, ColumnId)>,
        relation: Relation,
        constant: f64,
    ) -> Result<(), ModelError> {
        if relation == Relation::NotEqual {
            return Err(ModelError::UnsupportedRelation(relation));
        }
        self.validate(&terms)?;

        self.rows.push(RowConstraint {
            terms,
            relation,
            constant,
        });

        Ok(())
    }

    /// Add the two-sided row `lower <= \sum terms <= upper`.
    pub fn add_range_constraint(
        &mut self,
        terms: Vec<(f64, ColumnId)>,
        lower: f64,
        upper: f64,
    ) -> Result<(), ModelError> {
        self.add_constraint(terms.clone(), Relation::GreaterOrEqual, lower)?;
        self.add_constraint(terms, Relation::LessOrEqual, upper)
    }

    /// Set the objective to maximising `\sum terms`. Replaces any previous objective.
    pub fn maximise(&mut self, terms: Vec<(f64, ColumnId)>) -> Result<(), ModelError> {
        self.validate(&terms)?;
        self.objective = Some((OptimisationDirection::Maximise, terms));

        Ok(())
    }

    /// Set the objective to minimising `\sum terms`. Replaces any previous objective.
    pub fn minimise(&mut self, terms: Vec<(f64, ColumnId)>) -> Result<(), ModelError> {
        self.validate(&terms)?;
        self.objective = Some((OptimisationDirection::Minimise, terms));

        Ok(())
    }

    fn validate(&self, terms: &[(f64, ColumnId)]) -> Result<(), ModelError> {
        for &(_, column) in terms {
            if column.index() >= self.columns.len() {
                return Err(ModelError::UnknownVariable(column.index()));
            }
        }

        Ok(())
    }

    /// Solve the continuous relaxation of the program.
    pub fn solve(&self) -> LpResult {
        let start = Instant::now();
        let mut statistics = LpStatistics {
            num_nodes: 1,
            ..Default::default()
        };

        let lower = self.lower_bounds();
        let upper = self.upper_bounds();
        let standard = self.standardise(&lower, &upper);

        debug!(
            "solving linear program with {} columns and {} rows",
            standard.num_structural,
            standard.rows.len()
        );

        let outcome = simplex::solve(&standard, &mut statistics.num_pivots);

        let (status, solution, objective_value) = match outcome {
            SimplexOutcome::Optimal { values, objective } => {
                let point = self.unshift(&values, &lower);
                let status = if self.objective.is_some() {
                    SolveStatus::Optimal
                } else {
                    SolveStatus::Feasible
                };
                let objective_value = self
                    .objective
                    .as_ref()
                    .map(|(direction, _)| self.true_objective(*direction, objective, &lower));

                (status, Some(LpSolution { values: point }), objective_value)
            }
            SimplexOutcome::Infeasible => (SolveStatus::Infeasible, None, None),
            SimplexOutcome::Unbounded => (SolveStatus::Unbounded, None, None),
        };

        statistics.time_spent = start.elapsed();
        statistics.log();

        LpResult {
            status,
            solution,
            objective_value,
            statistics,
        }
    }

    /// Solve the program with every variable restricted to integer values.
    pub fn solve_integer(&self) -> LpResult {
        branch_and_bound::solve(self)
    }

    fn lower_bounds(&self) -> Vec<f64> {
        self.columns.iter().map(|column| column.lower_bound).collect()
    }

    fn upper_bounds(&self) -> Vec<f64> {
        self.columns.iter().map(|column| column.upper_bound).collect()
    }

    /// Bring the program into the non-negative standard form the tableau accepts under the
    /// given bounds: substitute `x_j = lower_j + y_j`, and turn finite upper bounds into rows.
    ///
    /// The returned objective is in maximisation form; minimisation negates the costs.
    pub(crate) fn standardise(&self, lower: &[f64], upper: &[f64]) -> StandardLp {
        let num_structural = self.columns.len();
        let mut rows = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let mut coefficients = vec![0.0; num_structural];
            let mut shift = 0.0;
            for &(coefficient, column) in &row.terms {
                coefficients[column.index()] += coefficient;
                shift += coefficient * lower[column.index()];
            }

            rows.push(LpRow {
                coefficients,
                relation: row.relation,
                rhs: row.constant - shift,
            });
        }

        for (index, (&low, &high)) in lower.iter().zip(upper.iter()).enumerate() {
            if high.is_finite() {
                let mut coefficients = vec![0.0; num_structural];
                coefficients[index] = 1.0;
                rows.push(LpRow {
                    coefficients,
                    relation: Relation::LessOrEqual,
                    rhs: high - low,
                });
            }
        }

        StandardLp {
            num_structural,
            rows,
            objective: self.signed_costs(),
        }
    }

    /// The objective costs in maximisation form, one per column.
    pub(crate) fn signed_costs(&self) -> Vec<f64> {
        let mut costs = vec![0.0; self.columns.len()];

        if let Some((direction, terms)) = &self.objective {
            let sign = match direction {
                OptimisationDirection::Maximise => 1.0,
                OptimisationDirection::Minimise => -1.0,
            };
            for &(coefficient, column) in terms {
                costs[column.index()] += sign * coefficient;
            }
        }

        costs
    }

    /// Translate the shifted simplex point back to the original variable space.
    pub(crate) fn unshift(&self, values: &[f64], lower: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(lower.iter())
            .map(|(&value, &low)| low + value)
            .collect()
    }

    /// The objective value in the user's direction, given the simplex maximum over the shifted
    /// variables.
    pub(crate) fn true_objective(
        &self,
        direction: OptimisationDirection,
        simplex_objective: f64,
        lower: &[f64],
    ) -> f64 {
        let signed_offset: f64 = self
            .signed_costs()
            .iter()
            .zip(lower.iter())
            .map(|(&cost, &low)| cost * low)
            .sum();
        let signed_value = simplex_objective + signed_offset;

        match direction {
            OptimisationDirection::Maximise => signed_value,
            OptimisationDirection::Minimise => -signed_value,
        }
    }

    pub(crate) fn direction(&self) -> Option<OptimisationDirection> {
        self.objective.as_ref().map(|(direction, _)| *direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disequality_rows_are_rejected() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, 1.0, "x");

        assert_eq!(
            program.add_constraint(vec![(1.0, x)], Relation::NotEqual, 0.5),
            Err(ModelError::UnsupportedRelation(Relation::NotEqual))
        );
    }

    #[test]
    fn a_row_over_a_foreign_column_is_rejected() {
        let mut donor = LinearProgram::new();
        let mut program = LinearProgram::new();
        let _ = donor.new_variable(0.0, 1.0, "a");
        let foreign = donor.new_variable(0.0, 1.0, "b");
        let _ = program.new_variable(0.0, 1.0, "x");

        assert_eq!(
            program.add_constraint(vec![(1.0, foreign)], Relation::LessOrEqual, 1.0),
            Err(ModelError::UnknownVariable(1))
        );
    }

    #[test]
    fn minimisation_reports_the_value_in_the_requested_direction() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(2.0, 10.0, "x");

        program
            .minimise(vec![(3.0, x)])
            .expect("x is registered in the program");

        let result = program.solve();

        assert_eq!(result.status, SolveStatus::Optimal);
        let objective = result.objective_value.expect("an objective is set");
        assert!((objective - 6.0).abs() < 1e-6);
    }

    #[test]
    fn a_program_without_an_objective_reports_a_feasible_point() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, 5.0, "x");

        program
            .add_constraint(vec![(1.0, x)], Relation::GreaterOrEqual, 3.0)
            .expect("x is registered in the program");

        let result = program.solve();

        assert_eq!(result.status, SolveStatus::Feasible);
        assert!(result.objective_value.is_none());
        let solution = result.solution.expect("the program is feasible");
        assert!(solution.value(x) >= 3.0 - 1e-6);
    }
}
