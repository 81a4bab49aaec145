//! Two-phase primal simplex on a dense tableau.

use crate::constraints::Relation;

/// Tolerance below which a reduced cost or pivot element is treated as zero.
const PIVOT_EPS: f64 = 1e-9;
/// Tolerance on the phase-one objective under which the problem is declared feasible.
const FEASIBILITY_EPS: f64 = 1e-7;

/// A linear program in the form the tableau accepts: all variables non-negative, rows over
/// those variables with a relation in `{<=, >=, =}`.
#[derive(Clone, Debug)]
pub(crate) struct StandardLp {
    pub(crate) num_structural: usize,
    pub(crate) rows: Vec<LpRow>,
    /// Maximisation costs, one per structural variable.
    pub(crate) objective: Vec<f64>,
}

#[derive(Clone, Debug)]
pub(crate) struct LpRow {
    /// One coefficient per structural variable.
    pub(crate) coefficients: Vec<f64>,
    pub(crate) relation: Relation,
    pub(crate) rhs: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SimplexOutcome {
    /// The maximum was attained; `values` holds one value per structural variable.
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
}

/// Maximise the objective of `lp` over its rows.
pub(crate) fn solve(lp: &StandardLp, num_pivots: &mut u64) -> SimplexOutcome {
    let mut tableau = Tableau::build(lp);

    // Phase one: maximise minus the sum of the artificial variables. The optimum is zero
    // exactly when the original rows admit a feasible point.
    if tableau.num_artificials() > 0 {
        tableau.install_phase_one_objective();

        // The phase-one objective is bounded above by zero, so the run cannot be unbounded.
        let _ = tableau.run(tableau.num_columns, num_pivots);

        if tableau.objective_value() < -FEASIBILITY_EPS {
            return SimplexOutcome::Infeasible;
        }

        tableau.drive_out_basic_artificials(num_pivots);
    }

    // Phase two: the real objective, with the artificial columns barred from entering.
    tableau.install_objective(&lp.objective);

    match tableau.run(tableau.artificial_start, num_pivots) {
        RunOutcome::Optimal => SimplexOutcome::Optimal {
            values: tableau.structural_values(lp.num_structural),
            objective: tableau.objective_value(),
        },
        RunOutcome::Unbounded => SimplexOutcome::Unbounded,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunOutcome {
    Optimal,
    Unbounded,
}

/// The dense simplex tableau: constraint rows kept in basis-reduced form, together with the
/// reduced-cost row.
///
/// Invariant: every entry of `rhs` is non-negative, so the tableau always represents a basic
/// feasible point. `objective_rhs` is the negation of the current objective value.
#[derive(Clone, Debug)]
struct Tableau {
    /// `num_rows` rows of `num_columns` coefficients.
    matrix: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    /// The basic column of each row.
    basis: Vec<usize>,
    objective_row: Vec<f64>,
    objective_rhs: f64,
    num_columns: usize,
    /// Columns at and beyond this index are artificial.
    artificial_start: usize,
}

impl Tableau {
    /// Lay out the columns as structural, then slack/surplus, then artificial, and put a basic
    /// column in every row.
    fn build(lp: &StandardLp) -> Tableau {
        let num_structural = lp.num_structural;
        let num_slack = lp.rows.len();
        let num_artificials = lp
            .rows
            .iter()
            .filter(|row| Self::needs_artificial(row))
            .count();

        let slack_start = num_structural;
        let artificial_start = slack_start + num_slack;
        let num_columns = artificial_start + num_artificials;

        let mut matrix = Vec::with_capacity(lp.rows.len());
        let mut rhs = Vec::with_capacity(lp.rows.len());
        let mut basis = Vec::with_capacity(lp.rows.len());
        let mut next_artificial = artificial_start;

        for (row_index, row) in lp.rows.iter().enumerate() {
            let mut coefficients = vec![0.0; num_columns];
            coefficients[..num_structural].copy_from_slice(&row.coefficients);
            let mut row_rhs = row.rhs;
            let mut relation = row.relation;

            // Normalise to a non-negative right-hand side.
            if row_rhs < 0.0 {
                for coefficient in coefficients.iter_mut() {
                    *coefficient = -*coefficient;
                }
                row_rhs = -row_rhs;
                relation = match relation {
                    Relation::LessOrEqual => Relation::GreaterOrEqual,
                    Relation::GreaterOrEqual => Relation::LessOrEqual,
                    other => other,
                };
            }

            let basic_column = match relation {
                Relation::LessOrEqual => {
                    coefficients[slack_start + row_index] = 1.0;
                    slack_start + row_index
                }
                Relation::GreaterOrEqual => {
                    coefficients[slack_start + row_index] = -1.0;
                    coefficients[next_artificial] = 1.0;
                    next_artificial += 1;
                    next_artificial - 1
                }
                Relation::Equal => {
                    coefficients[next_artificial] = 1.0;
                    next_artificial += 1;
                    next_artificial - 1
                }
                Relation::NotEqual => {
                    // Rejected before the tableau is built.
                    unreachable!("disequality rows cannot be standardised")
                }
            };

            matrix.push(coefficients);
            rhs.push(row_rhs);
            basis.push(basic_column);
        }

        Tableau {
            matrix,
            rhs,
            basis,
            objective_row: vec![0.0; num_columns],
            objective_rhs: 0.0,
            num_columns,
            artificial_start,
        }
    }

    fn needs_artificial(row: &LpRow) -> bool {
        match row.relation {
            Relation::LessOrEqual => row.rhs < 0.0,
            Relation::GreaterOrEqual => row.rhs >= 0.0,
            Relation::Equal => true,
            Relation::NotEqual => false,
        }
    }

    fn num_artificials(&self) -> usize {
        self.num_columns - self.artificial_start
    }

    fn objective_value(&self) -> f64 {
        -self.objective_rhs
    }

    /// Install the phase-one objective (minus the sum of the artificials), priced out over the
    /// initial basis.
    fn install_phase_one_objective(&mut self) {
        self.objective_row = vec![0.0; self.num_columns];
        self.objective_rhs = 0.0;
        for column in self.artificial_start..self.num_columns {
            self.objective_row[column] = -1.0;
        }

        // The artificials are basic, so their reduced cost must be cancelled to zero.
        for row_index in 0..self.matrix.len() {
            if self.basis[row_index] >= self.artificial_start {
                for column in 0..self.num_columns {
                    self.objective_row[column] += self.matrix[row_index][column];
                }
                self.objective_rhs += self.rhs[row_index];
            }
        }
    }

    /// Install the given maximisation costs over the structural columns, priced out over the
    /// current basis.
    fn install_objective(&mut self, costs: &[f64]) {
        self.objective_row = vec![0.0; self.num_columns];
        self.objective_rhs = 0.0;
        self.objective_row[..costs.len()].copy_from_slice(costs);

        for row_index in 0..self.matrix.len() {
            let basic_cost = self.objective_row[self.basis[row_index]];
            if basic_cost != 0.0 {
                for column in 0..self.num_columns {
                    self.objective_row[column] -= basic_cost * self.matrix[row_index][column];
                }
                self.objective_rhs -= basic_cost * self.rhs[row_index];
            }
        }
    }

    /// Pivot until no column below `allowed_columns` has a positive reduced cost.
    ///
    /// Entering and leaving variables are chosen by Bland's rule (smallest index), which
    /// guarantees termination in the presence of degeneracy.
    fn run(&mut self, allowed_columns: usize, num_pivots: &mut u64) -> RunOutcome {
        loop {
            let Some(entering) = (0..allowed_columns)
                .find(|&column| self.objective_row[column] > PIVOT_EPS)
            else {
                return RunOutcome::Optimal;
            };

            let Some(leaving_row) = self.ratio_test(entering) else {
                return RunOutcome::Unbounded;
            };

            self.pivot(leaving_row, entering);
            *num_pivots += 1;
        }
    }

    /// The row limiting the increase of `entering`, or `None` if the column is unbounded. Ties
    /// are broken towards the smallest basic column index.
    fn ratio_test(&self, entering: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (row_index, row) in self.matrix.iter().enumerate() {
            let coefficient = row[entering];
            if coefficient <= PIVOT_EPS {
                continue;
            }

            let ratio = self.rhs[row_index] / coefficient;
            let better = match best {
                None => true,
                Some((best_row, best_ratio)) => {
                    ratio < best_ratio - PIVOT_EPS
                        || (ratio < best_ratio + PIVOT_EPS
                            && self.basis[row_index] < self.basis[best_row])
                }
            };
            if better {
                best = Some((row_index, ratio));
            }
        }

        best.map(|(row_index, _)| row_index)
    }

    fn pivot(&mut self, pivot_row: usize, pivot_column: usize) {
        let pivot_element = self.matrix[pivot_row][pivot_column];

        for coefficient in self.matrix[pivot_row].iter_mut() {
            *coefficient /= pivot_element;
        }
        self.rhs[pivot_row] /= pivot_element;

        let pivot_row_values = self.matrix[pivot_row].clone();
        let pivot_rhs = self.rhs[pivot_row];

        for row_index in 0..self.matrix.len() {
            if row_index == pivot_row {
                continue;
            }
            let factor = self.matrix[row_index][pivot_column];
            if factor == 0.0 {
                continue;
            }
            for column in 0..self.num_columns {
                self.matrix[row_index][column] -= factor * pivot_row_values[column];
            }
            self.rhs[row_index] -= factor * pivot_rhs;
        }

        let factor = self.objective_row[pivot_column];
        if factor != 0.0 {
            for column in 0..self.num_columns {
                self.objective_row[column] -= factor * pivot_row_values[column];
            }
            self.objective_rhs -= factor * pivot_rhs;
        }

        self.basis[pivot_row] = pivot_column;
    }

    /// After a successful phase one, artificials may linger in the basis at value zero. Pivot
    /// them out where possible; rows in which no other column has a non-zero coefficient are
    /// redundant and are dropped.
    fn drive_out_basic_artificials(&mut self, num_pivots: &mut u64) {
        let mut row_index = 0;
        while row_index < self.matrix.len() {
            if self.basis[row_index] < self.artificial_start {
                row_index += 1;
                continue;
            }

            let replacement = (0..self.artificial_start)
                .find(|&column| self.matrix[row_index][column].abs() > PIVOT_EPS);

            match replacement {
                Some(column) => {
                    // The row's value is zero, so pivoting on any sign keeps feasibility.
                    self.pivot(row_index, column);
                    *num_pivots += 1;
                    row_index += 1;
                }
                None => {
                    let _ = self.matrix.swap_remove(row_index);
                    let _ = self.rhs.swap_remove(row_index);
                    let _ = self.basis.swap_remove(row_index);
                }
            }
        }
    }

    /// The values of the structural variables at the current basic point.
    fn structural_values(&self, num_structural: usize) -> Vec<f64> {
        let mut values = vec![0.0; num_structural];
        for (row_index, &basic_column) in self.basis.iter().enumerate() {
            if basic_column < num_structural {
                values[basic_column] = self.rhs[row_index];
            }
        }
        values
    }
}
