//! Branch-and-bound for integer linear programs, on top of the simplex relaxation.

use std::time::Instant;

use log::debug;
use log::info;

use crate::lp::simplex;
use crate::lp::simplex::SimplexOutcome;
use crate::lp::LinearProgram;
use crate::lp::LpResult;
use crate::lp::LpSolution;
use crate::optimisation::OptimisationDirection;
use crate::results::SolveStatus;
use crate::statistics::LpStatistics;

/// A value within this distance of an integer is considered integral.
const INTEGRALITY_EPS: f64 = 1e-6;

/// Bounds under which a node's relaxation is solved.
#[derive(Clone, Debug)]
struct Node {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

/// Depth-first branch-and-bound with the first fractional variable as the branching variable.
///
/// All comparisons happen in maximisation form (minimisation negates the costs), so a node can
/// be pruned as soon as its relaxation bound fails to strictly improve on the incumbent. The
/// floor branch is explored before the ceiling branch.
pub(crate) fn solve(program: &LinearProgram) -> LpResult {
    let start = Instant::now();
    let mut statistics = LpStatistics::default();

    let mut stack = vec![Node {
        lower: program.lower_bounds(),
        upper: program.upper_bounds(),
    }];

    // The incumbent's point and its objective value in maximisation form.
    let mut incumbent: Option<(Vec<f64>, f64)> = None;

    while let Some(node) = stack.pop() {
        statistics.num_nodes += 1;

        let standard = program.standardise(&node.lower, &node.upper);
        let outcome = simplex::solve(&standard, &mut statistics.num_pivots);

        let (values, objective) = match outcome {
            SimplexOutcome::Optimal { values, objective } => (values, objective),
            SimplexOutcome::Infeasible => continue,
            SimplexOutcome::Unbounded => {
                // Only the root relaxation can be unbounded; every other node shrinks it.
                statistics.time_spent = start.elapsed();
                statistics.log();
                return LpResult {
                    status: SolveStatus::Unbounded,
                    solution: None,
                    objective_value: None,
                    statistics,
                };
            }
        };

        let point = program.unshift(&values, &node.lower);
        let bound = objective + signed_offset(program, &node.lower);

        if let Some((_, incumbent_value)) = &incumbent {
            if bound <= incumbent_value + INTEGRALITY_EPS {
                continue;
            }
        }

        match first_fractional(&point) {
            None => {
                info!("improved integer objective bound: {bound}");
                incumbent = Some((point, bound));
            }
            Some((index, value)) => {
                debug!("branching on column {index} with relaxation value {value}");

                let mut ceiling = node.clone();
                ceiling.lower[index] = value.ceil();
                stack.push(ceiling);

                let mut floor = node;
                floor.upper[index] = value.floor();
                stack.push(floor);
            }
        }
    }

    statistics.time_spent = start.elapsed();
    statistics.log();

    match incumbent {
        Some((point, signed_value)) => {
            let objective_value = program.direction().map(|direction| match direction {
                OptimisationDirection::Maximise => signed_value,
                OptimisationDirection::Minimise => -signed_value,
            });
            let status = if program.direction().is_some() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };

            LpResult {
                status,
                solution: Some(LpSolution { values: point }),
                objective_value,
                statistics,
            }
        }
        None => LpResult {
            status: SolveStatus::Infeasible,
            solution: None,
            objective_value: None,
            statistics,
        },
    }
}

/// The part of the maximisation objective contributed by the lower-bound shift of a node.
fn signed_offset(program: &LinearProgram, lower: &[f64]) -> f64 {
    program
        .signed_costs()
        .iter()
        .zip(lower.iter())
        .map(|(&cost, &low)| cost * low)
        .sum()
}

/// The first variable whose relaxation value is not integral, together with that value.
fn first_fractional(point: &[f64]) -> Option<(usize, f64)> {
    point
        .iter()
        .enumerate()
        .find(|(_, &value)| (value - value.round()).abs() > INTEGRALITY_EPS)
        .map(|(index, &value)| (index, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Relation;

    #[test]
    fn a_fractional_relaxation_is_branched_to_the_integer_optimum() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, f64::INFINITY, "x");

        // The relaxation optimum is x = 3.5.
        program
            .add_constraint(vec![(2.0, x)], Relation::LessOrEqual, 7.0)
            .expect("x is registered in the program");
        program
            .maximise(vec![(1.0, x)])
            .expect("x is registered in the program");

        let result = program.solve_integer();

        assert_eq!(result.status, SolveStatus::Optimal);
        let objective = result.objective_value.expect("an objective is set");
        assert!((objective - 3.0).abs() < INTEGRALITY_EPS);
        assert!(result.statistics.num_nodes > 1);
    }

    #[test]
    fn an_integral_relaxation_needs_a_single_node() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, 4.0, "x");

        program
            .maximise(vec![(1.0, x)])
            .expect("x is registered in the program");

        let result = program.solve_integer();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.statistics.num_nodes, 1);
    }

    #[test]
    fn an_empty_integer_slice_is_infeasible() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, 10.0, "x");

        // 0.2 <= x <= 0.8 contains no integer.
        program
            .add_range_constraint(vec![(1.0, x)], 0.2, 0.8)
            .expect("x is registered in the program");
        program
            .maximise(vec![(1.0, x)])
            .expect("x is registered in the program");

        let result = program.solve_integer();

        assert_eq!(result.status, SolveStatus::Infeasible);
    }

    #[test]
    fn an_unbounded_relaxation_is_reported_as_unbounded() {
        let mut program = LinearProgram::new();
        let x = program.new_variable(0.0, f64::INFINITY, "x");

        program
            .maximise(vec![(1.0, x)])
            .expect("x is registered in the program");

        let result = program.solve_integer();

        assert_eq!(result.status, SolveStatus::Unbounded);
    }
}
