//! End-to-end tests of the LP core on classic linear and integer programs with known optima.

use butternut_solver::constraints::Relation;
use butternut_solver::lp::LinearProgram;
use butternut_solver::results::SolveStatus;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Maximise `3x + y` with `x` in `[0, 1]`, `y` in `[0, 2]` and `0 <= x + y <= 2`.
#[test]
fn a_small_bounded_program_is_maximised_to_four() {
    init_logger();
    let mut program = LinearProgram::new();
    let x = program.new_variable(0.0, 1.0, "x");
    let y = program.new_variable(0.0, 2.0, "y");

    program
        .add_range_constraint(vec![(1.0, x), (1.0, y)], 0.0, 2.0)
        .unwrap();
    program.maximise(vec![(3.0, x), (1.0, y)]).unwrap();

    let result = program.solve();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_close(result.objective_value.unwrap(), 4.0);

    let solution = result.solution.unwrap();
    assert_close(solution.value(x), 1.0);
    assert_close(solution.value(y), 1.0);
}

/// Maximise `3x + 4y` over non-negative variables subject to `x + 2y <= 14`, `3x - y >= 0` and
/// `x - y <= 2`.
#[test]
fn a_program_with_unbounded_variables_is_maximised_to_thirty_four() {
    init_logger();
    let mut program = LinearProgram::new();
    let x = program.new_variable(0.0, f64::INFINITY, "x");
    let y = program.new_variable(0.0, f64::INFINITY, "y");

    program
        .add_constraint(vec![(1.0, x), (2.0, y)], Relation::LessOrEqual, 14.0)
        .unwrap();
    program
        .add_constraint(vec![(3.0, x), (-1.0, y)], Relation::GreaterOrEqual, 0.0)
        .unwrap();
    program
        .add_constraint(vec![(1.0, x), (-1.0, y)], Relation::LessOrEqual, 2.0)
        .unwrap();
    program.maximise(vec![(3.0, x), (4.0, y)]).unwrap();

    let result = program.solve();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_close(result.objective_value.unwrap(), 34.0);

    let solution = result.solution.unwrap();
    assert_close(solution.value(x), 6.0);
    assert_close(solution.value(y), 4.0);
    assert!(result.statistics.num_pivots > 0);
}

/// Maximise `x + 10y` over non-negative integers subject to `x + 7y <= 17.5` and `x <= 3.5`.
///
/// The relaxation optimum is fractional, so branching is required to reach the integer optimum
/// of 23 at `x = 3`, `y = 2`.
#[test]
fn an_integer_program_with_a_fractional_relaxation_is_solved_by_branching() {
    init_logger();
    let mut program = LinearProgram::new();
    let x = program.new_variable(0.0, f64::INFINITY, "x");
    let y = program.new_variable(0.0, f64::INFINITY, "y");

    program
        .add_constraint(vec![(1.0, x), (7.0, y)], Relation::LessOrEqual, 17.5)
        .unwrap();
    program
        .add_constraint(vec![(1.0, x)], Relation::LessOrEqual, 3.5)
        .unwrap();
    program.maximise(vec![(1.0, x), (10.0, y)]).unwrap();

    let result = program.solve_integer();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_close(result.objective_value.unwrap(), 23.0);

    let solution = result.solution.unwrap();
    assert_close(solution.value(x), 3.0);
    assert_close(solution.value(y), 2.0);
    assert!(result.statistics.num_nodes > 1);
}

/// A five-variable integer program with four two-sided rows; the optimum is 260.
#[test]
fn the_var_array_integer_program_is_maximised_to_two_hundred_sixty() {
    init_logger();
    let constraint_coefficients = [
        [5.0, 7.0, 9.0, 2.0, 1.0],
        [18.0, 4.0, -9.0, 10.0, 12.0],
        [4.0, 7.0, 3.0, 8.0, 5.0],
        [5.0, 13.0, 16.0, 3.0, -7.0],
    ];
    let bounds = [250.0, 285.0, 211.0, 315.0];
    let objective_coefficients = [7.0, 8.0, 2.0, 9.0, 6.0];

    let mut program = LinearProgram::new();
    let columns: Vec<_> = (0..5)
        .map(|index| program.new_variable(0.0, f64::INFINITY, format!("x_{index}")))
        .collect();

    for (row, &bound) in constraint_coefficients.iter().zip(bounds.iter()) {
        let terms = row
            .iter()
            .zip(columns.iter())
            .map(|(&coefficient, &column)| (coefficient, column))
            .collect();
        program.add_range_constraint(terms, 0.0, bound).unwrap();
    }

    let objective = objective_coefficients
        .iter()
        .zip(columns.iter())
        .map(|(&coefficient, &column)| (coefficient, column))
        .collect();
    program.maximise(objective).unwrap();

    let result = program.solve_integer();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!(
        (result.objective_value.unwrap() - 260.0).abs() < 1e-4,
        "expected an optimum of 260, got {:?}",
        result.objective_value
    );

    let solution = result.solution.unwrap();
    for &column in &columns {
        let value = solution.value(column);
        assert!(
            (value - value.round()).abs() < 1e-6,
            "{value} is not integral"
        );
    }
}

#[test]
fn an_infeasible_program_is_reported_as_infeasible() {
    init_logger();
    let mut program = LinearProgram::new();
    let x = program.new_variable(0.0, 1.0, "x");

    program
        .add_constraint(vec![(1.0, x)], Relation::GreaterOrEqual, 2.0)
        .unwrap();
    program.maximise(vec![(1.0, x)]).unwrap();

    let result = program.solve();

    assert_eq!(result.status, SolveStatus::Infeasible);
    assert!(result.solution.is_none());
    assert!(result.objective_value.is_none());
}

#[test]
fn an_unbounded_objective_is_reported_as_unbounded() {
    init_logger();
    let mut program = LinearProgram::new();
    let x = program.new_variable(0.0, f64::INFINITY, "x");

    program.maximise(vec![(1.0, x)]).unwrap();

    let result = program.solve();

    assert_eq!(result.status, SolveStatus::Unbounded);
}
