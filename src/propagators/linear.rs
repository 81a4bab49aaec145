use crate::constraints::Relation;
use crate::engine::assignments::PropagationStatus;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::math::num_ext::NumExt;

/// Propagator for the constraint `\sum c_i * x_i (relation) constant` with
/// `relation \in {=, <=, >=, !=}`.
///
/// The `=`, `<=` and `>=` relations are propagated to bound consistency. The `!=` relation only
/// fires once all but one variable is fixed, at which point the forced value is excluded from
/// the remaining variable.
#[derive(Clone, Debug)]
pub(crate) struct LinearRelationPropagator {
    /// The terms `(c_i, x_i)`; coefficients are non-zero.
    terms: Box<[(i32, VariableId)]>,
    relation: Relation,
    constant: i32,
}

impl LinearRelationPropagator {
    pub(crate) fn new(
        terms: Box<[(i32, VariableId)]>,
        relation: Relation,
        constant: i32,
    ) -> Self {
        LinearRelationPropagator {
            terms,
            relation,
            constant,
        }
    }

    pub(crate) fn propagate(&self, assignments: &mut Assignments) -> PropagationStatus {
        match self.relation {
            Relation::LessOrEqual => self.propagate_less_or_equal(assignments, 1),
            Relation::GreaterOrEqual => self.propagate_less_or_equal(assignments, -1),
            Relation::Equal => {
                self.propagate_less_or_equal(assignments, 1)?;
                self.propagate_less_or_equal(assignments, -1)
            }
            Relation::NotEqual => self.propagate_not_equal(assignments),
        }
    }

    /// Propagate `\sum sign*c_i * x_i <= sign*constant`; with `sign = -1` this is the `>=` half
    /// of the constraint.
    fn propagate_less_or_equal(&self, assignments: &mut Assignments, sign: i64) -> PropagationStatus {
        let constant = sign * self.constant as i64;

        // The smallest value the left-hand side can take given the current bounds. Sums are
        // taken in i64 so that coefficient/bound combinations cannot overflow.
        let minimum_sum: i64 = self
            .terms
            .iter()
            .map(|&(coefficient, variable)| {
                Self::minimum_term(assignments, sign * coefficient as i64, variable)
            })
            .sum();

        if minimum_sum > constant {
            return Err(EmptyDomain);
        }

        for &(coefficient, variable) in self.terms.iter() {
            let coefficient = sign * coefficient as i64;
            let residual =
                constant - (minimum_sum - Self::minimum_term(assignments, coefficient, variable));

            if coefficient > 0 {
                let bound = NumExt::div_floor(residual, coefficient);
                if bound < assignments.upper_bound(variable) as i64 {
                    assignments.tighten_upper_bound(variable, Self::clamp(bound))?;
                }
            } else {
                let bound = NumExt::div_ceil(residual, coefficient);
                if bound > assignments.lower_bound(variable) as i64 {
                    assignments.tighten_lower_bound(variable, Self::clamp(bound))?;
                }
            }
        }

        Ok(())
    }

    fn propagate_not_equal(&self, assignments: &mut Assignments) -> PropagationStatus {
        let mut fixed_sum: i64 = 0;
        let mut unfixed: Option<(i64, VariableId)> = None;

        for &(coefficient, variable) in self.terms.iter() {
            match assignments.assigned_value(variable) {
                Some(value) => fixed_sum += coefficient as i64 * value as i64,
                None if unfixed.is_none() => unfixed = Some((coefficient as i64, variable)),
                // With two or more unfixed variables nothing can be deduced.
                None => return Ok(()),
            }
        }

        match unfixed {
            None => {
                if fixed_sum == self.constant as i64 {
                    Err(EmptyDomain)
                } else {
                    Ok(())
                }
            }
            Some((coefficient, variable)) => {
                let residual = self.constant as i64 - fixed_sum;
                // The forced value only exists if the residual is divisible by the coefficient.
                if residual % coefficient == 0 {
                    let forbidden = residual / coefficient;
                    if forbidden >= i32::MIN as i64 && forbidden <= i32::MAX as i64 {
                        assignments.remove_value(variable, forbidden as i32)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn minimum_term(assignments: &Assignments, coefficient: i64, variable: VariableId) -> i64 {
        if coefficient > 0 {
            coefficient * assignments.lower_bound(variable) as i64
        } else {
            coefficient * assignments.upper_bound(variable) as i64
        }
    }

    fn clamp(bound: i64) -> i32 {
        bound.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn upper_bounds_are_propagated_for_a_sum() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 5);
        let y = solver.new_variable(0, 10);

        let propagator = LinearRelationPropagator::new(
            [(1, x), (1, y)].into(),
            Relation::LessOrEqual,
            7,
        );

        solver.propagate(&propagator).expect("non-empty domain");

        solver.assert_bounds(x, 1, 5);
        solver.assert_bounds(y, 0, 6);
    }

    #[test]
    fn negative_coefficients_tighten_lower_bounds() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        // -2x <= -7, i.e. x >= 3.5, so x >= 4.
        let propagator =
            LinearRelationPropagator::new([(-2, x)].into(), Relation::LessOrEqual, -7);

        solver.propagate(&propagator).expect("non-empty domain");

        solver.assert_bounds(x, 4, 10);
    }

    #[test]
    fn equality_fixes_the_remaining_variable() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 3);
        let y = solver.new_variable(0, 10);

        let propagator =
            LinearRelationPropagator::new([(1, x), (2, y)].into(), Relation::Equal, 11);

        solver.propagate(&propagator).expect("non-empty domain");

        solver.assert_bounds(y, 4, 4);
    }

    #[test]
    fn exceeded_bound_is_a_conflict() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(5, 10);
        let y = solver.new_variable(5, 10);

        let propagator = LinearRelationPropagator::new(
            [(1, x), (1, y)].into(),
            Relation::LessOrEqual,
            9,
        );

        assert_eq!(solver.propagate(&propagator), Err(EmptyDomain));
    }

    #[test]
    fn not_equal_excludes_the_forced_value() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(0, 5);

        // x != y rewritten as x - y != 0.
        let propagator =
            LinearRelationPropagator::new([(1, x), (-1, y)].into(), Relation::NotEqual, 0);

        solver.propagate(&propagator).expect("non-empty domain");

        assert!(!solver.contains(y, 2));
        solver.assert_bounds(y, 0, 5);
    }

    #[test]
    fn not_equal_with_all_variables_fixed_detects_a_conflict() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(1, 1);

        let propagator =
            LinearRelationPropagator::new([(1, x), (-1, y)].into(), Relation::NotEqual, 0);

        assert_eq!(solver.propagate(&propagator), Err(EmptyDomain));
    }

    #[test]
    fn not_equal_ignores_indivisible_residuals() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(0, 5);

        // x + 2y != 4 with x = 1 forces 2y != 3, which no integer y violates.
        let propagator =
            LinearRelationPropagator::new([(1, x), (2, y)].into(), Relation::NotEqual, 4);

        solver.propagate(&propagator).expect("non-empty domain");

        solver.assert_bounds(y, 0, 5);
    }
}
