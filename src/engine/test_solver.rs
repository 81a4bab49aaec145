//! Test harness for propagator unit tests.

use crate::engine::assignments::PropagationStatus;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;
use crate::propagators::AllDifferentPropagator;
use crate::propagators::LinearRelationPropagator;

/// A thin wrapper around [`Assignments`] which lets propagator tests create variables, run a
/// single propagator, and inspect the resulting domains.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    assignments: Assignments,
}

/// Runs a concrete propagator against the domain store; implemented by every propagator so the
/// tests do not have to wrap them in the dispatch enum.
pub(crate) trait Propagate {
    fn run(&self, assignments: &mut Assignments) -> PropagationStatus;
}

impl Propagate for LinearRelationPropagator {
    fn run(&self, assignments: &mut Assignments) -> PropagationStatus {
        self.propagate(assignments)
    }
}

impl Propagate for AllDifferentPropagator {
    fn run(&self, assignments: &mut Assignments) -> PropagationStatus {
        self.propagate(assignments)
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        self.assignments.grow(lower_bound, upper_bound)
    }

    pub(crate) fn propagate(&mut self, propagator: &impl Propagate) -> PropagationStatus {
        propagator.run(&mut self.assignments)
    }

    pub(crate) fn contains(&self, variable: VariableId, value: i32) -> bool {
        self.assignments.contains(variable, value)
    }

    pub(crate) fn assert_bounds(&self, variable: VariableId, lower_bound: i32, upper_bound: i32) {
        let actual_lower_bound = self.assignments.lower_bound(variable);
        let actual_upper_bound = self.assignments.upper_bound(variable);

        assert_eq!(
            (lower_bound, upper_bound),
            (actual_lower_bound, actual_upper_bound),
            "The bounds of {variable} were expected to be [{lower_bound}, {upper_bound}] \
             but were [{actual_lower_bound}, {actual_upper_bound}]"
        );
    }
}
