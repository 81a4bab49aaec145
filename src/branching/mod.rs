//! Contains structures and traits to define the decision making procedure of the solver.
//!
//! A [`Brancher`] selects, at every search node where unassigned variables remain, which
//! variable to branch on and which value to try first. The solver explores the chosen value
//! first and, on backtracking, excludes it and retries the node.

use crate::engine::variables::VariableId;
use crate::engine::Assignments;

/// A variable/value branch decision taken at a search node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub variable: VariableId,
    pub value: i32,
}

/// Read-only view of the current domains, handed to a [`Brancher`] when a decision is needed.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        SelectionContext { assignments }
    }

    /// All variables of the model, in creation order.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> {
        self.assignments.variables()
    }

    pub fn is_assigned(&self, variable: VariableId) -> bool {
        self.assignments.is_assigned(variable)
    }

    pub fn lower_bound(&self, variable: VariableId) -> i32 {
        self.assignments.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: VariableId) -> i32 {
        self.assignments.upper_bound(variable)
    }
}

/// The decision making procedure used during search.
pub trait Brancher {
    /// Select the next decision, or `None` when every variable is assigned (i.e. the node is a
    /// solution).
    ///
    /// The returned value must be in the current domain of the returned variable.
    fn next_decision(&mut self, context: &SelectionContext<'_>) -> Option<Decision>;
}

/// The default [`Brancher`]: branch on the lowest-index unassigned variable and try its
/// smallest remaining value first.
///
/// This ordering is deterministic, which makes solution enumeration reproducible.
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrderMinValueBrancher;

impl Brancher for InOrderMinValueBrancher {
    fn next_decision(&mut self, context: &SelectionContext<'_>) -> Option<Decision> {
        context
            .variables()
            .find(|&variable| !context.is_assigned(variable))
            .map(|variable| Decision {
                variable,
                value: context.lower_bound(variable),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_brancher_picks_the_first_unassigned_variable() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(3, 3);
        let y = assignments.grow(-2, 5);

        let mut brancher = InOrderMinValueBrancher;
        let decision = brancher
            .next_decision(&SelectionContext::new(&assignments))
            .expect("y is unassigned");

        assert_ne!(decision.variable, x);
        assert_eq!(decision, Decision { variable: y, value: -2 });
    }

    #[test]
    fn no_decision_is_made_once_everything_is_assigned() {
        let mut assignments = Assignments::default();
        let _ = assignments.grow(1, 1);

        let mut brancher = InOrderMinValueBrancher;
        assert!(brancher
            .next_decision(&SelectionContext::new(&assignments))
            .is_none());
    }
}
