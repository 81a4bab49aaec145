use crate::engine::assignments::PropagationStatus;
use crate::engine::variables::VariableId;
use crate::engine::Assignments;

/// Propagator for the constraint that all variables in a group take pairwise-distinct values.
///
/// The propagation is the value-based decomposition: once a variable is fixed, its value is
/// removed from every other variable in the group. This is deliberately weaker than
/// Hall-interval filtering, which is not needed at the group sizes the solver targets.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentPropagator {
    variables: Box<[VariableId]>,
}

impl AllDifferentPropagator {
    pub(crate) fn new(variables: Box<[VariableId]>) -> Self {
        AllDifferentPropagator { variables }
    }

    pub(crate) fn propagate(&self, assignments: &mut Assignments) -> PropagationStatus {
        for (index, &variable) in self.variables.iter().enumerate() {
            let Some(value) = assignments.assigned_value(variable) else {
                continue;
            };

            for (other_index, &other) in self.variables.iter().enumerate() {
                if other_index != index {
                    assignments.remove_value(other, value)?;
                }
            }
        }

        Ok(())
    }
}
