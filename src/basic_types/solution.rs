use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;

/// A full assignment of every model variable to a concrete value.
///
/// Produced by the engine whenever search reaches a node in which all domains are singletons; the
/// solution is a snapshot and remains valid after the solver backtracks.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    values: KeyedVec<VariableId, i32>,
}

impl Solution {
    pub(crate) fn new(values: KeyedVec<VariableId, i32>) -> Self {
        Solution { values }
    }

    /// The value assigned to `variable`.
    ///
    /// # Panics
    /// If `variable` is not part of the model this solution was produced for.
    pub fn value(&self, variable: VariableId) -> i32 {
        self.values[variable]
    }

    /// The number of variables in the solution.
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all `(variable, value)` pairs, in variable creation order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, i32)> + '_ {
        self.values.keys().map(|id| (id, self.values[id]))
    }
}
