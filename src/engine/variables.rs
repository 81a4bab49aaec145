use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// The identifier of an integer variable in a [`Model`](crate::Model).
///
/// Variable ids index into the domain arena of the solver and are assigned in creation order,
/// which is also the order in which the default brancher considers variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    id: u32,
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}
