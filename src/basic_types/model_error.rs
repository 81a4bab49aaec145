use crate::constraints::Relation;

/// A structural error in a model which is surfaced before solving is attempted.
///
/// Note that infeasibility is *not* an error; an infeasible model solves to the
/// [`Infeasible`](crate::results::SolveStatus::Infeasible) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A constraint or objective references a variable which was not created through the model.
    #[error("variable with index {0} is not registered in the model")]
    UnknownVariable(usize),
    /// The relation cannot be expressed in the targeted engine.
    #[error("the relation '{0}' is not supported in a linear program")]
    UnsupportedRelation(Relation),
}
