mod model;

pub mod results;

pub use model::Model;
pub use model::SolveOptions;

pub use crate::basic_types::ModelError;

/// Identifiers of model variables.
pub mod variables {
    pub use crate::engine::variables::VariableId;
}
