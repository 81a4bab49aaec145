mod model_error;
mod solution;
mod trail;

pub use model_error::ModelError;
pub use solution::Solution;
pub(crate) use trail::Trail;
