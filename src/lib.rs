//! Butternut is a combinatorial optimisation library with two in-process engines:
//!
//! - a finite-domain constraint satisfaction engine based on depth-first backtracking search
//!   with constraint propagation, supporting linear relations and [`AllDifferent`] constraints,
//! - a linear programming core based on the two-phase simplex method, with a branch-and-bound
//!   wrapper for integer programs.
//!
//! # Example
//! ```
//! use butternut_solver::constraints;
//! use butternut_solver::Model;
//! use butternut_solver::SolveOptions;
//! use butternut_solver::results::SolveStatus;
//!
//! let mut model = Model::default();
//! let x = model.new_variable(0, 2, "x");
//! let y = model.new_variable(0, 2, "y");
//!
//! model
//!     .add_constraint(constraints::binary_not_equals(x, y))
//!     .expect("x and y are registered in the model");
//!
//! let result = model.solve(&SolveOptions::default());
//! assert_eq!(result.status, SolveStatus::Feasible);
//!
//! let solution = result.solution.expect("a solution was found");
//! assert_ne!(solution.value(x), solution.value(y));
//! ```
//!
//! [`AllDifferent`]: crate::constraints::all_different

#[doc(hidden)]
pub mod asserts;

pub(crate) mod basic_types;
pub(crate) mod engine;
pub(crate) mod math;
pub(crate) mod propagators;

pub mod branching;
pub mod constraints;
pub mod containers;
pub mod lp;
pub mod optimisation;
pub mod statistics;
pub mod termination;

// We declare a private module with public use, so that all exports from the API are exports
// directly from the crate.
//
// Example:
// `use butternut_solver::Model;`
// vs.
// `use butternut_solver::api::Model;`
mod api;

pub use api::*;
