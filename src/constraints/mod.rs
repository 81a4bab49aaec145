//! The constraints which can be posted to a [`Model`](crate::Model).
//!
//! A constraint is a declarative description; when solving starts it is compiled into one or
//! more propagators. The free functions in this module are the intended way of constructing
//! constraints:
//! ```
//! # use butternut_solver::Model;
//! # use butternut_solver::constraints;
//! let mut model = Model::default();
//! let x = model.new_variable(0, 10, "x");
//! let y = model.new_variable(0, 10, "y");
//!
//! let _ = model.add_constraint(constraints::less_than_or_equals(vec![(1, x), (2, y)], 14));
//! let _ = model.add_constraint(constraints::binary_not_equals(x, y));
//! ```

use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Either;
use itertools::Itertools;

use crate::containers::HashMap;
use crate::variables::VariableId;

/// The relational operator of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Relation::Equal => "=",
            Relation::LessOrEqual => "<=",
            Relation::GreaterOrEqual => ">=",
            Relation::NotEqual => "!=",
        };
        write!(f, "{symbol}")
    }
}

/// A constraint over integer variables.
#[derive(Clone, Debug)]
pub enum Constraint {
    /// `\sum coefficient_i * variable_i (relation) constant`.
    LinearRelation {
        terms: Vec<(i32, VariableId)>,
        relation: Relation,
        constant: i32,
    },
    /// The variables take pairwise-distinct values.
    AllDifferent(Vec<VariableId>),
}

impl Constraint {
    /// The variables the constraint mentions; used by the model to validate a posted constraint.
    pub(crate) fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        match self {
            Constraint::LinearRelation { terms, .. } => {
                Either::Left(terms.iter().map(|&(_, variable)| variable))
            }
            Constraint::AllDifferent(variables) => Either::Right(variables.iter().copied()),
        }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::LinearRelation {
                terms,
                relation,
                constant,
            } => {
                let lhs = terms
                    .iter()
                    .map(|(coefficient, variable)| format!("{coefficient}*{variable}"))
                    .join(" + ");
                write!(f, "{lhs} {relation} {constant}")
            }
            Constraint::AllDifferent(variables) => {
                write!(f, "all_different([{}])", variables.iter().join(", "))
            }
        }
    }
}

/// Combine duplicate variables and drop zero coefficients.
///
/// Normalising at construction means a propagator can assume its coefficients are non-zero; in
/// particular a term list in which a variable cancels out (for instance `x - x`) reduces to the
/// empty sum.
pub(crate) fn normalise_terms(terms: Vec<(i32, VariableId)>) -> Vec<(i32, VariableId)> {
    let mut combined: HashMap<VariableId, i32> = HashMap::default();
    let mut order: Vec<VariableId> = Vec::new();

    for (coefficient, variable) in terms {
        let entry = combined.entry(variable).or_insert_with(|| {
            order.push(variable);
            0
        });
        *entry += coefficient;
    }

    order
        .into_iter()
        .filter_map(|variable| {
            let coefficient = combined[&variable];
            (coefficient != 0).then_some((coefficient, variable))
        })
        .collect()
}

fn linear(terms: Vec<(i32, VariableId)>, relation: Relation, constant: i32) -> Constraint {
    Constraint::LinearRelation {
        terms: normalise_terms(terms),
        relation,
        constant,
    }
}

/// The constraint `\sum terms = constant`.
pub fn equals(terms: Vec<(i32, VariableId)>, constant: i32) -> Constraint {
    linear(terms, Relation::Equal, constant)
}

/// The constraint `\sum terms <= constant`.
pub fn less_than_or_equals(terms: Vec<(i32, VariableId)>, constant: i32) -> Constraint {
    linear(terms, Relation::LessOrEqual, constant)
}

/// The constraint `\sum terms >= constant`.
pub fn greater_than_or_equals(terms: Vec<(i32, VariableId)>, constant: i32) -> Constraint {
    linear(terms, Relation::GreaterOrEqual, constant)
}

/// The constraint `\sum terms != constant`.
pub fn not_equals(terms: Vec<(i32, VariableId)>, constant: i32) -> Constraint {
    linear(terms, Relation::NotEqual, constant)
}

/// The constraint `lhs != rhs` over two variables.
pub fn binary_not_equals(lhs: VariableId, rhs: VariableId) -> Constraint {
    not_equals(vec![(1, lhs), (-1, rhs)], 0)
}

/// The constraint that all of the `variables` take pairwise-distinct values.
pub fn all_different(variables: Vec<VariableId>) -> Constraint {
    Constraint::AllDifferent(variables)
}
