pub(crate) mod assignments;
pub(crate) mod search;
pub(crate) mod variables;

#[cfg(test)]
pub(crate) mod test_solver;

pub(crate) use assignments::Assignments;
pub(crate) use assignments::EmptyDomain;
pub(crate) use search::SearchEngine;
pub(crate) use search::SearchOutcome;
