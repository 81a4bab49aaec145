//! Termination conditions which bound how long the solver searches.
//!
//! The solver polls its [`TerminationCondition`] exactly once per search node; when the
//! condition triggers, the solve returns the [`Unknown`](crate::results::SolveStatus::Unknown)
//! status together with the best solution found so far, if any.

use std::time::Duration;
use std::time::Instant;

/// A condition which, when it triggers, causes the solver to give up searching.
pub trait TerminationCondition {
    /// Returns `true` when the solver should stop. Called once per search node.
    fn should_stop(&mut self) -> bool;
}

/// A [`TerminationCondition`] which never triggers; the solver runs to completion.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// A [`TerminationCondition`] which triggers when the specified time budget has been exceeded.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// The point in time from which to measure the budget.
    started_at: Instant,
    /// The amount of time before [`TimeBudget::should_stop()`] becomes true.
    budget: Duration,
}

impl TimeBudget {
    /// Give the solver a time budget, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        let started_at = Instant::now();

        TimeBudget { started_at, budget }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

/// A [`TerminationCondition`] which triggers after a fixed number of search nodes.
#[derive(Clone, Copy, Debug)]
pub struct NodeBudget {
    remaining: u64,
}

impl NodeBudget {
    /// Give the solver a budget of `num_nodes` search nodes.
    pub fn with_budget(num_nodes: u64) -> NodeBudget {
        NodeBudget {
            remaining: num_nodes,
        }
    }
}

impl TerminationCondition for NodeBudget {
    fn should_stop(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }

        self.remaining -= 1;
        false
    }
}

/// A [`TerminationCondition`] which triggers when either of its components triggers.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    first: T1,
    second: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    pub fn new(first: T1, second: T2) -> Self {
        Combinator { first, second }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        // Deliberately not short-circuiting: both conditions observe every node.
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }
}

/// `None` is a termination condition that never triggers.
impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(condition) => condition.should_stop(),
            None => false,
        }
    }
}
