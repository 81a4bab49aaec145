//! Solver statistics and the logging thereof.

mod statistic_logging;

use std::time::Duration;

pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticOptions;

/// Counters describing one solve call of the constraint satisfaction engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverStatistics {
    /// The number of branch decisions taken.
    pub num_decisions: u64,
    /// The number of search nodes in which propagation emptied a domain.
    pub num_failures: u64,
    /// The number of propagator invocations.
    pub num_propagations: u64,
    /// The number of solutions found.
    pub num_solutions: u64,
    /// Wall time spent in the solve call.
    pub time_spent: Duration,
}

impl SolverStatistics {
    /// Fold the counters of `other` into `self`; used when a solve consists of several search
    /// runs (e.g. the optimisation loop).
    pub(crate) fn absorb(&mut self, other: SolverStatistics) {
        self.num_decisions += other.num_decisions;
        self.num_failures += other.num_failures;
        self.num_propagations += other.num_propagations;
        self.num_solutions += other.num_solutions;
        self.time_spent += other.time_spent;
    }

    /// Write the statistics through [`log_statistic`], if statistic logging is configured.
    pub fn log(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("numDecisions", self.num_decisions);
        log_statistic("numFailures", self.num_failures);
        log_statistic("numPropagations", self.num_propagations);
        log_statistic("numSolutions", self.num_solutions);
        log_statistic("timeSpentInSolverInMilliseconds", self.time_spent.as_millis());
        log_statistic_postfix();
    }
}

/// Counters describing one solve call of the LP core.
#[derive(Clone, Copy, Debug, Default)]
pub struct LpStatistics {
    /// The number of simplex pivots performed.
    pub num_pivots: u64,
    /// The number of branch-and-bound nodes explored (1 for a pure LP solve).
    pub num_nodes: u64,
    /// Wall time spent in the solve call.
    pub time_spent: Duration,
}

impl LpStatistics {
    /// Write the statistics through [`log_statistic`], if statistic logging is configured.
    pub fn log(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("numPivots", self.num_pivots);
        log_statistic("numNodes", self.num_nodes);
        log_statistic("timeSpentInSolverInMilliseconds", self.time_spent.as_millis());
        log_statistic_postfix();
    }
}
