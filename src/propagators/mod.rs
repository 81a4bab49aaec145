//! The propagators of the solver, one per constraint kind.
//!
//! Propagators are a closed set dispatched through exhaustive matching in the propagation loop,
//! rather than through trait objects; see [`Propagator::propagate`].

pub(crate) mod all_different;
pub(crate) mod linear;

pub(crate) use all_different::AllDifferentPropagator;
pub(crate) use linear::LinearRelationPropagator;

use crate::engine::assignments::PropagationStatus;
use crate::engine::Assignments;

/// A propagator deduces domain tightenings implied by one constraint given the current domains.
#[derive(Clone, Debug)]
pub(crate) enum Propagator {
    LinearRelation(LinearRelationPropagator),
    AllDifferent(AllDifferentPropagator),
}

impl Propagator {
    /// Run the propagator once over the current domains.
    ///
    /// A propagator is *not* required to reach its own fixpoint in one call; the propagation
    /// loop re-invokes all propagators until no domain changes.
    pub(crate) fn propagate(&self, assignments: &mut Assignments) -> PropagationStatus {
        match self {
            Propagator::LinearRelation(propagator) => propagator.propagate(assignments),
            Propagator::AllDifferent(propagator) => propagator.propagate(assignments),
        }
    }
}

/// Propagate all propagators to a fixpoint: the loop only terminates once a full sweep leaves
/// every domain unchanged.
pub(crate) fn propagate_to_fixpoint(
    propagators: &[Propagator],
    assignments: &mut Assignments,
    num_propagations: &mut u64,
) -> PropagationStatus {
    loop {
        let trail_entries_before = assignments.num_trail_entries();

        for propagator in propagators {
            *num_propagations += 1;
            propagator.propagate(assignments)?;
        }

        if assignments.num_trail_entries() == trail_entries_before {
            return Ok(());
        }
    }
}
