use crate::basic_types::Trail;
use crate::butternut_assert_moderate;
use crate::butternut_assert_simple;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;

/// Indicates that a domain operation would leave a variable with no values.
///
/// This is an internal signal which triggers backtracking; it never surfaces to the caller of
/// the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EmptyDomain;

/// The result of propagating a single constraint or applying a single domain operation.
pub(crate) type PropagationStatus = Result<(), EmptyDomain>;

/// The domain of an integer variable: a bound interval with an explicit set of removed values
/// (holes) strictly inside the bounds.
///
/// Invariant: `lower_bound` and `upper_bound` are always values of the domain, i.e. they are
/// never in the hole set.
#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    holes: HashSet<i32>,
}

impl IntegerDomain {
    fn contains(&self, value: i32) -> bool {
        value >= self.lower_bound && value <= self.upper_bound && !self.holes.contains(&value)
    }
}

/// A single reversible domain change, recorded on the trail so that it can be undone when the
/// search backtracks.
#[derive(Clone, Copy, Debug)]
enum DomainOperation {
    LowerBound {
        variable: VariableId,
        previous: i32,
    },
    UpperBound {
        variable: VariableId,
        previous: i32,
    },
    Removal {
        variable: VariableId,
        value: i32,
    },
}

/// The domain store: an arena of integer domains indexed by [`VariableId`], with trail-backed
/// mutation.
///
/// All operations that shrink a domain fail with [`EmptyDomain`] if they would remove the last
/// value; in that case the store may be left with partially applied changes, which is fine
/// because the caller always backtracks past them.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignments {
    domains: KeyedVec<VariableId, IntegerDomain>,
    trail: Trail<DomainOperation>,
}

impl Assignments {
    /// Create a new variable with the domain `[lower_bound, upper_bound]`.
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        butternut_assert_simple!(
            lower_bound <= upper_bound,
            "cannot create a variable with an empty domain"
        );

        self.domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
            holes: HashSet::default(),
        })
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = VariableId> {
        self.domains.keys()
    }

    pub(crate) fn lower_bound(&self, variable: VariableId) -> i32 {
        self.domains[variable].lower_bound
    }

    pub(crate) fn upper_bound(&self, variable: VariableId) -> i32 {
        self.domains[variable].upper_bound
    }

    pub(crate) fn contains(&self, variable: VariableId, value: i32) -> bool {
        self.domains[variable].contains(value)
    }

    pub(crate) fn is_assigned(&self, variable: VariableId) -> bool {
        let domain = &self.domains[variable];
        domain.lower_bound == domain.upper_bound
    }

    /// The value of `variable` if its domain is a singleton.
    pub(crate) fn assigned_value(&self, variable: VariableId) -> Option<i32> {
        let domain = &self.domains[variable];
        (domain.lower_bound == domain.upper_bound).then_some(domain.lower_bound)
    }

    /// All variables assigned; used to detect that a search node is a solution.
    pub(crate) fn all_assigned(&self) -> bool {
        self.domains
            .keys()
            .all(|variable| self.is_assigned(variable))
    }

    /// Snapshot of all assigned values, in variable order.
    ///
    /// Must only be called when [`Assignments::all_assigned`] holds.
    pub(crate) fn snapshot(&self) -> KeyedVec<VariableId, i32> {
        let mut values = KeyedVec::default();
        for variable in self.domains.keys() {
            let value = self
                .assigned_value(variable)
                .expect("snapshot is only taken when all variables are assigned");
            let _ = values.push(value);
        }
        values
    }

    /// The number of domain operations applied so far; used by the propagation loop to detect a
    /// fixpoint.
    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    /// Raise the lower bound of `variable` to at least `bound`.
    pub(crate) fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        bound: i32,
    ) -> PropagationStatus {
        let domain = &self.domains[variable];

        if bound <= domain.lower_bound {
            return Ok(());
        }
        if bound > domain.upper_bound {
            return Err(EmptyDomain);
        }

        // The new lower bound must itself be a domain value; skip over holes.
        let mut new_bound = bound;
        while new_bound <= domain.upper_bound && domain.holes.contains(&new_bound) {
            new_bound += 1;
        }
        if new_bound > domain.upper_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainOperation::LowerBound {
            variable,
            previous: domain.lower_bound,
        });
        self.domains[variable].lower_bound = new_bound;

        Ok(())
    }

    /// Lower the upper bound of `variable` to at most `bound`.
    pub(crate) fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        bound: i32,
    ) -> PropagationStatus {
        let domain = &self.domains[variable];

        if bound >= domain.upper_bound {
            return Ok(());
        }
        if bound < domain.lower_bound {
            return Err(EmptyDomain);
        }

        let mut new_bound = bound;
        while new_bound >= domain.lower_bound && domain.holes.contains(&new_bound) {
            new_bound -= 1;
        }
        if new_bound < domain.lower_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainOperation::UpperBound {
            variable,
            previous: domain.upper_bound,
        });
        self.domains[variable].upper_bound = new_bound;

        Ok(())
    }

    /// Remove a single value from the domain of `variable`.
    ///
    /// Removing a bound value moves the bound inward instead of recording a hole, preserving the
    /// invariant that the bounds are domain values.
    pub(crate) fn remove_value(&mut self, variable: VariableId, value: i32) -> PropagationStatus {
        let domain = &self.domains[variable];

        if !domain.contains(value) {
            return Ok(());
        }
        if domain.lower_bound == domain.upper_bound {
            // `value` is the last domain value.
            return Err(EmptyDomain);
        }

        if value == domain.lower_bound {
            return self.tighten_lower_bound(variable, value + 1);
        }
        if value == domain.upper_bound {
            return self.tighten_upper_bound(variable, value - 1);
        }

        self.trail.push(DomainOperation::Removal { variable, value });
        let _ = self.domains[variable].holes.insert(value);

        Ok(())
    }

    /// Restrict the domain of `variable` to the single value `value`.
    pub(crate) fn assign(&mut self, variable: VariableId, value: i32) -> PropagationStatus {
        if !self.domains[variable].contains(value) {
            return Err(EmptyDomain);
        }

        self.tighten_lower_bound(variable, value)?;
        self.tighten_upper_bound(variable, value)
    }

    /// Start a new checkpoint; returns the checkpoint to restore to when undoing the changes
    /// made from this point on.
    pub(crate) fn new_checkpoint(&mut self) -> usize {
        self.trail.new_checkpoint()
    }

    /// Undo all domain operations recorded after `checkpoint`, restoring the exact domains that
    /// were active when the checkpoint was taken.
    pub(crate) fn backtrack_to(&mut self, checkpoint: usize) {
        butternut_assert_moderate!(checkpoint < self.trail.current_checkpoint());

        let Assignments { domains, trail } = self;

        for operation in trail.pop_to(checkpoint) {
            match operation {
                DomainOperation::LowerBound { variable, previous } => {
                    domains[variable].lower_bound = previous;
                }
                DomainOperation::UpperBound { variable, previous } => {
                    domains[variable].upper_bound = previous;
                }
                DomainOperation::Removal { variable, value } => {
                    let _ = domains[variable].holes.remove(&value);
                }
            }
        }
    }
}
