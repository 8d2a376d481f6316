use crate::consts::{DYNAMIC_CAP_CEILING, PRIMARY_TIER, SECONDARY_TIER};
use crate::error::{CfResult, ClassForgeError};
use crate::metrics::{self, Attribute, ClassCounts};
use crate::model::SwapMove;
use crate::optimizer::evaluator;
use crate::roster::Roster;
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// Locks every tier-1 student and both ends of any friend link touching one.
///
/// Returns how many distinct students the step covers.
pub fn freeze_tier_one(roster: &mut Roster) -> usize {
    let mut targets: BTreeSet<String> = BTreeSet::new();

    for student in roster.students() {
        if student.tier == PRIMARY_TIER {
            targets.insert(student.name.clone());
        }
        for friend_name in &student.friends {
            // Unknown references are ignored.
            let Some(friend) = roster.student(friend_name) else {
                continue;
            };
            if student.tier == PRIMARY_TIER || friend.tier == PRIMARY_TIER {
                targets.insert(student.name.clone());
                targets.insert(friend.name.clone());
            }
        }
    }

    let newly_locked = targets.iter().filter(|name| roster.lock(name)).count();
    info!(
        "Froze {} students ({} newly locked)",
        targets.len(),
        newly_locked
    );
    targets.len()
}

/// `min(ceil(tier5_total / class_count), 3)`.
pub fn dynamic_secondary_cap(roster: &Roster) -> usize {
    let classes = roster.class_count();
    if classes == 0 {
        return 0;
    }
    let total = roster
        .students()
        .filter(|s| s.tier == SECONDARY_TIER)
        .count();
    total.div_ceil(classes).min(DYNAMIC_CAP_CEILING)
}

/// Holds the per-class tier-1 counts taken at the end of phase one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenGuard {
    snapshot: ClassCounts,
}

impl FrozenGuard {
    pub fn capture(roster: &Roster) -> Self {
        let snapshot = tier_one_counts(roster);
        debug!("Captured tier-1 snapshot: {:?}", snapshot);
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &ClassCounts {
        &self.snapshot
    }

    /// A swap is safe when it touches no locked student and leaves the
    /// tier-1 vector exactly as it is before the swap.
    pub fn is_safe(&self, roster: &mut Roster, swap: &SwapMove) -> CfResult<bool> {
        if swap.participants().any(|name| roster.is_locked(name)) {
            return Ok(false);
        }
        let before = tier_one_counts(roster);
        let after = evaluator::simulate(roster, swap, tier_one_counts)?;
        Ok(before == after)
    }

    /// Fails hard if the current tier-1 vector differs from the snapshot.
    pub fn validate(&self, roster: &Roster) -> CfResult<()> {
        let current = tier_one_counts(roster);
        if current == self.snapshot {
            return Ok(());
        }

        let classes: BTreeSet<&String> = self.snapshot.keys().chain(current.keys()).collect();
        for class in classes {
            let expected = self.snapshot.get(class).copied().unwrap_or(0);
            let actual = current.get(class).copied().unwrap_or(0);
            if expected != actual {
                error!(
                    "Tier-1 count of class '{}' moved from {} to {}",
                    class, expected, actual
                );
                return Err(ClassForgeError::FrozenInvariantViolated {
                    class: class.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

fn tier_one_counts(roster: &Roster) -> ClassCounts {
    metrics::counts(roster, Attribute::Tier(PRIMARY_TIER))
}
