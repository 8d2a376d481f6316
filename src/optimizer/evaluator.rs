use crate::error::CfResult;
use crate::metrics::{SpreadSummary, TierMetrics};
use crate::model::{SwapDeltas, SwapMove};
use crate::roster::Roster;
use serde::Serialize;

/// The tier a phase balances and the per-class cap it is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierTarget {
    pub tier: u8,
    pub cap: usize,
}

/// Outcome of a trial swap. Every delta is `before - after`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub improves: bool,
    pub delta_spread: i32,
    pub delta_excess_groups: i32,
    pub delta_total_excess: i32,
    pub delta_boys: i32,
    pub delta_girls: i32,
    pub delta_language: i32,
    pub language_spread_after: usize,
}

impl Evaluation {
    pub fn delta_gender(&self) -> i32 {
        self.delta_boys + self.delta_girls
    }

    pub fn deltas(&self) -> SwapDeltas {
        SwapDeltas {
            main: self.delta_spread,
            gender: self.delta_gender(),
            language: self.delta_language,
        }
    }
}

/// Applies `swap`, runs `measure` on the mutated roster, then reverts.
///
/// The `&mut` borrow keeps the hypothetical state invisible to anyone else.
pub fn simulate<T, F>(roster: &mut Roster, swap: &SwapMove, measure: F) -> CfResult<T>
where
    F: FnOnce(&Roster) -> T,
{
    roster.apply(swap)?;
    let result = measure(roster);
    roster.undo(swap)?;
    Ok(result)
}

pub fn evaluate(roster: &mut Roster, target: TierTarget, swap: &SwapMove) -> CfResult<Evaluation> {
    let tier_before = TierMetrics::measure(roster, target.tier, target.cap);
    let spreads_before = SpreadSummary::capture(roster);

    let (tier_after, spreads_after) = simulate(roster, swap, |r| {
        (
            TierMetrics::measure(r, target.tier, target.cap),
            SpreadSummary::capture(r),
        )
    })?;

    let delta_spread = diff(tier_before.spread, tier_after.spread);
    let delta_excess_groups = diff(tier_before.excess_groups, tier_after.excess_groups);
    let delta_total_excess = diff(tier_before.total_excess, tier_after.total_excess);

    Ok(Evaluation {
        improves: improves(delta_spread, delta_excess_groups, delta_total_excess),
        delta_spread,
        delta_excess_groups,
        delta_total_excess,
        delta_boys: diff(spreads_before.boys, spreads_after.boys),
        delta_girls: diff(spreads_before.girls, spreads_after.girls),
        delta_language: diff(spreads_before.fluent, spreads_after.fluent),
        language_spread_after: spreads_after.fluent,
    })
}

/// Lexicographic rule: spread first, then excess-group count, then total excess.
pub fn improves(delta_spread: i32, delta_excess_groups: i32, delta_total_excess: i32) -> bool {
    delta_spread > 0
        || (delta_spread == 0 && delta_excess_groups > 0)
        || (delta_spread == 0 && delta_excess_groups == 0 && delta_total_excess > 0)
}

#[inline]
fn diff(before: usize, after: usize) -> i32 {
    before as i32 - after as i32
}
