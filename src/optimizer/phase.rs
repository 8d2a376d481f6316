use crate::config::PhaseSettings;
use crate::error::CfResult;
use crate::metrics::{self, Attribute, TierMetrics};
use crate::model::{Phase, SwapRecord};
use crate::optimizer::candidates::{self, PhaseRules};
use crate::optimizer::freeze::FrozenGuard;
use crate::optimizer::runner::ProgressCallback;
use crate::optimizer::selector;
use crate::roster::Roster;
use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Starvation {
    #[strum(to_string = "no candidates")]
    NoCandidates,
    #[strum(to_string = "no safe candidates")]
    NoSafeCandidates,
    #[strum(to_string = "no selectable candidate")]
    NoSelection,
}

/// Why a phase stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    Goal { iteration: usize, excess_cleared: bool },
    Starvation { iteration: usize, cause: Starvation },
    IterationCap { iterations: usize },
}

impl StopReason {
    pub fn is_goal(&self) -> bool {
        matches!(self, StopReason::Goal { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PhaseState {
    Scanning,
    Applying(SwapRecord),
    Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub tier: u8,
    pub cap: usize,
    pub spread_goal: usize,
    pub stop: StopReason,
    /// Goal checks performed, including the one that ended the phase.
    pub iterations: usize,
    pub spread_before: usize,
    pub spread_after: usize,
    pub excess_groups_after: usize,
    pub swaps: Vec<SwapRecord>,
}

/// Runs one greedy balancing phase to completion.
///
/// With a `guard`, every candidate must pass the safety filter and the
/// tier-1 snapshot is re-validated after each applied swap; a mismatch
/// aborts with `FrozenInvariantViolated`.
pub fn run_phase<CB: ProgressCallback + ?Sized>(
    roster: &mut Roster,
    rules: &PhaseRules,
    settings: &PhaseSettings,
    guard: Option<&FrozenGuard>,
    callback: &CB,
) -> CfResult<PhaseOutcome> {
    let tier = rules.target.tier;
    let cap = rules.target.cap;
    let before = TierMetrics::measure(roster, tier, cap);

    info!(
        "Phase {} (tier {}): spread {}, {} classes over cap {}",
        rules.phase, tier, before.spread, before.excess_groups, cap
    );

    let mut swaps: Vec<SwapRecord> = Vec::new();
    let mut iteration = 0;
    let mut state = PhaseState::Scanning;

    let stop = loop {
        state = match state {
            PhaseState::Scanning => {
                iteration += 1;
                scan(roster, rules, settings, guard, iteration)?
            }
            PhaseState::Applying(record) => {
                roster.apply(&record.swap)?;
                if let Some(guard) = guard {
                    guard.validate(roster)?;
                }
                let spread = metrics::spread(roster, Attribute::Tier(tier));
                debug!(
                    "#{} {}: {} {:?} <-> {} {:?} (spread {})",
                    swaps.len() + 1,
                    record.label(),
                    record.swap.from_class,
                    record.swap.students_out,
                    record.swap.to_class,
                    record.swap.students_in,
                    spread
                );
                callback.on_swap(&record, spread);
                swaps.push(record);
                PhaseState::Scanning
            }
            PhaseState::Stopped(reason) => break reason,
        };
    };

    let after = TierMetrics::measure(roster, tier, cap);
    match stop {
        StopReason::Goal { .. } => info!(
            "Phase {} reached spread {} after {} swaps",
            rules.phase,
            after.spread,
            swaps.len()
        ),
        StopReason::Starvation { iteration, cause } => warn!(
            "Phase {} stopped at iteration {}: {} (spread {})",
            rules.phase, iteration, cause, after.spread
        ),
        StopReason::IterationCap { iterations } => warn!(
            "Phase {} hit the iteration cap of {} (spread {})",
            rules.phase, iterations, after.spread
        ),
    }
    if after.excess_groups > 0 {
        warn!(
            "{} classes still hold more than {} tier-{} students",
            after.excess_groups, cap, tier
        );
    }

    let outcome = PhaseOutcome {
        phase: rules.phase,
        tier,
        cap,
        spread_goal: settings.spread_goal,
        stop,
        iterations: iteration,
        spread_before: before.spread,
        spread_after: after.spread,
        excess_groups_after: after.excess_groups,
        swaps,
    };
    callback.on_phase_end(&outcome);
    Ok(outcome)
}

fn scan(
    roster: &mut Roster,
    rules: &PhaseRules,
    settings: &PhaseSettings,
    guard: Option<&FrozenGuard>,
    iteration: usize,
) -> CfResult<PhaseState> {
    let counts = metrics::counts(roster, Attribute::Tier(rules.target.tier));
    let current = TierMetrics::from_counts(&counts, rules.target.cap);

    if current.spread <= settings.spread_goal {
        return Ok(PhaseState::Stopped(StopReason::Goal {
            iteration,
            excess_cleared: current.excess_groups == 0,
        }));
    }
    if iteration > settings.max_iterations {
        return Ok(PhaseState::Stopped(StopReason::IterationCap {
            iterations: settings.max_iterations,
        }));
    }

    let starved = |cause| {
        Ok(PhaseState::Stopped(StopReason::Starvation { iteration, cause }))
    };

    let Some((max_class, min_class)) = metrics::extremes(&counts) else {
        return starved(Starvation::NoCandidates);
    };

    let mut found = candidates::generate(roster, rules, &max_class, &min_class)?;
    if found.is_empty() {
        return starved(Starvation::NoCandidates);
    }

    if let Some(guard) = guard {
        let mut safe = Vec::with_capacity(found.len());
        for record in found {
            if guard.is_safe(roster, &record.swap)? {
                safe.push(record);
            }
        }
        if safe.is_empty() {
            return starved(Starvation::NoSafeCandidates);
        }
        found = safe;
    }

    match selector::select_best(found) {
        Some(best) => Ok(PhaseState::Applying(best)),
        None => starved(Starvation::NoSelection),
    }
}
