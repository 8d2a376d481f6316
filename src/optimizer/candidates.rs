use crate::consts::{PRIMARY_TIER, RELAXED_LANGUAGE_SPREAD_CEILING};
use crate::error::CfResult;
use crate::model::{Phase, SwapKind, SwapMove, SwapRecord};
use crate::optimizer::evaluator::{self, TierTarget};
use crate::roster::Roster;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::debug;

/// Which tiers may leave the loaded class and which may come back, per phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRules {
    pub phase: Phase,
    pub target: TierTarget,
    pub donors: &'static [u8],
    pub acceptors: &'static [u8],
    pub exclude_tier_one_pairs: bool,
}

impl PhaseRules {
    pub fn for_phase(phase: Phase, cap: usize) -> Self {
        Self {
            phase,
            target: TierTarget {
                tier: phase.tier(),
                cap,
            },
            donors: phase.donors(),
            acceptors: phase.acceptors(),
            exclude_tier_one_pairs: phase.excludes_tier_one_pairs(),
        }
    }

    pub fn primary(cap: usize) -> Self {
        Self::for_phase(Phase::Primary, cap)
    }

    pub fn secondary(cap: usize) -> Self {
        Self::for_phase(Phase::Secondary, cap)
    }
}

/// Unlocked members of `class` with a tier in `tiers` and no friend in the same class.
pub fn solos_with_tier(roster: &Roster, class: &str, tiers: &[u8]) -> Vec<String> {
    roster
        .class_students(class)
        .filter(|s| !s.locked && tiers.contains(&s.tier))
        .filter(|s| {
            !s.friends
                .iter()
                .any(|f| f != &s.name && roster.contains(class, f))
        })
        .map(|s| s.name.clone())
        .collect()
}

/// Friend pairs inside `class`, both unlocked, at least one with a tier in `tiers`.
///
/// A student may sit in several pairs, one per eligible friend. Members are scanned
/// in name order and friends in listed order; a mutual link yields a single pair.
pub fn pairs_with_tier(
    roster: &Roster,
    class: &str,
    tiers: &[u8],
    exclude_tier_one: bool,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut linked: HashSet<(&str, &str)> = HashSet::new();

    for student in roster.class_students(class) {
        if student.locked {
            continue;
        }
        for friend_name in &student.friends {
            if friend_name == &student.name || !roster.contains(class, friend_name) {
                continue;
            }
            let Some(friend) = roster.student(friend_name) else {
                continue;
            };
            if friend.locked {
                continue;
            }
            if !tiers.contains(&student.tier) && !tiers.contains(&friend.tier) {
                continue;
            }
            if exclude_tier_one && (student.tier == PRIMARY_TIER || friend.tier == PRIMARY_TIER) {
                continue;
            }

            let key = if student.name <= friend.name {
                (student.name.as_str(), friend.name.as_str())
            } else {
                (friend.name.as_str(), student.name.as_str())
            };
            if linked.insert(key) {
                pairs.push((student.name.clone(), friend.name.clone()));
            }
        }
    }
    pairs
}

/// Builds every improving candidate between the most-loaded and least-loaded classes.
///
/// Candidates come out in generation order: strict solos, strict pairs, relaxed solos.
pub fn generate(
    roster: &mut Roster,
    rules: &PhaseRules,
    max_class: &str,
    min_class: &str,
) -> CfResult<Vec<SwapRecord>> {
    let mut candidates = Vec::new();

    let solos_max = solos_with_tier(roster, max_class, rules.donors);
    let solos_min = solos_with_tier(roster, min_class, rules.acceptors);

    // Priority 1: solo strict
    for (out, inc) in solos_max.iter().cartesian_product(solos_min.iter()) {
        if !strict_match(roster, &[(out, inc)]) {
            continue;
        }
        let swap = SwapMove::new(max_class, vec![out.clone()], min_class, vec![inc.clone()]);
        push_if_improving(roster, rules, SwapKind::SoloStrict, swap, &mut candidates)?;
    }

    // Priority 2: pair strict
    let pairs_max = pairs_with_tier(roster, max_class, rules.donors, rules.exclude_tier_one_pairs);
    let pairs_min = pairs_with_tier(
        roster,
        min_class,
        rules.acceptors,
        rules.exclude_tier_one_pairs,
    );
    for ((a_out, b_out), (a_in, b_in)) in pairs_max.iter().cartesian_product(pairs_min.iter()) {
        if !strict_match(roster, &[(a_out, a_in), (b_out, b_in)]) {
            continue;
        }
        let swap = SwapMove::new(
            max_class,
            vec![a_out.clone(), b_out.clone()],
            min_class,
            vec![a_in.clone(), b_in.clone()],
        );
        push_if_improving(roster, rules, SwapKind::PairStrict, swap, &mut candidates)?;
    }

    // Priority 3: solo relaxed (same gender, different language)
    for (out, inc) in solos_max.iter().cartesian_product(solos_min.iter()) {
        if !relaxed_match(roster, out, inc) {
            continue;
        }
        let swap = SwapMove::new(max_class, vec![out.clone()], min_class, vec![inc.clone()]);
        push_if_improving(roster, rules, SwapKind::SoloRelaxed, swap, &mut candidates)?;
    }

    debug!(
        "{} candidates for {} -> {} ({} donor solos, {} acceptor solos, {}x{} pairs)",
        candidates.len(),
        max_class,
        min_class,
        solos_max.len(),
        solos_min.len(),
        pairs_max.len(),
        pairs_min.len()
    );

    Ok(candidates)
}

fn push_if_improving(
    roster: &mut Roster,
    rules: &PhaseRules,
    kind: SwapKind,
    swap: SwapMove,
    candidates: &mut Vec<SwapRecord>,
) -> CfResult<()> {
    let eval = evaluator::evaluate(roster, rules.target, &swap)?;
    if !eval.improves {
        return Ok(());
    }
    if kind == SwapKind::SoloRelaxed && eval.language_spread_after > RELAXED_LANGUAGE_SPREAD_CEILING
    {
        return Ok(());
    }
    candidates.push(SwapRecord::new(kind, rules.phase, swap, eval.deltas()));
    Ok(())
}

fn strict_match(roster: &Roster, pairs: &[(&String, &String)]) -> bool {
    pairs
        .iter()
        .all(|(a, b)| match (roster.student(a), roster.student(b)) {
            (Some(a), Some(b)) => a.matches_strict(b),
            _ => false,
        })
}

// Strict combinations are already covered by priority 1.
fn relaxed_match(roster: &Roster, a: &str, b: &str) -> bool {
    match (roster.student(a), roster.student(b)) {
        (Some(a), Some(b)) => a.gender == b.gender && a.language != b.language,
        _ => false,
    }
}
