//! Per-class counts and the spread/excess aggregates derived from them.
//!
//! Everything here is a pure function of the current roster; results must be
//! recomputed after every mutation.

use crate::consts::{TIER_COUNT, TIER_MIN};
use crate::model::{Gender, Language, Student};
use crate::roster::Roster;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Tier(u8),
    Gender(Gender),
    Language(Language),
}

impl Attribute {
    pub fn matches(self, student: &Student) -> bool {
        match self {
            Attribute::Tier(tier) => student.tier == tier,
            Attribute::Gender(gender) => student.gender == gender,
            Attribute::Language(language) => student.language == language,
        }
    }
}

pub type ClassCounts = BTreeMap<String, usize>;

pub fn count_of(roster: &Roster, class: &str, attribute: Attribute) -> usize {
    roster
        .class_students(class)
        .filter(|s| attribute.matches(s))
        .count()
}

pub fn counts(roster: &Roster, attribute: Attribute) -> ClassCounts {
    roster
        .class_names()
        .map(|class| (class.to_string(), count_of(roster, class, attribute)))
        .collect()
}

/// Max minus min over classes. Zero when there are no classes.
pub fn spread_of(counts: &ClassCounts) -> usize {
    let max = counts.values().max().copied().unwrap_or(0);
    let min = counts.values().min().copied().unwrap_or(0);
    max - min
}

pub fn excess_count_of(counts: &ClassCounts, cap: usize) -> usize {
    counts.values().filter(|&&c| c > cap).count()
}

pub fn total_excess_of(counts: &ClassCounts, cap: usize) -> usize {
    counts.values().map(|&c| c.saturating_sub(cap)).sum()
}

pub fn spread(roster: &Roster, attribute: Attribute) -> usize {
    spread_of(&counts(roster, attribute))
}

pub fn excess_count(roster: &Roster, attribute: Attribute, cap: usize) -> usize {
    excess_count_of(&counts(roster, attribute), cap)
}

pub fn total_excess(roster: &Roster, attribute: Attribute, cap: usize) -> usize {
    total_excess_of(&counts(roster, attribute), cap)
}

/// The most- and least-loaded classes. Ties resolve to the lexicographically
/// first class name.
pub fn extremes(counts: &ClassCounts) -> Option<(String, String)> {
    let mut iter = counts.iter();
    let (first, &first_count) = iter.next()?;
    let (mut max_class, mut max_count) = (first, first_count);
    let (mut min_class, mut min_count) = (first, first_count);
    for (class, &count) in iter {
        if count > max_count {
            max_class = class;
            max_count = count;
        }
        if count < min_count {
            min_class = class;
            min_count = count;
        }
    }
    Some((max_class.clone(), min_class.clone()))
}

/// Spread, excess-group count and total excess of one tier against a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierMetrics {
    pub spread: usize,
    pub excess_groups: usize,
    pub total_excess: usize,
}

impl TierMetrics {
    pub fn measure(roster: &Roster, tier: u8, cap: usize) -> Self {
        Self::from_counts(&counts(roster, Attribute::Tier(tier)), cap)
    }

    pub fn from_counts(counts: &ClassCounts, cap: usize) -> Self {
        Self {
            spread: spread_of(counts),
            excess_groups: excess_count_of(counts, cap),
            total_excess: total_excess_of(counts, cap),
        }
    }
}

/// Spreads of every tracked attribute value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpreadSummary {
    pub boys: usize,
    pub girls: usize,
    pub fluent: usize,
    pub tiers: [usize; TIER_COUNT],
}

impl SpreadSummary {
    pub fn capture(roster: &Roster) -> Self {
        let mut tiers = [0; TIER_COUNT];
        for (idx, slot) in tiers.iter_mut().enumerate() {
            *slot = spread(roster, Attribute::Tier(TIER_MIN + idx as u8));
        }
        Self {
            boys: spread(roster, Attribute::Gender(Gender::Boy)),
            girls: spread(roster, Attribute::Gender(Gender::Girl)),
            fluent: spread(roster, Attribute::Language(Language::Fluent)),
            tiers,
        }
    }

    pub fn tier(&self, tier: u8) -> usize {
        self.tiers
            .get(tier.wrapping_sub(TIER_MIN) as usize)
            .copied()
            .unwrap_or(0)
    }
}

pub fn spread_summary(roster: &Roster) -> SpreadSummary {
    SpreadSummary::capture(roster)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassStats {
    pub class: String,
    pub total: usize,
    pub boys: usize,
    pub girls: usize,
    pub fluent: usize,
    pub limited: usize,
    pub tiers: [usize; TIER_COUNT],
}

/// Per-class distribution plus the final spreads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsTable {
    pub classes: Vec<ClassStats>,
    pub spreads: SpreadSummary,
}

pub fn stats_table(roster: &Roster) -> StatsTable {
    let classes = roster
        .class_names()
        .map(|class| {
            let mut stats = ClassStats {
                class: class.to_string(),
                total: 0,
                boys: 0,
                girls: 0,
                fluent: 0,
                limited: 0,
                tiers: [0; TIER_COUNT],
            };
            for student in roster.class_students(class) {
                stats.total += 1;
                match student.gender {
                    Gender::Boy => stats.boys += 1,
                    Gender::Girl => stats.girls += 1,
                }
                match student.language {
                    Language::Fluent => stats.fluent += 1,
                    Language::Limited => stats.limited += 1,
                }
                if let Some(slot) = stats
                    .tiers
                    .get_mut(student.tier.wrapping_sub(TIER_MIN) as usize)
                {
                    *slot += 1;
                }
            }
            stats
        })
        .collect();

    StatsTable {
        classes,
        spreads: spread_summary(roster),
    }
}
