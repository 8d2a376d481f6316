use crate::consts::{
    PRIMARY_ACCEPTORS, PRIMARY_DONORS, PRIMARY_TIER, SECONDARY_ACCEPTORS, SECONDARY_DONORS,
    SECONDARY_TIER,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use typed_builder::TypedBuilder;

/// Parsing accepts the English and Greek sheet spellings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[strum(
        to_string = "B",
        serialize = "BOY",
        serialize = "M",
        serialize = "A",
        serialize = "Α"
    )]
    Boy,
    #[strum(
        to_string = "G",
        serialize = "GIRL",
        serialize = "F",
        serialize = "K",
        serialize = "Κ"
    )]
    Girl,
}

/// Good knowledge of the language of instruction.
///
/// The single letter `N` means "yes" (ΝΑΙ) in the source sheets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[strum(
        to_string = "YES",
        serialize = "Y",
        serialize = "FLUENT",
        serialize = "N",
        serialize = "Ν"
    )]
    Fluent,
    #[strum(
        to_string = "NO",
        serialize = "O",
        serialize = "Ο",
        serialize = "LIMITED"
    )]
    Limited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct Student {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default = 1)]
    pub tier: u8,
    #[builder(default = Gender::Girl)]
    pub gender: Gender,
    #[builder(default = Language::Fluent)]
    pub language: Language,
    #[builder(default)]
    pub friends: Vec<String>,
    #[builder(default)]
    pub locked: bool,
}

impl Student {
    /// Same gender and same language: the strict matching rule.
    pub fn matches_strict(&self, other: &Student) -> bool {
        self.gender == other.gender && self.language == other.language
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Primary,
    Secondary,
}

impl Phase {
    /// The tier whose per-class count this phase balances.
    pub fn tier(self) -> u8 {
        match self {
            Phase::Primary => PRIMARY_TIER,
            Phase::Secondary => SECONDARY_TIER,
        }
    }

    pub fn donors(self) -> &'static [u8] {
        match self {
            Phase::Primary => PRIMARY_DONORS,
            Phase::Secondary => SECONDARY_DONORS,
        }
    }

    pub fn acceptors(self) -> &'static [u8] {
        match self {
            Phase::Primary => PRIMARY_ACCEPTORS,
            Phase::Secondary => SECONDARY_ACCEPTORS,
        }
    }

    pub fn excludes_tier_one_pairs(self) -> bool {
        matches!(self, Phase::Secondary)
    }
}

/// The three candidate classes, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SwapKind {
    SoloStrict,
    PairStrict,
    SoloRelaxed,
}

impl SwapKind {
    pub fn priority(self) -> u8 {
        match self {
            SwapKind::SoloStrict => 1,
            SwapKind::PairStrict => 2,
            SwapKind::SoloRelaxed => 3,
        }
    }

    pub fn label(self, phase: Phase) -> String {
        let donors = tier_span(phase.donors());
        let acceptors = tier_span(phase.acceptors());
        match self {
            SwapKind::SoloStrict => format!("Solo({})<->Solo({}) strict", donors, acceptors),
            SwapKind::PairStrict => format!("Pair({})<->Pair({}) strict", donors, acceptors),
            SwapKind::SoloRelaxed => format!("Solo({})<->Solo({}) relaxed", donors, acceptors),
        }
    }
}

fn tier_span(tiers: &[u8]) -> String {
    match (tiers.first(), tiers.last()) {
        (Some(first), Some(last)) if first == last => format!("T{}", first),
        (Some(first), Some(last)) => format!("T{}-{}", first, last),
        _ => "T?".to_string(),
    }
}

/// A reciprocal exchange: `students_out` go `from_class -> to_class`,
/// `students_in` go `to_class -> from_class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMove {
    pub from_class: String,
    pub students_out: Vec<String>,
    pub to_class: String,
    pub students_in: Vec<String>,
}

impl SwapMove {
    pub fn new(
        from_class: impl Into<String>,
        students_out: Vec<String>,
        to_class: impl Into<String>,
        students_in: Vec<String>,
    ) -> Self {
        Self {
            from_class: from_class.into(),
            students_out,
            to_class: to_class.into(),
            students_in,
        }
    }

    /// The same move with the roles of both sides exchanged. Applying it undoes `self`.
    pub fn reversed(&self) -> SwapMove {
        SwapMove {
            from_class: self.to_class.clone(),
            students_out: self.students_in.clone(),
            to_class: self.from_class.clone(),
            students_in: self.students_out.clone(),
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.students_out
            .iter()
            .chain(self.students_in.iter())
            .map(String::as_str)
    }

    pub fn moved_count(&self) -> usize {
        self.students_out.len() + self.students_in.len()
    }
}

/// Metric deltas of a swap, expressed as `before - after` (positive is better).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDeltas {
    pub main: i32,
    pub gender: i32,
    pub language: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub kind: SwapKind,
    pub phase: Phase,
    pub priority: u8,
    #[serde(flatten)]
    pub swap: SwapMove,
    pub deltas: SwapDeltas,
}

impl SwapRecord {
    pub fn new(kind: SwapKind, phase: Phase, swap: SwapMove, deltas: SwapDeltas) -> Self {
        Self {
            kind,
            phase,
            priority: kind.priority(),
            swap,
            deltas,
        }
    }

    pub fn label(&self) -> String {
        self.kind.label(self.phase)
    }
}
