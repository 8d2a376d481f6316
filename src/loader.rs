//! Roster CSV ingestion.
//!
//! Malformed attribute cells never fail the load: they are defaulted and a
//! warning is collected for the caller to surface.

use crate::consts::{TIER_MAX, TIER_MIN};
use crate::error::{CfResult, ClassForgeError};
use crate::model::{Gender, Language, Student};
use crate::roster::Roster;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: Roster,
    pub warnings: Vec<String>,
}

struct Columns {
    name: usize,
    class: usize,
    gender: Option<usize>,
    language: Option<usize>,
    tier: Option<usize>,
    friends: Option<usize>,
    locked: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> CfResult<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect();

        let required = |key: &str| {
            index.get(key).copied().ok_or_else(|| {
                ClassForgeError::Config(format!("Roster is missing the '{}' column", key))
            })
        };

        Ok(Self {
            name: required("NAME")?,
            class: required("CLASS")?,
            gender: index.get("GENDER").copied(),
            language: index.get("LANGUAGE").copied(),
            tier: index.get("TIER").copied(),
            friends: index.get("FRIENDS").copied(),
            locked: index.get("LOCKED").copied(),
        })
    }
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> CfResult<LoadedRoster> {
    let path = path.as_ref();
    info!("Loading roster: {}", path.display());
    let file = File::open(path)?;
    load_roster_from_reader(file)
}

pub fn load_roster_from_reader<R: Read>(reader: R) -> CfResult<LoadedRoster> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.headers()?)?;

    let mut warnings = Vec::new();
    let mut students = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut partition: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let name = cell(Some(columns.name));
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            warnings.push(format!("Duplicate student '{}' skipped", name));
            continue;
        }
        let class = cell(Some(columns.class));
        if class.is_empty() {
            warnings.push(format!("Student '{}' has no class and was skipped", name));
            continue;
        }

        let student = Student::builder()
            .name(name)
            .tier(parse_tier(name, cell(columns.tier), &mut warnings))
            .gender(parse_gender(name, cell(columns.gender), &mut warnings))
            .language(parse_language(name, cell(columns.language), &mut warnings))
            .friends(parse_friends(cell(columns.friends)))
            .locked(parse_locked(cell(columns.locked)))
            .build();

        partition
            .entry(class.to_string())
            .or_default()
            .push(student.name.clone());
        students.push(student);
    }

    for warning in &warnings {
        debug!("{}", warning);
    }
    info!(
        "Loaded {} students in {} classes ({} warnings)",
        students.len(),
        partition.len(),
        warnings.len()
    );

    let roster = Roster::new(students, partition)?;
    Ok(LoadedRoster { roster, warnings })
}

/// Trimmed, upper-cased, spaces replaced by underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase().replace(' ', "_")
}

fn parse_tier(name: &str, raw: &str, warnings: &mut Vec<String>) -> u8 {
    match raw.parse::<u8>() {
        Ok(tier) if (TIER_MIN..=TIER_MAX).contains(&tier) => tier,
        _ => {
            warnings.push(format!(
                "Student '{}': tier '{}' is not in {}..={}, using {}",
                name, raw, TIER_MIN, TIER_MAX, TIER_MIN
            ));
            TIER_MIN
        }
    }
}

fn parse_gender(name: &str, raw: &str, warnings: &mut Vec<String>) -> Gender {
    Gender::from_str(&raw.to_uppercase()).unwrap_or_else(|_| {
        warnings.push(format!(
            "Student '{}': unknown gender '{}', using {}",
            name,
            raw,
            Gender::Girl
        ));
        Gender::Girl
    })
}

fn parse_language(name: &str, raw: &str, warnings: &mut Vec<String>) -> Language {
    Language::from_str(&raw.to_uppercase()).unwrap_or_else(|_| {
        warnings.push(format!(
            "Student '{}': unknown language value '{}', using {}",
            name,
            raw,
            Language::Fluent
        ));
        Language::Fluent
    })
}

fn parse_friends(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_locked(raw: &str) -> bool {
    matches!(
        raw.to_uppercase().as_str(),
        "LOCKED" | "TRUE" | "YES" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_normalization() {
        assert_eq!(normalize_header("  locked "), "LOCKED");
        assert_eq!(normalize_header("Class Name"), "CLASS_NAME");
    }

    #[test]
    fn test_friends_accept_both_separators() {
        assert_eq!(
            parse_friends("ann, bob;; carl "),
            vec!["ann".to_string(), "bob".to_string(), "carl".to_string()]
        );
        assert!(parse_friends("").is_empty());
    }

    #[test]
    fn test_greek_spellings() {
        let mut warnings = Vec::new();
        assert_eq!(parse_gender("x", "α", &mut warnings), Gender::Boy);
        assert_eq!(parse_gender("x", "Κ", &mut warnings), Gender::Girl);
        assert_eq!(parse_language("x", "ν", &mut warnings), Language::Fluent);
        assert_eq!(parse_language("x", "Ο", &mut warnings), Language::Limited);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_tier_falls_back_with_warning() {
        let mut warnings = Vec::new();
        assert_eq!(parse_tier("x", "7", &mut warnings), 1);
        assert_eq!(parse_tier("x", "", &mut warnings), 1);
        assert_eq!(parse_tier("x", "4", &mut warnings), 4);
        assert_eq!(warnings.len(), 2);
    }
}
