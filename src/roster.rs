use crate::consts::{TIER_MAX, TIER_MIN};
use crate::error::{CfResult, ClassForgeError};
use crate::model::{Student, SwapMove};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The partition store: every student and the class each one belongs to.
///
/// Classes and members are kept in ordered collections so that iteration is
/// lexicographic and a simulated swap followed by its undo restores an
/// identical store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    students: BTreeMap<String, Student>,
    classes: BTreeMap<String, BTreeSet<String>>,
}

impl Roster {
    /// Builds a roster from normalized students and an initial partition.
    ///
    /// Fails if a name is duplicated, a tier is outside 1..=5, a member is
    /// unknown or listed twice, or a student has no class.
    pub fn new<I>(students: I, partition: BTreeMap<String, Vec<String>>) -> CfResult<Self>
    where
        I: IntoIterator<Item = Student>,
    {
        let mut by_name = BTreeMap::new();
        for student in students {
            if !(TIER_MIN..=TIER_MAX).contains(&student.tier) {
                return Err(ClassForgeError::Validation(format!(
                    "Student '{}' has tier {} (expected {}..={})",
                    student.name, student.tier, TIER_MIN, TIER_MAX
                )));
            }
            if by_name.contains_key(&student.name) {
                return Err(ClassForgeError::Validation(format!(
                    "Duplicate student '{}'",
                    student.name
                )));
            }
            by_name.insert(student.name.clone(), student);
        }

        if partition.is_empty() {
            return Err(ClassForgeError::Validation(
                "Roster needs at least one class".to_string(),
            ));
        }

        let mut assigned: HashSet<String> = HashSet::new();
        let mut classes = BTreeMap::new();
        for (class, members) in partition {
            let mut set = BTreeSet::new();
            for name in members {
                if !by_name.contains_key(&name) {
                    return Err(ClassForgeError::Validation(format!(
                        "Class '{}' lists unknown student '{}'",
                        class, name
                    )));
                }
                if !assigned.insert(name.clone()) {
                    return Err(ClassForgeError::Validation(format!(
                        "Student '{}' is assigned more than once",
                        name
                    )));
                }
                set.insert(name);
            }
            classes.insert(class, set);
        }

        if let Some(missing) = by_name.keys().find(|name| !assigned.contains(*name)) {
            return Err(ClassForgeError::Validation(format!(
                "Student '{}' is not assigned to any class",
                missing
            )));
        }

        Ok(Self {
            students: by_name,
            classes,
        })
    }

    pub fn student(&self, name: &str) -> Option<&Student> {
        self.students.get(name)
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn members(&self, class: &str) -> Option<&BTreeSet<String>> {
        self.classes.get(class)
    }

    /// Students of `class` resolved to their records, in name order.
    pub fn class_students<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a Student> + 'a {
        self.classes
            .get(class)
            .into_iter()
            .flatten()
            .filter_map(move |name| self.students.get(name))
    }

    pub fn contains(&self, class: &str, name: &str) -> bool {
        self.classes
            .get(class)
            .is_some_and(|members| members.contains(name))
    }

    pub fn class_of(&self, name: &str) -> Option<&str> {
        self.classes
            .iter()
            .find(|(_, members)| members.contains(name))
            .map(|(class, _)| class.as_str())
    }

    /// Read-only view of the partition, for export.
    pub fn assignments(&self) -> BTreeMap<String, Vec<String>> {
        self.classes
            .iter()
            .map(|(class, members)| (class.clone(), members.iter().cloned().collect()))
            .collect()
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.students.get(name).is_some_and(|s| s.locked)
    }

    /// Sets the lock flag. Returns `true` if the student was not locked before.
    pub fn lock(&mut self, name: &str) -> bool {
        match self.students.get_mut(name) {
            Some(student) if !student.locked => {
                student.locked = true;
                true
            }
            _ => false,
        }
    }

    /// Performs the swap permanently. Nothing is mutated if the move is invalid.
    pub fn apply(&mut self, swap: &SwapMove) -> CfResult<()> {
        self.check_move(swap)?;

        for name in &swap.students_out {
            self.transfer(name, &swap.from_class, &swap.to_class);
        }
        for name in &swap.students_in {
            self.transfer(name, &swap.to_class, &swap.from_class);
        }
        Ok(())
    }

    /// Reverts a previously applied swap.
    pub fn undo(&mut self, swap: &SwapMove) -> CfResult<()> {
        self.apply(&swap.reversed())
    }

    /// Verifies that classes are disjoint and cover every student exactly once.
    pub fn check_partition(&self) -> CfResult<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (class, members) in &self.classes {
            for name in members {
                if !self.students.contains_key(name) {
                    return Err(ClassForgeError::Validation(format!(
                        "Class '{}' holds unknown student '{}'",
                        class, name
                    )));
                }
                if !seen.insert(name) {
                    return Err(ClassForgeError::Validation(format!(
                        "Student '{}' appears in more than one class",
                        name
                    )));
                }
            }
        }
        if seen.len() != self.students.len() {
            return Err(ClassForgeError::Validation(format!(
                "{} of {} students are assigned",
                seen.len(),
                self.students.len()
            )));
        }
        Ok(())
    }

    fn check_move(&self, swap: &SwapMove) -> CfResult<()> {
        if swap.from_class == swap.to_class {
            return Err(ClassForgeError::Validation(format!(
                "Swap source and destination are both '{}'",
                swap.from_class
            )));
        }
        if swap.students_out.len() != swap.students_in.len() {
            return Err(ClassForgeError::Validation(format!(
                "Swap moves {} out of '{}' but {} in; class sizes must stay constant",
                swap.students_out.len(),
                swap.from_class,
                swap.students_in.len()
            )));
        }

        let mut distinct = HashSet::new();
        if let Some(dup) = swap.participants().find(|name| !distinct.insert(*name)) {
            return Err(ClassForgeError::Validation(format!(
                "Student '{}' appears twice in one swap",
                dup
            )));
        }

        for (names, class) in [
            (&swap.students_out, &swap.from_class),
            (&swap.students_in, &swap.to_class),
        ] {
            let members = self.classes.get(class).ok_or_else(|| {
                ClassForgeError::Validation(format!("Unknown class '{}'", class))
            })?;
            if let Some(stray) = names.iter().find(|name| !members.contains(*name)) {
                return Err(ClassForgeError::Validation(format!(
                    "Student '{}' is not a member of '{}'",
                    stray, class
                )));
            }
        }
        Ok(())
    }

    // Callers validate membership first.
    fn transfer(&mut self, name: &str, from: &str, to: &str) {
        if let Some(members) = self.classes.get_mut(from) {
            members.remove(name);
        }
        if let Some(members) = self.classes.get_mut(to) {
            members.insert(name.to_string());
        }
    }
}
