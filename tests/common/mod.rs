#![allow(dead_code)]

use classforge::model::{Gender, Language, Student};
use classforge::roster::Roster;
use std::collections::BTreeMap;

pub fn student(name: &str, tier: u8) -> Student {
    Student::builder().name(name).tier(tier).build()
}

pub fn boy(name: &str, tier: u8, language: Language) -> Student {
    Student::builder()
        .name(name)
        .tier(tier)
        .gender(Gender::Boy)
        .language(language)
        .build()
}

pub fn with_friends(mut s: Student, friends: &[&str]) -> Student {
    s.friends = friends.iter().map(|f| f.to_string()).collect();
    s
}

pub fn locked(mut s: Student) -> Student {
    s.locked = true;
    s
}

/// Builds a roster from `(class, members)` groups.
pub fn roster(groups: Vec<(&str, Vec<Student>)>) -> Roster {
    let mut students = Vec::new();
    let mut partition = BTreeMap::new();
    for (class, members) in groups {
        let names: Vec<String> = members.iter().map(|s| s.name.clone()).collect();
        partition.insert(class.to_string(), names);
        students.extend(members);
    }
    Roster::new(students, partition).expect("valid test roster")
}

/// X holds three tier-1 students, Y holds one of each tier.
pub fn two_class_scenario() -> Roster {
    roster(vec![
        (
            "X",
            vec![
                student("a1", 1),
                student("a2", 1),
                student("a3", 1),
                student("a4", 2),
                student("a5", 2),
            ],
        ),
        (
            "Y",
            vec![
                student("b1", 1),
                student("b2", 2),
                student("b3", 3),
                student("b4", 4),
                student("b5", 5),
            ],
        ),
    ])
}

pub fn class_of(roster: &Roster, name: &str) -> String {
    roster.class_of(name).expect("student is assigned").to_string()
}
