mod common;

use classforge::model::SwapMove;
use classforge::roster::Roster;
use classforge::ClassForgeError;
use common::{roster, student, two_class_scenario};
use rstest::rstest;
use std::collections::BTreeMap;

fn partition(groups: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    groups
        .iter()
        .map(|(class, names)| {
            (
                class.to_string(),
                names.iter().map(|n| n.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_new_rejects_double_assignment() {
    let students = vec![student("a", 1), student("b", 2)];
    let err = Roster::new(students, partition(&[("X", &["a", "b"]), ("Y", &["a"])]))
        .unwrap_err();
    assert!(matches!(err, ClassForgeError::Validation(_)));
}

#[test]
fn test_new_rejects_unassigned_student() {
    let students = vec![student("a", 1), student("b", 2)];
    assert!(Roster::new(students, partition(&[("X", &["a"])])).is_err());
}

#[test]
fn test_new_rejects_unknown_member() {
    let students = vec![student("a", 1)];
    assert!(Roster::new(students, partition(&[("X", &["a", "ghost"])])).is_err());
}

#[rstest]
#[case(0)]
#[case(6)]
fn test_new_rejects_tier_out_of_range(#[case] tier: u8) {
    let students = vec![student("a", tier)];
    assert!(Roster::new(students, partition(&[("X", &["a"])])).is_err());
}

#[test]
fn test_classes_iterate_in_name_order() {
    let r = roster(vec![
        ("Gamma", vec![student("g", 1)]),
        ("Alpha", vec![student("z", 1), student("a", 2)]),
    ]);
    let classes: Vec<&str> = r.class_names().collect();
    assert_eq!(classes, vec!["Alpha", "Gamma"]);
    let members: Vec<&str> = r.class_students("Alpha").map(|s| s.name.as_str()).collect();
    assert_eq!(members, vec!["a", "z"]);
}

#[test]
fn test_apply_then_undo_restores_identical_store() {
    let mut r = two_class_scenario();
    let original = r.clone();
    let swap = SwapMove::new("X", vec!["a1".into()], "Y", vec!["b2".into()]);

    r.apply(&swap).unwrap();
    assert_eq!(r.class_of("a1"), Some("Y"));
    assert_eq!(r.class_of("b2"), Some("X"));
    r.check_partition().unwrap();

    r.undo(&swap).unwrap();
    assert_eq!(r, original);
}

#[test]
fn test_apply_keeps_class_sizes() {
    let mut r = two_class_scenario();
    let swap = SwapMove::new(
        "X",
        vec!["a1".into(), "a4".into()],
        "Y",
        vec!["b3".into(), "b5".into()],
    );
    r.apply(&swap).unwrap();
    assert_eq!(r.members("X").unwrap().len(), 5);
    assert_eq!(r.members("Y").unwrap().len(), 5);
}

#[rstest]
#[case::wrong_source(SwapMove::new("X", vec!["b1".into()], "Y", vec!["b2".into()]))]
#[case::wrong_destination(SwapMove::new("X", vec!["a1".into()], "Y", vec!["a2".into()]))]
#[case::same_class(SwapMove::new("X", vec!["a1".into()], "X", vec!["a2".into()]))]
#[case::uneven(SwapMove::new("X", vec!["a1".into(), "a2".into()], "Y", vec!["b2".into()]))]
#[case::unknown_class(SwapMove::new("X", vec!["a1".into()], "Z", vec!["b2".into()]))]
fn test_invalid_moves_leave_store_untouched(#[case] swap: SwapMove) {
    let mut r = two_class_scenario();
    let original = r.clone();
    assert!(r.apply(&swap).is_err());
    assert_eq!(r, original);
}

#[test]
fn test_lock_reports_first_lock_only() {
    let mut r = two_class_scenario();
    assert!(r.lock("a1"));
    assert!(!r.lock("a1"));
    assert!(!r.lock("ghost"));
    assert!(r.is_locked("a1"));
}
