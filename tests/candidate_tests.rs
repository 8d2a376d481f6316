mod common;

use classforge::model::{Language, SwapKind, SwapMove};
use classforge::optimizer::candidates::{generate, pairs_with_tier, solos_with_tier};
use classforge::optimizer::evaluator::{evaluate, TierTarget};
use classforge::optimizer::PhaseRules;
use classforge::roster::Roster;
use common::{boy, locked, roster, student, two_class_scenario, with_friends};
use rstest::rstest;

#[test]
fn test_solos_skip_locked_and_befriended() {
    let r = roster(vec![
        (
            "X",
            vec![
                student("a", 1),
                locked(student("b", 1)),
                with_friends(student("c", 1), &["d"]),
                student("d", 2),
                with_friends(student("e", 1), &["y"]),
            ],
        ),
        ("Y", vec![student("y", 2)]),
    ]);
    // A friend in another class does not break solo status.
    assert_eq!(solos_with_tier(&r, "X", &[1]), vec!["a", "e"]);
}

#[test]
fn test_pairs_cover_every_friend_link_once() {
    let r = roster(vec![(
        "X",
        vec![
            with_friends(student("a", 1), &["b", "c"]),
            with_friends(student("b", 2), &["a"]),
            with_friends(student("c", 3), &["a", "d"]),
            with_friends(student("d", 4), &["c"]),
        ],
    )]);
    let pairs = pairs_with_tier(&r, "X", &[1, 2, 3, 4], false);
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "b".to_string()),
            ("a".to_string(), "c".to_string()),
            ("c".to_string(), "d".to_string())
        ]
    );
}

#[test]
fn test_pair_strict_uses_any_friend_of_a_donor() {
    let mut r = roster(vec![
        (
            "X",
            vec![
                with_friends(student("a", 1), &["b", "c"]),
                boy("b", 2, Language::Fluent),
                student("c", 3),
                locked(student("x1", 1)),
                locked(student("x2", 1)),
            ],
        ),
        (
            "Y",
            vec![
                with_friends(student("d", 2), &["e"]),
                student("e", 3),
                student("y1", 4),
                student("y2", 4),
                student("y3", 4),
            ],
        ),
    ]);
    assert_eq!(pairs_with_tier(&r, "X", &[1], false).len(), 2);

    // Only (a, c) lines up with (d, e); b is the wrong gender.
    let found = generate(&mut r, &PhaseRules::primary(2), "X", "Y").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, SwapKind::PairStrict);
    assert_eq!(found[0].swap.students_out, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(found[0].swap.students_in, vec!["d".to_string(), "e".to_string()]);
    assert_eq!(found[0].deltas.main, 2);
}

#[test]
fn test_secondary_pairs_exclude_tier_one() {
    let r = roster(vec![(
        "X",
        vec![
            with_friends(student("a", 1), &["b"]),
            with_friends(student("b", 5), &["a"]),
            with_friends(student("c", 5), &["d"]),
            with_friends(student("d", 2), &["c"]),
        ],
    )]);
    assert_eq!(pairs_with_tier(&r, "X", &[5], false).len(), 2);
    assert_eq!(
        pairs_with_tier(&r, "X", &[5], true),
        vec![("c".to_string(), "d".to_string())]
    );
}

#[test]
fn test_evaluation_reports_deltas_and_reverts() {
    let mut r = two_class_scenario();
    let original = r.clone();
    let swap = SwapMove::new("X", vec!["a1".into()], "Y", vec!["b2".into()]);

    let eval = evaluate(&mut r, TierTarget { tier: 1, cap: 2 }, &swap).unwrap();
    assert!(eval.improves);
    assert_eq!(eval.delta_spread, 2);
    assert_eq!(eval.delta_excess_groups, 1);
    assert_eq!(eval.delta_total_excess, 1);
    assert_eq!(eval.delta_gender(), 0);
    assert_eq!(r, original);
}

#[test]
fn test_non_improving_swap_is_rejected() {
    let mut r = two_class_scenario();
    // Tier 2 out of X, tier 3 into X: tier-1 counts stay put.
    let swap = SwapMove::new("X", vec!["a4".into()], "Y", vec!["b3".into()]);
    let eval = evaluate(&mut r, TierTarget { tier: 1, cap: 2 }, &swap).unwrap();
    assert!(!eval.improves);
}

#[test]
fn test_generate_strict_solos_in_order() {
    let mut r = two_class_scenario();
    let found = generate(&mut r, &PhaseRules::primary(2), "X", "Y").unwrap();

    // Three donors times four acceptors, all strict matches.
    assert_eq!(found.len(), 12);
    assert!(found.iter().all(|c| c.kind == SwapKind::SoloStrict));
    assert_eq!(found[0].swap.students_out, vec!["a1".to_string()]);
    assert_eq!(found[0].swap.students_in, vec!["b2".to_string()]);
    assert_eq!(found[0].priority, 1);
}

#[test]
fn test_relaxed_candidates_need_same_gender() {
    let mut r = roster(vec![
        (
            "X",
            vec![
                boy("a1", 1, Language::Fluent),
                boy("a2", 1, Language::Fluent),
                boy("a3", 1, Language::Fluent),
            ],
        ),
        (
            "Y",
            vec![
                boy("b1", 2, Language::Limited),
                student("b2", 3),
                student("b3", 3),
            ],
        ),
    ]);
    let found = generate(&mut r, &PhaseRules::primary(2), "X", "Y").unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|c| c.kind == SwapKind::SoloRelaxed));
    assert!(found
        .iter()
        .all(|c| c.swap.students_in == vec!["b1".to_string()]));
}

/// X sends a fluent boy for a limited one; Y already holds `fluent_in_y` locked fluent fillers.
fn relaxed_roster(fluent_in_y: usize) -> Roster {
    let mut y = vec![boy("b1", 2, Language::Limited)];
    for i in 0..fluent_in_y {
        y.push(locked(student(&format!("y{}", i), 3)));
    }
    roster(vec![
        (
            "X",
            vec![
                boy("a1", 1, Language::Fluent),
                locked(student("x2", 1)),
                locked(student("x3", 1)),
            ],
        ),
        ("Y", y),
    ])
}

#[rstest]
#[case(5, 1)]
#[case(6, 0)]
fn test_relaxed_swap_respects_language_ceiling(
    #[case] fluent_in_y: usize,
    #[case] expected: usize,
) {
    let mut r = relaxed_roster(fluent_in_y);
    let found = generate(&mut r, &PhaseRules::primary(2), "X", "Y").unwrap();
    assert_eq!(found.len(), expected);
    assert!(found.iter().all(|c| c.kind == SwapKind::SoloRelaxed));
}

#[test]
fn test_pair_candidates_when_no_solos() {
    let mut r = roster(vec![
        (
            "X",
            vec![
                locked(student("a3", 1)),
                with_friends(student("p1", 1), &["p2"]),
                with_friends(student("p2", 2), &["p1"]),
            ],
        ),
        (
            "Y",
            vec![
                with_friends(student("q1", 2), &["q2"]),
                with_friends(student("q2", 3), &["q1"]),
                student("y3", 4),
            ],
        ),
    ]);
    let found = generate(&mut r, &PhaseRules::primary(2), "X", "Y").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, SwapKind::PairStrict);
    assert_eq!(found[0].swap.moved_count(), 4);
}

#[test]
fn test_secondary_rules_never_accept_tier_one() {
    let mut r = roster(vec![
        (
            "X",
            vec![student("e1", 5), student("e2", 5), student("e3", 5)],
        ),
        ("Y", vec![student("o1", 1), student("o2", 1), student("o3", 4)]),
    ]);
    let found = generate(&mut r, &PhaseRules::secondary(2), "X", "Y").unwrap();
    assert!(!found.is_empty());
    assert!(found
        .iter()
        .all(|c| c.swap.students_in == vec!["o3".to_string()]));
}
