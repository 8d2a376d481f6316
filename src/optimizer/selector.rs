use crate::model::SwapRecord;
use std::cmp::Ordering;

/// Orders two candidates; `Greater` means `left` is preferred.
///
/// Lower priority number wins, then larger main delta, gender delta,
/// language delta, and finally fewer moved students.
pub fn compare(left: &SwapRecord, right: &SwapRecord) -> Ordering {
    right
        .priority
        .cmp(&left.priority)
        .then_with(|| left.deltas.main.cmp(&right.deltas.main))
        .then_with(|| left.deltas.gender.cmp(&right.deltas.gender))
        .then_with(|| left.deltas.language.cmp(&right.deltas.language))
        .then_with(|| right.swap.moved_count().cmp(&left.swap.moved_count()))
}

/// Picks the best candidate. Full ties go to the earliest generated one.
pub fn select_best(candidates: Vec<SwapRecord>) -> Option<SwapRecord> {
    let mut best: Option<SwapRecord> = None;
    for candidate in candidates {
        match &best {
            Some(current) if compare(&candidate, current) != Ordering::Greater => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Phase, SwapDeltas, SwapKind, SwapMove};

    fn record(kind: SwapKind, main: i32, gender: i32, language: i32, out: &str) -> SwapRecord {
        let swap = if kind == SwapKind::PairStrict {
            SwapMove::new(
                "A",
                vec![out.to_string(), format!("{out}-friend")],
                "B",
                vec!["x".to_string(), "y".to_string()],
            )
        } else {
            SwapMove::new("A", vec![out.to_string()], "B", vec!["x".to_string()])
        };
        SwapRecord::new(
            kind,
            Phase::Primary,
            swap,
            SwapDeltas {
                main,
                gender,
                language,
            },
        )
    }

    #[test]
    fn test_priority_beats_larger_delta() {
        let picked = select_best(vec![
            record(SwapKind::SoloRelaxed, 3, 3, 3, "relaxed"),
            record(SwapKind::SoloStrict, 1, 0, 0, "strict"),
        ])
        .unwrap();
        assert_eq!(picked.kind, SwapKind::SoloStrict);
    }

    #[test]
    fn test_secondary_deltas_break_ties() {
        let picked = select_best(vec![
            record(SwapKind::SoloStrict, 1, 0, 2, "a"),
            record(SwapKind::SoloStrict, 1, 1, 0, "b"),
        ])
        .unwrap();
        assert_eq!(picked.swap.students_out, vec!["b".to_string()]);
    }

    #[test]
    fn test_first_generated_wins_full_tie() {
        let picked = select_best(vec![
            record(SwapKind::SoloStrict, 1, 0, 0, "first"),
            record(SwapKind::SoloStrict, 1, 0, 0, "second"),
        ])
        .unwrap();
        assert_eq!(picked.swap.students_out, vec!["first".to_string()]);
    }

    #[test]
    fn test_empty_selects_nothing() {
        assert!(select_best(Vec::new()).is_none());
    }
}
