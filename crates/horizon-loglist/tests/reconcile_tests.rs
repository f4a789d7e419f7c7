//! Tests for window reconciliation and plan application.

mod common;

use common::{numbers, Line, RowModel};
use horizon_loglist::{apply_plan, reconcile, Reconciler, Record, RecordNumber, TransitionKind};

fn records(numbers: &[u64]) -> Vec<Record<Line>> {
    numbers
        .iter()
        .map(|&n| Record::new(RecordNumber(n), Line::at(n)))
        .collect()
}

#[test]
fn test_window_shift_by_one() {
    let plan = reconcile(&records(&[0, 1, 2, 3]), &records(&[1, 2, 3, 4]), 4);
    let t = plan.transitions();

    assert_eq!(t[0].number(), RecordNumber(0));
    assert_eq!((t[0].kind, t[0].to), (TransitionKind::RemoveAfterMove, -1));

    for (transition, (from, to)) in t[1..4].iter().zip([(1, 0), (2, 1), (3, 2)]) {
        assert_eq!(transition.kind, TransitionKind::Move);
        assert_eq!((transition.from, transition.to), (from, to));
    }

    assert_eq!(t[4].number(), RecordNumber(4));
    assert_eq!(t[4].kind, TransitionKind::Enter);
    assert_eq!((t[4].from, t[4].to), (4, 3));
}

#[test]
fn test_applying_plan_yields_new_window() {
    let cases: [(&[u64], &[u64]); 5] = [
        (&[0, 1, 2, 3], &[1, 2, 3, 4]),
        (&[4, 5, 6], &[1, 2, 3, 4]),
        (&[1, 3, 5, 7], &[1, 2, 3, 4, 5, 6, 7]),
        (&[1, 2, 3, 4, 5], &[2, 4]),
        (&[10, 11], &[0, 1]),
    ];

    for (old, new) in cases {
        let mut model = RowModel::default();
        let mut reconciler = Reconciler::new();

        let first = reconciler.reconcile(&records(old), old.len());
        apply_plan(&first, &mut model, false);
        reconciler.commit(&first);
        assert_eq!(model.shown(), old.to_vec());

        let second = reconciler.reconcile(&records(new), new.len());
        apply_plan(&second, &mut model, true);
        reconciler.commit(&second);

        assert_eq!(model.shown(), new.to_vec(), "old {old:?} new {new:?}");
        assert_eq!(numbers(reconciler.visible()), new.to_vec());
    }
}

#[test]
fn test_same_time_new_records_are_inserted() {
    // Equal timestamps tie-break on number.
    let old: Vec<Record<Line>> = [0u64, 2].iter().map(|&n| Record::new(RecordNumber(n), Line::at(5))).collect();
    let new: Vec<Record<Line>> = [0u64, 1, 2].iter().map(|&n| Record::new(RecordNumber(n), Line::at(5))).collect();

    let plan = reconcile(&old, &new, 3);
    let inserted: Vec<_> = plan.of_kind(TransitionKind::Insert).map(|t| t.number()).collect();
    assert_eq!(inserted, vec![RecordNumber(1)]);
}

#[test]
fn test_reset_forgets_visible() {
    let mut reconciler = Reconciler::new();
    let plan = reconciler.reconcile(&records(&[1, 2]), 2);
    reconciler.commit(&plan);
    reconciler.reset();

    let plan = reconciler.reconcile(&records(&[1, 2]), 2);
    assert!(plan.transitions().iter().all(|t| t.kind == TransitionKind::Insert));
}
