use gridplot::{
    geometry::snap,
    matcher::order_student_points,
    normalize,
    transform::{Transform, TransformKind},
    validator::{count_message, validate, PositionalValidator},
    Point,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn grid_point() -> impl Strategy<Value = Point> {
    (-6i32..=6, -6i32..=6).prop_map(|(x, y)| Point::new(x as f64, y as f64))
}

fn is_subsequence(needle: &[Point], haystack: &[Point]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|p| rest.any(|q| q == p))
}

fn v1_config() -> impl Strategy<Value = Value> {
    (
        proptest::collection::vec((-20i32..20, -20i32..20), 1..6),
        (-20i32..0, 1i32..20),
        prop_oneof![Just("reflect_x"), Just("reflect_y"), Just("rotate_90")],
        1u8..4,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(points, (min, max), kind, step, connect, reveal)| {
            json!({
                "schemaVersion": "1",
                "view": { "xmin": min, "xmax": max, "ymin": min, "ymax": max },
                "ui": { "title": "t", "legend": ["original"] },
                "interaction": { "snapStep": step },
                "feedback": { "showExpectedPointsOnFail": reveal },
                "original": { "points": points, "connectLines": connect },
                "transform": { "type": kind },
                "activity": { "type": "transformations" }
            })
        })
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(raw in v1_config()) {
        let once = normalize(&raw);
        let again = normalize(&serde_json::to_value(&once).unwrap());
        prop_assert_eq!(once, again);
    }

    #[test]
    fn prop_reflections_are_involutions(
        points in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..10)
    ) {
        for kind in [TransformKind::ReflectX, TransformKind::ReflectY] {
            let t = Transform::new(kind);
            for &(x, y) in &points {
                let p = Point::new(x, y);
                prop_assert_eq!(t.apply(t.apply(p)), p);
            }
        }
    }

    #[test]
    fn prop_matched_points_follow_expected_order(
        expected in proptest::collection::vec(grid_point(), 0..8),
        student in proptest::collection::vec(grid_point(), 0..12),
    ) {
        let ordered = order_student_points(&expected, &student, 0.0);
        prop_assert!(ordered.len() <= expected.len().min(student.len()));
        prop_assert!(is_subsequence(&ordered, &expected));
    }

    #[test]
    fn prop_adding_unmatched_expected_point_never_shrinks_match(
        expected in proptest::collection::vec(grid_point(), 1..8),
        student in proptest::collection::vec(grid_point(), 0..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let before = order_student_points(&expected, &student, 0.0);
        let candidate = expected[pick.index(expected.len())];
        let mut more = student.clone();
        more.push(candidate);
        let after = order_student_points(&expected, &more, 0.0);
        prop_assert!(after.len() >= before.len());
    }

    #[test]
    fn prop_wrong_count_is_never_correct(
        expected in proptest::collection::vec(grid_point(), 0..6),
        student in proptest::collection::vec(grid_point(), 0..6),
    ) {
        prop_assume!(expected.len() != student.len());
        let set = validate(&student, &expected);
        prop_assert!(!set.is_correct);
        prop_assert_eq!(set.message(), count_message(expected.len()));

        let positional = PositionalValidator::default().check(&student, &expected);
        prop_assert!(!positional.is_correct);
        prop_assert_eq!(positional.message(), count_message(expected.len()));
    }

    #[test]
    fn prop_snap_is_stable(value in -1e4f64..1e4, step in prop_oneof![Just(0.5), Just(1.0), Just(2.0)]) {
        let once = snap(value, step);
        prop_assert_eq!(snap(once, step), once);
        prop_assert!((once - value).abs() <= step / 2.0 + 1e-9);
    }
}

#[test]
fn positional_and_set_matching_disagree_on_reordered_clicks() {
    let expected = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
    let reordered = vec![Point::new(3.0, 4.0), Point::new(1.0, 2.0)];

    assert!(validate(&expected, &expected).is_correct);
    assert!(validate(&reordered, &expected).is_correct);
    assert!(!PositionalValidator::default().check(&reordered, &expected).is_correct);
}
