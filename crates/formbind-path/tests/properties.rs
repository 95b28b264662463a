//! Property tests for copy-on-write path access.

use formbind_path::{MAX_INDEX_GAP, PathError, Segment, delete, enumerate, get, try_set};
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-c]", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof!["[a-c]", (0usize..4).prop_map(|i| i.to_string())],
        1..4,
    )
    .prop_map(|segments| segments.join("."))
}

/// Index segments too far past any generated sequence to be padded.
fn arb_distant_index() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(usize::MAX),
        Just(4_000_000_000usize),
        (MAX_INDEX_GAP + 5)..=usize::MAX,
    ]
}

fn ends_with_key(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .is_some_and(|last| matches!(Segment::parse(last), Segment::Key(_)))
}

proptest! {
    #[test]
    fn set_then_get_round_trips(root in arb_value(), path in arb_path(), value in arb_leaf()) {
        if let Ok(updated) = try_set(&root, &path, value.clone()) {
            prop_assert_eq!(get(&updated, &path), Some(&value));
        }
    }

    #[test]
    fn set_never_mutates_input(root in arb_value(), path in arb_path(), value in arb_leaf()) {
        let before = root.clone();
        let _ = formbind_path::set(&root, &path, value);
        prop_assert_eq!(root, before);
    }

    #[test]
    fn delete_after_set_removes_key_leaf(root in arb_value(), path in arb_path(), value in arb_leaf()) {
        prop_assume!(ends_with_key(&path));
        if let Ok(updated) = try_set(&root, &path, value) {
            let pruned = delete(&updated, &path);
            prop_assert!(enumerate(&pruned).all(|entry| entry.path != path));
        }
    }

    #[test]
    fn distant_index_is_unreachable(root in arb_value(), prefix in arb_path(), index in arb_distant_index()) {
        let path = format!("{prefix}.{index}");
        prop_assume!(try_set(&root, &prefix, json!([])).is_ok());
        let seeded = formbind_path::set(&root, &prefix, json!([]));
        prop_assert_eq!(formbind_path::set(&seeded, &path, json!(1)), seeded.clone());
        let is_unreachable = matches!(
            try_set(&seeded, &path, json!(1)),
            Err(PathError::Unreachable { .. })
        );
        prop_assert!(is_unreachable);
    }

    #[test]
    fn enumerate_is_deterministic(root in arb_value()) {
        let first: Vec<String> = enumerate(&root).map(|entry| entry.path).collect();
        let second: Vec<String> = enumerate(&root).map(|entry| entry.path).collect();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn delete_after_set_on_index_leaf_shrinks_sequence() {
    let root = json!({"xs": ["a", "b"]});
    let updated = formbind_path::set(&root, "xs.0", json!("z"));
    let pruned = delete(&updated, "xs.0");
    assert_eq!(pruned, json!({"xs": ["b"]}));
}

#[test]
fn set_builds_nested_array_of_objects() {
    let out = formbind_path::set(&json!({}), "data.0.value", json!(10));
    assert_eq!(out, json!({"data": [{"value": 10}]}));
}

#[test]
fn overflowing_index_leaves_root_unchanged() {
    let root = json!({"xs": [1, 2]});
    for path in ["xs.18446744073709551615", "xs.4000000000"] {
        assert_eq!(formbind_path::set(&root, path, json!(0)), root);
    }
    assert_eq!(
        try_set(&root, "xs.18446744073709551615", json!(0)),
        Err(PathError::Unreachable {
            path: "xs.18446744073709551615".to_string(),
            segment: "18446744073709551615".to_string(),
        })
    );
}
