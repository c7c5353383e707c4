use chrono::{TimeZone, Utc};
use keyward_model::{Entity, Scalar, Value, MAX_INDEXED_BYTES};
use keyward_types::Key;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn make_entity() -> Entity {
    Entity::new(Key::new("Note", 1))
        .with("title", "Hello")
        .with("count", 42i64)
        .with("done", true)
}

// ── Construction & fields ────────────────────────────────────────

#[test]
fn new_entity_is_keyed_and_empty() {
    let e = Entity::new(Key::new("Note", 1));
    assert_eq!(e.key(), Some(&Key::new("Note", 1)));
    assert!(e.is_empty());
    assert!(e.exclude_from_indexes().is_empty());
}

#[test]
fn embedded_entity_has_no_key() {
    assert!(Entity::embedded().key().is_none());
}

#[test]
fn set_returns_previous_value() {
    let mut e = make_entity();
    let prev = e.set("title", "Bye");
    assert_eq!(prev, Some(Value::from("Hello")));
    assert_eq!(e.get_str("title"), Some("Bye"));
}

#[test]
fn typed_getters() {
    let e = make_entity();
    assert_eq!(e.get_str("title"), Some("Hello"));
    assert_eq!(e.get_i64("count"), Some(42));
    assert_eq!(e.get_bool("done"), Some(true));
    assert_eq!(e.get_str("count"), None);
    assert_eq!(e.get_i64("missing"), None);
}

#[test]
fn remove_and_contains() {
    let mut e = make_entity();
    assert!(e.contains("done"));
    assert_eq!(e.remove("done"), Some(Value::from(true)));
    assert!(!e.contains("done"));
    assert_eq!(e.len(), 2);
}

#[test]
fn iteration_is_name_ordered() {
    let e = make_entity();
    let names: Vec<&str> = e.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["count", "done", "title"]);
}

// ── Index limits ─────────────────────────────────────────────────

#[test]
fn text_limit_counts_bytes_not_chars() {
    // "é" is two bytes in UTF-8.
    let value = Value::from("é".repeat(MAX_INDEXED_BYTES / 2));
    assert!(value.is_unindexable());
    let value = Value::from("é".repeat(MAX_INDEXED_BYTES / 2 - 1));
    assert!(!value.is_unindexable());
}

#[test]
fn bytes_limit() {
    assert!(!Value::from(vec![0u8; 499]).is_unindexable());
    assert!(Value::from(vec![0u8; 500]).is_unindexable());
}

#[test]
fn scalars_are_always_indexable() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(!Value::from(ts).is_unindexable());
    assert!(!Value::from(Key::new("K", 1)).is_unindexable());
    assert!(!Value::NULL.is_unindexable());
    assert!(!Value::from(1.5).is_unindexable());
}

#[test]
fn arrays_and_entities_recurse() {
    let long = "x".repeat(500);
    let arr = Value::from(vec![Value::from("short"), Value::from(long.as_str())]);
    assert!(arr.is_unindexable());
    let nested = Value::from(Entity::embedded().with("inner", long.as_str()));
    assert!(nested.is_unindexable());
    let deep = Value::from(vec![Value::from(
        Entity::embedded().with("list", vec![Value::from(long.as_str())]),
    )]);
    assert!(deep.is_unindexable());
}

#[test]
fn find_unindexed_skips_excluded() {
    let mut e = Entity::new(Key::new("Note", 1)).with("body", "x".repeat(600));
    assert_eq!(e.find_unindexed(), Some("body".to_string()));
    e.set_exclude_from_indexes(BTreeSet::from(["body".to_string()]));
    assert_eq!(e.find_unindexed(), None);
}

#[test]
fn find_unindexed_reports_nested_path() {
    let inner = Entity::embedded().with("text", "y".repeat(500));
    let e = Entity::new(Key::new("Note", 1)).with("meta", inner);
    assert_eq!(e.find_unindexed(), Some("meta.text".to_string()));
}

// ── Non-finite numbers ───────────────────────────────────────────

#[test]
fn finite_doubles_are_accepted() {
    let e = make_entity().with("ratio", 0.5f64).with("big", f64::MAX);
    assert_eq!(e.find_non_finite(), None);
}

#[test]
fn find_non_finite_reports_path() {
    let e = make_entity().with("ratio", f64::NAN);
    assert_eq!(e.find_non_finite(), Some("ratio".to_string()));

    let nested = make_entity().with("meta", Entity::embedded().with("inf", f64::INFINITY));
    assert_eq!(nested.find_non_finite(), Some("meta.inf".to_string()));

    let in_array = make_entity().with("xs", vec![Value::from(1.0f64), Value::from(f64::NEG_INFINITY)]);
    assert_eq!(in_array.find_non_finite(), Some("xs".to_string()));
}

#[test]
fn find_non_finite_ignores_index_exclusion() {
    let mut e = make_entity().with("ratio", f64::NAN);
    e.set_exclude_from_indexes(BTreeSet::from(["ratio".to_string()]));
    assert_eq!(e.find_non_finite(), Some("ratio".to_string()));
}

// ── Serialization roundtrip ──────────────────────────────────────

#[test]
fn serde_roundtrip() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let mut original = make_entity()
        .with("when", ts)
        .with("blob", vec![1u8, 2, 3])
        .with("ref", Key::new("Other", "x"))
        .with("nested", Entity::embedded().with("a", 1i64))
        .with("tags", vec![Value::from("a"), Value::Scalar(Scalar::Null)]);
    original.set_exclude_from_indexes(BTreeSet::from(["blob".to_string()]));

    let json = serde_json::to_string(&original).unwrap();
    let parsed: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, original);
}
