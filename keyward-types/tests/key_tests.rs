use keyward_types::{Key, KeyId, Partition};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_key_has_no_parent_and_default_partition() {
    let key = Key::new("Person", 12);
    assert_eq!(key.kind(), "Person");
    assert_eq!(key.id(), &KeyId::Id(12));
    assert!(key.parent().is_none());
    assert_eq!(key.partition(), &Partition::default());
}

#[test]
fn string_ids_become_names() {
    let key = Key::new("Person", "alice");
    assert_eq!(key.id().as_name(), Some("alice"));
    assert_eq!(key.id().as_id(), None);
}

#[test]
fn with_parent_links_chain() {
    let key = Key::new("Address", "home").with_parent(Key::new("Person", 1));
    let parent = key.parent().unwrap();
    assert_eq!(parent.kind(), "Person");
    assert_eq!(parent.id(), &KeyId::Id(1));
}

#[test]
fn in_partition_only_moves_leaf() {
    let p = Partition::new("app").with_namespace("tenant");
    let key = Key::new("Address", "home")
        .with_parent(Key::new("Person", 1))
        .in_partition(p.clone());
    assert_eq!(key.partition(), &p);
    assert_eq!(key.parent().unwrap().partition(), &Partition::default());
}

#[test]
fn set_kind_keeps_id_and_parent() {
    let mut key = Key::new("Old", 5).with_parent(Key::new("Root", "r"));
    key.set_kind("New");
    assert_eq!(key.kind(), "New");
    assert_eq!(key.id(), &KeyId::Id(5));
    assert_eq!(key.parent().unwrap().kind(), "Root");
}

// ── Path & display ───────────────────────────────────────────────

#[test]
fn path_is_root_first() {
    let key = Key::new("C", 3)
        .with_parent(Key::new("B", 2).with_parent(Key::new("A", 1)));
    let kinds: Vec<&str> = key.path().iter().map(|k| k.kind()).collect();
    assert_eq!(kinds, vec!["A", "B", "C"]);
}

#[test]
fn display_joins_path() {
    let key = Key::new("Address", "home").with_parent(Key::new("Person", 7));
    assert_eq!(key.to_string(), r#"Person(7)/Address("home")"#);
}

#[test]
fn partition_display() {
    assert_eq!(Partition::new("app").to_string(), "app");
    assert_eq!(Partition::new("app").with_namespace("ns").to_string(), "app/ns");
}

// ── Equality & hashing ───────────────────────────────────────────

#[test]
fn partition_participates_in_equality() {
    let a = Key::new("Person", 1).in_partition(Partition::new("a"));
    let b = Key::new("Person", 1).in_partition(Partition::new("b"));
    assert_ne!(a, b);
}

#[test]
fn id_and_name_never_equal() {
    assert_ne!(Key::new("Person", 1), Key::new("Person", "1"));
}

#[test]
fn keys_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(Key::new("Person", 1));
    set.insert(Key::new("Person", 1));
    set.insert(Key::new("Person", 2));
    assert_eq!(set.len(), 2);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn key_id_serializes_untagged() {
    assert_eq!(serde_json::to_string(&KeyId::Id(4)).unwrap(), "4");
    assert_eq!(serde_json::to_string(&KeyId::from("x")).unwrap(), r#""x""#);
}

#[test]
fn key_serde_roundtrip() {
    let key = Key::new("Address", "home")
        .with_parent(Key::new("Person", 7).in_partition(Partition::new("app")))
        .in_partition(Partition::new("app").with_namespace("ns"));
    let json = serde_json::to_string(&key).unwrap();
    let parsed: Key = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, key);
}
