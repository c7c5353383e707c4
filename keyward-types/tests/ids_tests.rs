use keyward_types::TransactionId;
use std::collections::HashSet;
use std::str::FromStr;

#[test]
fn transaction_id_new_is_unique() {
    assert_ne!(TransactionId::new(), TransactionId::new());
}

#[test]
fn transaction_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::new_v4();
    assert_eq!(TransactionId::from_uuid(uuid).as_uuid(), uuid);
}

#[test]
fn transaction_id_display_and_parse() {
    let id = TransactionId::new();
    assert_eq!(TransactionId::parse(&id.to_string()).unwrap(), id);
    assert_eq!(TransactionId::from_str(&id.to_string()).unwrap(), id);
}

#[test]
fn transaction_id_hex_is_32_lowercase_digits() {
    let hex = TransactionId::new().to_hex();
    assert_eq!(hex.len(), 32);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn transaction_id_parse_invalid() {
    assert!(TransactionId::parse("not-a-uuid").is_err());
}

#[test]
fn transaction_id_hash_and_eq() {
    let id = TransactionId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}
