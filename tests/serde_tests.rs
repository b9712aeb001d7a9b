#![cfg(feature = "serde")]
//! Serde round-trip tests for BalancedOrderedMap.

use balanced_map::avl::BalancedOrderedMap;
use rstest::rstest;

#[rstest]
fn test_serialize_empty() {
    let map: BalancedOrderedMap<String, i32> = BalancedOrderedMap::new();
    assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
}

#[rstest]
fn test_serialize_in_key_order() {
    let map: BalancedOrderedMap<String, i32> = [("c", 3), ("a", 1), ("b", 2)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    assert_eq!(
        serde_json::to_string(&map).unwrap(),
        r#"{"a":1,"b":2,"c":3}"#
    );
}

#[rstest]
fn test_deserialize_builds_balanced_tree() {
    let json = r#"{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7}"#;
    let map: BalancedOrderedMap<String, i32> = serde_json::from_str(json).unwrap();

    assert_eq!(map.len(), 7);
    assert_eq!(map.height(), 3);
    assert_eq!(map.get("d"), Some(&4));
    assert_eq!(map.check_invariants(), Ok(()));
}

#[rstest]
fn test_deserialize_duplicate_keys_last_wins() {
    let json = r#"{"a":1,"a":2}"#;
    let map: BalancedOrderedMap<String, i32> = serde_json::from_str(json).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("a"), Some(&2));
}

#[rstest]
fn test_roundtrip_large() {
    let map: BalancedOrderedMap<u32, u32> = (0..500).map(|key| (key, key * key)).collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: BalancedOrderedMap<u32, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
}

#[rstest]
fn test_deserialize_rejects_non_map() {
    let result: Result<BalancedOrderedMap<String, i32>, _> = serde_json::from_str("[1, 2]");
    assert!(result.is_err());
}
