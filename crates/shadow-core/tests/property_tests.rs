//! Property Tests
//!
//! Random mutation sequences against every shadow kind.

use proptest::prelude::*;
use shadow_core::prelude::*;
use shadow_core::Correlation;
use shadow_test_utils::Address;

#[derive(Debug, Clone)]
enum MapOp {
    Insert(u8, i32),
    Remove(u8),
    Clear,
}

fn map_op() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (0..8u8, -5..5i32).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => (0..8u8).prop_map(MapOp::Remove),
        1 => Just(MapOp::Clear),
    ]
}

fn apply_map(map: &mut MapShadow<u8, i32>, op: &MapOp) {
    match *op {
        MapOp::Insert(k, v) => {
            map.insert(k, v);
        }
        MapOp::Remove(k) => {
            map.remove(&k);
        }
        MapOp::Clear => map.clear(),
    }
}

#[derive(Debug, Clone)]
enum ListOp {
    Push(i32),
    Insert(usize, i32),
    Remove(usize),
    Set(usize, i32),
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        (-5..5i32).prop_map(ListOp::Push),
        (0..10usize, -5..5i32).prop_map(|(i, v)| ListOp::Insert(i, v)),
        (0..10usize).prop_map(ListOp::Remove),
        (0..10usize, -5..5i32).prop_map(|(i, v)| ListOp::Set(i, v)),
    ]
}

fn apply_list(list: &mut CollectionShadow<i32>, op: &ListOp) {
    // Out-of-range positions are rejected without touching the list.
    let _ = match *op {
        ListOp::Push(v) => {
            list.push(v);
            Ok(())
        }
        ListOp::Insert(i, v) => list.insert(i, v),
        ListOp::Remove(i) => list.remove(i).map(drop),
        ListOp::Set(i, v) => list.set(i, v).map(drop),
    };
}

fn correlation() -> impl Strategy<Value = Correlation> {
    prop_oneof![Just(Correlation::Multiset), Just(Correlation::Positional)]
}

proptest! {
    #[test]
    fn prop_map_clean_after_baseline(
        start in proptest::collection::vec((0..8u8, -5..5i32), 0..8),
        ops in proptest::collection::vec(map_op(), 0..20),
    ) {
        let mut map: MapShadow<u8, i32> = start.into_iter().collect();
        for op in &ops {
            apply_map(&mut map, op);
        }
        map.baseline();
        prop_assert!(!map.has_changes());
        prop_assert!(map.dictionary_changes().is_empty());
        prop_assert!(map.list_changes().is_empty());
    }

    #[test]
    fn prop_collection_clean_after_baseline(
        start in proptest::collection::vec(-5..5i32, 0..8),
        ops in proptest::collection::vec(list_op(), 0..20),
        policy in correlation(),
    ) {
        let factory = ShadowFactory::with_config(ShadowConfig::new().with_correlation(policy));
        let mut list = factory.copy_into_collection(&start).unwrap();
        for op in &ops {
            apply_list(&mut list, op);
        }
        list.baseline();
        prop_assert!(!list.has_changes());
        prop_assert!(list.changes().is_empty());
        prop_assert!(list.list_changes().is_empty());
        prop_assert_eq!(list.original_items(), list.as_slice());
    }

    #[test]
    fn prop_object_clean_after_baseline(street in ".{0,12}", city in ".{0,12}") {
        let mut address = ShadowFactory::new().wrap(Address::default());
        address.street = street.clone();
        address.set("city", city).unwrap();

        address.baseline();
        prop_assert!(!address.has_changes());
        prop_assert!(address.changes().is_empty());
        prop_assert!(address.list_changes().is_empty());
        prop_assert_eq!(address.original_as::<String>("street").unwrap(), street);
    }

    #[test]
    fn prop_map_reset_restores_baseline(
        start in proptest::collection::vec((0..8u8, -5..5i32), 0..8),
        ops in proptest::collection::vec(map_op(), 0..30),
    ) {
        let mut map: MapShadow<u8, i32> = start.into_iter().collect();
        let expected: Vec<(u8, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();

        for op in &ops {
            apply_map(&mut map, op);
        }
        map.reset_to_original().unwrap();

        let actual: Vec<(u8, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(!map.has_changes());
    }

    #[test]
    fn prop_map_add_then_remove_is_net_zero(
        start in proptest::collection::vec((0..8u8, -5..5i32), 0..8),
        value in -5..5i32,
    ) {
        let mut map: MapShadow<u8, i32> = start.into_iter().collect();
        map.add(100, value).unwrap();
        map.remove(&100);
        prop_assert!(!map.dictionary_changes().contains_key(&100));
        prop_assert!(!map.has_changes());
    }

    #[test]
    fn prop_map_changes_match_key_presence(
        start in proptest::collection::vec((0..8u8, -5..5i32), 0..8),
        ops in proptest::collection::vec(map_op(), 0..20),
    ) {
        let mut map: MapShadow<u8, i32> = start.into_iter().collect();
        let baseline = map.original().unwrap();
        for op in &ops {
            apply_map(&mut map, op);
        }

        for (key, change) in map.dictionary_changes() {
            let expected = match (baseline.get(&key), map.get(&key)) {
                (None, Some(_)) => ChangeType::Add,
                (Some(_), None) => ChangeType::Remove,
                (Some(a), Some(b)) if a != b => ChangeType::Edit,
                _ => unreachable!("unchanged key {} reported", key),
            };
            prop_assert_eq!(change, expected);
        }
    }

    #[test]
    fn prop_collection_reset_restores_baseline(
        start in proptest::collection::vec(-5..5i32, 0..8),
        ops in proptest::collection::vec(list_op(), 0..30),
        policy in correlation(),
    ) {
        let config = ShadowConfig::new().with_correlation(policy);
        let factory = ShadowFactory::with_config(config);
        let mut list = factory.copy_into_collection(&start).unwrap();

        for op in &ops {
            apply_list(&mut list, op);
        }
        list.reset_to_original().unwrap();

        prop_assert_eq!(list.as_slice(), start.as_slice());
        prop_assert!(!list.has_changes());
        prop_assert!(list.changes().is_empty());
    }

    #[test]
    fn prop_collection_append_then_remove_is_net_zero(
        start in proptest::collection::vec(0..5i32, 0..8),
        policy in correlation(),
    ) {
        let factory = ShadowFactory::with_config(ShadowConfig::new().with_correlation(policy));
        let mut list = factory.copy_into_collection(&start).unwrap();
        list.push(99);
        prop_assert!(list.remove_item(&99));
        prop_assert_eq!(list.change_of(&99), None);
        prop_assert!(!list.has_changes());
    }

    #[test]
    fn prop_collection_reset_key_clears_that_change(
        start in proptest::collection::vec(0..5i32, 1..8),
        index in 0..8usize,
    ) {
        let mut list = ShadowFactory::new().copy_into_collection(&start).unwrap();
        let index = index % start.len();
        let removed = list.remove(index).unwrap();

        list.reset_key(&removed).unwrap();
        prop_assert!(!list.has_changes());
    }

    #[test]
    fn prop_object_reset_key(street in ".{0,12}", city in ".{0,12}") {
        let factory = ShadowFactory::new();
        let mut address = factory.wrap(Address::default());
        address.street = street;
        address.city = city;

        for key in ["street", "city"] {
            address.reset_key(key).unwrap();
            prop_assert!(!address.has_change(key));
            prop_assert_eq!(
                address.member(key).unwrap().clone_member(),
                address.original_value(key).unwrap()
            );
        }
        prop_assert!(!address.has_changes());
    }
}
