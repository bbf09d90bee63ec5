//! End-to-end Scenarios
//!
//! One test per documented scenario for each shadow kind, plus the error
//! surface of the tracking API.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use shadow_core::prelude::*;
use shadow_core::{Correlation, MemberValue, ShadowKind};
use shadow_test_utils::{init_tracing, line, sample_customer, sample_order, Address, Customer, Line, Order};

#[test]
fn test_map_scenario() {
    init_tracing();
    let factory = ShadowFactory::new();
    let mut map = factory
        .copy_into_map(&IndexMap::from([("a".to_string(), 1), ("b".to_string(), 2)]))
        .unwrap();

    map.insert("a".to_string(), 5);
    map.add("c".to_string(), 3).unwrap();
    map.remove(&"b".to_string());

    let expected = IndexMap::from([
        ("a".to_string(), ChangeType::Edit),
        ("b".to_string(), ChangeType::Remove),
        ("c".to_string(), ChangeType::Add),
    ]);
    assert_eq!(map.dictionary_changes(), expected);

    map.reset_to_original().unwrap();
    assert_eq!(
        map.as_map(),
        &IndexMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
    );
    assert!(map.dictionary_changes().is_empty());
}

#[test]
fn test_object_scenario() {
    init_tracing();
    let factory = ShadowFactory::new();
    let mut address = factory.wrap(Address {
        street: "Alice".to_string(),
        city: "Springfield".to_string(),
    });

    address.street = "Bob".to_string();
    assert!(address.has_changes());
    assert!(address.has_change("street"));
    assert!(!address.has_change("city"));

    address.reset_to_original().unwrap();
    assert_eq!(address.street, "Alice");
    assert!(!address.has_changes());
}

#[test]
fn test_collection_scenario() {
    init_tracing();
    let factory = ShadowFactory::new();
    let mut list = factory.copy_into_collection(&[1, 2, 3]).unwrap();

    assert!(list.remove_item(&2));
    list.push(4);

    assert_eq!(list.change_of(&2), Some(ChangeType::Remove));
    assert_eq!(list.change_of(&4), Some(ChangeType::Add));
    assert_eq!(list.change_of(&1), None);
    assert_eq!(list.change_of(&3), None);
    assert_eq!(list.list_changes(), "[1]: 2 (Remove)\n[2]: 4 (Add)");

    list.reset_to_original().unwrap();
    assert_eq!(list.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_recursive_copy_scenario() {
    init_tracing();
    let factory = ShadowFactory::new();
    let source = sample_order(42);

    let order = factory.copy_into(&source).unwrap();
    let lines = order.lines.as_ref().unwrap();

    assert_eq!(lines.len(), 2);
    assert!(!lines.has_changes());
    assert_ne!(lines, source.lines.as_ref().unwrap());
    assert_eq!(order.member_tracker("lines").unwrap().kind(), ShadowKind::Collection);
    assert!(!order.has_changes_with(Depth::Deep));
}

#[test]
fn test_deep_copy_of_customer_graph() {
    let factory = ShadowFactory::new();
    let source = sample_customer(&factory);

    let mut customer = factory.copy_into(&source).unwrap();
    assert!(!customer.has_changes_with(Depth::Deep));

    let order = customer.orders.as_mut().unwrap().get_mut(0).unwrap();
    order.number = 2;
    order.lines.as_mut().unwrap().push(line("plum", 5));

    assert!(customer.has_changes_with(Depth::Deep));
    assert!(!customer.has_changes());
    assert_eq!(source.orders.as_ref().unwrap()[0].number, 1);
    assert!(!source.orders.as_ref().unwrap()[0].has_changes_with(Depth::Deep));
}

#[test]
fn test_original_rebuilds_value_object() {
    let factory = ShadowFactory::new();
    let mut customer = factory.wrap(Customer {
        name: "Alice".to_string(),
        ..Customer::default()
    });
    customer.name = "Bob".to_string();
    customer.email = Some("bob@example.com".to_string());

    let original: Customer = customer.original().unwrap();
    assert_eq!(original.name, "Alice");
    assert_eq!(original.email, None);
    assert_eq!(
        customer.change_types().into_iter().collect::<Vec<_>>(),
        vec![("name", ChangeType::Edit), ("email", ChangeType::Add)]
    );
}

#[test]
fn test_reset_key_writes_through_member() {
    let factory = ShadowFactory::new();
    let mut order = factory.wrap(Order {
        number: 1,
        ..Order::default()
    });
    order.set("number", 9_u32).unwrap();
    assert_eq!(order.original_value("number").unwrap(), MemberValue::new(1_u32));

    order.reset_key("number").unwrap();
    assert_eq!(order.number, 1);
    assert!(!order.has_change("number"));
}

#[test]
fn test_missing_keys_are_key_not_found() {
    let factory = ShadowFactory::new();
    let mut order = factory.create::<Order>();
    assert!(order.original_value("missing").unwrap_err().is_key_not_found());
    assert!(order.reset_key("missing").unwrap_err().is_key_not_found());

    let mut map = factory.create_map::<String, i32>();
    assert!(map.original_value(&"x".to_string()).unwrap_err().is_key_not_found());
    assert!(map.reset_key(&"x".to_string()).unwrap_err().is_key_not_found());

    let mut list = factory.create_collection::<Line>();
    let extra = line("kiwi", 1);
    list.push(extra.clone());
    assert!(list.reset_key(&extra).unwrap_err().is_key_not_found());
}

#[test]
fn test_plain_value_is_invalid_argument() {
    let order = ShadowFactory::new().wrap(Order::default());
    assert!(matches!(
        order.member_tracker("number"),
        Err(ShadowError::InvalidArgument(_))
    ));
    assert!(matches!(
        MemberValue::new(3_u32).as_tracker(),
        Err(ShadowError::InvalidArgument(_))
    ));
}

#[test]
fn test_positional_correlation_reports_edits() {
    let config = ShadowConfig::new().with_correlation(Correlation::Positional);
    let mut list = ShadowFactory::with_config(config)
        .copy_into_collection(&[1, 2, 3])
        .unwrap();
    list.set(1, 20).unwrap();

    let changes = list.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change, ChangeType::Edit);
    assert_eq!(changes[0].previous, Some(2));
    assert_eq!(list.list_changes(), "[1]: 2 -> 20 (Edit)");
}

#[test]
fn test_copy_into_hands_config_to_nested_shadows() {
    let config = ShadowConfig::new()
        .with_reset_depth(Depth::Deep)
        .with_correlation(Correlation::Positional);
    let factory = ShadowFactory::with_config(config);
    let source = sample_customer(&ShadowFactory::new());

    let mut customer = factory.copy_into(&source).unwrap();
    assert_eq!(customer.address.as_ref().unwrap().config(), &config);

    let orders = customer.orders.as_mut().unwrap();
    assert_eq!(orders.config(), &config);
    let lines = orders.get_mut(0).unwrap().lines.as_mut().unwrap();
    assert_eq!(lines.config(), &config);

    lines.set(1, line("fig", 3)).unwrap();
    let changes = lines.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change, ChangeType::Edit);
    assert_eq!(changes[0].previous, Some(line("pear", 1)));

    customer.reset_to_original().unwrap();
    assert!(!customer.has_changes_with(Depth::Deep));
}

#[test]
fn test_config_from_toml() {
    let config = ShadowConfig::from_toml_str(
        r#"
        reset_depth = "deep"
        correlation = "positional"
        "#,
    )
    .unwrap();
    assert_eq!(config.reset_depth, Depth::Deep);
    assert_eq!(config.baseline_depth, Depth::Shallow);
    assert_eq!(config.correlation, Correlation::Positional);

    assert!(matches!(
        ShadowConfig::from_toml_str("reset_depth = \"sideways\""),
        Err(ShadowError::Config(_))
    ));
}
