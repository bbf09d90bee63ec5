//! Testing utilities for the shadow workspace
//!
//! Shared fixtures, builders and tracing setup.

#![allow(missing_docs)]

use shadow_core::{
    shadow_schema, CollectionShadow, MapShadow, ObjectShadow, ShadowFactory, Trackable,
};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

shadow_schema! {
    Address {
        street,
        city,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub sku: String,
    pub quantity: u32,
}

impl Trackable for Line {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub number: u32,
    pub lines: Option<CollectionShadow<Line>>,
    pub attributes: Option<MapShadow<String, String>>,
}

shadow_schema! {
    Order {
        number,
        #[shadowed] lines,
        #[shadowed] attributes,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<ObjectShadow<Address>>,
    pub orders: Option<CollectionShadow<ObjectShadow<Order>>>,
}

shadow_schema! {
    Customer {
        name,
        email,
        #[shadowed] address,
        #[shadowed] orders,
    }
}

/// Order line
pub fn line(sku: &str, quantity: u32) -> Line {
    Line {
        sku: sku.to_string(),
        quantity,
    }
}

/// Order with two lines and one attribute
pub fn sample_order(number: u32) -> Order {
    Order {
        number,
        lines: Some(vec![line("apple", 2), line("pear", 1)].into()),
        attributes: Some(
            [("channel".to_string(), "web".to_string())]
                .into_iter()
                .collect(),
        ),
    }
}

/// Customer with an address and one order, nested handles wrapped by `factory`
pub fn sample_customer(factory: &ShadowFactory) -> Customer {
    Customer {
        name: "Alice".to_string(),
        email: None,
        address: Some(factory.wrap(Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
        })),
        orders: Some(vec![factory.wrap(sample_order(1))].into()),
    }
}

/// Route tracing output to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
