//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use compliance_store::{Catalog, InMemoryCatalog};
use serde_json::{json, Value};

pub const SEED_CATALOG: &str = include_str!("../../../../../data/catalog.yaml");

pub fn seed_catalog() -> InMemoryCatalog {
    let catalog = Catalog::from_yaml_str(SEED_CATALOG).expect("seed catalog parses");
    InMemoryCatalog::from_catalog(catalog).expect("seed catalog loads")
}

/// Large enhanced-accessibility office under the national code.
pub fn office_scenario() -> Value {
    json!({
        "building_type": "office",
        "jurisdiction": "NBC",
        "occupancy_load": 150,
        "room_length": 12,
        "room_width": 8,
        "accessibility_level": "enhanced"
    })
}
