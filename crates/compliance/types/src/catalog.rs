//! Catalog entities referenced by rules: assemblies and code clauses.

use crate::rule::parse_encoded;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named bundle of components with a footprint and circulation clearances.
///
/// `total_footprint` and `circulation_space` are kept undecoded, as JSON text
/// or structured values, and decoded by the layout stage via
/// [`Footprint::decode`] and [`Circulation::decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub assembly_code: String,
    pub name: String,
    #[serde(default)]
    pub component_ids: Vec<String>,
    #[serde(default)]
    pub total_footprint: Value,
    #[serde(default)]
    pub circulation_space: Value,
}

/// Plan footprint of an assembly in metres. Missing sides fall back to the
/// layout defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
}

impl Footprint {
    pub fn decode(value: &Value) -> Result<Footprint, serde_json::Error> {
        match parse_encoded(value)? {
            Value::Null => Ok(Footprint::default()),
            decoded => serde_json::from_value(decoded),
        }
    }
}

/// Named clearances around an assembly, e.g. `approach_space`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Circulation(pub BTreeMap<String, f64>);

impl Circulation {
    pub const APPROACH_SPACE: &'static str = "approach_space";

    pub fn decode(value: &Value) -> Result<Circulation, serde_json::Error> {
        match parse_encoded(value)? {
            Value::Null => Ok(Circulation::default()),
            decoded => serde_json::from_value(decoded),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A single building-code requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub clause_code: String,
    pub clause_number: String,
    pub clause_title: String,
    #[serde(alias = "clause_text_en")]
    pub clause_text: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub applies_to_components: Vec<String>,
    #[serde(default)]
    pub page_number: Option<u32>,
    pub enforcement_level: String,
}

impl Clause {
    /// Formatted reference such as `NBC 3.8.3.8`.
    pub fn code_reference(&self) -> String {
        format!("{} {}", self.jurisdiction, self.clause_number)
    }
}
