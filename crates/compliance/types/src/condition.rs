//! Rule trigger conditions.
//!
//! Rule stores hold trigger conditions as JSON objects: a leaf
//! `{"key": expected}` or a composite `{"AND": [...]}` / `{"OR": [...]}`.
//! They are decoded once into a [`Condition`] tree when a rule is loaded so
//! evaluation never re-interprets raw JSON.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Errors produced while decoding a rule record.
#[derive(Debug, Error)]
pub enum RuleDecodeError {
    #[error("{field} is not valid JSON: {source}")]
    InvalidJson {
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("condition must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("{operator} expects a list of conditions")]
    NotAList { operator: &'static str },

    #[error("{field} must be a list of codes")]
    NotACodeList { field: &'static str },
}

/// Numeric comparison operators recognised as prefixes of expected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparator {
    // Two-character tokens come first so ">=5" is not read as "> =5".
    const PREFIXES: [(&'static str, Comparator); 4] = [
        (">=", Comparator::Gte),
        ("<=", Comparator::Lte),
        (">", Comparator::Gt),
        ("<", Comparator::Lt),
    ];

    /// Splits a comparator prefix off an expected value.
    pub fn split_prefix(expected: &str) -> Option<(Comparator, &str)> {
        Self::PREFIXES
            .iter()
            .find_map(|(token, cmp)| expected.strip_prefix(token).map(|rest| (*cmp, rest)))
    }

    pub fn token(&self) -> &'static str {
        match self {
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Gte => ">=",
            Comparator::Lte => "<=",
        }
    }

    pub fn holds(&self, actual: f64, threshold: f64) -> bool {
        match self {
            Comparator::Gt => actual > threshold,
            Comparator::Lt => actual < threshold,
            Comparator::Gte => actual >= threshold,
            Comparator::Lte => actual <= threshold,
        }
    }
}

/// What a leaf expects of its input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact equality with the expected value.
    Equals(Value),
    /// Numeric comparison. `threshold` is `None` when the text after the
    /// comparator is not a number; such a leaf never holds.
    Compare {
        comparator: Comparator,
        threshold: Option<f64>,
        expected: String,
    },
}

impl Predicate {
    fn decode(expected: &Value) -> Self {
        if let Value::String(text) = expected {
            if let Some((comparator, rest)) = Comparator::split_prefix(text) {
                return Predicate::Compare {
                    comparator,
                    threshold: rest.trim().parse::<f64>().ok(),
                    expected: text.clone(),
                };
            }
        }
        Predicate::Equals(expected.clone())
    }

    /// The expected value as written in the rule.
    pub fn expected(&self) -> Value {
        match self {
            Predicate::Equals(value) => value.clone(),
            Predicate::Compare { expected, .. } => Value::String(expected.clone()),
        }
    }
}

/// A single `key: expected` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub key: String,
    pub predicate: Predicate,
}

impl Leaf {
    pub fn new(key: impl Into<String>, expected: &Value) -> Self {
        Self {
            key: key.into(),
            predicate: Predicate::decode(expected),
        }
    }
}

/// Decoded trigger condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Leaf(Leaf),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Decodes a condition object.
    ///
    /// `AND` takes precedence over `OR`, and both take precedence over any
    /// sibling leaf keys. An object with several leaf keys requires all of
    /// them; an empty object always holds.
    pub fn decode(value: &Value) -> Result<Condition, RuleDecodeError> {
        let map = value.as_object().ok_or(RuleDecodeError::NotAnObject {
            found: json_kind(value),
        })?;

        if let Some(children) = map.get("AND") {
            return Ok(Condition::And(decode_children("AND", children)?));
        }
        if let Some(children) = map.get("OR") {
            return Ok(Condition::Or(decode_children("OR", children)?));
        }

        let mut leaves: Vec<Condition> = map
            .iter()
            .map(|(key, expected)| Condition::Leaf(Leaf::new(key, expected)))
            .collect();
        if leaves.len() == 1 {
            Ok(leaves.remove(0))
        } else {
            Ok(Condition::And(leaves))
        }
    }

    /// All leaves in the tree, depth first.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            Condition::Leaf(leaf) => out.push(leaf),
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Re-encodes the tree into its JSON object form.
    pub fn to_value(&self) -> Value {
        match self {
            Condition::Leaf(leaf) => {
                let mut map = Map::new();
                map.insert(leaf.key.clone(), leaf.predicate.expected());
                Value::Object(map)
            }
            Condition::And(children) => composite("AND", children),
            Condition::Or(children) => composite("OR", children),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Condition::decode(&value).map_err(serde::de::Error::custom)
    }
}

fn decode_children(
    operator: &'static str,
    children: &Value,
) -> Result<Vec<Condition>, RuleDecodeError> {
    children
        .as_array()
        .ok_or(RuleDecodeError::NotAList { operator })?
        .iter()
        .map(Condition::decode)
        .collect()
}

fn composite(operator: &str, children: &[Condition]) -> Value {
    let mut map = Map::new();
    map.insert(
        operator.to_string(),
        Value::Array(children.iter().map(Condition::to_value).collect()),
    );
    Value::Object(map)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
