//! Rules as stored and as decoded.

use crate::condition::{Condition, RuleDecodeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Jurisdiction sentinel for rules that apply everywhere.
pub const ALL_JURISDICTIONS: &str = "ALL";

/// A rule row as held by a rule store, before decoding.
///
/// The condition and requirement fields may be stored as JSON text or as
/// structured values; both decode the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub rule_code: String,
    pub rule_name: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub priority: i32,
    pub trigger_condition: Value,
    #[serde(default)]
    pub required_component_ids: Value,
    #[serde(default)]
    pub required_assembly_ids: Value,
    #[serde(default)]
    pub required_clause_ids: Value,
}

impl RuleRecord {
    /// Whether the rule is visible to the given jurisdiction.
    pub fn applies_to(&self, jurisdiction: &str) -> bool {
        self.jurisdiction == jurisdiction || self.jurisdiction == ALL_JURISDICTIONS
    }
}

/// A decoded rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub code: String,
    pub name: String,
    pub jurisdiction: String,
    pub priority: i32,
    pub trigger_condition: Condition,
    pub required_component_ids: Vec<String>,
    pub required_assembly_ids: Vec<String>,
    pub required_clause_ids: Vec<String>,
}

/// A requirement-list entry dropped during decoding because it is not a code.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub field: &'static str,
    pub entry: Value,
}

/// Outcome of decoding one rule record.
#[derive(Debug, Clone)]
pub struct DecodedRule {
    pub rule: Rule,
    pub skipped: Vec<SkippedEntry>,
}

impl Rule {
    /// Decodes a stored rule.
    ///
    /// A condition or requirement field that cannot be decoded at all fails
    /// the whole rule. Individual list entries that are not strings are
    /// dropped and reported in [`DecodedRule::skipped`].
    pub fn decode(record: &RuleRecord) -> Result<DecodedRule, RuleDecodeError> {
        let trigger = parse_encoded(&record.trigger_condition).map_err(|source| {
            RuleDecodeError::InvalidJson {
                field: "trigger_condition",
                source,
            }
        })?;
        let trigger_condition = Condition::decode(&trigger)?;

        let mut skipped = Vec::new();
        let required_component_ids = decode_code_list(
            "required_component_ids",
            &record.required_component_ids,
            &mut skipped,
        )?;
        let required_assembly_ids = decode_code_list(
            "required_assembly_ids",
            &record.required_assembly_ids,
            &mut skipped,
        )?;
        let required_clause_ids = decode_code_list(
            "required_clause_ids",
            &record.required_clause_ids,
            &mut skipped,
        )?;

        Ok(DecodedRule {
            rule: Rule {
                code: record.rule_code.clone(),
                name: record.rule_name.clone(),
                jurisdiction: record.jurisdiction.clone(),
                priority: record.priority,
                trigger_condition,
                required_component_ids,
                required_assembly_ids,
                required_clause_ids,
            },
            skipped,
        })
    }
}

/// A rule whose trigger condition held for the current input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRule {
    pub rule: Rule,
    pub match_reason: String,
}

impl MatchedRule {
    pub fn new(rule: Rule, match_reason: impl Into<String>) -> Self {
        Self {
            rule,
            match_reason: match_reason.into(),
        }
    }

    pub fn required_components(&self) -> &[String] {
        &self.rule.required_component_ids
    }

    pub fn required_assemblies(&self) -> &[String] {
        &self.rule.required_assembly_ids
    }

    pub fn required_clauses(&self) -> &[String] {
        &self.rule.required_clause_ids
    }
}

/// Parses JSON text; structured values pass through unchanged.
pub(crate) fn parse_encoded(value: &Value) -> Result<Value, serde_json::Error> {
    match value {
        Value::String(text) => serde_json::from_str(text),
        other => Ok(other.clone()),
    }
}

fn decode_code_list(
    field: &'static str,
    value: &Value,
    skipped: &mut Vec<SkippedEntry>,
) -> Result<Vec<String>, RuleDecodeError> {
    let decoded = match value {
        Value::Null => return Ok(Vec::new()),
        Value::String(text) if text.trim().is_empty() => return Ok(Vec::new()),
        other => parse_encoded(other)
            .map_err(|source| RuleDecodeError::InvalidJson { field, source })?,
    };

    let entries = match decoded {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(RuleDecodeError::NotACodeList { field }),
    };

    let mut codes = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::String(code) => codes.push(code),
            other => skipped.push(SkippedEntry {
                field,
                entry: other,
            }),
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(trigger: Value) -> RuleRecord {
        RuleRecord {
            rule_code: "R-1".into(),
            rule_name: "Office base".into(),
            jurisdiction: "NBC".into(),
            priority: 10,
            trigger_condition: trigger,
            required_component_ids: Value::Null,
            required_assembly_ids: json!("[\"ASM-1\"]"),
            required_clause_ids: json!(["NBC-1", "NBC-2"]),
        }
    }

    #[test]
    fn decodes_text_and_structured_fields() {
        let decoded = Rule::decode(&record(json!("{\"occupancy_type\": \"office\"}"))).unwrap();
        assert_eq!(decoded.rule.required_assembly_ids, vec!["ASM-1"]);
        assert_eq!(decoded.rule.required_clause_ids, vec!["NBC-1", "NBC-2"]);
        assert!(decoded.rule.required_component_ids.is_empty());
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn invalid_condition_text_fails_rule() {
        let err = Rule::decode(&record(json!("{not json"))).unwrap_err();
        assert!(matches!(
            err,
            RuleDecodeError::InvalidJson {
                field: "trigger_condition",
                ..
            }
        ));
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let mut rec = record(json!({"occupancy_type": "office"}));
        rec.required_component_ids = json!(["WC-1", 42, null, "LAV-1"]);
        let decoded = Rule::decode(&rec).unwrap();
        assert_eq!(decoded.rule.required_component_ids, vec!["WC-1", "LAV-1"]);
        assert_eq!(decoded.skipped.len(), 2);
        assert_eq!(decoded.skipped[0].field, "required_component_ids");
    }

    #[test]
    fn requirement_must_be_a_list() {
        let mut rec = record(json!({"occupancy_type": "office"}));
        rec.required_clause_ids = json!({"a": 1});
        assert!(matches!(
            Rule::decode(&rec),
            Err(RuleDecodeError::NotACodeList {
                field: "required_clause_ids"
            })
        ));
    }

    #[test]
    fn all_sentinel_applies_everywhere() {
        let mut rec = record(json!({}));
        assert!(rec.applies_to("NBC"));
        assert!(!rec.applies_to("Alberta"));
        rec.jurisdiction = ALL_JURISDICTIONS.into();
        assert!(rec.applies_to("Alberta"));
    }
}
