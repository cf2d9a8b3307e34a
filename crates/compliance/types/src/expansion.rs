//! Component expansion and clause collection results with their provenance.

use crate::catalog::{Assembly, Clause};
use crate::error::ReferenceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why components were pulled in: through an assembly, or directly by a
/// rule when `assembly` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_code: Option<String>,
    pub components: Vec<String>,
    pub reason: String,
}

impl ExpansionLogEntry {
    pub fn from_assembly(assembly: &Assembly, rule_name: &str) -> Self {
        Self {
            assembly: Some(assembly.name.clone()),
            assembly_code: Some(assembly.assembly_code.clone()),
            components: assembly.component_ids.clone(),
            reason: format!("Required by rule: {}", rule_name),
        }
    }

    pub fn direct(components: Vec<String>, rule_name: &str) -> Self {
        Self {
            assembly: None,
            assembly_code: None,
            components,
            reason: format!("Directly required by rule: {}", rule_name),
        }
    }
}

/// A code that a rule or component referenced but the store could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub code: String,
    pub referenced_by: String,
}

/// Output of assembly expansion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentExpansion {
    pub required_components: BTreeSet<String>,
    pub required_assemblies: Vec<Assembly>,
    pub expansion_log: Vec<ExpansionLogEntry>,
    #[serde(default)]
    pub unresolved_assemblies: Vec<UnresolvedReference>,
}

impl ComponentExpansion {
    /// Log entries that account for `component`.
    pub fn provenance_of<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = &'a ExpansionLogEntry> + 'a {
        self.expansion_log
            .iter()
            .filter(move |entry| entry.components.iter().any(|c| c == component))
    }
}

/// How a clause entered the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ClauseSource {
    DirectRuleRequirement { rule: String, reason: String },
    ComponentLinkage { component: String, clause_title: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionLogEntry {
    pub clause_id: String,
    #[serde(flatten)]
    pub source: ClauseSource,
}

impl CollectionLogEntry {
    pub fn direct(
        clause_id: impl Into<String>,
        rule: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            clause_id: clause_id.into(),
            source: ClauseSource::DirectRuleRequirement {
                rule: rule.into(),
                reason: reason.into(),
            },
        }
    }

    pub fn linked(
        clause_id: impl Into<String>,
        component: impl Into<String>,
        clause_title: impl Into<String>,
    ) -> Self {
        Self {
            clause_id: clause_id.into(),
            source: ClauseSource::ComponentLinkage {
                component: component.into(),
                clause_title: clause_title.into(),
            },
        }
    }

    /// The match reason of a direct requirement; linkage entries carry none.
    pub fn reason(&self) -> Option<&str> {
        match &self.source {
            ClauseSource::DirectRuleRequirement { reason, .. } => Some(reason),
            ClauseSource::ComponentLinkage { .. } => None,
        }
    }
}

/// Output of clause collection. `clauses` holds one resolved record per
/// distinct clause code, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClauseCollection {
    pub clauses: Vec<Clause>,
    pub collection_log: Vec<CollectionLogEntry>,
    pub total_clauses: usize,
    #[serde(default)]
    pub unresolved_clauses: Vec<UnresolvedReference>,
}

impl ClauseCollection {
    pub fn clause_codes(&self) -> BTreeSet<&str> {
        self.clauses.iter().map(|c| c.clause_code.as_str()).collect()
    }

    /// Log entries that account for `clause_id`, in collection order.
    pub fn provenance_of<'a>(
        &'a self,
        clause_id: &'a str,
    ) -> impl Iterator<Item = &'a CollectionLogEntry> + 'a {
        self.collection_log
            .iter()
            .filter(move |entry| entry.clause_id == clause_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn log_entries_flatten_their_source() {
        let entry = CollectionLogEntry::direct("NBC-1", "Office base", "occupancy_type: office");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "clause_id": "NBC-1",
                "source": "direct_rule_requirement",
                "rule": "Office base",
                "reason": "occupancy_type: office"
            })
        );

        let linked = CollectionLogEntry::linked("NBC-2", "WC-ACC", "Grab Bars");
        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(json["source"], "component_linkage");
        assert_eq!(linked.reason(), None);

        let back: CollectionLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, linked);
    }

    #[test]
    fn expansion_entries_name_their_origin() {
        let assembly = Assembly {
            assembly_code: "ASM-1".into(),
            name: "Accessible stall".into(),
            component_ids: vec!["WC-ACC".into(), "GB-SIDE".into()],
            total_footprint: json!({"width": 1.7, "depth": 1.8}),
            circulation_space: json!({"approach_space": 1.5}),
        };
        let mut expansion = ComponentExpansion::default();
        expansion
            .expansion_log
            .push(ExpansionLogEntry::from_assembly(&assembly, "Accessibility"));
        expansion
            .expansion_log
            .push(ExpansionLogEntry::direct(vec!["TURN-SPACE".into()], "Accessibility"));

        let json = serde_json::to_value(&expansion.expansion_log[1]).unwrap();
        assert!(json.get("assembly").is_none());
        assert_eq!(json["reason"], "Directly required by rule: Accessibility");

        assert_eq!(expansion.provenance_of("GB-SIDE").count(), 1);
        assert_eq!(
            expansion.provenance_of("TURN-SPACE").next().unwrap().assembly,
            None
        );
        assert_eq!(expansion.provenance_of("URINAL").count(), 0);
    }
}
