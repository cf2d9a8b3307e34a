//! Assembly expander: resolves the assemblies matched rules require and
//! unions their components with the components rules require directly.

use compliance_store::AssemblyStore;
use compliance_types::{
    ComplianceError, ComplianceResult, ComponentExpansion, ExpansionLogEntry, MatchedRule,
    ReferenceKind, UnresolvedReference,
};

#[derive(Clone, Debug, Default)]
pub struct AssemblyExpander;

impl AssemblyExpander {
    pub fn new() -> Self {
        Self
    }

    /// Expand matched rules into the set of required components.
    ///
    /// Assemblies keep rule order and may repeat when several rules require
    /// the same one. Unknown assembly codes are recorded as unresolved and
    /// skipped.
    pub fn expand<S>(&self, store: &S, rules: &[MatchedRule]) -> ComplianceResult<ComponentExpansion>
    where
        S: AssemblyStore + ?Sized,
    {
        let mut expansion = ComponentExpansion::default();

        for matched in rules {
            for code in matched.required_assemblies() {
                match store.get_assembly(code)? {
                    Some(assembly) => {
                        expansion
                            .required_components
                            .extend(assembly.component_ids.iter().cloned());
                        expansion
                            .expansion_log
                            .push(ExpansionLogEntry::from_assembly(&assembly, &matched.rule.name));
                        expansion.required_assemblies.push(assembly);
                    }
                    None => {
                        let missing = ComplianceError::MissingReferencedEntity {
                            kind: ReferenceKind::Assembly,
                            code: code.clone(),
                            referenced_by: matched.rule.code.clone(),
                        };
                        tracing::warn!(error = %missing, "Assembly not found");
                        expansion.unresolved_assemblies.push(UnresolvedReference {
                            kind: ReferenceKind::Assembly,
                            code: code.clone(),
                            referenced_by: matched.rule.code.clone(),
                        });
                    }
                }
            }
        }

        for matched in rules {
            let direct = matched.required_components();
            if direct.is_empty() {
                continue;
            }
            expansion.required_components.extend(direct.iter().cloned());
            expansion
                .expansion_log
                .push(ExpansionLogEntry::direct(direct.to_vec(), &matched.rule.name));
        }

        tracing::debug!(
            assemblies = expansion.required_assemblies.len(),
            components = expansion.required_components.len(),
            unresolved = expansion.unresolved_assemblies.len(),
            "Assemblies expanded"
        );
        Ok(expansion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_store::{InMemoryCatalog, StoreConnector};
    use compliance_types::{Assembly, Condition, Rule};
    use serde_json::{json, Value};

    fn assembly(code: &str, components: &[&str]) -> Assembly {
        Assembly {
            assembly_code: code.into(),
            name: format!("{} assembly", code),
            component_ids: components.iter().map(|c| c.to_string()).collect(),
            total_footprint: json!({"width": 1.0, "depth": 1.0}),
            circulation_space: Value::Null,
        }
    }

    fn matched(name: &str, assemblies: &[&str], components: &[&str]) -> MatchedRule {
        MatchedRule::new(
            Rule {
                code: format!("R-{}", name),
                name: name.into(),
                jurisdiction: "NBC".into(),
                priority: 1,
                trigger_condition: Condition::And(vec![]),
                required_component_ids: components.iter().map(|c| c.to_string()).collect(),
                required_assembly_ids: assemblies.iter().map(|c| c.to_string()).collect(),
                required_clause_ids: vec![],
            },
            "",
        )
    }

    fn catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .add_assembly(assembly("ASM-STALL", &["WC-STD", "DOOR-STD"]))
            .unwrap();
        catalog
            .add_assembly(assembly("ASM-ACC", &["WC-ACC", "GB-SIDE", "DOOR-STD"]))
            .unwrap();
        catalog
    }

    #[test]
    fn unions_assembly_and_direct_components() {
        let catalog = catalog();
        let session = catalog.connect().unwrap();
        let rules = vec![
            matched("Base", &["ASM-STALL"], &[]),
            matched("Accessible", &["ASM-ACC"], &["TURN-SPACE"]),
        ];

        let expansion = AssemblyExpander::new().expand(&session, &rules).unwrap();
        let components: Vec<&str> = expansion
            .required_components
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            components,
            vec!["DOOR-STD", "GB-SIDE", "TURN-SPACE", "WC-ACC", "WC-STD"]
        );
        assert_eq!(expansion.required_assemblies.len(), 2);
        assert_eq!(expansion.expansion_log[0].reason, "Required by rule: Base");
        assert_eq!(
            expansion.expansion_log[2].reason,
            "Directly required by rule: Accessible"
        );
        for component in &expansion.required_components {
            assert!(expansion.provenance_of(component).next().is_some());
        }
    }

    #[test]
    fn repeated_assemblies_are_kept() {
        let catalog = catalog();
        let session = catalog.connect().unwrap();
        let rules = vec![
            matched("A", &["ASM-STALL"], &[]),
            matched("B", &["ASM-STALL"], &[]),
        ];
        let expansion = AssemblyExpander::new().expand(&session, &rules).unwrap();
        assert_eq!(expansion.required_assemblies.len(), 2);
        assert_eq!(expansion.required_components.len(), 2);
    }

    #[test]
    fn unknown_assemblies_are_recorded() {
        let catalog = catalog();
        let session = catalog.connect().unwrap();
        let rules = vec![matched("Base", &["ASM-GONE", "ASM-STALL"], &[])];
        let expansion = AssemblyExpander::new().expand(&session, &rules).unwrap();

        assert_eq!(expansion.required_assemblies.len(), 1);
        assert_eq!(
            expansion.unresolved_assemblies,
            vec![UnresolvedReference {
                kind: ReferenceKind::Assembly,
                code: "ASM-GONE".into(),
                referenced_by: "R-Base".into(),
            }]
        );
    }

    #[test]
    fn no_rules_no_components() {
        let catalog = catalog();
        let session = catalog.connect().unwrap();
        let expansion = AssemblyExpander::new().expand(&session, &[]).unwrap();
        assert!(expansion.required_components.is_empty());
        assert!(expansion.expansion_log.is_empty());
    }
}
