//! Clause collector: gathers the clauses matched rules name directly and the
//! clauses linked to every required component, with provenance for each.

use compliance_store::ClauseStore;
use compliance_types::{
    ClauseCollection, ClauseSource, CollectionLogEntry, ComplianceError, ComplianceResult,
    ComponentExpansion, MatchedRule, ReferenceKind, UnresolvedReference,
};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct ClauseCollector;

impl ClauseCollector {
    pub fn new() -> Self {
        Self
    }

    /// Collect clauses for the expansion.
    ///
    /// Direct rule requirements are logged first, then component linkages in
    /// component order. Each distinct clause code is resolved once; codes the
    /// store cannot resolve are recorded and left out of `clauses`.
    pub fn collect<S>(
        &self,
        store: &S,
        expansion: &ComponentExpansion,
        rules: &[MatchedRule],
        jurisdiction: &str,
    ) -> ComplianceResult<ClauseCollection>
    where
        S: ClauseStore + ?Sized,
    {
        let mut clause_ids = BTreeSet::new();
        let mut collection = ClauseCollection::default();

        for matched in rules {
            for clause_id in matched.required_clauses() {
                clause_ids.insert(clause_id.clone());
                collection.collection_log.push(CollectionLogEntry::direct(
                    clause_id,
                    &matched.rule.name,
                    &matched.match_reason,
                ));
            }
        }

        for component in &expansion.required_components {
            for clause in store.query_clauses_by_component(component, jurisdiction)? {
                collection.collection_log.push(CollectionLogEntry::linked(
                    &clause.clause_code,
                    component,
                    &clause.clause_title,
                ));
                clause_ids.insert(clause.clause_code);
            }
        }

        for clause_id in &clause_ids {
            match store.get_clause(clause_id)? {
                Some(clause) => collection.clauses.push(clause),
                None => {
                    let referenced_by = collection
                        .provenance_of(clause_id)
                        .next()
                        .map(|entry| match &entry.source {
                            ClauseSource::DirectRuleRequirement { rule, .. } => rule.clone(),
                            ClauseSource::ComponentLinkage { component, .. } => component.clone(),
                        })
                        .unwrap_or_default();
                    let missing = ComplianceError::MissingReferencedEntity {
                        kind: ReferenceKind::Clause,
                        code: clause_id.clone(),
                        referenced_by: referenced_by.clone(),
                    };
                    tracing::warn!(error = %missing, "Clause not found");
                    collection.unresolved_clauses.push(UnresolvedReference {
                        kind: ReferenceKind::Clause,
                        code: clause_id.clone(),
                        referenced_by,
                    });
                }
            }
        }

        collection.total_clauses = collection.clauses.len();
        tracing::debug!(
            clauses = collection.total_clauses,
            log_entries = collection.collection_log.len(),
            unresolved = collection.unresolved_clauses.len(),
            "Clauses collected"
        );
        Ok(collection)
    }
}
