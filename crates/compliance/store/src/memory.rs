//! In-memory catalog backend.
//!
//! Deterministic and test-friendly. Every session reads the same shared
//! index under a read lock, so any number of workflow runs can hold sessions
//! concurrently.

use crate::model::Catalog;
use crate::traits::{AssemblyStore, ClauseStore, RuleStore, StoreConnector};
use crate::{StoreError, StoreResult};
use compliance_types::{Assembly, Clause, RuleRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

#[derive(Default)]
struct CatalogIndex {
    rules: Vec<RuleRecord>,
    assemblies: HashMap<String, Assembly>,
    clauses: Vec<Clause>,
    clause_positions: HashMap<String, usize>,
}

struct Shared {
    index: RwLock<CatalogIndex>,
    online: AtomicBool,
    open_sessions: AtomicUsize,
    next_session: AtomicU64,
}

/// In-memory catalog and its session connector.
///
/// Cloning is cheap; clones share the same catalog.
#[derive(Clone)]
pub struct InMemoryCatalog {
    shared: Arc<Shared>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                index: RwLock::new(CatalogIndex::default()),
                online: AtomicBool::new(true),
                open_sessions: AtomicUsize::new(0),
                next_session: AtomicU64::new(1),
            }),
        }
    }

    pub fn from_catalog(catalog: Catalog) -> StoreResult<Self> {
        let store = Self::new();
        for rule in catalog.rules {
            store.add_rule(rule)?;
        }
        for assembly in catalog.assemblies {
            store.add_assembly(assembly)?;
        }
        for clause in catalog.clauses {
            store.add_clause(clause)?;
        }
        Ok(store)
    }

    pub fn add_rule(&self, rule: RuleRecord) -> StoreResult<()> {
        let mut index = self.write_index()?;
        if index.rules.iter().any(|r| r.rule_code == rule.rule_code) {
            return Err(StoreError::Conflict(format!(
                "rule {} already exists",
                rule.rule_code
            )));
        }
        index.rules.push(rule);
        Ok(())
    }

    pub fn add_assembly(&self, assembly: Assembly) -> StoreResult<()> {
        let mut index = self.write_index()?;
        if index.assemblies.contains_key(&assembly.assembly_code) {
            return Err(StoreError::Conflict(format!(
                "assembly {} already exists",
                assembly.assembly_code
            )));
        }
        index
            .assemblies
            .insert(assembly.assembly_code.clone(), assembly);
        Ok(())
    }

    pub fn add_clause(&self, clause: Clause) -> StoreResult<()> {
        let mut index = self.write_index()?;
        if index.clause_positions.contains_key(&clause.clause_code) {
            return Err(StoreError::Conflict(format!(
                "clause {} already exists",
                clause.clause_code
            )));
        }
        let position = index.clauses.len();
        index
            .clause_positions
            .insert(clause.clause_code.clone(), position);
        index.clauses.push(clause);
        Ok(())
    }

    /// Take the catalog offline (or back online). While offline, new
    /// sessions and queries on open sessions fail with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.shared.online.store(available, Ordering::SeqCst);
    }

    /// Number of sessions currently held.
    pub fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }

    fn write_index(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, CatalogIndex>> {
        self.shared
            .index
            .write()
            .map_err(|_| StoreError::Backend("catalog lock poisoned".to_string()))
    }
}

impl StoreConnector for InMemoryCatalog {
    type Session = InMemorySession;

    fn connect(&self) -> StoreResult<InMemorySession> {
        if !self.shared.online.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("catalog is offline".to_string()));
        }
        let id = self.shared.next_session.fetch_add(1, Ordering::SeqCst);
        self.shared.open_sessions.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(session = id, "Catalog session opened");
        Ok(InMemorySession {
            shared: Arc::clone(&self.shared),
            id,
        })
    }
}

/// A session on an [`InMemoryCatalog`], owned by one workflow run.
pub struct InMemorySession {
    shared: Arc<Shared>,
    id: u64,
}

impl InMemorySession {
    pub fn id(&self) -> u64 {
        self.id
    }

    fn read_index(&self) -> StoreResult<RwLockReadGuard<'_, CatalogIndex>> {
        if !self.shared.online.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("catalog is offline".to_string()));
        }
        self.shared
            .index
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(session = self.id, "Catalog session released");
    }
}

impl RuleStore for InMemorySession {
    fn query_rules_by_jurisdiction(&self, jurisdiction: &str) -> StoreResult<Vec<RuleRecord>> {
        let index = self.read_index()?;
        let mut rules: Vec<RuleRecord> = index
            .rules
            .iter()
            .filter(|r| r.applies_to(jurisdiction))
            .cloned()
            .collect();
        // Stable: equal priorities keep catalog order.
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(rules)
    }
}

impl AssemblyStore for InMemorySession {
    fn get_assembly(&self, code: &str) -> StoreResult<Option<Assembly>> {
        let index = self.read_index()?;
        Ok(index.assemblies.get(code).cloned())
    }
}

impl ClauseStore for InMemorySession {
    fn query_clauses_by_component(
        &self,
        component_id: &str,
        jurisdiction: &str,
    ) -> StoreResult<Vec<Clause>> {
        let index = self.read_index()?;
        Ok(index
            .clauses
            .iter()
            .filter(|c| c.jurisdiction == jurisdiction)
            .filter(|c| {
                c.applies_to_components
                    .iter()
                    .any(|applies| applies.contains(component_id))
            })
            .cloned()
            .collect())
    }

    fn get_clause(&self, code: &str) -> StoreResult<Option<Clause>> {
        let index = self.read_index()?;
        Ok(index
            .clause_positions
            .get(code)
            .and_then(|&position| index.clauses.get(position))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rule(code: &str, jurisdiction: &str, priority: i32) -> RuleRecord {
        RuleRecord {
            rule_code: code.to_string(),
            rule_name: format!("rule {}", code),
            jurisdiction: jurisdiction.to_string(),
            priority,
            trigger_condition: json!({}),
            required_component_ids: Value::Null,
            required_assembly_ids: Value::Null,
            required_clause_ids: Value::Null,
        }
    }

    fn clause(code: &str, jurisdiction: &str, components: &[&str]) -> Clause {
        Clause {
            clause_code: code.to_string(),
            clause_number: "1.1".to_string(),
            clause_title: format!("clause {}", code),
            clause_text: "shall be provided".to_string(),
            jurisdiction: jurisdiction.to_string(),
            applies_to_components: components.iter().map(|c| c.to_string()).collect(),
            page_number: Some(1),
            enforcement_level: "critical".to_string(),
        }
    }

    #[test]
    fn rules_filtered_and_ordered_by_priority() {
        let catalog = InMemoryCatalog::new();
        catalog.add_rule(rule("low", "NBC", 10)).unwrap();
        catalog.add_rule(rule("everywhere", "ALL", 50)).unwrap();
        catalog.add_rule(rule("alberta", "Alberta", 99)).unwrap();
        catalog.add_rule(rule("high", "NBC", 100)).unwrap();
        catalog.add_rule(rule("low-2", "NBC", 10)).unwrap();

        let session = catalog.connect().unwrap();
        let codes: Vec<String> = session
            .query_rules_by_jurisdiction("NBC")
            .unwrap()
            .into_iter()
            .map(|r| r.rule_code)
            .collect();
        assert_eq!(codes, vec!["high", "everywhere", "low", "low-2"]);
    }

    #[test]
    fn component_linkage_is_textual_and_scoped_to_jurisdiction() {
        let catalog = InMemoryCatalog::new();
        catalog.add_clause(clause("NBC-1", "NBC", &["WC-ACC"])).unwrap();
        catalog.add_clause(clause("NBC-2", "NBC", &["LAV-STD"])).unwrap();
        catalog.add_clause(clause("AB-1", "Alberta", &["WC-ACC"])).unwrap();

        let session = catalog.connect().unwrap();
        let hits = session.query_clauses_by_component("WC", "NBC").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].clause_code, "NBC-1");
        assert!(session
            .query_clauses_by_component("URINAL", "NBC")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn lookups_miss_quietly() {
        let catalog = InMemoryCatalog::new();
        catalog.add_clause(clause("NBC-1", "NBC", &[])).unwrap();
        let session = catalog.connect().unwrap();
        assert!(session.get_clause("NBC-1").unwrap().is_some());
        assert!(session.get_clause("NBC-404").unwrap().is_none());
        assert!(session.get_assembly("ASM-404").unwrap().is_none());
    }

    #[test]
    fn duplicate_codes_conflict() {
        let catalog = InMemoryCatalog::new();
        catalog.add_rule(rule("R", "NBC", 1)).unwrap();
        assert!(matches!(
            catalog.add_rule(rule("R", "NBC", 2)),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn sessions_are_released_on_drop() {
        let catalog = InMemoryCatalog::new();
        {
            let first = catalog.connect().unwrap();
            let second = catalog.connect().unwrap();
            assert_ne!(first.id(), second.id());
            assert_eq!(catalog.open_sessions(), 2);
        }
        assert_eq!(catalog.open_sessions(), 0);
    }

    #[test]
    fn offline_catalog_refuses_sessions_and_queries() {
        let catalog = InMemoryCatalog::new();
        let session = catalog.connect().unwrap();
        catalog.set_available(false);

        assert!(matches!(
            catalog.connect(),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            session.query_rules_by_jurisdiction("NBC"),
            Err(StoreError::Unavailable(_))
        ));

        catalog.set_available(true);
        assert!(session.query_rules_by_jurisdiction("NBC").is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sessions_read_the_same_catalog() {
        let catalog = InMemoryCatalog::new();
        catalog.add_clause(clause("NBC-1", "NBC", &["WC-ACC"])).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let catalog = catalog.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let session = catalog.connect().unwrap();
                session.query_clauses_by_component("WC-ACC", "NBC").unwrap().len()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(catalog.open_sessions(), 0);
    }
}
