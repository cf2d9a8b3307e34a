use crate::StoreResult;
use compliance_types::{Assembly, Clause, RuleRecord};

/// Read access to rule definitions.
pub trait RuleStore {
    /// Rules tagged with `jurisdiction` or with the `ALL` sentinel,
    /// highest priority first.
    fn query_rules_by_jurisdiction(&self, jurisdiction: &str) -> StoreResult<Vec<RuleRecord>>;
}

/// Read access to component assemblies.
pub trait AssemblyStore {
    /// Look up one assembly by code. A miss is `Ok(None)`.
    fn get_assembly(&self, code: &str) -> StoreResult<Option<Assembly>>;
}

/// Read access to building-code clauses.
pub trait ClauseStore {
    /// Clauses of `jurisdiction` whose component applicability textually
    /// references `component_id`.
    fn query_clauses_by_component(
        &self,
        component_id: &str,
        jurisdiction: &str,
    ) -> StoreResult<Vec<Clause>>;

    /// Look up one clause by code. A miss is `Ok(None)`.
    fn get_clause(&self, code: &str) -> StoreResult<Option<Clause>>;
}

/// Everything one workflow run reads.
pub trait ComplianceStore: RuleStore + AssemblyStore + ClauseStore {}

impl<T> ComplianceStore for T where T: RuleStore + AssemblyStore + ClauseStore {}

/// Hands out per-run store sessions.
///
/// Each workflow run calls [`StoreConnector::connect`] once and owns the
/// returned session; dropping it releases the underlying resources. Sessions
/// are never shared between runs.
pub trait StoreConnector: Send + Sync {
    type Session: ComplianceStore;

    fn connect(&self) -> StoreResult<Self::Session>;
}
