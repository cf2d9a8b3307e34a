//! End-to-end workflow runs against the seed catalog.

mod common;

use common::{office_scenario, seed_catalog};
use compliance_engine::WorkflowOrchestrator;
use compliance_store::{
    AssemblyStore, ClauseStore, InMemoryCatalog, InMemorySession, RuleStore, StoreConnector,
    StoreError, StoreResult,
};
use compliance_types::{
    Assembly, Category, Clause, ClauseSource, IssueType, PlacementStatus, RuleRecord, StepKind,
    StepStatus, WorkflowResult,
};
use serde_json::json;
use std::sync::Arc;

fn run(raw: serde_json::Value) -> WorkflowResult {
    WorkflowOrchestrator::new(seed_catalog()).run_value(&raw)
}

#[test]
fn office_scenario_end_to_end() {
    let result = run(office_scenario());

    assert!(result.error.is_none(), "aborted: {:?}", result.error);
    assert!(result.workflow_id.starts_with("workflow_"));
    assert_eq!(result.steps.len(), 7);
    for kind in StepKind::ALL {
        let step = result.step(kind).expect("step recorded");
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.name, kind.name());
    }

    let input = result.normalized_input().unwrap();
    assert!((input.occupancy_density - 1.5625).abs() < 1e-9);
    assert_eq!(input.room_area, 96.0);

    let rules: Vec<&str> = result
        .matched_rules()
        .unwrap()
        .iter()
        .map(|m| m.rule.code.as_str())
        .collect();
    assert_eq!(
        rules,
        vec![
            "R-NBC-OFFICE-BASE",
            "R-ALL-ACCESSIBLE",
            "R-NBC-OFFICE-LARGE",
            "R-NBC-ACCESSIBLE-ENHANCED",
            "R-NBC-DENSITY",
        ]
    );

    let expansion = result.component_expansion().unwrap();
    assert_eq!(expansion.required_assemblies.len(), 5);
    assert!(expansion.required_components.contains("TURN-SPACE"));
    assert!(expansion.unresolved_assemblies.is_empty());

    let validation = result.validation.as_ref().unwrap();
    assert!(validation.is_complete);
    assert!(validation.errors.is_empty());
    // The mirror has no linked clause.
    assert_eq!(validation.warnings.len(), 1);
    assert_eq!(validation.warnings[0].issue_type, IssueType::UncoveredComponents);
    assert_eq!(validation.warnings[0].subjects, vec!["MIRROR"]);

    let final_results = result.final_results.as_ref().unwrap();
    assert!(final_results.traceability_complete);
    assert_eq!(&final_results.validation_summary, validation);
    let checklist = &final_results.compliance_checklist;
    assert!(checklist.project_info.total_items > 0);
    assert_eq!(
        checklist.project_info.total_items,
        result.clause_collection().unwrap().total_clauses
    );
    let grab_bars = checklist
        .section(Category::Accessibility)
        .and_then(|s| s.items.iter().find(|i| i.clause_id == "NBC-3.8.3.8(1)(d)"))
        .expect("grab bar item");
    assert_eq!(grab_bars.affected_components, vec!["GB-SIDE", "GB-REAR"]);
    assert!(grab_bars.why_required.contains("accessibility_level: enhanced"));

    let layout = &final_results.layout_design;
    assert_eq!(
        layout.positioned_assemblies.len(),
        expansion.required_assemblies.len()
    );
    assert!(layout
        .positioned_assemblies
        .iter()
        .all(|p| p.compliance_status == PlacementStatus::Compliant));
    assert_eq!(layout.compliance_score, 100.0);
    assert!(layout.layout_efficiency > 0.0 && layout.layout_efficiency <= 100.0);
    assert!(result.ensure_complete().is_ok());
}

#[test]
fn every_component_and_clause_is_traceable() {
    let result = run(office_scenario());
    let expansion = result.component_expansion().unwrap();
    let collection = result.clause_collection().unwrap();

    for component in &expansion.required_components {
        let via_expansion = expansion.provenance_of(component).next().is_some();
        let via_collection = collection.collection_log.iter().any(|entry| {
            matches!(&entry.source, ClauseSource::ComponentLinkage { component: c, .. } if c == component)
        });
        assert!(via_expansion || via_collection, "{component} untraceable");
    }
    for clause in &collection.clauses {
        assert!(collection.provenance_of(&clause.clause_code).next().is_some());
    }

    let mut codes: Vec<&str> = collection
        .clauses
        .iter()
        .map(|c| c.clause_code.as_str())
        .collect();
    let len = codes.len();
    codes.dedup();
    assert_eq!(codes.len(), len, "clause codes repeat");
}

#[test]
fn alberta_universal_washroom() {
    let result = run(json!({
        "jurisdiction": "Alberta",
        "occupancy_load": "150",
        "accessibility_level": "universal"
    }));

    let rules: Vec<&str> = result
        .matched_rules()
        .unwrap()
        .iter()
        .map(|m| m.rule.code.as_str())
        .collect();
    assert_eq!(rules, vec!["R-AB-OFFICE", "R-ALL-ACCESSIBLE", "R-AB-UNIVERSAL"]);

    let collection = result.clause_collection().unwrap();
    assert!(collection.clauses.iter().all(|c| c.jurisdiction == "Alberta"));
    assert!(result.validation.as_ref().unwrap().is_complete);
}

#[test]
fn rules_without_clauses_in_store_leave_validation_incomplete() {
    let catalog = seed_catalog();
    catalog
        .add_rule(RuleRecord {
            rule_code: "R-NBC-SHOWERS".into(),
            rule_name: "Shower facilities".into(),
            jurisdiction: "NBC".into(),
            priority: 10,
            trigger_condition: json!({"occupancy_type": "office"}),
            required_component_ids: json!(null),
            required_assembly_ids: json!(["ASM-SHOWER"]),
            required_clause_ids: json!(["NBC-3.7.2.10"]),
        })
        .unwrap();

    let result = WorkflowOrchestrator::new(catalog).run_value(&office_scenario());

    // Data gaps are findings, not aborts.
    assert!(result.error.is_none());
    assert_eq!(result.steps.len(), 7);

    let validation = result.validation.as_ref().unwrap();
    assert!(!validation.is_complete);
    assert_eq!(validation.incomplete_rules(), vec!["Shower facilities"]);
    assert!(validation
        .warnings
        .iter()
        .any(|w| w.issue_type == IssueType::UnresolvedAssembly && w.subjects == ["ASM-SHOWER"]));
    assert!(validation
        .warnings
        .iter()
        .any(|w| w.issue_type == IssueType::UnresolvedClause));
    assert!(!result.final_results.as_ref().unwrap().traceability_complete);
    assert!(result.ensure_complete().is_err());
}

#[test]
fn runs_are_deterministic_apart_from_identity_and_time() {
    let orchestrator = WorkflowOrchestrator::new(seed_catalog());
    let first = orchestrator.run_value(&office_scenario());
    let second = orchestrator.run_value(&office_scenario());

    assert_eq!(first.matched_rules(), second.matched_rules());
    assert_eq!(first.component_expansion(), second.component_expansion());
    assert_eq!(first.clause_collection(), second.clause_collection());
    assert_eq!(first.validation, second.validation);
    assert_eq!(first.final_results, second.final_results);
}

#[test]
fn daycare_child_stall_uses_default_geometry() {
    let result = run(json!({"building_type": "Daycare", "occupancy_load": 30}));
    let layout = &result.final_results.as_ref().unwrap().layout_design;
    let child = layout
        .positioned_assemblies
        .iter()
        .find(|p| p.assembly_code == "ASM-CHILD-STALL")
        .expect("child stall placed");
    assert_eq!((child.position.width, child.position.depth), (1.2, 1.8));
}

#[test]
fn unknown_jurisdiction_matches_only_universal_rules() {
    let result = run(json!({"jurisdiction": "Ontario", "accessibility_level": "enhanced"}));
    let rules = result.matched_rules().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].rule.jurisdiction, "ALL");

    // No Ontario clauses exist, so every component is uncovered.
    let validation = result.validation.as_ref().unwrap();
    assert!(validation.is_complete);
    assert_eq!(validation.coverage_map.coverage_percentage, 0.0);
}

// ── Store failures ───────────────────────────────────────────────────

struct BrokenClauseIndex(InMemoryCatalog);

struct BrokenSession(InMemorySession);

impl StoreConnector for BrokenClauseIndex {
    type Session = BrokenSession;

    fn connect(&self) -> StoreResult<BrokenSession> {
        Ok(BrokenSession(self.0.connect()?))
    }
}

impl RuleStore for BrokenSession {
    fn query_rules_by_jurisdiction(&self, jurisdiction: &str) -> StoreResult<Vec<RuleRecord>> {
        self.0.query_rules_by_jurisdiction(jurisdiction)
    }
}

impl AssemblyStore for BrokenSession {
    fn get_assembly(&self, code: &str) -> StoreResult<Option<Assembly>> {
        self.0.get_assembly(code)
    }
}

impl ClauseStore for BrokenSession {
    fn query_clauses_by_component(&self, _: &str, _: &str) -> StoreResult<Vec<Clause>> {
        Err(StoreError::Backend("clause index corrupted".into()))
    }

    fn get_clause(&self, code: &str) -> StoreResult<Option<Clause>> {
        self.0.get_clause(code)
    }
}

#[test]
fn store_failure_mid_run_aborts_and_releases_the_session() {
    let catalog = seed_catalog();
    let orchestrator = WorkflowOrchestrator::new(BrokenClauseIndex(catalog.clone()));
    let result = orchestrator.run_value(&office_scenario());

    assert_eq!(
        result.error.as_deref(),
        Some("store unavailable: backend error: clause index corrupted")
    );
    assert_eq!(result.steps.len(), 4);
    assert_eq!(
        result.step(StepKind::AssemblyExpansion).unwrap().status,
        StepStatus::Completed
    );
    assert_eq!(
        result.step(StepKind::ClauseCollection).unwrap().status,
        StepStatus::Failed
    );
    assert!(result.final_results.is_none());
    assert!(result.validation.is_none());
    assert_eq!(catalog.open_sessions(), 0);
}

// ── Concurrency ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_are_isolated() {
    let catalog = seed_catalog();
    let orchestrator = Arc::new(WorkflowOrchestrator::new(catalog.clone()));

    let inputs = vec![
        office_scenario(),
        json!({"building_type": "daycare"}),
        json!({"jurisdiction": "Alberta", "accessibility_level": "enhanced", "occupancy_load": 200}),
        json!({"occupancy_load": "not a number"}),
    ];

    let mut handles = Vec::new();
    for _ in 0..4 {
        for input in &inputs {
            let orchestrator = Arc::clone(&orchestrator);
            let input = input.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let result = orchestrator.run_value(&input);
                (input, result)
            }));
        }
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        let (input, result) = handle.await.unwrap();
        assert!(ids.insert(result.workflow_id.clone()), "workflow ids collide");

        let expected = orchestrator.run_value(&input);
        assert_eq!(result.error, expected.error);
        assert_eq!(result.final_results, expected.final_results);
    }
    assert_eq!(catalog.open_sessions(), 0);
}
