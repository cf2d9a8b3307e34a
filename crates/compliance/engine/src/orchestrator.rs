//! Workflow orchestrator: the main entry point for the compliance engine.
//!
//! The orchestrator runs the seven stages in order:
//! 1. Normalize input
//! 2. Match rules
//! 3. Expand assemblies
//! 4. Collect clauses
//! 5. Validate completeness
//! 6. Build the checklist
//! 7. Place the layout
//!
//! Each run opens its own store session after stage 1 and drops it once the
//! last store-reading stage is done. Runs share nothing mutable, so one
//! orchestrator can serve concurrent runs.

use crate::{
    AssemblyExpander, AuditTrail, ChecklistBuilder, ClauseCollector, CompletenessValidator,
    EngineConfig, InputNormalizer, LayoutPlacer, RawParameters, RuleMatcher,
};
use chrono::{DateTime, Utc};
use compliance_store::StoreConnector;
use compliance_types::{
    Checklist, ComplianceResult, FinalResults, LayoutResult, NormalizedInput, StepKind,
    StepPayload, ValidationReport, WorkflowResult,
};
use serde_json::Value;
use uuid::Uuid;

/// Runs the compliance workflow against a store connector.
pub struct WorkflowOrchestrator<C> {
    connector: C,
    normalizer: InputNormalizer,
    matcher: RuleMatcher,
    expander: AssemblyExpander,
    collector: ClauseCollector,
    validator: CompletenessValidator,
    checklist_builder: ChecklistBuilder,
    layout_placer: LayoutPlacer,
}

struct Outcome {
    validation: ValidationReport,
    checklist: Checklist,
    layout: LayoutResult,
}

impl<C: StoreConnector> WorkflowOrchestrator<C> {
    /// Create an orchestrator with default configuration
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, EngineConfig::default())
    }

    pub fn with_config(connector: C, config: EngineConfig) -> Self {
        Self {
            connector,
            normalizer: InputNormalizer::new(config.input),
            matcher: RuleMatcher::new(),
            expander: AssemblyExpander::new(),
            collector: ClauseCollector::new(),
            validator: CompletenessValidator::new(),
            checklist_builder: ChecklistBuilder::new(),
            layout_placer: LayoutPlacer::new(config.layout),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Run the workflow on raw parameters.
    ///
    /// Never panics and never returns an error: a fatal failure is reported
    /// through [`WorkflowResult::error`] with the step records gathered so far.
    pub fn run(&self, raw: &RawParameters) -> WorkflowResult {
        self.run_with(|normalizer| normalizer.normalize(raw))
    }

    /// Run the workflow on a raw JSON value, which must be an object.
    pub fn run_value(&self, raw: &Value) -> WorkflowResult {
        self.run_with(|normalizer| normalizer.normalize_value(raw))
    }

    fn run_with(
        &self,
        normalize: impl FnOnce(&InputNormalizer) -> ComplianceResult<NormalizedInput>,
    ) -> WorkflowResult {
        let timestamp = Utc::now();
        let workflow_id = workflow_id(timestamp);
        let mut result = WorkflowResult::new(workflow_id.clone(), timestamp);
        let mut audit = AuditTrail::new(&workflow_id);

        tracing::info!(workflow_id = %workflow_id, "Workflow started");
        match self.execute(normalize, &mut audit) {
            Ok(outcome) => {
                tracing::info!(
                    workflow_id = %workflow_id,
                    complete = outcome.validation.is_complete,
                    checklist_items = outcome.checklist.project_info.total_items,
                    placed = outcome.layout.positioned_assemblies.len(),
                    "Workflow completed"
                );
                result.final_results = Some(FinalResults {
                    traceability_complete: outcome.validation.is_complete,
                    compliance_checklist: outcome.checklist,
                    layout_design: outcome.layout,
                    validation_summary: outcome.validation.clone(),
                });
                result.validation = Some(outcome.validation);
            }
            Err(err) => {
                tracing::error!(workflow_id = %workflow_id, error = %err, "Workflow aborted");
                result.error = Some(err.to_string());
            }
        }
        result.steps = audit.into_steps();
        result
    }

    fn execute(
        &self,
        normalize: impl FnOnce(&InputNormalizer) -> ComplianceResult<NormalizedInput>,
        audit: &mut AuditTrail,
    ) -> ComplianceResult<Outcome> {
        let input = audit.run(
            StepKind::InputProcessing,
            || normalize(&self.normalizer),
            |input| StepPayload::NormalizedInput(input.clone()),
        )?;

        let (session, rules) = audit.run(
            StepKind::RuleMatching,
            || {
                let session = self.connector.connect()?;
                let rules = self.matcher.match_rules(&session, &input)?;
                Ok((session, rules))
            },
            |(_, rules)| StepPayload::MatchedRules {
                rules_found: rules.len(),
                matched_rules: rules.clone(),
            },
        )?;

        let expansion = audit.run(
            StepKind::AssemblyExpansion,
            || self.expander.expand(&session, &rules),
            |expansion| StepPayload::ComponentExpansion(expansion.clone()),
        )?;

        let collection = audit.run(
            StepKind::ClauseCollection,
            || {
                self.collector
                    .collect(&session, &expansion, &rules, &input.jurisdiction)
            },
            |collection| StepPayload::ClauseCollection(collection.clone()),
        )?;
        drop(session);

        let validation = audit.run(
            StepKind::LogicValidation,
            || Ok(self.validator.validate(&expansion, &collection, &rules)),
            |report| StepPayload::Validation(report.clone()),
        )?;

        let checklist = audit.run(
            StepKind::ChecklistGeneration,
            || {
                Ok(self
                    .checklist_builder
                    .build(&collection, &expansion, &validation))
            },
            |checklist| StepPayload::Checklist(checklist.clone()),
        )?;

        let layout = audit.run(
            StepKind::LayoutGeneration,
            || Ok(self.layout_placer.place(&expansion, &input.room_dimensions)),
            |layout| StepPayload::Layout(layout.clone()),
        )?;

        Ok(Outcome {
            validation,
            checklist,
            layout,
        })
    }
}

/// `workflow_<YYYYmmdd_HHMMSS>_<8 hex>`
fn workflow_id(timestamp: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "workflow_{}_{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}
