//! Workflow run result and per-step audit records.

use crate::checklist::Checklist;
use crate::error::{ComplianceError, ComplianceResult};
use crate::expansion::{ClauseCollection, ComponentExpansion};
use crate::input::NormalizedInput;
use crate::layout::LayoutResult;
use crate::rule::MatchedRule;
use crate::validation::ValidationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The seven workflow stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepKind {
    InputProcessing,
    RuleMatching,
    AssemblyExpansion,
    ClauseCollection,
    LogicValidation,
    ChecklistGeneration,
    LayoutGeneration,
}

impl StepKind {
    pub const ALL: [StepKind; 7] = [
        StepKind::InputProcessing,
        StepKind::RuleMatching,
        StepKind::AssemblyExpansion,
        StepKind::ClauseCollection,
        StepKind::LogicValidation,
        StepKind::ChecklistGeneration,
        StepKind::LayoutGeneration,
    ];

    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    /// Key under which the step is recorded, `step_1` .. `step_7`.
    pub fn key(&self) -> String {
        format!("step_{}", self.number())
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::InputProcessing => "User Input Processing",
            StepKind::RuleMatching => "Context Logic Rule Matching",
            StepKind::AssemblyExpansion => "Component Assembly Expansion",
            StepKind::ClauseCollection => "Building Code Clause Collection",
            StepKind::LogicValidation => "Logic Validation Pass",
            StepKind::ChecklistGeneration => "Compliance Checklist Generation",
            StepKind::LayoutGeneration => "2D Layout Generation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Failed,
}

/// Data a step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StepPayload {
    NormalizedInput(NormalizedInput),
    MatchedRules {
        rules_found: usize,
        matched_rules: Vec<MatchedRule>,
    },
    ComponentExpansion(ComponentExpansion),
    ClauseCollection(ClauseCollection),
    Validation(ValidationReport),
    Checklist(Checklist),
    Layout(LayoutResult),
    Failure {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub payload: StepPayload,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResults {
    pub compliance_checklist: Checklist,
    pub layout_design: LayoutResult,
    pub validation_summary: ValidationReport,
    /// Mirrors `validation.is_complete`.
    pub traceability_complete: bool,
}

/// One complete workflow run.
///
/// When `error` is set the run aborted: `steps` holds the records up to and
/// including the failed step, and the final results are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub timestamp: DateTime<Utc>,
    pub steps: BTreeMap<String, StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_results: Option<FinalResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResult {
    pub fn new(workflow_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            timestamp,
            steps: BTreeMap::new(),
            final_results: None,
            validation: None,
            error: None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }

    pub fn step(&self, kind: StepKind) -> Option<&StepRecord> {
        self.steps.get(&kind.key())
    }

    pub fn normalized_input(&self) -> Option<&NormalizedInput> {
        match self.step(StepKind::InputProcessing).map(|s| &s.payload) {
            Some(StepPayload::NormalizedInput(input)) => Some(input),
            _ => None,
        }
    }

    pub fn matched_rules(&self) -> Option<&[MatchedRule]> {
        match self.step(StepKind::RuleMatching).map(|s| &s.payload) {
            Some(StepPayload::MatchedRules { matched_rules, .. }) => Some(matched_rules),
            _ => None,
        }
    }

    pub fn component_expansion(&self) -> Option<&ComponentExpansion> {
        match self.step(StepKind::AssemblyExpansion).map(|s| &s.payload) {
            Some(StepPayload::ComponentExpansion(expansion)) => Some(expansion),
            _ => None,
        }
    }

    pub fn clause_collection(&self) -> Option<&ClauseCollection> {
        match self.step(StepKind::ClauseCollection).map(|s| &s.payload) {
            Some(StepPayload::ClauseCollection(collection)) => Some(collection),
            _ => None,
        }
    }

    /// Fails if the run aborted or its validation is incomplete.
    pub fn ensure_complete(&self) -> ComplianceResult<()> {
        if let Some(error) = &self.error {
            return Err(ComplianceError::Aborted(error.clone()));
        }
        match &self.validation {
            Some(report) if report.is_complete => Ok(()),
            Some(report) => Err(ComplianceError::ValidationIncomplete {
                rules: report.incomplete_rules(),
            }),
            None => Err(ComplianceError::Aborted(
                "workflow produced no validation report".to_string(),
            )),
        }
    }
}
