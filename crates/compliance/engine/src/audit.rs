//! Audit trail: records one [`StepRecord`] per executed workflow stage.
//!
//! Each stage runs through [`AuditTrail::run`], which timestamps it and
//! records either its payload or the error that aborted the run.

use chrono::{DateTime, Utc};
use compliance_types::{
    ComplianceError, ComplianceResult, StepKind, StepPayload, StepRecord, StepStatus,
};
use std::collections::BTreeMap;

/// Per-run step records, keyed `step_1` .. `step_7`.
#[derive(Clone, Debug)]
pub struct AuditTrail {
    workflow_id: String,
    steps: BTreeMap<String, StepRecord>,
}

impl AuditTrail {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            steps: BTreeMap::new(),
        }
    }

    /// Run one stage and record its outcome.
    ///
    /// On success `payload` builds the recorded data from the stage output.
    /// On failure a [`StepPayload::Failure`] is recorded and the error is
    /// returned to the caller.
    pub fn run<T>(
        &mut self,
        kind: StepKind,
        stage: impl FnOnce() -> ComplianceResult<T>,
        payload: impl FnOnce(&T) -> StepPayload,
    ) -> ComplianceResult<T> {
        let started_at = Utc::now();
        tracing::debug!(
            workflow_id = %self.workflow_id,
            step = kind.number(),
            name = kind.name(),
            "Step started"
        );

        match stage() {
            Ok(output) => {
                self.record(kind, StepStatus::Completed, payload(&output), started_at);
                Ok(output)
            }
            Err(err) => {
                self.record_failure(kind, &err, started_at);
                Err(err)
            }
        }
    }

    fn record_failure(
        &mut self,
        kind: StepKind,
        err: &ComplianceError,
        started_at: DateTime<Utc>,
    ) {
        tracing::error!(
            workflow_id = %self.workflow_id,
            step = kind.number(),
            name = kind.name(),
            error = %err,
            "Step failed"
        );
        self.record(
            kind,
            StepStatus::Failed,
            StepPayload::Failure {
                message: err.to_string(),
            },
            started_at,
        );
    }

    fn record(
        &mut self,
        kind: StepKind,
        status: StepStatus,
        payload: StepPayload,
        started_at: DateTime<Utc>,
    ) {
        let record = StepRecord {
            name: kind.name().to_string(),
            status,
            payload,
            started_at,
            completed_at: Utc::now(),
        };
        tracing::trace!(
            workflow_id = %self.workflow_id,
            step = %kind.key(),
            status = ?status,
            "Step recorded"
        );
        self.steps.insert(kind.key(), record);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> BTreeMap<String, StepRecord> {
        self.steps
    }
}
