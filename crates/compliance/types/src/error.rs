use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for compliance workflow operations.
pub type ComplianceResult<T> = Result<T, ComplianceError>;

/// Errors raised by the compliance workflow.
///
/// Only [`ComplianceError::InvalidInput`] and
/// [`ComplianceError::StoreUnavailable`] abort a run. The remaining variants
/// describe data-quality problems that the stages record and carry on past.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed rule definition {rule}: {reason}")]
    MalformedRuleDefinition { rule: String, reason: String },

    #[error("{kind} {code} referenced by {referenced_by} was not found")]
    MissingReferencedEntity {
        kind: ReferenceKind,
        code: String,
        referenced_by: String,
    },

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("validation incomplete: rules with unresolved clauses: {}", rules.join(", "))]
    ValidationIncomplete { rules: Vec<String> },

    #[error("workflow aborted: {0}")]
    Aborted(String),
}

/// Kind of catalog entity a rule or component points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Assembly,
    Clause,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Assembly => write!(f, "assembly"),
            ReferenceKind::Clause => write!(f, "clause"),
        }
    }
}
