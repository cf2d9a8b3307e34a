//! Domain types for the building-code compliance workflow.
//!
//! The workflow turns a handful of building parameters into a traceable
//! requirements checklist and a fixture layout. This crate holds the data
//! that flows between its seven stages:
//!
//! - [`NormalizedInput`]: typed parameters plus derived values
//! - [`RuleRecord`] / [`Rule`] / [`MatchedRule`]: declarative rules, decoded
//!   once into a [`Condition`] tree
//! - [`Assembly`] / [`Clause`]: catalog entities referenced by rules
//! - [`ComponentExpansion`] / [`ClauseCollection`]: expansion results with
//!   their provenance logs
//! - [`ValidationReport`], [`Checklist`], [`LayoutResult`]: the artifacts
//! - [`WorkflowResult`]: one complete run with its per-step audit records

#![deny(unsafe_code)]

pub mod catalog;
pub mod checklist;
pub mod condition;
pub mod error;
pub mod expansion;
pub mod input;
pub mod layout;
pub mod rule;
pub mod validation;
pub mod workflow;

pub use catalog::{Assembly, Circulation, Clause, Footprint};
pub use checklist::{
    Category, Checklist, ChecklistItem, ChecklistSection, ItemStatus, ProjectInfo,
    VerificationMethod,
};
pub use condition::{Comparator, Condition, Leaf, Predicate, RuleDecodeError};
pub use error::{ComplianceError, ComplianceResult, ReferenceKind};
pub use expansion::{
    ClauseCollection, ClauseSource, CollectionLogEntry, ComponentExpansion, ExpansionLogEntry,
    UnresolvedReference,
};
pub use input::{AccessibilityLevel, NormalizedInput, RoomDimensions};
pub use layout::{LayoutResult, Placement, PlacementStatus, PositionedAssembly};
pub use rule::{DecodedRule, MatchedRule, Rule, RuleRecord, SkippedEntry, ALL_JURISDICTIONS};
pub use validation::{CoverageMap, IssueType, Severity, ValidationIssue, ValidationReport};
pub use workflow::{FinalResults, StepKind, StepPayload, StepRecord, StepStatus, WorkflowResult};
