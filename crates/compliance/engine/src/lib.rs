//! Compliance workflow engine
//!
//! Turns a handful of building parameters into a traceable requirements
//! checklist and a 2D fixture layout, using a jurisdiction-scoped rule base
//! read through [`compliance_store`].
//!
//! # Architecture
//!
//! The [`WorkflowOrchestrator`] composes one component per stage:
//!
//! - [`InputNormalizer`]: defaults, coercion and derived values
//! - [`RuleMatcher`]: evaluates rule trigger conditions
//! - [`AssemblyExpander`]: resolves assemblies into required components
//! - [`ClauseCollector`]: gathers direct and component-linked clauses
//! - [`CompletenessValidator`]: checks the expansion is fully traceable
//! - [`ChecklistBuilder`]: groups clauses into checklist sections
//! - [`LayoutPlacer`]: linear placement of assemblies in the room
//! - [`AuditTrail`]: records every executed stage
//!
//! # Example
//!
//! ```rust
//! use compliance_engine::WorkflowOrchestrator;
//! use compliance_store::{Catalog, InMemoryCatalog};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_yaml_str(r#"
//! rules:
//!   - rule_code: R-1
//!     rule_name: Office base
//!     jurisdiction: NBC
//!     priority: 100
//!     trigger_condition: {occupancy_type: office}
//!     required_clause_ids: [NBC-3.7.2.2]
//! clauses:
//!   - clause_code: NBC-3.7.2.2
//!     clause_number: 3.7.2.2
//!     clause_title: Water Closets Required
//!     clause_text: Water closets shall be provided.
//!     jurisdiction: NBC
//!     enforcement_level: critical
//! "#).unwrap();
//!
//! let orchestrator = WorkflowOrchestrator::new(InMemoryCatalog::from_catalog(catalog).unwrap());
//! let result = orchestrator.run_value(&json!({"building_type": "office"}));
//!
//! assert_eq!(result.steps.len(), 7);
//! assert!(result.ensure_complete().is_ok());
//! ```

#![deny(unsafe_code)]

pub mod assembly_expander;
pub mod audit;
pub mod checklist_builder;
pub mod clause_collector;
pub mod completeness_validator;
pub mod config;
pub mod input_normalizer;
pub mod layout_placer;
pub mod orchestrator;
pub mod rule_matcher;

pub use assembly_expander::AssemblyExpander;
pub use audit::AuditTrail;
pub use checklist_builder::ChecklistBuilder;
pub use clause_collector::ClauseCollector;
pub use completeness_validator::CompletenessValidator;
pub use config::{EngineConfig, InputDefaults, LayoutConfig};
pub use input_normalizer::{InputNormalizer, RawParameters};
pub use layout_placer::LayoutPlacer;
pub use orchestrator::WorkflowOrchestrator;
pub use rule_matcher::RuleMatcher;
