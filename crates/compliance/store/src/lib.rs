//! Store contracts for the compliance workflow.
//!
//! The workflow reads three catalogs: rules, assemblies and code clauses.
//! This crate defines:
//! - the read contracts ([`RuleStore`], [`AssemblyStore`], [`ClauseStore`])
//! - [`StoreConnector`], which hands each workflow run its own session;
//!   the session is released when it is dropped, on every exit path
//! - [`InMemoryCatalog`], a deterministic backend loaded from a [`Catalog`]
//!   file or built up in code
//!
//! Stores are read-only for the duration of a run. Backends must tolerate
//! concurrent reads from sessions held by different runs.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod model;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryCatalog, InMemorySession};
pub use model::Catalog;
pub use traits::{AssemblyStore, ClauseStore, ComplianceStore, RuleStore, StoreConnector};
