//! # veridoc-engine — Validation Orchestration
//!
//! Ties the independent checks together into one validation pass and
//! defines the request/response contract shared by the CLI and the API.
//!
//! ## The Pass
//!
//! Every step of [`Engine::validate`] is always attempted, in a fixed
//! order: whitespace audit, pattern rules, path resolution, schema
//! checks, extensions. A failing unit (one rule, one schema, one
//! extension, one path spec) is recorded next to its siblings' successes
//! and never aborts them.
//!
//! ## Extensions
//!
//! Third-party checks plug in through the [`Extension`] trait and a
//! statically populated [`ExtensionRegistry`]; requests select
//! registered extensions by name. Panics inside an extension are
//! isolated into that extension's result.
//!
//! ## Crate Policy
//!
//! - No I/O besides what the schema checker does; callers read the input.
//! - Results are built fresh per call and never mutated afterwards.

pub mod extension;
pub mod orchestrator;
pub mod types;

pub use extension::{DocStats, Extension, ExtensionOutcome, ExtensionRegistry};
pub use orchestrator::Engine;
pub use types::{
    ExtensionResult, SchemaOutcome, ValidationRequest, ValidationResponse, ValidationSummary,
};
