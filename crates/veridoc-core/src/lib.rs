//! # veridoc-core — Foundational Types for veridoc
//!
//! This crate is the bedrock of the veridoc workspace. It defines the
//! generic document tree that every other crate operates on, together with
//! the two byte-level checks that need no tree at all.
//!
//! ## Key Design Principles
//!
//! 1. **Line-annotated tree.** Every node carries its 1-based source line,
//!    captured from the parser's event markers at build time. Line numbers
//!    are what turn a schema violation or a path match into something a
//!    human can locate in the input.
//!
//! 2. **Immutable documents.** A [`DocumentTree`] is built once from raw
//!    bytes and never mutated. All downstream checks borrow it.
//!
//! 3. **Injectable environment.** Pattern-rule cross-checks consult the
//!    process environment through the [`EnvLookup`] capability, never
//!    through `std::env` directly, so tests can substitute a fixed map.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veridoc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod env;
pub mod error;
pub mod format;
pub mod whitespace;

// Re-export primary types for ergonomic imports.
pub use document::{DocumentTree, Node, NodeValue, Scalar};
pub use env::{EnvLookup, FixedEnv, ProcessEnv};
pub use error::ParseError;
pub use format::{detect, is_unknown, DataFormat};
pub use whitespace::{audit, WhitespaceReport};
