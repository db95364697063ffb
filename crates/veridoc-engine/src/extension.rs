//! # Extension Point
//!
//! Extensions are extra document checks contributed from outside the
//! engine. They are statically registered and selected per request by
//! name; there is no runtime code loading. An extension that panics is
//! reported in its own result and never disturbs sibling extensions or
//! the surrounding call.
//!
//! Extension runs are not bounded by a deadline. Schema fetches are the
//! only timeout-bounded external calls in a validation pass; a deadline
//! here would need a cancellable execution boundary.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::types::ExtensionResult;

/// What an extension produced for one document.
#[derive(Debug, Default, Clone)]
pub struct ExtensionOutcome {
    pub messages: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// An extra document check.
pub trait Extension: Send + Sync {
    /// Stable name the request selects this extension by.
    fn name(&self) -> &str;

    /// Inspect the raw document bytes.
    fn run(&self, data: &[u8]) -> ExtensionOutcome;
}

/// Holds the registered extensions and runs request selections.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    extensions: Vec<Arc<dyn Extension>>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with the built-in extensions.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocStats));
        registry
    }

    pub fn register(&mut self, extension: Arc<dyn Extension>) {
        self.extensions.push(extension);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Extension>> {
        self.extensions.iter().find(|ext| ext.name() == name)
    }

    /// Run the extensions a selection spec names, in spec order.
    ///
    /// The spec is a comma- or newline-separated name list; blank entries
    /// are skipped. An unregistered name produces a result with
    /// `load_error` set and no execution.
    pub fn run_spec(&self, spec: &str, data: &[u8]) -> Vec<ExtensionResult> {
        let mut results = Vec::new();
        for raw in spec.split(|c| c == ',' || c == '\n') {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            match self.get(name) {
                None => results.push(ExtensionResult {
                    name: name.to_string(),
                    load_error: Some(format!("extension not registered: {name}")),
                    ..ExtensionResult::default()
                }),
                Some(extension) => {
                    let started = Instant::now();
                    let outcome = run_isolated(extension.as_ref(), data);
                    let execution_time_ms = started.elapsed().as_millis() as u64;
                    results.push(ExtensionResult {
                        name: extension.name().to_string(),
                        messages: outcome.messages,
                        warnings: outcome.warnings,
                        errors: outcome.errors,
                        load_error: None,
                        execution_time_ms,
                    });
                }
            }
        }
        results
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extensions.iter().map(|ext| ext.name()).collect();
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &names)
            .finish()
    }
}

/// Run one extension, converting a panic into a recorded error.
fn run_isolated(extension: &dyn Extension, data: &[u8]) -> ExtensionOutcome {
    match catch_unwind(AssertUnwindSafe(|| extension.run(data))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(extension = extension.name(), reason = %reason, "extension panicked");
            ExtensionOutcome {
                errors: vec![format!("extension panicked: {reason}")],
                ..ExtensionOutcome::default()
            }
        }
    }
}

/// Built-in extension reporting basic document statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocStats;

impl Extension for DocStats {
    fn name(&self) -> &str {
        "doc-stats"
    }

    fn run(&self, data: &[u8]) -> ExtensionOutcome {
        let text = String::from_utf8_lossy(data);
        let lines = text.split('\n').count();
        ExtensionOutcome {
            messages: vec![format!("document has {} bytes over {} lines", data.len(), lines)],
            ..ExtensionOutcome::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shout;

    impl Extension for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn run(&self, data: &[u8]) -> ExtensionOutcome {
            ExtensionOutcome {
                messages: vec![format!("{} bytes seen", data.len())],
                ..ExtensionOutcome::default()
            }
        }
    }

    struct Crash;

    impl Extension for Crash {
        fn name(&self) -> &str {
            "crash"
        }

        fn run(&self, _data: &[u8]) -> ExtensionOutcome {
            panic!("boom");
        }
    }

    fn registry() -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        registry.register(Arc::new(Shout));
        registry.register(Arc::new(Crash));
        registry
    }

    #[test]
    fn runs_selected_extensions_in_spec_order() {
        let results = registry().run_spec("shout", b"abc");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "shout");
        assert_eq!(results[0].messages, vec!["3 bytes seen"]);
        assert!(results[0].load_error.is_none());
    }

    #[test]
    fn unknown_name_yields_a_load_error_and_no_execution() {
        let results = registry().run_spec("nope", b"abc");
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].load_error.as_deref(),
            Some("extension not registered: nope")
        );
        assert!(results[0].messages.is_empty());
    }

    #[test]
    fn panic_is_isolated_and_siblings_still_run() {
        let results = registry().run_spec("crash,shout", b"xy");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].errors, vec!["extension panicked: boom"]);
        assert!(results[0].load_error.is_none());
        assert_eq!(results[1].messages, vec!["2 bytes seen"]);
    }

    #[test]
    fn spec_accepts_commas_newlines_and_blanks() {
        let results = registry().run_spec(" shout ,\n, shout\n", b"z");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.name == "shout"));
    }

    #[test]
    fn empty_spec_selects_nothing() {
        assert!(registry().run_spec("", b"z").is_empty());
    }

    #[test]
    fn doc_stats_counts_bytes_and_lines() {
        let results = ExtensionRegistry::builtin().run_spec("doc-stats", b"a: 1\nb: 2\n");
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].messages,
            vec!["document has 10 bytes over 3 lines"]
        );
    }
}
