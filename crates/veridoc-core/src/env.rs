//! # Environment Lookup Capability
//!
//! Pattern rules cross-check extracted names against environment
//! variables. That lookup is global state, so it sits behind a trait:
//! production code injects [`ProcessEnv`], tests inject [`FixedEnv`] with
//! a deterministic mapping.

use std::collections::HashMap;

/// Resolves environment-variable names to values.
pub trait EnvLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed in-memory environment for deterministic lookups.
#[derive(Debug, Default, Clone)]
pub struct FixedEnv {
    values: HashMap<String, String>,
}

impl FixedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl EnvLookup for FixedEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_env_resolves_only_known_names() {
        let env = FixedEnv::new().set("HOME_DIR", "/home/x");
        assert_eq!(env.lookup("HOME_DIR"), Some("/home/x".to_string()));
        assert_eq!(env.lookup("MISSING"), None);
    }
}
