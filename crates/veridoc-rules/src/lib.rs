//! # veridoc-rules — Regex Pattern Rules
//!
//! Applies named regex rules to the raw document bytes, line by line.
//! A rule with a capture group treats group 1 as an environment-variable
//! name and can cross-check it against the environment; the recorded data
//! is always the full match text. A rule without a capture group records
//! its matches verbatim.
//!
//! Failures stay scoped to their rule: a regex that does not compile
//! records an error on that rule's report and the remaining rules still
//! run. A missing environment variable is an error on the rule; it fails
//! the whole call only when the rule is strict.

use regex::Regex;
use serde::{Deserialize, Serialize};

use veridoc_core::EnvLookup;

/// Environment cross-check settings for a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvCheck {
    /// Look up capture group 1 in the environment.
    pub enabled: bool,
    /// Escalate a missing variable to a call-wide validation failure.
    pub strict: bool,
}

/// A named extraction rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRule {
    pub name: String,
    pub regex: String,
    #[serde(default)]
    pub check_env: Option<EnvCheck>,
}

/// The outcome of applying one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub name: String,
    pub check_env: bool,
    pub check_env_strict_mode: bool,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

/// Apply every rule to the input.
///
/// Returns one report per rule in input order (matches ordered by line,
/// then position) and the call-wide strict-failure flag: the OR, across
/// all rules and lines, of "strict rule hit a missing variable".
pub fn scan(
    rules: &[PatternRule],
    bytes: &[u8],
    env: &dyn EnvLookup,
) -> (Vec<PatternReport>, bool) {
    let content = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = content.split('\n').collect();

    let mut reports = Vec::with_capacity(rules.len());
    let mut strict_failure = false;

    for rule in rules {
        let mut report = PatternReport {
            name: rule.name.clone(),
            ..PatternReport::default()
        };
        if let Some(check) = &rule.check_env {
            report.check_env = check.enabled;
            report.check_env_strict_mode = check.strict;
        }

        match Regex::new(&rule.regex) {
            Err(err) => report.errors.push(format!("Invalid regex: {err}")),
            Ok(re) => {
                let has_group = re.captures_len() > 1;
                for (line_idx, line) in lines.iter().enumerate() {
                    for caps in re.captures_iter(line) {
                        let full = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                        report.data.push(full.to_string());
                        report
                            .messages
                            .push(format!("{} found on line {}", full, line_idx + 1));

                        if !has_group {
                            continue;
                        }
                        let var_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                        let Some(check) = &rule.check_env else {
                            continue;
                        };
                        if !check.enabled {
                            continue;
                        }
                        match env.lookup(var_name) {
                            Some(value) => {
                                report.env_values.push(format!("{var_name}={value}"));
                            }
                            None => {
                                report
                                    .errors
                                    .push(format!("Environment variable not found: {var_name}"));
                                if check.strict {
                                    strict_failure = true;
                                }
                            }
                        }
                    }
                }
            }
        }

        reports.push(report);
    }

    (reports, strict_failure)
}
